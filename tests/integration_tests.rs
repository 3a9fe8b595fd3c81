//! Integration tests for stegocore
//!
//! Carriers go through the real WAV/PNG adapters and the file-backed store
//! wherever a codec is exercised end to end.
//!
//! LSB text extraction reads base64 characters until the first non-base64
//! byte, so text carriers here keep their trailing LSBs at zero.

use hound::{SampleFormat, WavSpec, WavWriter};
use image::{GrayImage, RgbImage};
use std::f64::consts::TAU;
use tempfile::TempDir;

use stegocore::crypto::{ChaChaCipher, Sha256Hasher};
use stegocore::stego::image::load_secret_image;
use stegocore::stego::{lsb_text, spectral, structured};
use stegocore::store::{FileStore, MetadataStore, Record};
use stegocore::workflow::{
    embed_audio_text, extract_audio_text, seal_image, sign_document, verify_document,
    verify_image, AuthOutcome,
};
use stegocore::{
    AudioCarrier, BitSequence, ImageCarrier, SecretImage, SpectralParams, StegoConfig, StegoError,
};

/// A pure tone on an exact DFT bin below the default embedding window.
fn sine(len: usize, bin: f64, amplitude: f64) -> Vec<i16> {
    (0..len)
        .map(|i| (amplitude * (TAU * bin * i as f64 / len as f64).sin()).round() as i16)
        .collect()
}

/// Pixel bytes with varied high bits and every LSB cleared.
fn even_pixels(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 37) % 251) as u8 & 0xFE).collect()
}

/// Pixel bytes covering every value, LSBs included.
fn noisy_pixels(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 131 + 7) % 256) as u8).collect()
}

/// Test scenario A: "HI" becomes 24 bits and survives the spectral codec
#[test]
fn test_spectral_hi_scenario() {
    let mut bits = BitSequence::from_latin1("HI").unwrap();
    bits.push_uint(u64::from(spectral::MARKER), 8);
    assert_eq!(bits.len(), 24);
    assert_eq!(bits.to_string(), "010010000100100110101011");

    let params = SpectralParams::default();
    let carrier = sine(1024, 17.0, 5000.0);
    let stego = spectral::embed(&carrier, "HI", &params).unwrap();
    assert_eq!(spectral::extract(&stego, &params).unwrap(), "HI");
}

/// Test scenario B: 2x2 secret with an 8-character identifier
#[test]
fn test_structured_scenario_b() {
    let carrier = noisy_pixels(192);
    let secret = SecretImage::new(2, 2, vec![10, 20, 30, 40]).unwrap();
    assert_eq!(secret.required_bits(), 192);

    let stego = structured::embed(&carrier, &secret, "abcd1234").unwrap();
    let extracted = structured::extract(&stego).unwrap();

    assert_eq!(extracted.identifier, "abcd1234");
    assert_eq!(extracted.image.height(), 2);
    assert_eq!(extracted.image.width(), 2);
    assert_eq!(extracted.image.pixels(), &[10, 20, 30, 40]);
}

/// Test scenario C: identifiers keep only their first 16 characters
#[test]
fn test_structured_identifier_truncated() {
    let carrier = noisy_pixels(512);
    let secret = SecretImage::new(1, 3, vec![1, 2, 3]).unwrap();

    let stego = structured::embed(&carrier, &secret, "0123456789abcdefGHIJ").unwrap();
    let extracted = structured::extract(&stego).unwrap();
    assert_eq!(extracted.identifier, "0123456789abcdef");
}

/// Test that capacity is checked before anything is written
#[test]
fn test_capacity_guard() {
    let secret = SecretImage::new(2, 2, vec![10, 20, 30, 40]).unwrap();
    assert_eq!(
        structured::embed(&noisy_pixels(191), &secret, "abcd1234"),
        Err(StegoError::CapacityExceeded {
            required: 192,
            available: 191
        })
    );

    let params = SpectralParams::default();
    assert!(matches!(
        spectral::embed(&sine(247, 5.0, 3000.0), "HI", &params),
        Err(StegoError::CapacityExceeded { .. })
    ));

    // "id:x" is 8 base64 chars, 64 bits
    assert!(matches!(
        lsb_text::embed(&even_pixels(63), "id", "x"),
        Err(StegoError::CapacityExceeded {
            required: 64,
            available: 63
        })
    ));
    assert!(lsb_text::embed(&even_pixels(64), "id", "x").is_ok());
}

/// Test that embedding only ever touches the lowest bit of each byte
#[test]
fn test_lsb_isolation() {
    let carrier = noisy_pixels(4096);
    let secret = SecretImage::new(8, 8, (0..64).map(|i| (i * 4) as u8).collect()).unwrap();
    let stego = structured::embed(&carrier, &secret, "isolation").unwrap();

    assert_eq!(stego.len(), carrier.len());
    for (before, after) in carrier.iter().zip(&stego) {
        assert_eq!(before & 0xFE, after & 0xFE);
    }
    // beyond the payload the carrier is untouched
    let used = secret.required_bits();
    assert_eq!(&stego[used..], &carrier[used..]);
}

/// Test that the caller's carrier is left as it was
#[test]
fn test_embed_does_not_mutate_input() {
    let pixels = even_pixels(1024);
    let snapshot = pixels.clone();
    let _ = lsb_text::embed(&pixels, "doc", "hello").unwrap();
    assert_eq!(pixels, snapshot);

    let samples = sine(2048, 9.0, 4000.0);
    let snapshot = samples.clone();
    let _ = spectral::embed(&samples, "hello", &SpectralParams::default()).unwrap();
    assert_eq!(samples, snapshot);
}

/// Test spatial text round trip through a PNG file
#[test]
fn test_text_roundtrip_through_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stego.png");

    let carrier = ImageCarrier::from_pixels(24, 24, 3, even_pixels(24 * 24 * 3)).unwrap();
    let pixels = lsb_text::embed(carrier.pixels(), "a1b2c3", "Hello, world").unwrap();
    carrier.with_pixels(pixels).unwrap().save(&path).unwrap();

    let loaded = ImageCarrier::from_file(&path).unwrap();
    assert_eq!((loaded.height(), loaded.width()), (24, 24));
    let message = lsb_text::extract(loaded.pixels()).unwrap();
    assert_eq!(message.identifier, "a1b2c3");
    assert_eq!(message.text, "Hello, world");
}

/// Test that a BMP carrier can be read and the result saved as PNG
#[test]
fn test_bmp_carrier_to_png() {
    let dir = TempDir::new().unwrap();
    let bmp_path = dir.path().join("carrier.bmp");
    let out_path = dir.path().join("out.png");

    RgbImage::from_raw(20, 10, noisy_pixels(20 * 10 * 3))
        .unwrap()
        .save(&bmp_path)
        .unwrap();

    let carrier = ImageCarrier::from_file(&bmp_path).unwrap();
    assert_eq!(carrier.pixels(), noisy_pixels(600).as_slice());

    let secret = SecretImage::new(3, 5, (0..15).map(|i| i * 17).collect()).unwrap();
    let pixels = structured::embed(carrier.pixels(), &secret, "bmp").unwrap();
    carrier.with_pixels(pixels).unwrap().save(&out_path).unwrap();

    let extracted = structured::extract(ImageCarrier::from_file(&out_path).unwrap().pixels())
        .unwrap();
    assert_eq!(extracted.identifier, "bmp");
    assert_eq!(extracted.image, secret);
}

/// Test that color secrets are reduced to grayscale on load
#[test]
fn test_secret_image_loaded_as_grayscale() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secret.png");
    GrayImage::from_raw(3, 2, vec![0, 50, 100, 150, 200, 250])
        .unwrap()
        .save(&path)
        .unwrap();

    let secret = load_secret_image(&path).unwrap();
    assert_eq!(secret.height(), 2);
    assert_eq!(secret.width(), 3);
    assert_eq!(secret.pixels(), &[0, 50, 100, 150, 200, 250]);
}

/// Test spectral text round trip through a WAV file
#[test]
fn test_audio_roundtrip_through_wav() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stego.wav");
    let params = SpectralParams::default();

    let carrier = AudioCarrier::from_samples(22050, sine(4096, 11.0, 9000.0));
    let stego = embed_audio_text(&carrier, "the owl flies at midnight", &params).unwrap();
    stego.save(&path).unwrap();

    let loaded = AudioCarrier::from_file(&path).unwrap();
    assert_eq!(loaded.sample_rate(), 22050);
    assert_eq!(loaded.samples(), stego.samples());
    assert_eq!(
        extract_audio_text(&loaded, &params).unwrap(),
        "the owl flies at midnight"
    );
}

/// Test that a carrier of realistic length keeps its payload
#[test]
fn test_long_wav_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("long.wav");
    let params = SpectralParams::default();

    // about 1.5s at 44.1kHz
    let carrier = AudioCarrier::from_samples(44100, sine(1 << 16, 7.0, 3000.0));
    embed_audio_text(&carrier, "hello", &params)
        .unwrap()
        .save(&path)
        .unwrap();

    let loaded = AudioCarrier::from_file(&path).unwrap();
    assert_eq!(extract_audio_text(&loaded, &params).unwrap(), "hello");
}

/// Test that stereo input keeps only its first channel
#[test]
fn test_stereo_wav_uses_first_channel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stereo.wav");
    let left = sine(2048, 7.0, 6000.0);

    let spec = WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for (i, sample) in left.iter().enumerate() {
        writer.write_sample(*sample).unwrap();
        writer.write_sample(((i * 997) % 20000) as i16 - 10000).unwrap();
    }
    writer.finalize().unwrap();

    let carrier = AudioCarrier::from_file(&path).unwrap();
    assert_eq!(carrier.source_channels(), 2);
    assert_eq!(carrier.samples(), left.as_slice());

    let params = SpectralParams::default();
    let stego = embed_audio_text(&carrier, "left only", &params).unwrap();
    let reloaded = AudioCarrier::from_bytes(&stego.to_wav_bytes().unwrap()).unwrap();
    assert_eq!(reloaded.source_channels(), 1);
    assert_eq!(extract_audio_text(&reloaded, &params).unwrap(), "left only");
}

/// Test that extraction with different parameters does not recover the text
#[test]
fn test_spectral_params_must_match() {
    let embed_params = SpectralParams::default();
    let stego = spectral::embed(&sine(2048, 9.0, 4000.0), "secret", &embed_params).unwrap();

    let shifted = SpectralParams {
        base_index: embed_params.base_index + 3,
        ..embed_params
    };
    assert_ne!(spectral::extract(&stego, &shifted).ok().as_deref(), Some("secret"));
}

/// Test sealing and verifying an image with the file-backed store
#[test]
fn test_seal_verify_with_file_store() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("records.toml");
    let carrier = ImageCarrier::from_pixels(32, 32, 3, noisy_pixels(32 * 32 * 3)).unwrap();
    let secret = SecretImage::new(6, 6, (0..36).map(|i| i * 7).collect()).unwrap();

    let sealed = {
        let mut store = FileStore::open(&store_path).unwrap();
        seal_image(&carrier, &secret, &Sha256Hasher, &mut store).unwrap()
    };
    let sealed_path = dir.path().join("sealed.png");
    sealed.carrier.save(&sealed_path).unwrap();

    // reopened from disk
    let store = FileStore::open(&store_path).unwrap();
    match store.find(&sealed.identifier).unwrap() {
        Some(Record::Image(record)) => assert_eq!(record.secret_size, "6x6"),
        other => panic!("unexpected record: {:?}", other),
    }

    let loaded = ImageCarrier::from_file(&sealed_path).unwrap();
    let verification = verify_image(&loaded, &Sha256Hasher, &store).unwrap();
    assert_eq!(verification.identifier, sealed.identifier);
    assert_eq!(verification.image, secret);
    assert_eq!(verification.outcome, AuthOutcome::Authenticated);
}

/// Test signing and verifying a document, including a forged signature
#[test]
fn test_sign_verify_document() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("records.toml");
    let carrier = ImageCarrier::from_pixels(40, 40, 3, even_pixels(40 * 40 * 3)).unwrap();

    let signed = {
        let mut store = FileStore::open(&store_path).unwrap();
        sign_document(
            &carrier,
            "Avery Quinn",
            Some("lease.png"),
            &ChaChaCipher,
            &mut store,
        )
        .unwrap()
    };

    let store = FileStore::open(&store_path).unwrap();
    let verification = verify_document(&signed.carrier, &ChaChaCipher, &store).unwrap();
    assert_eq!(verification.outcome, AuthOutcome::Authenticated);
    assert_eq!(verification.outcome.to_string(), "Document Authenticated");
    assert_eq!(verification.signature.as_deref(), Some("Avery Quinn"));

    // same identifier, different ciphertext
    let forged_pixels = lsb_text::embed(carrier.pixels(), &signed.identifier, "Zm9yZ2Vk").unwrap();
    let forged = carrier.with_pixels(forged_pixels).unwrap();
    let verification = verify_document(&forged, &ChaChaCipher, &store).unwrap();
    assert_eq!(verification.outcome, AuthOutcome::NotAuthenticated);
    assert_eq!(verification.outcome.to_string(), "Document Not Authenticated");
    assert!(verification.signature.is_none());
}

/// Test loading configuration from a TOML file
#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stegocore.toml");
    std::fs::write(
        &path,
        "store_path = \"/var/lib/stego/records.toml\"\n\
         [spectral]\n\
         base_index = 64\n\
         delta = 48.0\n\
         threshold = 24.0\n",
    )
    .unwrap();

    let config = StegoConfig::load(&path).unwrap();
    assert_eq!(config.spectral.base_index, 64);
    assert_eq!(config.spectral.delta, 48.0);
    assert_eq!(config.spectral.window_bits, SpectralParams::default().window_bits);
    assert_eq!(config.log_level, "info");

    let missing = StegoConfig::load(dir.path().join("absent.toml")).unwrap();
    assert_eq!(missing, StegoConfig::default());

    std::fs::write(&path, "[spectral]\ndelta = 10.0\nthreshold = 50.0\n").unwrap();
    assert!(StegoConfig::load(&path).is_err());
}
