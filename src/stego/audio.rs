//! WAV audio carriers.
//!
//! Only 16-bit integer PCM is accepted. Multi-channel input is reduced to the
//! first channel of every interleaved frame on load; the other channels are
//! discarded. Output is written as mono at the source sample rate.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading or saving audio carriers.
#[derive(Error, Debug)]
pub enum AudioCarrierError {
    #[error("Audio load error: {0}")]
    AudioLoadError(String),

    #[error("Audio save error: {0}")]
    AudioSaveError(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

/// A single-channel 16-bit PCM carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCarrier {
    sample_rate: u32,
    /// Channel count of the source before reduction.
    source_channels: u16,
    samples: Vec<i16>,
}

impl AudioCarrier {
    /// Loads a carrier from a WAV file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioCarrierError> {
        let reader =
            WavReader::open(path).map_err(|e| AudioCarrierError::AudioLoadError(e.to_string()))?;
        Self::from_reader(reader)
    }

    /// Loads a carrier from WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AudioCarrierError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| AudioCarrierError::AudioLoadError(e.to_string()))?;
        Self::from_reader(reader)
    }

    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, AudioCarrierError> {
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(AudioCarrierError::UnsupportedFormat(format!(
                "Only 16-bit PCM WAV is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        let interleaved: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AudioCarrierError::AudioLoadError(e.to_string()))?;

        let channels = usize::from(spec.channels.max(1));
        let samples: Vec<i16> = interleaved.iter().step_by(channels).copied().collect();
        if channels > 1 {
            debug!(
                channels,
                frames = samples.len(),
                "multi-channel audio reduced to first channel"
            );
        }

        Ok(Self {
            sample_rate: spec.sample_rate,
            source_channels: spec.channels,
            samples,
        })
    }

    /// Wraps mono samples directly.
    pub fn from_samples(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            source_channels: 1,
            samples,
        }
    }

    /// Same format metadata, different samples. Used to wrap codec output.
    pub fn with_samples(&self, samples: Vec<i16>) -> Self {
        Self {
            sample_rate: self.sample_rate,
            source_channels: self.source_channels,
            samples,
        }
    }

    fn output_spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    fn write_samples<W: std::io::Write + Seek>(
        &self,
        mut writer: WavWriter<W>,
    ) -> Result<(), AudioCarrierError> {
        for sample in &self.samples {
            writer
                .write_sample(*sample)
                .map_err(|e| AudioCarrierError::AudioSaveError(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioCarrierError::AudioSaveError(e.to_string()))
    }

    /// Saves the carrier to a mono WAV file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioCarrierError> {
        let writer = WavWriter::create(path, self.output_spec())
            .map_err(|e| AudioCarrierError::AudioSaveError(e.to_string()))?;
        self.write_samples(writer)
    }

    /// Returns the carrier as mono WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, AudioCarrierError> {
        let mut bytes = Vec::new();
        {
            let writer = WavWriter::new(Cursor::new(&mut bytes), self.output_spec())
                .map_err(|e| AudioCarrierError::AudioSaveError(e.to_string()))?;
            self.write_samples(writer)?;
        }
        Ok(bytes)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn source_channels(&self) -> u16 {
        self.source_channels
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate.max(1))
    }
}
