//! Image carriers and grayscale secret images.
//!
//! Carriers are normalized to 8-bit RGB and flattened row-major with channels
//! interleaved, which is the unit order the LSB codecs address. Output is
//! always written as PNG: a lossy format would destroy the LSB plane.

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::error::StegoError;
use crate::stego::structured::SecretImage;

/// Channels per pixel after normalization.
const CARRIER_CHANNELS: usize = 3;

/// Errors that can occur while loading or saving image carriers.
#[derive(Error, Debug)]
pub enum ImageCarrierError {
    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("Pixel buffer of {len} bytes does not match {height}x{width}x{channels}")]
    ShapeMismatch {
        len: usize,
        height: usize,
        width: usize,
        channels: usize,
    },

    #[error(transparent)]
    Codec(#[from] StegoError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A carrier image as a flat pixel byte buffer plus its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCarrier {
    height: usize,
    width: usize,
    channels: usize,
    pixels: Vec<u8>,
}

impl ImageCarrier {
    /// Loads a carrier from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageCarrierError> {
        let image =
            image::open(path).map_err(|e| ImageCarrierError::ImageLoadError(e.to_string()))?;
        Ok(Self::from_image(&image))
    }

    /// Loads a carrier from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageCarrierError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ImageCarrierError::ImageLoadError(e.to_string()))?;
        Ok(Self::from_image(&image))
    }

    /// Converts any decoded image to an RGB carrier.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        debug!(width, height, "loaded image carrier");
        Self {
            height: height as usize,
            width: width as usize,
            channels: CARRIER_CHANNELS,
            pixels: rgb.into_raw(),
        }
    }

    /// Wraps an already flattened pixel buffer.
    pub fn from_pixels(
        height: usize,
        width: usize,
        channels: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageCarrierError> {
        if pixels.len() != height * width * channels {
            return Err(ImageCarrierError::ShapeMismatch {
                len: pixels.len(),
                height,
                width,
                channels,
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            pixels,
        })
    }

    /// Same shape, different pixel bytes. Used to wrap codec output.
    pub fn with_pixels(&self, pixels: Vec<u8>) -> Result<Self, ImageCarrierError> {
        Self::from_pixels(self.height, self.width, self.channels, pixels)
    }

    /// Addressable units: one per pixel byte.
    pub fn capacity_units(&self) -> usize {
        self.pixels.len()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Flattened row-major, channel-interleaved pixel bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn to_dynamic_image(&self) -> Result<DynamicImage, ImageCarrierError> {
        let shape_error = || ImageCarrierError::ShapeMismatch {
            len: self.pixels.len(),
            height: self.height,
            width: self.width,
            channels: self.channels,
        };
        let (w, h) = (self.width as u32, self.height as u32);
        match self.channels {
            1 => GrayImage::from_raw(w, h, self.pixels.clone())
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(shape_error),
            3 => RgbImage::from_raw(w, h, self.pixels.clone())
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(shape_error),
            4 => image::RgbaImage::from_raw(w, h, self.pixels.clone())
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(shape_error),
            _ => Err(shape_error()),
        }
    }

    /// Returns the carrier as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ImageCarrierError> {
        let mut bytes = Vec::new();
        self.to_dynamic_image()?
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ImageCarrierError::ImageSaveError(e.to_string()))?;
        Ok(bytes)
    }

    /// Saves the carrier as a PNG file, whatever the path's extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageCarrierError> {
        std::fs::write(path, self.to_png_bytes()?)?;
        Ok(())
    }
}

/// Loads any image file as a grayscale secret image.
pub fn load_secret_image<P: AsRef<Path>>(path: P) -> Result<SecretImage, ImageCarrierError> {
    let image = image::open(path).map_err(|e| ImageCarrierError::ImageLoadError(e.to_string()))?;
    secret_from_image(&image)
}

/// Converts a decoded image to 8-bit luma.
pub fn secret_from_image(image: &DynamicImage) -> Result<SecretImage, ImageCarrierError> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    Ok(SecretImage::new(
        height as usize,
        width as usize,
        gray.into_raw(),
    )?)
}

/// Encodes a secret image as a grayscale PNG.
pub fn secret_to_png_bytes(secret: &SecretImage) -> Result<Vec<u8>, ImageCarrierError> {
    let gray = GrayImage::from_raw(
        secret.width() as u32,
        secret.height() as u32,
        secret.pixels().to_vec(),
    )
    .ok_or(ImageCarrierError::ShapeMismatch {
        len: secret.pixels().len(),
        height: secret.height(),
        width: secret.width(),
        channels: 1,
    })?;
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ImageCarrierError::ImageSaveError(e.to_string()))?;
    Ok(bytes)
}
