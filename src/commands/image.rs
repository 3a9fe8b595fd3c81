//! Image commands - hide and recover a grayscale image inside another image.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegocore::stego::image::{load_secret_image, secret_to_png_bytes};
use stegocore::stego::{structured, ImageCarrier};
use stegocore::StegoConfig;

use super::CommandExecutor;

/// Hide a secret image (converted to grayscale) in the LSBs of a carrier.
///
/// The identifier keeps its first 16 characters.
#[derive(Args, Debug)]
pub struct ImageEmbedCommand {
    /// Carrier image (PNG, BMP)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Secret image to hide
    #[arg(short, long)]
    pub secret: PathBuf,

    /// Identifier written into the header
    #[arg(short, long)]
    pub identifier: String,

    /// Output PNG file
    #[arg(short, long, default_value = "encoded_image_with_id.png")]
    pub output: PathBuf,
}

impl CommandExecutor for ImageEmbedCommand {
    fn execute(&self, _config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;
        let secret = load_secret_image(&self.secret)
            .with_context(|| format!("Failed to load secret {}", self.secret.display()))?;

        let pixels = structured::embed(carrier.pixels(), &secret, &self.identifier)
            .context("Failed to embed image")?;
        carrier
            .with_pixels(pixels)?
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!(
            "Image {}x{} embedded successfully: {}",
            secret.height(),
            secret.width(),
            self.output.display()
        );
        Ok(())
    }
}

/// Recover a secret image hidden with `image-embed`.
#[derive(Args, Debug)]
pub struct ImageExtractCommand {
    /// Stego image
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Output PNG for the recovered grayscale image
    #[arg(short, long, default_value = "extracted_image.png")]
    pub output: PathBuf,
}

impl CommandExecutor for ImageExtractCommand {
    fn execute(&self, _config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;

        let extracted = structured::extract(carrier.pixels()).context("Failed to extract image")?;
        fs::write(&self.output, secret_to_png_bytes(&extracted.image)?)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!("Identifier: {}", extracted.identifier);
        println!(
            "Size: {}x{}",
            extracted.image.height(),
            extracted.image.width()
        );
        println!("Saved to: {}", self.output.display());
        Ok(())
    }
}
