//! Text commands - hide and recover an identifier and text in image LSBs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegocore::stego::{lsb_text, ImageCarrier};
use stegocore::StegoConfig;

use super::CommandExecutor;

/// Hide `<identifier>:<text>` (base64-framed) in the LSBs of an image.
///
/// The output is always PNG.
#[derive(Args, Debug)]
pub struct TextEmbedCommand {
    /// Carrier image (PNG, BMP)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Identifier stored before the separator (must not contain ':')
    #[arg(short, long)]
    pub identifier: String,

    /// Text to hide
    #[arg(short, long)]
    pub text: String,

    /// Output PNG file
    #[arg(short, long, default_value = "encoded_image.png")]
    pub output: PathBuf,
}

impl CommandExecutor for TextEmbedCommand {
    fn execute(&self, _config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;

        let pixels = lsb_text::embed(carrier.pixels(), &self.identifier, &self.text)
            .context("Failed to embed text")?;
        carrier
            .with_pixels(pixels)?
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!("Text embedded successfully: {}", self.output.display());
        Ok(())
    }
}

/// Recover the identifier and text hidden with `text-embed`.
#[derive(Args, Debug)]
pub struct TextExtractCommand {
    /// Stego image
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CommandExecutor for TextExtractCommand {
    fn execute(&self, _config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;

        let message = lsb_text::extract(carrier.pixels()).context("Failed to extract text")?;
        println!("Identifier: {}", message.identifier);
        println!("Text: {}", message.text);
        Ok(())
    }
}
