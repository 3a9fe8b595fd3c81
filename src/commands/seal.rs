//! Seal commands - hide an image under a fresh identifier and verify it later.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegocore::crypto::Sha256Hasher;
use stegocore::stego::image::{load_secret_image, secret_to_png_bytes};
use stegocore::stego::ImageCarrier;
use stegocore::store::FileStore;
use stegocore::workflow::{seal_image, verify_image};
use stegocore::StegoConfig;

use super::CommandExecutor;

/// Hide a secret image and record its SHA-256 hash in the metadata store.
#[derive(Args, Debug)]
pub struct SealCommand {
    /// Carrier image (PNG, BMP)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Secret image to hide
    #[arg(short, long)]
    pub secret: PathBuf,

    /// Output PNG file
    #[arg(short, long, default_value = "sealed_image.png")]
    pub output: PathBuf,
}

impl CommandExecutor for SealCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;
        let secret = load_secret_image(&self.secret)
            .with_context(|| format!("Failed to load secret {}", self.secret.display()))?;
        let mut store = FileStore::open(&config.store_path).with_context(|| {
            format!("Failed to open store {}", config.store_path.display())
        })?;

        let sealed = seal_image(&carrier, &secret, &Sha256Hasher, &mut store)?;
        sealed
            .carrier
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!("Identifier: {}", sealed.identifier);
        println!("Sealed image saved to: {}", self.output.display());
        Ok(())
    }
}

/// Extract a sealed image and check it against the stored hash.
#[derive(Args, Debug)]
pub struct VerifyImageCommand {
    /// Sealed image
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Also write the recovered grayscale image here
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for VerifyImageCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;
        let store = FileStore::open(&config.store_path).with_context(|| {
            format!("Failed to open store {}", config.store_path.display())
        })?;

        let verification = verify_image(&carrier, &Sha256Hasher, &store)?;
        if let Some(output) = &self.output {
            fs::write(output, secret_to_png_bytes(&verification.image)?)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }

        println!("Identifier: {}", verification.identifier);
        println!("{}", verification.outcome);
        Ok(())
    }
}
