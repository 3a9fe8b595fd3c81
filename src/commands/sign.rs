//! Sign commands - embed an encrypted signature in a document image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegocore::crypto::ChaChaCipher;
use stegocore::stego::ImageCarrier;
use stegocore::store::FileStore;
use stegocore::workflow::{sign_document, verify_document};
use stegocore::StegoConfig;

use super::CommandExecutor;

/// Encrypt a signature, hide it in a document image and store the key.
#[derive(Args, Debug)]
pub struct SignCommand {
    /// Document image (PNG, BMP)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Signature text
    #[arg(short, long)]
    pub signature: String,

    /// Output PNG file
    #[arg(short, long, default_value = "signed_document.png")]
    pub output: PathBuf,
}

impl CommandExecutor for SignCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;
        let mut store = FileStore::open(&config.store_path).with_context(|| {
            format!("Failed to open store {}", config.store_path.display())
        })?;

        let filename = self
            .carrier
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let signed = sign_document(
            &carrier,
            &self.signature,
            filename.as_deref(),
            &ChaChaCipher,
            &mut store,
        )?;
        signed
            .carrier
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!("Identifier: {}", signed.identifier);
        println!("Signed document saved to: {}", self.output.display());
        Ok(())
    }
}

/// Extract an embedded signature and check it against the stored record.
#[derive(Args, Debug)]
pub struct VerifyDocumentCommand {
    /// Signed document image
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CommandExecutor for VerifyDocumentCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;
        let store = FileStore::open(&config.store_path).with_context(|| {
            format!("Failed to open store {}", config.store_path.display())
        })?;

        let verification = verify_document(&carrier, &ChaChaCipher, &store)?;
        println!("Identifier: {}", verification.identifier);
        println!("{}", verification.outcome);
        if let Some(signature) = &verification.signature {
            println!("Signature: {}", signature);
        }
        Ok(())
    }
}
