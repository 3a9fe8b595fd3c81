//! stegocore - hide text or images in audio and image carriers
//!
//! Command-line front end for the codecs and the seal/sign workflows.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stegocore::logging::init_logging;
use stegocore::StegoConfig;

use commands::{
    AudioEmbedCommand, AudioExtractCommand, CapacityCommand, CommandExecutor, ImageEmbedCommand,
    ImageExtractCommand, SealCommand, SignCommand, TextEmbedCommand, TextExtractCommand,
    VerifyDocumentCommand, VerifyImageCommand,
};

/// stegocore - bit-exact steganographic codecs
///
/// Hides text in the spectrum of WAV audio, and text or grayscale images in
/// the least significant bits of PNG/BMP images.
#[derive(Parser)]
#[command(name = "stegocore")]
#[command(version)]
#[command(about = "Hide text or images in audio and image carriers")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (missing file means defaults)
    #[arg(long, global = true, default_value = "stegocore.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide text in a WAV file
    AudioEmbed(AudioEmbedCommand),

    /// Recover text from a WAV file
    AudioExtract(AudioExtractCommand),

    /// Hide an identifier and text in an image
    TextEmbed(TextEmbedCommand),

    /// Recover an identifier and text from an image
    TextExtract(TextExtractCommand),

    /// Hide a grayscale image in an image
    ImageEmbed(ImageEmbedCommand),

    /// Recover a grayscale image from an image
    ImageExtract(ImageExtractCommand),

    /// Hide an image under a fresh identifier and record its hash
    Seal(SealCommand),

    /// Check a sealed image against its recorded hash
    VerifyImage(VerifyImageCommand),

    /// Embed an encrypted signature in a document image
    Sign(SignCommand),

    /// Check a signed document against its record
    VerifyDocument(VerifyDocumentCommand),

    /// Show how much a carrier can hide
    Capacity(CapacityCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::AudioEmbed(cmd) => cmd,
            Commands::AudioExtract(cmd) => cmd,
            Commands::TextEmbed(cmd) => cmd,
            Commands::TextExtract(cmd) => cmd,
            Commands::ImageEmbed(cmd) => cmd,
            Commands::ImageExtract(cmd) => cmd,
            Commands::Seal(cmd) => cmd,
            Commands::VerifyImage(cmd) => cmd,
            Commands::Sign(cmd) => cmd,
            Commands::VerifyDocument(cmd) => cmd,
            Commands::Capacity(cmd) => cmd,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = StegoConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    init_logging(level)?;

    cli.command.executor().execute(&config)
}
