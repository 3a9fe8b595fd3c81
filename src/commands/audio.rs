//! Audio commands - hide and recover text in the spectrum of a WAV file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegocore::stego::AudioCarrier;
use stegocore::workflow::{embed_audio_text, extract_audio_text};
use stegocore::StegoConfig;

use super::CommandExecutor;

/// Hide text in a 16-bit PCM WAV file.
///
/// Stereo input is reduced to its first channel; the output is mono.
/// Extraction must use the same [spectral] settings as embedding.
#[derive(Args, Debug)]
pub struct AudioEmbedCommand {
    /// Carrier WAV file
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Text to hide (one byte per character)
    #[arg(short, long)]
    pub text: String,

    /// Output WAV file
    #[arg(short, long, default_value = "stego_audio.wav")]
    pub output: PathBuf,
}

impl CommandExecutor for AudioEmbedCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let carrier = AudioCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load audio {}", self.carrier.display()))?;

        let stego = embed_audio_text(&carrier, &self.text, &config.spectral)
            .context("Failed to embed text")?;
        stego
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!("Text embedded successfully: {}", self.output.display());
        Ok(())
    }
}

/// Recover text hidden with `audio-embed`.
#[derive(Args, Debug)]
pub struct AudioExtractCommand {
    /// Stego WAV file
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CommandExecutor for AudioExtractCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let carrier = AudioCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load audio {}", self.carrier.display()))?;

        let text =
            extract_audio_text(&carrier, &config.spectral).context("Failed to extract text")?;
        println!("{}", text);
        Ok(())
    }
}
