//! Capacity command - report how much a carrier can hide under each codec.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegocore::stego::{lsb_text, structured, AudioCarrier, ImageCarrier};
use stegocore::StegoConfig;

use super::CommandExecutor;

/// Print the payload capacity of a carrier.
///
/// `.wav` files are treated as audio carriers, everything else as images.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier file
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CapacityCommand {
    fn is_audio(&self) -> bool {
        self.carrier
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("wav"))
            .unwrap_or(false)
    }

    fn report_audio(&self, config: &StegoConfig) -> Result<()> {
        let carrier = AudioCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load audio {}", self.carrier.display()))?;
        let params = &config.spectral;
        let samples = carrier.samples().len();

        println!("Audio carrier: {}", self.carrier.display());
        println!("  Sample rate: {} Hz", carrier.sample_rate());
        println!("  Channels: {} (first channel used)", carrier.source_channels());
        println!("  Samples: {} ({:.2}s)", samples, carrier.duration_secs());
        println!("  Spectral bits: {}", params.capacity_bits(samples));
        println!("  Max text: {} chars", params.max_text_chars(samples));
        Ok(())
    }

    fn report_image(&self) -> Result<()> {
        let carrier = ImageCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image {}", self.carrier.display()))?;
        let units = carrier.capacity_units();

        println!("Image carrier: {}", self.carrier.display());
        println!(
            "  Size: {}x{} ({} channels)",
            carrier.height(),
            carrier.width(),
            carrier.channels()
        );
        println!("  LSB bits: {}", units);
        println!(
            "  Max text: {} bytes of \"<identifier>:<text>\"",
            lsb_text::max_composite_bytes(units)
        );
        println!(
            "  Max secret image: {} pixels",
            structured::max_secret_pixels(units)
        );
        Ok(())
    }
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        if self.is_audio() {
            self.report_audio(config)
        } else {
            self.report_image()
        }
    }
}
