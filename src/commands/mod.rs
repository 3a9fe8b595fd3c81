//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod audio;
mod capacity;
mod image;
mod seal;
mod sign;
mod text;

pub use audio::{AudioEmbedCommand, AudioExtractCommand};
pub use capacity::CapacityCommand;
pub use image::{ImageEmbedCommand, ImageExtractCommand};
pub use seal::{SealCommand, VerifyImageCommand};
pub use sign::{SignCommand, VerifyDocumentCommand};
pub use text::{TextEmbedCommand, TextExtractCommand};

use anyhow::Result;
use stegocore::StegoConfig;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments and the loaded config.
    fn execute(&self, config: &StegoConfig) -> Result<()>;
}
