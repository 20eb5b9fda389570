//! Codec and container tooling for all-sky camera raw frame dumps.
//!
//! This library provides functionality for:
//! - Decoding fixed-resolution 8/16-bit raw frames into pixel grids
//! - Deriving capture times from `HH_MM_SS_FFF` filenames with day rollover
//! - Packing a night of frames into a `.rcd` container with 112-byte headers
//! - Reading containers back and exporting frames as PNG images

pub mod cli;
pub mod config;
pub mod container;
pub mod error;
pub mod export;
pub mod frame;
pub mod logging;
pub mod source;
pub mod timestamp;

pub use config::Config;
pub use container::{ContainerFrameHeader, ContainerReader, ContainerWriter, HeaderBuilder, WriteReport};
pub use error::{AppError, DecodeError, Result, TimestampError, Warning};
pub use frame::{BitDepth, FrameDecoder, PixelGrid, RawFrame};
pub use timestamp::{CapturedTimestamp, TimestampDeriver};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging for library consumers that do not bring their own logger.
///
/// # Arguments
///
/// * `debug` - Whether to enable debug logging
/// * `log_file` - Optional path to a log file. If None, logs only go to the terminal.
pub fn initialize(debug: bool, log_file: Option<&str>) -> anyhow::Result<()> {
    logging::setup_logging(debug as u8, log_file)?;
    logging::log_app_start(VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty(), "Version should not be empty");
    }

    // Only test in this binary that installs the global logger.
    #[test]
    fn test_initialize_writes_dated_log_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        initialize(false, Some(tmp.path().to_str().unwrap())).unwrap();

        let path = logging::resolve_log_path(tmp.path(), chrono::Local::now().date_naive());
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains(&format!("Starting allsky_frames v{}", VERSION)));
    }
}
