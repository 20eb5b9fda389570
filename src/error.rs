use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Frame decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("Output path {path} must end in .{expected}")]
    InvalidOutputExtension { path: PathBuf, expected: String },

    #[error("Source directory does not exist or is not a directory: {0}")]
    MissingSourceDirectory(PathBuf),

    #[error("Output path exists and is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    #[error("Invalid sensor configuration: {0}")]
    InvalidSensor(String),

    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported bit depth {0}, expected 8 or 16")]
    UnsupportedBitDepth(u16),

    #[error("expected {expected} samples, got {actual} (+{trailing_bytes} trailing bytes)")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        trailing_bytes: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("directory name {0:?} does not start with a valid YYYYMMDD date")]
    InvalidDirectoryDate(String),

    #[error("filename {0:?} is not of the form HH_MM_SS_FFF")]
    InvalidTimeFields(String),
}

/// Non-fatal conditions surfaced alongside a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    DestructiveOverwrite(PathBuf),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DestructiveOverwrite(path) => {
                write!(f, "existing file {} was deleted before writing", path.display())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn corrupt_container(msg: impl Into<String>) -> Self {
        AppError::CorruptContainer(msg.into())
    }
}
