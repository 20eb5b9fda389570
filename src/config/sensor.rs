use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::frame::BitDepth;

/// Geometry and sample width of the sensor that produced the raw dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u16,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            bit_depth: 16,
        }
    }
}

impl SensorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_bit_depth(mut self, bit_depth: u16) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn depth(&self) -> std::result::Result<BitDepth, DecodeError> {
        BitDepth::try_from(self.bit_depth)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("Width and height must be greater than 0".to_string());
        }
        // Header stores both dimensions in 2-byte fields.
        if self.width > u16::MAX as u32 || self.height > u16::MAX as u32 {
            return Err(format!(
                "Resolution {}x{} does not fit the 2-byte header fields",
                self.width, self.height
            ));
        }
        self.depth().map_err(|e| e.to_string())?;
        Ok(())
    }
}
