use image::{ImageBuffer, Luma};

use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = DecodeError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            other => Err(DecodeError::UnsupportedBitDepth(other)),
        }
    }
}

/// Single-channel pixel grid, row-major, `height` rows of `width` samples.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelGrid {
    Eight(ImageBuffer<Luma<u8>, Vec<u8>>),
    Sixteen(ImageBuffer<Luma<u16>, Vec<u16>>),
}

impl PixelGrid {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PixelGrid::Eight(buf) => buf.dimensions(),
            PixelGrid::Sixteen(buf) => buf.dimensions(),
        }
    }

    /// Sample at column `x`, row `y`, widened to 16 bits.
    pub fn sample(&self, x: u32, y: u32) -> Option<u16> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return None;
        }
        Some(match self {
            PixelGrid::Eight(buf) => buf.get_pixel(x, y)[0] as u16,
            PixelGrid::Sixteen(buf) => buf.get_pixel(x, y)[0],
        })
    }

    pub fn len(&self) -> usize {
        let (width, height) = self.dimensions();
        width as usize * height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct RawFrame {
    pub pixels: PixelGrid,
    pub bit_depth: BitDepth,
    pub width: u32,
    pub height: u32,
    pub source_filename: Option<String>,
}

impl RawFrame {
    pub fn new(pixels: PixelGrid, bit_depth: BitDepth, source_filename: Option<String>) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            pixels,
            bit_depth,
            width,
            height,
            source_filename,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.pixels.len()
    }
}
