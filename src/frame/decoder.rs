use image::{ImageBuffer, Luma};
use log::trace;

use super::types::{BitDepth, PixelGrid, RawFrame};
use crate::config::SensorConfig;
use crate::error::DecodeError;

/// Turns raw sensor dumps into pixel grids of a fixed geometry.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    width: u32,
    height: u32,
}

impl FrameDecoder {
    pub fn new(sensor: &SensorConfig) -> Self {
        Self {
            width: sensor.width,
            height: sensor.height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks that `byte_len` bytes hold exactly one frame at `bit_depth`
    /// without touching the bytes themselves.
    pub fn validate_len(&self, byte_len: usize, bit_depth: u16) -> Result<BitDepth, DecodeError> {
        let depth = BitDepth::try_from(bit_depth)?;
        let bytes_per_sample = depth.bytes_per_sample();
        let actual = byte_len / bytes_per_sample;
        let trailing_bytes = byte_len % bytes_per_sample;
        let expected = self.sample_count();

        if actual != expected || trailing_bytes != 0 {
            return Err(DecodeError::ShapeMismatch {
                expected,
                actual,
                trailing_bytes,
            });
        }

        Ok(depth)
    }

    pub fn decode(&self, buffer: &[u8], bit_depth: u16) -> Result<RawFrame, DecodeError> {
        self.decode_named(buffer, bit_depth, None)
    }

    pub fn decode_named(
        &self,
        buffer: &[u8],
        bit_depth: u16,
        source_filename: Option<String>,
    ) -> Result<RawFrame, DecodeError> {
        let depth = self.validate_len(buffer.len(), bit_depth)?;
        trace!(
            "Decoding {} bytes as {}x{} at {} bits",
            buffer.len(),
            self.width,
            self.height,
            depth.bits()
        );

        let pixels = match depth {
            BitDepth::Eight => PixelGrid::Eight(self.reshape::<Luma<u8>>(buffer.to_vec())?),
            BitDepth::Sixteen => {
                let samples: Vec<u16> = buffer
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                PixelGrid::Sixteen(self.reshape::<Luma<u16>>(samples)?)
            }
        };

        Ok(RawFrame::new(pixels, depth, source_filename))
    }

    fn reshape<P>(
        &self,
        samples: Vec<P::Subpixel>,
    ) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, DecodeError>
    where
        P: image::Pixel,
    {
        let actual = samples.len();
        ImageBuffer::from_raw(self.width, self.height, samples).ok_or(DecodeError::ShapeMismatch {
            expected: self.sample_count(),
            actual,
            trailing_bytes: 0,
        })
    }
}
