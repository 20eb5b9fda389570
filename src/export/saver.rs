use image::imageops;
use log::debug;
use std::path::Path;

use crate::error::Result;
use crate::frame::{PixelGrid, RawFrame};

/// Encodes a decoded frame as a lossless greyscale image.
///
/// The format follows the extension of `output_path` (PNG in practice);
/// 16-bit frames stay 16-bit.
pub fn save_frame_image(frame: &RawFrame, output_path: &Path, rotate_180: bool) -> Result<()> {
    match &frame.pixels {
        PixelGrid::Eight(buf) if rotate_180 => imageops::rotate180(buf).save(output_path)?,
        PixelGrid::Eight(buf) => buf.save(output_path)?,
        PixelGrid::Sixteen(buf) if rotate_180 => imageops::rotate180(buf).save(output_path)?,
        PixelGrid::Sixteen(buf) => buf.save(output_path)?,
    }

    debug!(
        "Wrote {}x{} {}-bit image to {}",
        frame.width,
        frame.height,
        frame.bit_depth.bits(),
        output_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorConfig;
    use crate::frame::FrameDecoder;
    use tempfile::TempDir;

    fn decoder() -> FrameDecoder {
        FrameDecoder::new(&SensorConfig::new().with_resolution(4, 3))
    }

    #[test]
    fn test_16bit_png_keeps_depth() {
        let tmp = TempDir::new().unwrap();
        let buffer: Vec<u8> = (0u16..12).flat_map(|s| (s * 1000).to_le_bytes()).collect();
        let frame = decoder().decode(&buffer, 16).unwrap();
        let path = tmp.path().join("frame.png");

        save_frame_image(&frame, &path, false).unwrap();

        let img = image::open(&path).unwrap().into_luma16();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(1, 0)[0], 1000);
        assert_eq!(img.get_pixel(3, 2)[0], 11_000);
    }

    #[test]
    fn test_rotate_180() {
        let tmp = TempDir::new().unwrap();
        let buffer: Vec<u8> = (0..12).collect();
        let frame = decoder().decode(&buffer, 8).unwrap();
        let path = tmp.path().join("frame.png");

        save_frame_image(&frame, &path, true).unwrap();

        let img = image::open(&path).unwrap().into_luma8();
        assert_eq!(img.get_pixel(0, 0)[0], 11);
        assert_eq!(img.get_pixel(3, 2)[0], 0);
    }
}
