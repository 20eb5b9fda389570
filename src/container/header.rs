//! Fixed 112-byte per-frame header of the `.rcd` container.
//!
//! Every multi-byte field is little-endian. Layout (byte offsets):
//!
//! ```text
//!   0  u32  magic
//!   4  u32  payload length in samples (width * height)
//!   8  u32  header length (112)
//!  12  u32  flags
//!  16  u32  sequence index
//!  20  u32  unix timestamp, whole seconds
//!  24  u16  frame count (1)
//!  26  u16  width
//!  28  u16  height
//!  30  u16  bit depth
//!  32  u16  reserved
//!  34  u16  reserved
//!  36  u16  camera id
//!  38  u16  hardware id
//!  40  u32  exposure
//!  44  u32  reserved
//!  48  [u8; 7] ASCII tag
//!  55  zero padding up to 112
//! ```

use crate::config::{HeaderConfig, SensorConfig};
use crate::error::{AppError, Result};
use crate::frame::BitDepth;
use crate::timestamp::CapturedTimestamp;

pub const HEADER_LEN: usize = 112;
pub const TAG_LEN: usize = 7;
const FRAME_COUNT: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFrameHeader {
    pub magic: u32,
    pub sample_count: u32,
    pub header_len: u32,
    pub flags: u32,
    pub sequence_index: u32,
    pub timestamp: u32,
    pub frame_count: u16,
    pub width: u16,
    pub height: u16,
    pub bit_depth: u16,
    pub reserved_a: u16,
    pub reserved_b: u16,
    pub camera_id: u16,
    pub hardware_id: u16,
    pub exposure: u32,
    pub reserved_c: u32,
    pub tag: [u8; TAG_LEN],
}

impl ContainerFrameHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..8].copy_from_slice(&self.sample_count.to_le_bytes());
        out[8..12].copy_from_slice(&self.header_len.to_le_bytes());
        out[12..16].copy_from_slice(&self.flags.to_le_bytes());
        out[16..20].copy_from_slice(&self.sequence_index.to_le_bytes());
        out[20..24].copy_from_slice(&self.timestamp.to_le_bytes());
        out[24..26].copy_from_slice(&self.frame_count.to_le_bytes());
        out[26..28].copy_from_slice(&self.width.to_le_bytes());
        out[28..30].copy_from_slice(&self.height.to_le_bytes());
        out[30..32].copy_from_slice(&self.bit_depth.to_le_bytes());
        out[32..34].copy_from_slice(&self.reserved_a.to_le_bytes());
        out[34..36].copy_from_slice(&self.reserved_b.to_le_bytes());
        out[36..38].copy_from_slice(&self.camera_id.to_le_bytes());
        out[38..40].copy_from_slice(&self.hardware_id.to_le_bytes());
        out[40..44].copy_from_slice(&self.exposure.to_le_bytes());
        out[44..48].copy_from_slice(&self.reserved_c.to_le_bytes());
        out[48..48 + TAG_LEN].copy_from_slice(&self.tag);
        // remaining bytes stay zero
        out
    }

    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(AppError::corrupt_container(format!(
                "header needs {} bytes, got {}",
                HEADER_LEN,
                buf.len()
            )));
        }

        let u32_at = |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let u16_at = |at: usize| u16::from_le_bytes([buf[at], buf[at + 1]]);

        let header_len = u32_at(8);
        if header_len as usize != HEADER_LEN {
            return Err(AppError::corrupt_container(format!(
                "unexpected header length {}",
                header_len
            )));
        }

        let bit_depth = u16_at(30);
        if BitDepth::try_from(bit_depth).is_err() {
            return Err(AppError::corrupt_container(format!(
                "unsupported bit depth {}",
                bit_depth
            )));
        }

        let (sample_count, width, height) = (u32_at(4), u16_at(26), u16_at(28));
        if sample_count != width as u32 * height as u32 {
            return Err(AppError::corrupt_container(format!(
                "sample count {} does not match {}x{}",
                sample_count, width, height
            )));
        }

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&buf[48..48 + TAG_LEN]);

        Ok(Self {
            magic: u32_at(0),
            sample_count,
            header_len,
            flags: u32_at(12),
            sequence_index: u32_at(16),
            timestamp: u32_at(20),
            frame_count: u16_at(24),
            width,
            height,
            bit_depth,
            reserved_a: u16_at(32),
            reserved_b: u16_at(34),
            camera_id: u16_at(36),
            hardware_id: u16_at(38),
            exposure: u32_at(40),
            reserved_c: u32_at(44),
            tag,
        })
    }

    /// Number of payload bytes that follow this header.
    pub fn payload_len(&self) -> Result<usize> {
        let depth = BitDepth::try_from(self.bit_depth)?;
        Ok(self.sample_count as usize * depth.bytes_per_sample())
    }

    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

/// Stamps configured constants and per-frame values into headers.
///
/// Per-frame inputs are trusted. Only the sensor geometry is checked,
/// since it has to fit the 2-byte width and height fields.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    magic: u32,
    flags: u32,
    camera_id: u16,
    hardware_id: u16,
    exposure: u32,
    tag: [u8; TAG_LEN],
    width: u16,
    height: u16,
}

impl HeaderBuilder {
    pub fn new(header: &HeaderConfig, sensor: &SensorConfig) -> Result<Self> {
        let dimension = |value: u32| {
            u16::try_from(value).map_err(|_| {
                AppError::InvalidSensor(format!(
                    "resolution {}x{} does not fit the 2-byte header fields",
                    sensor.width, sensor.height
                ))
            })
        };
        let (width, height) = (dimension(sensor.width)?, dimension(sensor.height)?);

        let mut tag = [0u8; TAG_LEN];
        for (dst, src) in tag.iter_mut().zip(header.tag.bytes()) {
            *dst = src;
        }

        Ok(Self {
            magic: header.magic,
            flags: header.flags,
            camera_id: header.camera_id,
            hardware_id: header.hardware_id,
            exposure: header.exposure,
            tag,
            width,
            height,
        })
    }

    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn build(
        &self,
        sequence_index: u32,
        timestamp: &CapturedTimestamp,
        bit_depth: BitDepth,
    ) -> ContainerFrameHeader {
        ContainerFrameHeader {
            magic: self.magic,
            sample_count: self.width as u32 * self.height as u32,
            header_len: HEADER_LEN as u32,
            flags: self.flags,
            sequence_index,
            timestamp: timestamp.header_seconds(),
            frame_count: FRAME_COUNT,
            width: self.width,
            height: self.height,
            bit_depth: bit_depth.bits(),
            reserved_a: 0,
            reserved_b: 0,
            camera_id: self.camera_id,
            hardware_id: self.hardware_id,
            exposure: self.exposure,
            reserved_c: 0,
            tag: self.tag,
        }
    }
}
