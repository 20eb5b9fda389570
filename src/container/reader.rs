use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use super::header::{ContainerFrameHeader, HEADER_LEN};
use crate::config::SensorConfig;
use crate::error::{AppError, Result};
use crate::frame::{FrameDecoder, RawFrame};

#[derive(Debug, Clone)]
pub struct ContainerFrame {
    pub header: ContainerFrameHeader,
    pub payload: Vec<u8>,
}

impl ContainerFrame {
    /// Decodes the payload using the geometry recorded in its own header.
    pub fn decode(&self) -> Result<RawFrame> {
        let sensor = SensorConfig::new()
            .with_resolution(self.header.width as u32, self.header.height as u32);
        let frame = FrameDecoder::new(&sensor).decode(&self.payload, self.header.bit_depth)?;
        Ok(frame)
    }
}

/// Sequential reader over `[header][payload]` pairs in written order.
pub struct ContainerReader<R: Read> {
    reader: R,
    offset: u64,
}

impl ContainerReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read> ContainerReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    pub fn next_frame(&mut self) -> Result<Option<ContainerFrame>> {
        let mut header_buf = [0u8; HEADER_LEN];
        let read = read_full(&mut self.reader, &mut header_buf)?;
        if read == 0 {
            return Ok(None);
        }
        if read < HEADER_LEN {
            return Err(AppError::corrupt_container(format!(
                "truncated header at offset {}: {} of {} bytes",
                self.offset, read, HEADER_LEN
            )));
        }

        let header = ContainerFrameHeader::parse(&header_buf)?;
        let expected = header.payload_len()?;

        // Grows with the bytes actually present, not the size the header claims.
        let mut payload = Vec::new();
        (&mut self.reader)
            .take(expected as u64)
            .read_to_end(&mut payload)?;
        if payload.len() < expected {
            return Err(AppError::corrupt_container(format!(
                "truncated payload for frame {}: {} of {} bytes",
                header.sequence_index,
                payload.len(),
                expected
            )));
        }

        self.offset += (HEADER_LEN + payload.len()) as u64;
        Ok(Some(ContainerFrame { header, payload }))
    }
}

impl<R: Read> Iterator for ContainerReader<R> {
    type Item = Result<ContainerFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeaderConfig;
    use crate::container::HeaderBuilder;
    use crate::frame::BitDepth;
    use crate::timestamp::TimestampDeriver;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn container_bytes(frames: u32) -> Vec<u8> {
        let sensor = SensorConfig::new().with_resolution(2, 2);
        let builder = HeaderBuilder::new(&HeaderConfig::default(), &sensor).unwrap();
        let ts = TimestampDeriver::default()
            .derive("20_00_00_000", NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
            .unwrap();

        let mut out = Vec::new();
        for i in 0..frames {
            out.extend_from_slice(&builder.build(i, &ts, BitDepth::Sixteen).to_bytes());
            out.extend((0..8).map(|b| b as u8 + i as u8));
        }
        out
    }

    #[test]
    fn test_reads_frames_in_order() {
        let frames: Vec<ContainerFrame> = ContainerReader::new(Cursor::new(container_bytes(3)))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(frames.len(), 3);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.header.sequence_index, i as u32);
            assert_eq!(frame.payload.len(), 8);
            assert_eq!(frame.payload[0], i as u8);
        }

        let decoded = frames[1].decode().unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 2));
        assert_eq!(decoded.pixels.sample(0, 0), Some(u16::from_le_bytes([1, 2])));
    }

    #[test]
    fn test_empty_container_has_no_frames() {
        assert_eq!(ContainerReader::new(Cursor::new(Vec::new())).count(), 0);
    }

    #[test]
    fn test_truncated_header() {
        let mut bytes = container_bytes(1);
        bytes.extend_from_slice(&[0u8; 40]);
        let results: Vec<Result<ContainerFrame>> = ContainerReader::new(Cursor::new(bytes)).collect();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(AppError::CorruptContainer(_))));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = container_bytes(1);
        bytes.truncate(HEADER_LEN + 3);
        let mut reader = ContainerReader::new(Cursor::new(bytes));
        assert!(matches!(reader.next_frame(), Err(AppError::CorruptContainer(_))));
    }

    #[test]
    fn test_oversized_header_with_short_payload() {
        // 65535x65535 at 16 bits claims about 8 GiB of payload
        let sensor = SensorConfig::new().with_resolution(u16::MAX as u32, u16::MAX as u32);
        let ts = TimestampDeriver::default()
            .derive("20_00_00_000", NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
            .unwrap();
        let mut bytes = HeaderBuilder::new(&HeaderConfig::default(), &sensor)
            .unwrap()
            .build(0, &ts, BitDepth::Sixteen)
            .to_bytes()
            .to_vec();
        bytes.extend_from_slice(&[0u8; 16]);

        let mut reader = ContainerReader::new(Cursor::new(bytes));
        assert!(matches!(reader.next_frame(), Err(AppError::CorruptContainer(_))));
    }

    #[test]
    fn test_rejects_header_with_unsupported_bit_depth() {
        let mut bytes = container_bytes(1);
        bytes[30..32].copy_from_slice(&12u16.to_le_bytes());
        let mut reader = ContainerReader::new(Cursor::new(bytes));
        assert!(matches!(reader.next_frame(), Err(AppError::CorruptContainer(_))));
    }
}
