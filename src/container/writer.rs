use log::{debug, info, warn};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::header::HeaderBuilder;
use crate::config::{Config, SequenceOrder};
use crate::error::{AppError, Result, Warning};
use crate::frame::FrameDecoder;
use crate::source::{self, file_name_of, has_extension};
use crate::timestamp::{self, CapturedTimestamp, TimestampDeriver};

/// One frame as it was laid down in the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    pub sequence_index: u32,
    pub filename: String,
    pub unix_epoch_seconds: i64,
    pub calendar_date: String,
    pub capture_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteReport {
    pub output_path: PathBuf,
    pub frames_written: usize,
    pub output_size: u64,
    pub records: Vec<FrameRecord>,
    pub warnings: Vec<Warning>,
}

struct Candidate {
    path: PathBuf,
    filename: String,
    timestamp: CapturedTimestamp,
}

/// Packs a night's worth of raw frames into a single `.rcd` container.
pub struct ContainerWriter {
    decoder: FrameDecoder,
    deriver: TimestampDeriver,
    builder: HeaderBuilder,
    bit_depth: u16,
    raw_extension: String,
    container_extension: String,
    order: SequenceOrder,
    atomic: bool,
}

impl ContainerWriter {
    pub fn new(config: &Config) -> Result<Self> {
        config.sensor.validate().map_err(AppError::InvalidSensor)?;

        Ok(Self {
            decoder: FrameDecoder::new(&config.sensor),
            deriver: TimestampDeriver::new(&config.timestamp),
            builder: HeaderBuilder::new(&config.header, &config.sensor)?,
            bit_depth: config.sensor.bit_depth,
            raw_extension: config.output.raw_extension.clone(),
            container_extension: config.output.container_extension.clone(),
            order: config.output.order,
            atomic: config.output.atomic,
        })
    }

    pub fn write_container(&self, source_directory: &Path, output_path: &Path) -> Result<WriteReport> {
        if !has_extension(output_path, &self.container_extension) {
            return Err(AppError::InvalidOutputExtension {
                path: output_path.to_path_buf(),
                expected: self.container_extension.clone(),
            });
        }
        source::ensure_source_directory(source_directory)?;

        let candidates = self.collect_candidates(source_directory)?;
        info!(
            "Writing {} frames from {} to {}",
            candidates.len(),
            source_directory.display(),
            output_path.display()
        );

        let mut warnings = Vec::new();
        if output_path.exists() {
            let warning = Warning::DestructiveOverwrite(output_path.to_path_buf());
            warn!("{}", warning);
            fs::remove_file(output_path)?;
            warnings.push(warning);
        }

        let target = if self.atomic {
            temp_path(output_path)
        } else {
            output_path.to_path_buf()
        };
        File::create(&target)?;

        let records = match self.append_frames(&candidates, &target) {
            Ok(records) => records,
            Err(e) => {
                if self.atomic {
                    let _ = fs::remove_file(&target);
                } else {
                    warn!("Container {} left truncated after error", target.display());
                }
                return Err(e);
            }
        };

        if self.atomic {
            OpenOptions::new().append(true).open(&target)?.sync_all()?;
            fs::rename(&target, output_path)?;
        }

        let output_size = fs::metadata(output_path)?.len();
        info!(
            "Wrote {} frames ({} bytes) to {}",
            records.len(),
            output_size,
            output_path.display()
        );

        Ok(WriteReport {
            output_path: output_path.to_path_buf(),
            frames_written: records.len(),
            output_size,
            records,
            warnings,
        })
    }

    fn collect_candidates(&self, source_directory: &Path) -> Result<Vec<Candidate>> {
        let directory_date = timestamp::directory_date(source_directory)?;

        let mut candidates = source::list_raw_frames(source_directory, &self.raw_extension)?
            .into_iter()
            .map(|path| -> Result<Candidate> {
                let filename = file_name_of(&path);
                let timestamp = self.deriver.derive(&filename, directory_date)?;
                Ok(Candidate {
                    path,
                    filename,
                    timestamp,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if self.order == SequenceOrder::Chronological {
            candidates.sort_by(|a, b| {
                a.timestamp
                    .epoch_millis()
                    .cmp(&b.timestamp.epoch_millis())
                    .then_with(|| a.filename.cmp(&b.filename))
            });
        }

        Ok(candidates)
    }

    fn append_frames(&self, candidates: &[Candidate], target: &Path) -> Result<Vec<FrameRecord>> {
        let mut records = Vec::with_capacity(candidates.len());

        for (sequence_index, candidate) in (0u32..).zip(candidates) {
            let payload = fs::read(&candidate.path)?;
            let depth = self.decoder.validate_len(payload.len(), self.bit_depth)?;
            let header = self.builder.build(sequence_index, &candidate.timestamp, depth);

            let mut file = OpenOptions::new().append(true).open(target)?;
            file.write_all(&header.to_bytes())?;
            file.write_all(&payload)?;

            debug!(
                "Appended frame {} ({}, t={})",
                sequence_index, candidate.filename, candidate.timestamp.unix_epoch_seconds
            );

            records.push(FrameRecord {
                sequence_index,
                filename: candidate.filename.clone(),
                unix_epoch_seconds: candidate.timestamp.unix_epoch_seconds,
                calendar_date: candidate.timestamp.calendar_date.to_string(),
                capture_time: format!(
                    "{:02}:{:02}:{:02}.{:03}",
                    candidate.timestamp.hour,
                    candidate.timestamp.minute,
                    candidate.timestamp.second,
                    candidate.timestamp.millisecond
                ),
            });
        }

        Ok(records)
    }
}

fn temp_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    output_path.with_file_name(name)
}
