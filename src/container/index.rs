use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::writer::FrameRecord;

/// Sidecar path for a container: `night.rcd` -> `night.rcd.csv`.
pub fn index_path(container: &Path) -> PathBuf {
    let mut name = container.file_name().unwrap_or_default().to_os_string();
    name.push(".csv");
    container.with_file_name(name)
}

pub fn save_container_index(records: &[FrameRecord], save_path: &Path) -> Result<()> {
    info!("Saving container index to {}", save_path.display());

    let file = File::create(save_path)
        .with_context(|| format!("Failed to create index file at {}", save_path.display()))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "sequence_index,filename,unix_epoch_seconds,calendar_date,capture_time")
        .context("Failed to write header to index file")?;

    for record in records {
        writeln!(
            file,
            "{},{},{},{},{}",
            record.sequence_index,
            record.filename,
            record.unix_epoch_seconds,
            record.calendar_date,
            record.capture_time
        )
        .context("Failed to write frame record")?;
    }
    file.flush().context("Failed to flush index file")?;

    info!("Successfully saved index for {} frames", records.len());

    Ok(())
}
