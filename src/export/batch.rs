use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::saver::save_frame_image;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::frame::FrameDecoder;
use crate::source::{self, file_name_of};

const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub output_dir: PathBuf,
    pub images_written: Vec<PathBuf>,
}

/// Decodes every raw frame in `source_directory` into `<stem>.png` under `output_dir`.
pub fn convert_directory(
    source_directory: &Path,
    output_dir: &Path,
    config: &Config,
) -> Result<ConvertReport> {
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(AppError::OutputNotDirectory(output_dir.to_path_buf()));
    }

    let frames = source::list_raw_frames(source_directory, &config.output.raw_extension)?;
    fs::create_dir_all(output_dir)?;

    let decoder = FrameDecoder::new(&config.sensor);
    let mut images_written = Vec::with_capacity(frames.len());

    for path in frames {
        let filename = file_name_of(&path);
        let buffer = fs::read(&path)?;
        let frame = decoder.decode_named(&buffer, config.sensor.bit_depth, Some(filename))?;

        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let image_path = output_dir.join(format!("{}.{}", stem, IMAGE_EXTENSION));
        save_frame_image(&frame, &image_path, config.output.rotate_180)?;
        images_written.push(image_path);
    }

    info!(
        "Converted {} frames from {} into {}",
        images_written.len(),
        source_directory.display(),
        output_dir.display()
    );

    Ok(ConvertReport {
        output_dir: output_dir.to_path_buf(),
        images_written,
    })
}
