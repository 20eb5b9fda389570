use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use fern::colors::{Color, ColoredLevelConfig};
use log::{debug, info, LevelFilter};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "allsky_frames";

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// A directory given as `--log-file` gets one dated file per processing day.
pub fn resolve_log_path(log_file: &Path, day: NaiveDate) -> PathBuf {
    if log_file.is_dir() {
        log_file.join(format!("{}_{}.log", LOG_FILE_PREFIX, day.format("%Y%m%d")))
    } else {
        log_file.to_path_buf()
    }
}

/// Terminal lines go to stderr so stdout stays clean for JSON reports.
pub fn setup_logging(verbosity: u8, log_file: Option<&str>) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let terminal = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                Local::now().format("[%H:%M:%S]"),
                colors.color(record.level()),
                message
            ))
        })
        .chain(io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(level_for(verbosity))
        .chain(terminal);

    if let Some(log_file) = log_file {
        let path = resolve_log_path(Path::new(log_file), Local::now().date_naive());
        let file = fern::log_file(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{}[{}][{}] {}",
                        Local::now().format("[%Y-%m-%d][%H:%M:%S%.3f]"),
                        record.target(),
                        record.level(),
                        message
                    ))
                })
                .chain(file),
        );
    }

    dispatch.apply()?;
    debug!("Debug logging enabled");
    Ok(())
}

pub fn log_app_start(version: &str) {
    info!("Starting allsky_frames v{}", version);
}

pub fn log_app_config(config: &Config) {
    debug!("Application configured with:");
    debug!("  Sensor:");
    debug!("    Resolution: {}x{}", config.sensor.width, config.sensor.height);
    debug!("    Bit depth: {}", config.sensor.bit_depth);
    debug!("  Header:");
    debug!("    Magic: {:#010x}", config.header.magic);
    debug!("    Camera id: {}", config.header.camera_id);
    debug!("    Tag: {}", config.header.tag);
    debug!("  Timestamp:");
    debug!("    Rollover hour: {}", config.timestamp.rollover_hour);
    debug!("  Output:");
    debug!("    Raw extension: .{}", config.output.raw_extension);
    debug!("    Container extension: .{}", config.output.container_extension);
    debug!("    Order: {:?}", config.output.order);
    debug!("    Atomic writes: {}", config.output.atomic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), LevelFilter::Info);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(5), LevelFilter::Trace);
    }

    #[test]
    fn test_log_directory_gets_dated_file() {
        let tmp = TempDir::new().unwrap();
        let day = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(
            resolve_log_path(tmp.path(), day),
            tmp.path().join("allsky_frames_20230615.log")
        );
    }

    #[test]
    fn test_log_file_path_is_kept() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("run.log");
        let day = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(resolve_log_path(&file, day), file);
    }
}
