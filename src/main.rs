use allsky_frames::{
    cli::{CliArgs, Command},
    config::Config,
    container::{index_path, save_container_index, ContainerReader, ContainerWriter},
    export, logging, source,
    timestamp::{self, frame_intervals, IntervalSummary, TimestampDeriver},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::Path;

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    allsky_frames::initialize(cli_args.debug, cli_args.log_file.as_deref())?;

    let config = Config::load(&cli_args)?;
    logging::log_app_config(&config);

    match &cli_args.command {
        Command::Container { source, output, .. } => write_container(&config, source, output),
        Command::Convert {
            source, output_dir, ..
        } => {
            let report = export::convert_directory(source, output_dir, &config)
                .with_context(|| format!("Failed to convert frames in {}", source.display()))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Inspect { container } => inspect(container),
        Command::Intervals { source } => intervals(&config, source),
    }
}

fn write_container(config: &Config, source: &Path, output: &Path) -> Result<()> {
    let report = ContainerWriter::new(config)?
        .write_container(source, output)
        .with_context(|| format!("Failed to write container {}", output.display()))?;

    if config.output.write_index {
        save_container_index(&report.records, &index_path(&report.output_path))?;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn inspect(container: &Path) -> Result<()> {
    let reader = ContainerReader::open(container)
        .with_context(|| format!("Failed to open container {}", container.display()))?;

    println!("index,magic,timestamp,width,height,bit_depth,camera_id,tag,payload_bytes");
    let mut frames = 0;
    for frame in reader {
        let header = frame?.header;
        println!(
            "{},{:#010x},{},{},{},{},{},{},{}",
            header.sequence_index,
            header.magic,
            header.timestamp,
            header.width,
            header.height,
            header.bit_depth,
            header.camera_id,
            header.tag_str(),
            header.payload_len()?
        );
        frames += 1;
    }

    info!("{} holds {} frames", container.display(), frames);
    Ok(())
}

fn intervals(config: &Config, night_dir: &Path) -> Result<()> {
    let directory_date = timestamp::directory_date(night_dir)?;
    let deriver = TimestampDeriver::new(&config.timestamp);

    let stamps = source::list_raw_frames(night_dir, &config.output.raw_extension)?
        .iter()
        .map(|path| deriver.derive(&source::file_name_of(path), directory_date))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    match IntervalSummary::from_intervals(&frame_intervals(&stamps)) {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => warn!("Need at least two frames to measure intervals, found {}", stamps.len()),
    }
    Ok(())
}
