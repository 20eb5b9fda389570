use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file (defaults to config/default.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub debug: bool,

    /// Log file, or a directory to get one dated log per day
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[arg(long, global = true)]
    pub bit_depth: Option<u16>,

    #[arg(long, global = true)]
    pub rollover_hour: Option<u32>,

    /// Assign sequence indices in directory-listing order instead of capture time
    #[arg(long, global = true)]
    pub listing_order: bool,

    /// Write straight to the output path instead of a temporary file
    #[arg(long, global = true)]
    pub no_atomic: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a night directory of raw frames into one container file
    Container {
        source: PathBuf,
        output: PathBuf,
        /// Also write a CSV index next to the container
        #[arg(long)]
        index: bool,
    },
    /// Decode every raw frame into a PNG image
    Convert {
        source: PathBuf,
        output_dir: PathBuf,
        #[arg(long)]
        rotate: bool,
    },
    /// List the frame headers stored in a container
    Inspect { container: PathBuf },
    /// Summarise the time between consecutive frames
    Intervals { source: PathBuf },
}
