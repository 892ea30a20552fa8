use clap::{Parser, Subcommand};
use std::path::PathBuf;
use birdcam_cli::commands::{inspect, nearest, readings, timeline};

#[derive(Parser)]
#[command(name = "birdcam")]
#[command(about = "BirdCam CLI - inspect the sensor log and photo timeline offline", long_about = None)]
struct Cli {
    /// Data directory holding sensor_data.ndjson and images/
    #[arg(long, short, global = true, default_value = ".")]
    dir: PathBuf,

    /// Civil zone offset used for capture keys
    #[arg(long, global = true, default_value = "+01:00", allow_hyphen_values = true)]
    utc_offset: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show status of the sensor log and photo directory
    Inspect,
    /// List photos newest first with their nearest sensor reading
    Timeline,
    /// List the sensor log newest first
    Readings {
        /// Also list lines that failed to decode
        #[arg(long)]
        show_skipped: bool,
    },
    /// Find the reading nearest to one capture key (YYYYMMDD_HHMMSS)
    Nearest {
        key: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect => inspect::run(&cli.dir, &cli.utc_offset),
        Commands::Timeline => timeline::run(&cli.dir, &cli.utc_offset),
        Commands::Readings { show_skipped } => readings::run(&cli.dir, &cli.utc_offset, show_skipped),
        Commands::Nearest { key } => nearest::run(&cli.dir, &cli.utc_offset, &key).map(|_| ()),
    }
}
