//! plyprobe
//!
//! Inspect the vertex data of a PLY point cloud or Gaussian splat file.

mod app;
mod errors;
mod report;

use app::{App, LoggingConfig};
use clap::Parser;
use std::path::PathBuf;

/// plyprobe - PLY point cloud inspector
#[derive(Parser, Debug)]
#[command(name = "plyprobe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to PLY file to inspect
    file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let app = App::new()
        .with_logging(LoggingConfig {
            level: args.log_level,
        })
        .with_json(args.json);

    if let Err(e) = app.run(&args.file) {
        eprintln!("Error parsing PLY file: {}", e);
        std::process::exit(1);
    }
}
