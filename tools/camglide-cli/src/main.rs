//! Camglide CLI — Inspect cursor logs and render stylized output offline.
//!
//! Usage:
//!   camglide validate <LOG>    Check a cursor log file
//!   camglide analyze <LOG>     Compute zoom keyframes and print statistics
//!   camglide render <LOG>      Render the session over a synthetic source

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "camglide",
    about = "Stylized screen-recording renders driven by cursor activity",
    version,
    author
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a cursor log file
    Validate {
        /// Path to the events.jsonl file
        log: PathBuf,
    },

    /// Compute zoom keyframes and print statistics
    Analyze {
        /// Path to the events.jsonl file
        log: PathBuf,

        /// Source width when the log header is missing
        #[arg(long)]
        source_width: Option<u32>,

        /// Source height when the log header is missing
        #[arg(long)]
        source_height: Option<u32>,

        /// Maximum zoom factor
        #[arg(long, default_value = "2.0")]
        max_zoom: f64,

        /// Write the keyframe trajectory as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Render the session over a synthetic source to a PNG sequence
    Render {
        /// Path to the events.jsonl file
        log: PathBuf,

        /// Output directory for the PNG frames
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output width
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Output height
        #[arg(long, default_value = "720")]
        height: u32,

        /// Output frame rate (30 or 60)
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Seconds to render (default: one second past the last sample)
        #[arg(long)]
        duration: Option<f64>,

        /// Background gradient: midnight, ocean, sunset, forest, graphite
        #[arg(long, default_value = "midnight")]
        background: String,

        /// Disable cursor-driven zoom
        #[arg(long)]
        no_zoom: bool,

        /// Maximum zoom factor
        #[arg(long, default_value = "2.0")]
        max_zoom: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    camglide_common::logging::init_logging(&camglide_common::config::LoggingConfig {
        level: camglide_common::logging::filter_for_verbosity(cli.verbose),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Validate { log } => commands::validate::run(log),
        Commands::Analyze {
            log,
            source_width,
            source_height,
            max_zoom,
            json,
        } => commands::analyze::run(log, source_width, source_height, max_zoom, json),
        Commands::Render {
            log,
            output,
            width,
            height,
            fps,
            duration,
            background,
            no_zoom,
            max_zoom,
        } => {
            commands::render::run(
                log, output, width, height, fps, duration, background, !no_zoom, max_zoom,
            )
            .await
        }
    }
}
