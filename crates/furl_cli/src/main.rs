//! Furl CLI
//!
//! Replays scripted scroll sessions against a collapsing header and reports
//! the header offset, state and content position after every step.

mod config;
mod replay;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::ScenarioConfig;
use crate::replay::{Frame, HeaderReport, Replay};

/// Collapsing header scroll coordination
#[derive(Parser, Debug)]
#[command(name = "furl")]
#[command(about = "Replay and inspect collapsing-header scroll sessions")]
#[command(version)]
struct Cli {
    /// Log behavior decisions (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scenario and print one frame per step
    Replay {
        /// Scenario file
        scenario: PathBuf,

        /// Print frames as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the header geometry a scenario lays out
    Inspect {
        /// Scenario file
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a sample scenario
    Init {
        /// Where to write the scenario
        #[arg(default_value = "scenario.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Replay { scenario, json } => {
            let config = ScenarioConfig::load(&scenario)?;
            let frames = replay::run(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&frames)?);
            } else {
                print_frames(&frames);
            }
        }
        Commands::Inspect { scenario, json } => {
            let config = ScenarioConfig::load(&scenario)?;
            let report = Replay::new(&config)?.header_report()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Init { path, force } => {
            ScenarioConfig::write_sample(&path, force)?;
            tracing::info!("Wrote sample scenario to {}", path.display());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_frames(frames: &[Frame]) {
    println!(
        "{:>4}  {:<7} {:>7}  {:<13} {:>7} {:>8} {:>8}",
        "step", "action", "offset", "state", "top", "scroll_y", "consumed"
    );
    for frame in frames {
        println!(
            "{:>4}  {:<7} {:>7}  {:<13} {:>7} {:>8} {:>8}{}",
            frame.step,
            frame.action,
            frame.header_offset,
            format!("{:?}", frame.header_state),
            frame.content_top,
            frame.content_scroll_y,
            frame.consumed,
            if frame.animating { "  ~" } else { "" }
        );
    }
}

fn print_report(report: &HeaderReport) {
    let container = report.container;
    println!(
        "container:         {}x{}",
        container.width(),
        container.height()
    );
    println!("height:            {}", report.height);
    println!("natural height:    {}", report.natural_height);
    println!("pinned row height: {}", report.pinned_row_height);
    println!("collapsible range: {}", report.collapsible_range);
    match report.scroll_rate {
        Some(rate) => println!("scroll rate:       {rate:.3}"),
        None => println!("scroll rate:       none (pass-through)"),
    }
    for (index, row) in report.rows.iter().enumerate() {
        println!(
            "row {index}: {}..{} x {}..{}",
            row.top, row.bottom, row.left, row.right
        );
    }
}
