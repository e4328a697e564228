//! # CLI Module
//!
//! Command-line interface for the hue sorter. It plays the role of the
//! display layer: it starts the pipeline, watches progress through the
//! event channel, and renders the final hue-ordered listing.
//!
//! ## Usage
//! ```bash
//! # Sort a directory of images by hue
//! huesort sort ~/Pictures
//!
//! # JSON output
//! huesort sort ~/Pictures --output json
//!
//! # Include hidden files
//! huesort sort ~/Pictures --include-hidden
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use huesort::core::pipeline::{PipelineController, PipelineResult};
use huesort::error::{HueSorterError, Result};
use huesort::events::{Event, EventChannel, ScanEvent, StageEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// huesort - order an image gallery by dominant hue
#[derive(Parser, Debug)]
#[command(name = "huesort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort directories of images by their average hue
    Sort {
        /// Directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Stage poll interval in milliseconds
        #[arg(long, default_value = "25")]
        poll_interval_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths only, hue order)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sort {
            paths,
            output,
            include_hidden,
            poll_interval_ms,
        } => run_sort(paths, output, include_hidden, poll_interval_ms),
    }
}

/// A zero poll interval would turn every idle stage into a busy spin.
fn validate_poll_interval(poll_interval_ms: u64) -> Result<()> {
    if poll_interval_ms == 0 {
        return Err(HueSorterError::Config(
            "poll interval must be at least 1 millisecond".to_string(),
        ));
    }
    Ok(())
}

fn run_sort(
    paths: Vec<PathBuf>,
    output: OutputFormat,
    include_hidden: bool,
    poll_interval_ms: u64,
) -> Result<()> {
    validate_poll_interval(poll_interval_ms)?;

    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("huesort").bold().cyan(),
            style(env!("CARGO_PKG_VERSION")).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let controller = PipelineController::builder()
        .roots(paths)
        .include_hidden(include_hidden)
        .poll_interval(Duration::from_millis(poll_interval_ms))
        .build();

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Scan(ScanEvent::ImageFound { path }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.inc_length(1);
                        pb.set_message(
                            path.file_name().unwrap_or_default().to_string_lossy().to_string(),
                        );
                    }
                }
                Event::Stage(StageEvent::ItemInserted { inserted, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(inserted as u64);
                    }
                }
                Event::Pipeline(huesort::events::PipelineEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let running = controller.start(&sender);
    let result = running
        .wait()
        .map_err(HueSorterError::from)?;

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult) {
    term.write_line("").ok();
    term.write_line(&format!("{} Sort Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images processed in {:.1}s",
        style(result.total_images).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    if result.failed > 0 {
        term.write_line(&format!(
            "  {} images failed to load (listed first)",
            style(result.failed).yellow()
        ))
        .ok();
    }

    term.write_line("").ok();

    for item in &result.items {
        let line = if item.is_failed() {
            format!(
                "  {:>8} {}",
                style("failed").red(),
                item.path.display()
            )
        } else {
            format!(
                "  {:>7.1}° {}",
                style(item.sort_hue()).cyan(),
                item.path.display()
            )
        };
        term.write_line(&line).ok();
    }
}

fn print_json_results(result: &PipelineResult) {
    let output = serde_json::json!({
        "total_images": result.total_images,
        "failed": result.failed,
        "duration_ms": result.duration_ms,
        "items": result.items.iter().map(|item| {
            serde_json::json!({
                "path": item.path,
                "hue": item.hue,
                "average_color": item.average_color,
                "error": item.error,
            })
        }).collect::<Vec<_>>()
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn print_minimal_results(result: &PipelineResult) {
    for item in &result.items {
        println!("{}", item.path.display());
    }
}
