// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod aggregation;
mod classification;
mod config;
mod csv_load;
mod overtime;
mod record;
mod report;
mod shift;
mod sick_leave;
mod work_time;

mod classification_tests;

use aggregation::run_pipeline;
use config::PipelineConfig;
use csv_load::load_records;
use report::render_text_report;

// --- Error Handling ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON serialization failed: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

// --- CLI ---

/// Computes attendance, overtime and sick-leave statistics from a timesheet
/// planning export.
#[derive(Parser, Debug)]
#[command(name = "pointage", version)]
struct Cli {
    /// Semicolon-delimited, Latin-1 encoded planning export.
    input: PathBuf,

    /// Write the full report as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the text summary to this path instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let config = PipelineConfig::default();

    let records = load_records(&cli.input, &config)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    info!("Loaded {} records, running pipeline", records.len());

    let pipeline_report = run_pipeline(&records, &config);

    if let Some(json_path) = &cli.json {
        let json = serde_json::to_string_pretty(&pipeline_report).map_err(AppError::from)?;
        fs::write(json_path, json)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        info!("JSON report written to {}", json_path.display());
    }

    let text = render_text_report(&pipeline_report);
    match &cli.report {
        Some(report_path) => {
            fs::write(report_path, &text)
                .with_context(|| format!("failed to write {}", report_path.display()))?;
            info!("Text report written to {}", report_path.display());
        }
        None => print!("{}", text),
    }

    Ok(())
}
