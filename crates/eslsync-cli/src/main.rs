use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use eslsync_core::{PipelineSettings, PricingMode, UpdateRecord};
use eslsync_pipeline::{normalize_rows, read_workbook, run_pipeline, EslClient, Sheet, SkippedRow};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eslsync-cli")]
#[command(about = "Push retail price exports to the ESL management API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize a workbook and submit it to the ESL API
    Convert(SheetArgs),
    /// Normalize a workbook and print the records without sending anything
    Preview(SheetArgs),
}

#[derive(Debug, Args)]
struct SheetArgs {
    /// Path to the `.xlsx` export
    file: PathBuf,
    /// Title rows above the header row (overrides `ESL_SHEET_SKIP_ROWS`)
    #[arg(long)]
    skip_rows: Option<usize>,
    /// Price derivation: auto, direct, or `tax_adjusted` (overrides `ESL_PRICING_MODE`)
    #[arg(long)]
    mode: Option<PricingMode>,
}

impl SheetArgs {
    fn apply(&self, settings: &mut PipelineSettings) {
        if let Some(skip_rows) = self.skip_rows {
            settings.sheet_skip_rows = skip_rows;
        }
        if let Some(mode) = self.mode {
            settings.pricing_mode = mode;
        }
    }
}

#[derive(Debug, Serialize)]
struct PreviewOutput {
    rows_attempted: usize,
    records: Vec<UpdateRecord>,
    skipped_rows: Vec<SkippedRow>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => run_convert(&args).await,
        Commands::Preview(args) => run_preview(&args),
    }
}

async fn run_convert(args: &SheetArgs) -> anyhow::Result<()> {
    let mut config = eslsync_core::load_app_config_from_env()?;
    args.apply(&mut config.pipeline);

    let sheet = load_sheet(&args.file, config.pipeline.sheet_skip_rows)?;
    let client = EslClient::new(&config.esl)?;
    let report = run_pipeline(&client, &config.pipeline, &sheet).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    let failed = report.failed_batches();
    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} batches failed (status {})",
            report.results.len(),
            report.overall_status()
        );
    }
    Ok(())
}

fn run_preview(args: &SheetArgs) -> anyhow::Result<()> {
    let mut settings = eslsync_core::load_pipeline_settings_from_env()?;
    args.apply(&mut settings);

    let sheet = load_sheet(&args.file, settings.sheet_skip_rows)?;
    let normalized = normalize_rows(&sheet, settings.pricing_mode);
    let output = PreviewOutput {
        rows_attempted: normalized.rows_attempted,
        records: normalized.records,
        skipped_rows: normalized.skipped,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_sheet(path: &Path, skip_rows: usize) -> anyhow::Result<Sheet> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let sheet = read_workbook(&bytes, skip_rows)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!(file = %path.display(), rows = sheet.rows().len(), "loaded workbook");
    Ok(sheet)
}

#[cfg(test)]
mod tests;
