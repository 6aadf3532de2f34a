//! Paper screening command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use slr_core::{rank_records, PaperRecord, ReviewConfig};
use slr_review::ScreeningPipeline;

#[derive(Args)]
pub struct ScreenArgs {
    /// JSON file with already-fetched papers
    #[arg(long)]
    pub papers: PathBuf,

    /// Keep the N best-scoring papers
    #[arg(long)]
    pub top: Option<usize>,

    /// Directory with model checkpoints
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Write the ranked records as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(config_path: &Path, args: ScreenArgs) -> Result<()> {
    let mut config = ReviewConfig::load(config_path)?;
    if let Some(model_dir) = args.model_dir {
        config.model_dir = model_dir;
    }
    let top = args.top.unwrap_or(config.top_results);

    let contents = std::fs::read_to_string(&args.papers)
        .with_context(|| format!("reading {}", args.papers.display()))?;
    let papers: Vec<PaperRecord> = serde_json::from_str(&contents).context("parsing papers")?;
    if papers.is_empty() {
        println!("No papers found.");
        return Ok(());
    }

    let mut pipeline = ScreeningPipeline::new(&config);
    pipeline.load_models(&config.model_dir)?;
    let records = pipeline.screen(&papers, None)?;
    let ranked = rank_records(records, top);

    println!("{:<8} {:<9} {:<6} Title", "Score", "Decision", "Year");
    for record in &ranked {
        println!(
            "{:<8.3} {:<9} {:<6} {}",
            record.score,
            record.decision.to_string(),
            record.year,
            record.title
        );
    }

    if let Some(output) = args.output {
        let json = serde_json::to_string_pretty(&ranked)?;
        let written = match std::fs::write(&output, &json) {
            Ok(()) => output,
            Err(err) => {
                // Destination not writable; keep the run's results anyway
                let fallback = std::env::temp_dir().join(
                    output
                        .file_name()
                        .unwrap_or_else(|| std::ffi::OsStr::new("review_results.json")),
                );
                tracing::warn!(
                    path = %output.display(),
                    error = %err,
                    fallback = %fallback.display(),
                    "output path not writable, using fallback"
                );
                std::fs::write(&fallback, &json)
                    .with_context(|| format!("writing {}", fallback.display()))?;
                fallback
            }
        };
        println!("Saved {} records to {}", ranked.len(), written.display());
    }

    Ok(())
}
