//! Agent training command

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use slr_core::{PolicyKind, ReviewConfig};
use slr_review::{ReviewTrainer, TrainingSample};

#[derive(Args)]
pub struct TrainArgs {
    /// JSON file with labeled training samples
    #[arg(long)]
    pub data: PathBuf,

    /// Number of training epochs
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Directory for model checkpoints
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Abstract-filter architecture: value | actor-critic
    #[arg(long)]
    pub policy: Option<String>,
}

pub fn run(config_path: &Path, args: TrainArgs) -> Result<()> {
    let mut config = ReviewConfig::load(config_path)?;
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(model_dir) = args.model_dir {
        config.model_dir = model_dir;
    }
    if let Some(policy) = args.policy.as_deref() {
        config.abstract_policy = policy.parse::<PolicyKind>()?;
    }

    let contents = std::fs::read_to_string(&args.data)
        .with_context(|| format!("reading {}", args.data.display()))?;
    let samples: Vec<TrainingSample> =
        serde_json::from_str(&contents).context("parsing training samples")?;
    if samples.is_empty() {
        bail!("no training samples in {}", args.data.display());
    }

    let mut trainer = ReviewTrainer::new(config);
    trainer.load_models()?;
    let report = trainer.train(&samples);
    let model_dir = trainer.save_models()?;

    println!(
        "Trained {} epochs over {} samples",
        report.epochs.len(),
        samples.len()
    );
    if let Some(last) = report.epochs.last() {
        println!(
            "Final mean rewards: search {:.3}, abstract {:.3}, full-text {:.3}",
            last.search_mean, last.abstract_mean, last.fulltext_mean
        );
    }
    println!("Models saved to {}", model_dir.display());
    Ok(())
}
