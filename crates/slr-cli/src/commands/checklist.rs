//! PRISMA checklist scoring command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use slr_core::{HashingEmbedder, PrismaChecklist};
use slr_review::{PrismaChecker, RewardSystem};

#[derive(Args)]
pub struct ChecklistArgs {
    /// JSON file with checklist item scores; missing items count as 0
    #[arg(long)]
    pub file: PathBuf,
}

pub fn run(args: &ChecklistArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let checklist: PrismaChecklist =
        serde_json::from_str(&contents).context("parsing checklist")?;

    let checker = PrismaChecker::new(RewardSystem::new(Box::new(
        HashingEmbedder::for_abstracts(),
    )));
    let score = checker.evaluate_prisma_score(&checklist);

    for (name, value) in checklist.items() {
        println!("{name:<32} {value:.2}");
    }
    println!();
    println!("PRISMA Compliance Score: {score:.2}");

    Ok(())
}
