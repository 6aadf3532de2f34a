//! SLR CLI - Command line interface for the review pipeline
//!
//! Papers arrive as JSON from the external search collaborator; this
//! binary trains the screening agents, ranks papers, and scores PRISMA
//! compliance checklists.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{checklist, screen, train};

#[derive(Parser)]
#[command(name = "slr", version, about = "Systematic literature review with cooperating RL agents")]
struct Cli {
    /// Optional TOML configuration file
    #[arg(long, global = true, default_value = "slr.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the screening agents on labeled review samples
    Train(train::TrainArgs),
    /// Screen already-fetched papers and rank the results
    Screen(screen::ScreenArgs),
    /// Score a PRISMA compliance checklist
    Checklist(checklist::ChecklistArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Train(args) => train::run(&cli.config, args),
        Commands::Screen(args) => screen::run(&cli.config, args),
        Commands::Checklist(args) => checklist::run(&args),
    };

    // A failed stage ends the run here; nothing downstream is half-computed.
    if let Err(err) = result {
        tracing::error!(error = %err, "run aborted");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
