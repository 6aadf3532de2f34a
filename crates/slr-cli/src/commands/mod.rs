//! CLI subcommands

pub mod checklist;
pub mod screen;
pub mod train;
