//! Subcommand handlers. Each module owns its clap `Args` and a `run_*` entry point.

pub mod completions;
pub mod logs;
pub mod tickets;
pub mod ui;
