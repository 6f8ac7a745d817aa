//! CLI module for the Capacity Planner sync.
//!
//! This module provides the command-line flags and report formatting.

mod commands;
mod output;

pub use commands::{Cli, OutputFormat};
pub use output::OutputFormatter;
