//! CLI module
//!
//! Command-line interface for listing collections.
//!
//! # Commands
//!
//! - `list` - Fetch every page and print the matching items
//! - `page` - Fetch a single page (first, or via `--next-link`)
//! - `parse-id` - Validate a resource ID and print its segments

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, TargetArgs};
pub use runner::Runner;
