//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// List management-plane collections page by page
#[derive(Parser, Debug)]
#[command(name = "resource-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the endpoint from the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the api-version from the config file
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Overall deadline for the command in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page of a collection and print the matching items
    List {
        #[command(flatten)]
        target: TargetArgs,

        /// Keep only items whose field equals a value (field=value, repeatable)
        #[arg(short, long = "match", value_name = "FIELD=VALUE")]
        matches: Vec<String>,

        /// Fail instead of fetching more than this many pages
        #[arg(long)]
        max_pages: Option<NonZeroUsize>,
    },

    /// Fetch a single page
    Page {
        /// Scope resource ID, not needed with --next-link
        #[arg(short, long, required_unless_present = "next_link")]
        scope: Option<String>,

        /// Collection below the scope as Namespace/collection
        #[arg(long)]
        collection: String,

        /// OData filter expression for the first page
        #[arg(long)]
        filter: Option<String>,

        /// Page-size hint for the first page
        #[arg(long)]
        top: Option<i64>,

        /// Continuation link from a previous page
        #[arg(long)]
        next_link: Option<String>,
    },

    /// Validate a resource ID and print its segments
    ParseId {
        /// Resource ID to parse
        id: String,

        /// Expected shape (subscription, resource-group, workspace, recoverable-database)
        #[arg(long)]
        shape: Option<String>,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Page { .. } => "page",
            Self::ParseId { .. } => "parse-id",
        }
    }
}

/// Where to list and what to ask for
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Scope resource ID, e.g. /subscriptions/{id}/resourceGroups/{rg}
    #[arg(short, long)]
    pub scope: String,

    /// Collection below the scope as Namespace/collection
    #[arg(long)]
    pub collection: String,

    /// OData filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Page-size hint
    #[arg(long)]
    pub top: Option<i64>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
