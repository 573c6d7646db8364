use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tableorder")]
#[command(about = "Order tables so that foreign-key targets come first")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print tables in dependency-first order
    Order {
        #[command(flatten)]
        source: SourceArgs,
        /// Only order these tables and what they reference (repeatable)
        #[arg(long = "table", value_name = "NAME")]
        tables: Vec<String>,
        /// Print teardown order (dependents first) instead
        #[arg(long)]
        reverse: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Verify that the tables can be ordered
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the discovered dependency graph as a schema file
    Graph {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where the dependency graph comes from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// JSON schema file mapping each table to the tables it references
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
    /// SQLite database to read foreign keys from
    #[arg(long, value_name = "DB")]
    pub sqlite: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One table per line
    Text,
    /// JSON array of table names
    Json,
}
