use clap::Parser;
use std::process;
use tableorder::cli::{Cli, Commands};
use tableorder::cli_handlers;

fn main() {
    // Logs go to stderr so ordered output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Order {
            source,
            tables,
            reverse,
            format,
        } => cli_handlers::handle_order(&source, &tables, reverse, format),
        Commands::Check { source } => cli_handlers::handle_check(&source),
        Commands::Graph { source } => cli_handlers::handle_graph(&source),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
