use crate::cli::{OutputFormat, SourceArgs};
use crate::graph::{self, TableOrder};
use crate::introspect::introspect_sqlite;
use crate::models::DependencyGraph;
use crate::schema::{load_schema, to_schema_json};
use anyhow::{Context, Result, bail};
use tracing::info;

/// Load the dependency graph from whichever source was given
pub fn load_graph(source: &SourceArgs) -> Result<DependencyGraph> {
    match (&source.schema, &source.sqlite) {
        (Some(path), _) => load_schema(path)
            .with_context(|| format!("failed to load schema file {}", path.display())),
        (None, Some(path)) => introspect_sqlite(path)
            .with_context(|| format!("failed to read foreign keys from {}", path.display())),
        (None, None) => bail!("no schema source given, use --schema or --sqlite"),
    }
}

/// Handle the order command
pub fn handle_order(
    source: &SourceArgs,
    tables: &[String],
    reverse: bool,
    format: OutputFormat,
) -> Result<()> {
    let graph = load_graph(source)?;

    let plan = if tables.is_empty() {
        TableOrder::compute(&graph)?
    } else {
        TableOrder::compute_subset(&graph, tables.iter().map(String::as_str))?
    };
    info!(tables = plan.len(), reverse, "computed table order");

    let names: Vec<&str> = if reverse {
        plan.teardown_order().collect()
    } else {
        plan.creation_order().iter().map(String::as_str).collect()
    };

    match format {
        OutputFormat::Text => {
            for name in names {
                println!("{name}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&names)?),
    }

    Ok(())
}

/// Handle the check command
pub fn handle_check(source: &SourceArgs) -> Result<()> {
    let graph = load_graph(source)?;
    graph.validate()?;
    graph::check(&graph)?;

    println!(
        "ok: {} tables, {} references",
        graph.len(),
        graph.edge_count()
    );
    Ok(())
}

/// Handle the graph command
pub fn handle_graph(source: &SourceArgs) -> Result<()> {
    let graph = load_graph(source)?;
    println!("{}", to_schema_json(&graph)?);
    Ok(())
}
