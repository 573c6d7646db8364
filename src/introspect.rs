//! Foreign-key discovery for SQLite databases.

use crate::error::Result;
use crate::models::DependencyGraph;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Open a SQLite database read-only and build its dependency graph
pub fn introspect_sqlite<P: AsRef<Path>>(path: P) -> Result<DependencyGraph> {
    let conn = Connection::open_with_flags(
        path.as_ref(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    dependency_graph(&conn)
}

/// Build the dependency graph of every user table reachable through `conn`
pub fn dependency_graph(conn: &Connection) -> Result<DependencyGraph> {
    let tables = user_tables(conn)?;
    // SQLite matches table names case-insensitively (ASCII only), while
    // foreign_key_list reports the target as written after REFERENCES
    let canonical: HashMap<String, &str> = tables
        .iter()
        .map(|t| (t.to_ascii_lowercase(), t.as_str()))
        .collect();
    let mut graph = DependencyGraph::new();

    for table in &tables {
        graph.add_table(table.clone());
        for target in foreign_key_targets(conn, table)? {
            let target = match canonical.get(&target.to_ascii_lowercase()) {
                Some(name) => name.to_string(),
                None => target,
            };
            graph.add_reference(table.clone(), target);
        }
    }

    debug!(
        tables = graph.len(),
        references = graph.edge_count(),
        "introspected sqlite schema"
    );
    Ok(graph)
}

fn user_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_'
         ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Tables referenced by `table`'s foreign keys. Composite keys show up once
/// per column, the caller's set collapses them.
fn foreign_key_targets(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA foreign_key_list({})",
        quote_ident(table)
    ))?;
    let targets = stmt
        .query_map([], |row| row.get::<_, String>("table"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(targets)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
