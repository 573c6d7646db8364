//! Schema files: JSON objects mapping each table to the tables it references.

use crate::error::Result;
use crate::models::DependencyGraph;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// On-disk form of a dependency graph
pub type SchemaDocument = BTreeMap<String, Vec<String>>;

/// Parse a schema document from a JSON string
pub fn parse_schema(json: &str) -> Result<DependencyGraph> {
    let document: SchemaDocument = serde_json::from_str(json)?;
    Ok(DependencyGraph::from_adjacency(document))
}

/// Load a schema document from a file
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<DependencyGraph> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let graph = parse_schema(&contents)?;
    debug!(path = %path.display(), tables = graph.len(), "loaded schema file");
    Ok(graph)
}

/// Render a graph in the schema file format
pub fn to_schema_json(graph: &DependencyGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&graph.to_adjacency())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_schema() {
        let graph = parse_schema(
            r#"{
                "customers": [],
                "orders": ["customers"],
                "line_items": ["orders", "products", "orders"],
                "products": []
            }"#,
        )
        .unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.references("line_items").unwrap().contains("products"));
    }

    #[test]
    fn test_parse_schema_rejects_non_object() {
        let err = parse_schema(r#"["customers"]"#).unwrap_err();
        assert!(matches!(err, OrderError::Json(_)));
    }

    #[test]
    fn test_load_schema_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"a": ["b"], "b": []}}"#).unwrap();

        let graph = load_schema(file.path()).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_schema("/nonexistent/schema.json").unwrap_err();
        assert!(matches!(err, OrderError::Io(_)));
    }

    #[test]
    fn test_schema_json_reparses_to_same_graph() {
        let graph = parse_schema(r#"{"a": ["b"], "b": []}"#).unwrap();
        let json = to_schema_json(&graph).unwrap();
        assert_eq!(parse_schema(&json).unwrap(), graph);
    }
}
