use crate::error::{OrderError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// A table and the tables it references through foreign keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub references: BTreeSet<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            references: BTreeSet::new(),
        }
    }

    /// Tables this one must be ordered after
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(String::as_str)
    }

    pub fn references_self(&self) -> bool {
        self.references.contains(&self.name)
    }
}

/// Directed graph of tables, where an edge A -> B means "A references B"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    tables: BTreeMap<String, Table>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from (table, referenced tables) pairs.
    ///
    /// Referenced tables are not created implicitly; a reference to a name
    /// that never appears as a key stays dangling and is reported by
    /// [`DependencyGraph::validate`] or by ordering.
    pub fn from_adjacency<I, S, R>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut graph = Self::new();
        for (name, refs) in adjacency {
            let name = name.into();
            graph.add_table(name.clone());
            for reference in refs {
                graph.add_reference(name.clone(), reference);
            }
        }
        graph
    }

    /// Add a table with no references. Adding an existing table is a no-op.
    pub fn add_table(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.tables
            .entry(name.clone())
            .or_insert_with(|| Table::new(name));
    }

    /// Record that `table` references `reference`, creating `table` if needed
    pub fn add_reference(&mut self, table: impl Into<String>, reference: impl Into<String>) {
        let table = table.into();
        self.tables
            .entry(table.clone())
            .or_insert_with(|| Table::new(table))
            .references
            .insert(reference.into());
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Table names in lexicographic order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Referenced tables of `name`, or `None` if the table is unknown
    pub fn references(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.tables.get(name).map(|t| &t.references)
    }

    /// Total number of reference edges
    pub fn edge_count(&self) -> usize {
        self.tables.values().map(|t| t.references.len()).sum()
    }

    /// Check that every reference points at a table in the graph
    pub fn validate(&self) -> Result<()> {
        for table in self.tables.values() {
            for reference in table.references() {
                if !self.tables.contains_key(reference) {
                    return Err(OrderError::MalformedGraph {
                        table: table.name.clone(),
                        reference: reference.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Adjacency view: table name -> referenced names
    pub fn to_adjacency(&self) -> BTreeMap<String, Vec<String>> {
        self.tables
            .iter()
            .map(|(name, t)| (name.clone(), t.references.iter().cloned().collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_adjacency_collapses_duplicates() {
        let graph = DependencyGraph::from_adjacency([
            ("customers", vec![]),
            ("orders", vec!["customers", "customers"]),
        ]);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edge_count(), 1);
        let refs: Vec<_> = graph.get("orders").unwrap().references().collect();
        assert_eq!(refs, vec!["customers"]);
    }

    #[test]
    fn test_references_of_unknown_table() {
        let graph = DependencyGraph::from_adjacency([("a", Vec::<&str>::new())]);
        assert!(graph.references("a").unwrap().is_empty());
        assert!(graph.references("missing").is_none());
    }

    #[test]
    fn test_add_reference_creates_source() {
        let mut graph = DependencyGraph::new();
        graph.add_table("customers");
        graph.add_reference("orders", "customers");

        assert!(graph.contains("orders"));
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_validate_dangling_reference() {
        let graph = DependencyGraph::from_adjacency([("orders", vec!["customers"])]);

        match graph.validate() {
            Err(OrderError::MalformedGraph { table, reference }) => {
                assert_eq!(table, "orders");
                assert_eq!(reference, "customers");
            }
            other => panic!("expected MalformedGraph, got {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_flag() {
        let graph = DependencyGraph::from_adjacency([("employees", vec!["employees"])]);
        assert!(graph.get("employees").unwrap().references_self());
    }

    #[test]
    fn test_table_names_sorted() {
        let graph = DependencyGraph::from_adjacency([
            ("b", Vec::<&str>::new()),
            ("c", vec![]),
            ("a", vec![]),
        ]);
        let names: Vec<_> = graph.table_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
