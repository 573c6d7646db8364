use crate::error::{OrderError, Result};
use crate::models::{DependencyGraph, Table};
use std::collections::HashMap;
use std::collections::btree_set;
use tracing::{debug, trace, warn};

/// Per-run traversal marker for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    /// On the active traversal stack
    InProgress,
    Done,
}

/// A table whose references are still being walked
struct Frame<'g> {
    table: &'g str,
    references: btree_set::Iter<'g, String>,
}

/// Depth-first ordering over a borrowed graph.
///
/// Owns the visitation state and the result for exactly one run. The
/// traversal keeps its own stack of frames instead of recursing, so the
/// depth of a reference chain is limited by memory rather than the thread
/// stack.
struct Visitor<'g> {
    graph: &'g DependencyGraph,
    state: HashMap<&'g str, VisitState>,
    order: Vec<String>,
}

impl<'g> Visitor<'g> {
    fn new(graph: &'g DependencyGraph) -> Self {
        let state = graph
            .table_names()
            .map(|name| (name, VisitState::Unvisited))
            .collect();

        Visitor {
            graph,
            state,
            order: Vec::with_capacity(graph.len()),
        }
    }

    fn state_of(&self, table: &str) -> VisitState {
        self.state
            .get(table)
            .copied()
            .unwrap_or(VisitState::Unvisited)
    }

    /// Ensure `table` and everything it transitively references is in the
    /// order, dependencies first.
    fn visit(&mut self, table: &str) -> Result<()> {
        let graph = self.graph;
        let root = graph
            .get(table)
            .ok_or_else(|| OrderError::UnknownTable(table.to_string()))?;

        let mut stack: Vec<Frame<'g>> = Vec::new();
        match self.state_of(&root.name) {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => return Err(self.cycle(&root.name, &stack)),
            VisitState::Unvisited => self.enter(root, &mut stack),
        }

        while let Some(frame) = stack.last_mut() {
            let current = frame.table;
            match frame.references.next() {
                Some(reference) => match self.state_of(reference) {
                    // reached through another path already, e.g. a diamond
                    VisitState::Done => {}
                    VisitState::InProgress => return Err(self.cycle(reference, &stack)),
                    VisitState::Unvisited => {
                        let Some(next) = graph.get(reference) else {
                            warn!(table = current, reference = %reference, "reference to unknown table");
                            return Err(OrderError::MalformedGraph {
                                table: current.to_string(),
                                reference: reference.clone(),
                            });
                        };
                        self.enter(next, &mut stack);
                    }
                },
                None => {
                    stack.pop();
                    self.state.insert(current, VisitState::Done);
                    trace!(table = current, position = self.order.len(), "table ordered");
                    self.order.push(current.to_string());
                }
            }
        }

        Ok(())
    }

    fn enter(&mut self, table: &'g Table, stack: &mut Vec<Frame<'g>>) {
        self.state.insert(&table.name, VisitState::InProgress);
        stack.push(Frame {
            table: &table.name,
            references: table.references.iter(),
        });
    }

    /// Build the cycle error for a back-edge into `table`, which is on `stack`
    fn cycle(&self, table: &str, stack: &[Frame<'g>]) -> OrderError {
        let start = stack.iter().position(|f| f.table == table).unwrap_or(0);
        let mut path: Vec<String> = stack[start..]
            .iter()
            .map(|f| f.table.to_string())
            .collect();
        path.push(table.to_string());

        warn!(table, depth = stack.len(), "reference loop detected");
        OrderError::CycleDetected {
            table: table.to_string(),
            path,
        }
    }

    fn finish(self) -> Vec<String> {
        self.order
    }
}

/// Order every table in the graph so that referenced tables come first.
///
/// Roots are visited in name order and each table's references in name
/// order, so the same graph always produces the same sequence. On error no
/// partial order is returned.
pub fn order(graph: &DependencyGraph) -> Result<Vec<String>> {
    debug!(tables = graph.len(), references = graph.edge_count(), "ordering tables");

    let mut visitor = Visitor::new(graph);
    for table in graph.table_names() {
        visitor.visit(table)?;
    }

    let order = visitor.finish();
    debug!(tables = order.len(), "ordering complete");
    Ok(order)
}

/// Order only `roots` and the tables they transitively reference
pub fn order_subset<'a, I>(graph: &DependencyGraph, roots: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut visitor = Visitor::new(graph);
    for root in roots {
        visitor.visit(root)?;
    }

    let order = visitor.finish();
    debug!(tables = order.len(), "subset ordering complete");
    Ok(order)
}

/// Verify that the graph can be ordered, discarding the order itself
pub fn check(graph: &DependencyGraph) -> Result<()> {
    order(graph).map(|_| ())
}

/// A computed dependency-first order of tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOrder {
    tables: Vec<String>,
}

impl TableOrder {
    pub fn compute(graph: &DependencyGraph) -> Result<Self> {
        Ok(TableOrder {
            tables: order(graph)?,
        })
    }

    pub fn compute_subset<'a, I>(graph: &DependencyGraph, roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Ok(TableOrder {
            tables: order_subset(graph, roots)?,
        })
    }

    /// Order in which tables can be created or loaded
    pub fn creation_order(&self) -> &[String] {
        &self.tables
    }

    /// Order in which tables can be dropped or truncated
    pub fn teardown_order(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().rev().map(String::as_str)
    }

    pub fn position(&self, table: &str) -> Option<usize> {
        self.tables.iter().position(|t| t == table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
