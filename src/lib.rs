//! Foreign-key aware table ordering for database migrations.
//!
//! Given tables and the tables each one references, [`order`] returns a
//! sequence in which every referenced table comes before the tables that
//! reference it, or reports the reference loop that makes such an order
//! impossible.

pub mod cli;
pub mod cli_handlers;
pub mod error;
pub mod graph;
pub mod introspect;
pub mod models;
pub mod schema;

pub use error::{OrderError, Result};
pub use graph::{TableOrder, check, order, order_subset};
pub use models::{DependencyGraph, Table};
