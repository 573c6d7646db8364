use thiserror::Error;

/// All possible errors while building or ordering a dependency graph
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Found reference loop while visiting table {table}: {path}", path = format_cycle(path))]
    CycleDetected { table: String, path: Vec<String> },

    #[error("Table {table} references unknown table {reference}")]
    MalformedGraph { table: String, reference: String },

    #[error("Table {0} not found")]
    UnknownTable(String),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrderError {
    /// True when the graph itself is cyclic, as opposed to malformed or unreadable
    pub fn is_cycle(&self) -> bool {
        matches!(self, OrderError::CycleDetected { .. })
    }
}

fn format_cycle(path: &[String]) -> String {
    path.join(" -> ")
}

/// Result type alias
pub type Result<T> = std::result::Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = OrderError::CycleDetected {
            table: "a".to_string(),
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Found reference loop while visiting table a: a -> b -> a"
        );
        assert!(err.is_cycle());
    }

    #[test]
    fn test_malformed_is_not_cycle() {
        let err = OrderError::MalformedGraph {
            table: "orders".to_string(),
            reference: "customers".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Table orders references unknown table customers"
        );
        assert!(!err.is_cycle());
    }
}
