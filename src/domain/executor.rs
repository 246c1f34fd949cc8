//! Query executor trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// A single result row returned by the execution API
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Trait for remote SQL execution backends
#[async_trait]
pub trait QueryExecutor: Send + Sync + Debug {
    /// Execute the SQL and return the result rows
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MockQueryExecutor {
        rows: Vec<Row>,
        error: Option<String>,
        executed: Mutex<Vec<String>>,
    }

    impl MockQueryExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_rows(mut self, rows: serde_json::Value) -> Self {
            self.rows = serde_json::from_value(rows).expect("mock rows must be objects");
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// SQL statements this executor has run, in order
        pub fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryExecutor for MockQueryExecutor {
        async fn execute(&self, sql: &str) -> Result<Vec<Row>, DomainError> {
            self.executed.lock().unwrap().push(sql.to_string());

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            Ok(self.rows.clone())
        }
    }
}
