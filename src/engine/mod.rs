//! Database Handle and Core Types
//!
//! The menu loop talks to the database only through the [`Database`] trait.
//! Production code uses [`postgres::PgSession`]; tests substitute in-memory
//! implementations.
//!
//! # Parameters
//! Every statement parameter is sent as text (`Option<String>`, `None` is SQL
//! NULL). Statements cast parameters server-side, so malformed numbers are
//! rejected by the database rather than by the client.

use std::future::Future;

use crate::error::Result;

pub mod postgres;

/// A single text parameter bound to a statement placeholder
pub type Param = Option<String>;

/// Query execution result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column names in result set
    pub columns: Vec<String>,

    /// Result rows, one value per column
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// Create a result from column names and rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }

    /// Look up a cell by row index and column name
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&serde_json::Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Open database handle
///
/// Exactly one handle exists per process. It is borrowed by one action at a
/// time and every call is awaited before the next one is issued.
pub trait Database {
    /// Run a statement that returns rows
    fn query(
        &self,
        sql: &str,
        params: &[Param],
    ) -> impl Future<Output = Result<QueryResult>> + Send;

    /// Run a statement that returns no rows, yielding the affected row count
    fn execute(&self, sql: &str, params: &[Param]) -> impl Future<Output = Result<u64>> + Send;
}
