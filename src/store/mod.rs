//! Record store module
//!
//! A single SQLite connection shared behind a mutex. Every query runs on
//! tokio's blocking pool so request tasks only suspend while waiting for it.
//! The generic operations mirror the three shapes the handlers need:
//! `get` (one optional row), `all` (every row) and `run` (a statement).

pub mod students;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

/// Positional statement parameters
pub type Params = Vec<Value>;

/// Errors raised by the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store connection lock poisoned")]
    Poisoned,
    #[error("blocking store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of a data-modifying statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// Rows inserted, updated or deleted
    pub changes: usize,
    pub last_insert_id: i64,
}

/// Shared handle to the SQLite connection
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open a database file; `:memory:` opens a private in-memory database
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard).map_err(StoreError::from)
        })
        .await?
    }

    /// Fetch the first row of a query, if any
    pub async fn get<T, F>(
        &self,
        sql: &str,
        params: Params,
        map: F,
    ) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sql = sql.to_owned();
        self.with_connection(move |conn| {
            conn.query_row(&sql, params_from_iter(params), map).optional()
        })
        .await
    }

    /// Fetch every row of a query
    pub async fn all<T, F>(&self, sql: &str, params: Params, map: F) -> Result<Vec<T>, StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sql = sql.to_owned();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(params), map)?
                .collect::<rusqlite::Result<Vec<T>>>();
            rows
        })
        .await
    }

    /// Execute a statement that returns no rows
    pub async fn run(&self, sql: &str, params: Params) -> Result<Execution, StoreError> {
        let sql = sql.to_owned();
        self.with_connection(move |conn| {
            let changes = conn.execute(&sql, params_from_iter(params))?;
            Ok(Execution {
                changes,
                last_insert_id: conn.last_insert_rowid(),
            })
        })
        .await
    }

    /// Execute several `;`-separated statements without parameters
    pub async fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        let sql = sql.to_owned();
        self.with_connection(move |conn| conn.execute_batch(&sql)).await
    }
}
