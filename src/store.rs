//! Persistence boundary: idempotent schema creation and row insertion.

use crate::format::{Field, TableRow};
use anyhow::{Context, Result};
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use std::path::Path;

/// Default DDL for the four ingest tables.
pub const DEFAULT_SCHEMA: &str = include_str!("../schema.sql");

/// Store abstraction the pipeline writes through. Persistence failures are
/// fatal to the caller; the core provides no retry or rollback.
pub trait Store {
    fn create_schema(&mut self, ddl: &str) -> Result<()>;
    fn insert_row(&mut self, row: &TableRow) -> Result<()>;
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

fn to_sql_value(field: &Field) -> SqlValue {
    match field {
        Field::Text(s) => SqlValue::Text(s.clone()),
        Field::Int(i) => SqlValue::Integer(*i),
        Field::Null => SqlValue::Null,
    }
}

impl Store for SqliteStore {
    fn create_schema(&mut self, ddl: &str) -> Result<()> {
        self.conn
            .execute_batch(ddl)
            .context("failed to create schema")
    }

    /// `INSERT OR IGNORE` so re-running an ingest over an existing database
    /// stays idempotent for keyed tables.
    fn insert_row(&mut self, row: &TableRow) -> Result<()> {
        let table = row.table.name();
        let columns: Vec<&str> = row.fields.iter().map(|(name, _)| *name).collect();
        let placeholders: Vec<String> =
            (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT OR IGNORE INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );

        let params = rusqlite::params_from_iter(row.fields.iter().map(|(_, f)| to_sql_value(f)));
        self.conn
            .execute(&sql, params)
            .with_context(|| format!("failed to insert into {table}"))?;
        Ok(())
    }
}
