//! Keyed storage collaborators
//!
//! The upsert coordinator only needs two operations from a backing store: an
//! equality lookup on a table's key column and a plain insert. Both stores
//! reject a second row with the same key in one table, surfacing it as
//! [`DicomstarError::DuplicateKey`](crate::DicomstarError::DuplicateKey).

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use super::schema::Table;
use crate::error::{DicomstarError, Result};
use crate::types::{FieldValue, Fields};

/// Backing store keyed by each table's surrogate key column
pub trait KeyedStore {
    /// Returns the row of `table` whose `key_field` equals `key`
    fn find_one(&self, table: Table, key_field: &str, key: &str) -> Result<Option<Fields>>;

    /// Inserts `row` into `table`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a row with the same key already exists, and
    /// `UnknownColumn` if `row` names a column the table does not declare.
    fn insert_one(&mut self, table: Table, row: &Fields) -> Result<()>;

    /// Number of rows stored in `table`
    fn count(&self, table: Table) -> Result<usize>;
}

/// Rejects rows naming columns outside the table's schema
pub(crate) fn check_columns(table: Table, row: &Fields) -> Result<()> {
    match row.names().find(|name| !table.has_column(name)) {
        Some(column) => Err(DicomstarError::UnknownColumn {
            table: table.name(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

/// Key value stored in a row's key column, if present and textual
pub(crate) fn key_of<'a>(table: Table, row: &'a Fields) -> Option<&'a str> {
    row.get(table.key_column()).and_then(FieldValue::as_text)
}
