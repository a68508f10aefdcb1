use super::{check_columns, key_of, KeyedStore};
use crate::error::{DicomstarError, Result};
use crate::types::Fields;
use crate::warehouse::schema::Table;
use std::collections::HashMap;

/// In-process store used for dry runs and tests
///
/// Rows are kept per table in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: HashMap<Table, Vec<Fields>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows of `table`, in insertion order
    pub fn rows(&self, table: Table) -> &[Fields] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl KeyedStore for MemoryStore {
    fn find_one(&self, table: Table, key_field: &str, key: &str) -> Result<Option<Fields>> {
        Ok(self
            .rows(table)
            .iter()
            .find(|row| row.get(key_field).and_then(|v| v.as_text()) == Some(key))
            .cloned())
    }

    fn insert_one(&mut self, table: Table, row: &Fields) -> Result<()> {
        check_columns(table, row)?;

        if let Some(key) = key_of(table, row) {
            if self.find_one(table, table.key_column(), key)?.is_some() {
                return Err(DicomstarError::DuplicateKey {
                    table: table.name(),
                    key: key.to_string(),
                });
            }
        }

        self.tables.entry(table).or_default().push(row.clone());
        Ok(())
    }

    fn count(&self, table: Table) -> Result<usize> {
        Ok(self.rows(table).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let mut store = MemoryStore::new();
        let row = Fields::new()
            .with("manufacturer", "GE")
            .with("model_name", "Senographe")
            .with("station_id", "abc");

        store.insert_one(Table::Station, &row).unwrap();

        let found = store.find_one(Table::Station, "station_id", "abc").unwrap();
        assert_eq!(found, Some(row));
        assert!(store
            .find_one(Table::Station, "station_id", "zzz")
            .unwrap()
            .is_none());
        assert!(store
            .find_one(Table::Protocol, "protocol_id", "abc")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut store = MemoryStore::new();
        let row = Fields::new().with("year", 2023_i64).with("study_date_id", "k");

        store.insert_one(Table::StudyDate, &row).unwrap();
        let err = store.insert_one(Table::StudyDate, &row).unwrap_err();

        assert!(matches!(err, DicomstarError::DuplicateKey { .. }));
        assert_eq!(store.count(Table::StudyDate).unwrap(), 1);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut store = MemoryStore::new();
        let row = Fields::new().with("colour", "red");

        let err = store.insert_one(Table::Station, &row).unwrap_err();
        assert!(matches!(err, DicomstarError::UnknownColumn { .. }));
        assert_eq!(store.count(Table::Station).unwrap(), 0);
    }
}
