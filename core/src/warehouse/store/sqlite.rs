use super::{check_columns, KeyedStore};
use crate::error::{DicomstarError, Result};
use crate::types::{FieldValue, Fields};
use crate::warehouse::schema::{Table, SQLITE_DDL};
use log::debug;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{ffi, params_from_iter, Connection, OptionalExtension, ToSql};
use std::path::Path;
use std::time::Duration;

/// SQLite-backed star schema
///
/// Every key column is the table's primary key, so a racing second writer gets
/// a constraint violation instead of silently adding a duplicate row.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and ensures the schema
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SQLITE_DDL)?;
        Ok(Self { conn })
    }

    /// Round-trips a trivial query to prove the connection is usable
    pub fn ping(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
        Ok(())
    }
}

impl KeyedStore for SqliteStore {
    fn find_one(&self, table: Table, key_field: &str, key: &str) -> Result<Option<Fields>> {
        if !table.has_column(key_field) {
            return Err(DicomstarError::UnknownColumn {
                table: table.name(),
                column: key_field.to_string(),
            });
        }

        let sql = format!(
            "SELECT * FROM \"{}\" WHERE \"{}\" = ?1 LIMIT 1",
            table.name(),
            key_field
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let row = stmt
            .query_row([key], |r| {
                let mut fields = Fields::new();
                for (i, name) in names.iter().enumerate() {
                    fields.insert(name, r.get::<_, FieldValue>(i)?);
                }
                Ok(fields)
            })
            .optional()?;

        Ok(row)
    }

    fn insert_one(&mut self, table: Table, row: &Fields) -> Result<()> {
        check_columns(table, row)?;

        let columns: Vec<String> = row.names().map(|n| format!("\"{}\"", n)).collect();
        let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            table.name(),
            columns.join(", "),
            placeholders.join(", ")
        );
        debug!("{}", sql);

        match self
            .conn
            .execute(&sql, params_from_iter(row.iter().map(|(_, v)| v)))
        {
            Ok(_) => Ok(()),
            Err(e) if is_key_conflict(&e) => Err(DicomstarError::DuplicateKey {
                table: table.name(),
                key: super::key_of(table, row).unwrap_or_default().to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self, table: Table) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.name());
        let count: i64 = self.conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

fn is_key_conflict(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Int(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            FieldValue::Float(v) => ToSqlOutput::Owned(Value::Real(*v)),
            FieldValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl FromSql for FieldValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(FieldValue::Null),
            ValueRef::Integer(i) => Ok(FieldValue::Int(i)),
            ValueRef::Real(v) => Ok(FieldValue::Float(v)),
            ValueRef::Text(t) => Ok(FieldValue::Text(String::from_utf8_lossy(t).into_owned())),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}
