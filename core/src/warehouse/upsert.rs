use super::key::derive_key;
use super::rows::StarRow;
use super::schema::Table;
use super::store::KeyedStore;
use crate::error::{DicomstarError, Result};
use crate::types::{FieldValue, Fields};
use log::debug;

/// Returns the key of the row matching `fields`, inserting it first if needed
///
/// # Algorithm
///
/// 1. Derive the key from `fields`, which must not contain `key_field`
/// 2. Look the key up in `table`
/// 3. Found: return the stored key; the stored row is neither compared with
///    `fields` nor updated
/// 4. Not found: insert `fields` plus `key_field = key` and return the key
///
/// An insert rejected as a duplicate (another writer got there between steps 2
/// and 4) is answered with one re-read. Every other store error propagates.
///
/// # Example
///
/// ```
/// use dicomstar_core::{get_or_create, Fields, KeyedStore, MemoryStore, Table};
///
/// let mut store = MemoryStore::new();
/// let station = Fields::new()
///     .with("manufacturer", "HOLOGIC, Inc.")
///     .with("model_name", "Selenia Dimensions");
///
/// let first = get_or_create(&mut store, Table::Station, station.clone(), "station_id").unwrap();
/// let second = get_or_create(&mut store, Table::Station, station, "station_id").unwrap();
///
/// assert_eq!(first, second);
/// assert_eq!(store.count(Table::Station).unwrap(), 1);
/// ```
pub fn get_or_create<S: KeyedStore + ?Sized>(
    store: &mut S,
    table: Table,
    fields: Fields,
    key_field: &str,
) -> Result<String> {
    let key = derive_key(&fields);
    find_or_insert(store, table, key, fields, key_field)
}

/// Typed form of [`get_or_create`], keyed on the row's own table
///
/// The key covers [`StarRow::fields`] only; unkeyed fields are stored with a
/// newly inserted row.
pub fn upsert<R: StarRow, S: KeyedStore + ?Sized>(store: &mut S, row: &R) -> Result<String> {
    let mut fields = row.fields();
    let key = derive_key(&fields);
    for (name, value) in row.unkeyed_fields().iter() {
        fields.insert(name, value.clone());
    }
    find_or_insert(store, R::TABLE, key, fields, R::TABLE.key_column())
}

fn find_or_insert<S: KeyedStore + ?Sized>(
    store: &mut S,
    table: Table,
    key: String,
    mut fields: Fields,
    key_field: &str,
) -> Result<String> {
    if let Some(existing) = store.find_one(table, key_field, &key)? {
        debug!("[MATCH] {} {}={}", table, key_field, key);
        return Ok(stored_key(&existing, key_field).unwrap_or(key));
    }

    fields.insert(key_field, FieldValue::Text(key.clone()));
    match store.insert_one(table, &fields) {
        Ok(()) => {
            debug!("[INSERT] {} {}={}", table, key_field, key);
            Ok(key)
        }
        Err(DicomstarError::DuplicateKey { .. }) => {
            debug!("[RACE] {} {}={} inserted concurrently", table, key_field, key);
            match store.find_one(table, key_field, &key)? {
                Some(existing) => Ok(stored_key(&existing, key_field).unwrap_or(key)),
                None => Err(DicomstarError::DuplicateKey {
                    table: table.name(),
                    key,
                }),
            }
        }
        Err(e) => Err(e),
    }
}

fn stored_key(row: &Fields, key_field: &str) -> Option<String> {
    row.get(key_field)
        .and_then(FieldValue::as_text)
        .map(str::to_string)
}
