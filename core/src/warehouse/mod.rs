//! Star-schema persistence
//!
//! - [`derive_key`]: content-derived surrogate keys
//! - [`get_or_create`] / [`upsert`]: deduplicating insert-if-absent
//! - [`KeyedStore`]: the backing store seam, with [`SqliteStore`] and
//!   [`MemoryStore`] implementations
//! - [`StarRow`]: typed rows, one per [`Table`]

pub mod key;
pub mod rows;
pub mod schema;
pub mod store;
pub mod upsert;

pub use key::{canonical_form, derive_key};
pub use rows::{
    DimensionKeys, ImageRow, PatientRow, ProtocolRow, StarRow, StationRow, StudyDateRow, StudyFact,
};
pub use schema::Table;
pub use store::{KeyedStore, MemoryStore, SqliteStore};
pub use upsert::{get_or_create, upsert};
