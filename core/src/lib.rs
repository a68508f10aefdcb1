pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod extraction;
pub mod pipeline;
pub mod raster;
pub mod types;
pub mod warehouse;

pub use cli::report::TextReport;
pub use config::{load_dotenv, IngestConfig, StoreTarget};
pub use discovery::{collect_dicom_files, is_dicom_file};
pub use error::{DicomstarError, Result};
pub use export::{write_csv, FlatRecord, FLAT_COLUMNS};
pub use extraction::StudyRecord;
pub use pipeline::{extract_records, IngestSummary, Ingestor, RecordOutcome};
pub use raster::{JpegConverter, RasterConverter, RasterSize};
pub use types::*;
pub use warehouse::{
    derive_key, get_or_create, upsert, KeyedStore, MemoryStore, SqliteStore, StarRow, Table,
};
