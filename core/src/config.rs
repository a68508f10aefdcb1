//! Run configuration
//!
//! Values come from command-line flags, falling back to environment variables
//! (optionally loaded from a `.env` file) and then to the defaults below.

use crate::raster::RasterSize;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_DATA_PATH: &str = "data/";
pub const DEFAULT_DATABASE_PATH: &str = "dicomstar.sqlite3";
pub const DEFAULT_OUTPUT_DIR: &str = "converted_images";
pub const DEFAULT_RASTER_EDGE: u32 = 256;

static DOTENV: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Loads `.env` from the working directory or its parents, once per process
///
/// Returns the file that was loaded, if any. Variables already set in the
/// environment are not overridden.
pub fn load_dotenv() -> Option<PathBuf> {
    DOTENV.get_or_init(|| dotenvy::dotenv().ok()).clone()
}

/// Where rows are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// SQLite database file
    Sqlite(PathBuf),
    /// Process memory; nothing survives the run
    Memory,
}

/// Resolved configuration of an ingest run
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Directory scanned for DICOM files
    pub data_path: PathBuf,
    pub store: StoreTarget,
    /// Directory receiving the JPEG exports
    pub output_dir: PathBuf,
    pub raster_size: RasterSize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            store: StoreTarget::Sqlite(PathBuf::from(DEFAULT_DATABASE_PATH)),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            raster_size: RasterSize::new(DEFAULT_RASTER_EDGE, DEFAULT_RASTER_EDGE),
        }
    }
}
