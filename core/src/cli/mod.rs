pub mod report;

use crate::config::{
    IngestConfig, StoreTarget, DEFAULT_DATABASE_PATH, DEFAULT_DATA_PATH, DEFAULT_OUTPUT_DIR,
};
use crate::raster::RasterSize;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for dicomstar
#[derive(Parser, Debug)]
#[command(name = "dicomstar")]
#[command(about = "Load DICOM metadata into a deduplicated star schema")]
#[command(version)]
pub struct Cli {
    /// Directory containing DICOM files
    #[arg(long, env = "DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// Directory for converted JPEG images
    #[arg(long, env = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Width of converted images in pixels
    #[arg(long, default_value_t = 256)]
    pub width: u32,

    /// Height of converted images in pixels
    #[arg(long, default_value_t = 256)]
    pub height: u32,

    /// Keep rows in memory instead of writing the database
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolves the arguments into a run configuration
    pub fn to_config(&self) -> IngestConfig {
        let store = if self.dry_run {
            StoreTarget::Memory
        } else {
            StoreTarget::Sqlite(self.database.clone())
        };

        IngestConfig {
            data_path: self.data_path.clone(),
            store,
            output_dir: self.output_dir.clone(),
            raster_size: RasterSize::new(self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "dicomstar",
            "--data-path",
            "scans",
            "--database",
            "warehouse.db",
            "--width",
            "128",
            "--height",
            "64",
        ]);
        let config = cli.to_config();

        assert_eq!(config.data_path, PathBuf::from("scans"));
        assert_eq!(config.store, StoreTarget::Sqlite(PathBuf::from("warehouse.db")));
        assert_eq!(config.raster_size, RasterSize::new(128, 64));
    }

    #[test]
    fn test_dry_run_uses_memory() {
        let cli = Cli::parse_from(["dicomstar", "--dry-run"]);
        assert_eq!(cli.to_config().store, StoreTarget::Memory);
    }
}
