use clap::Parser;
use dicomstar_core::cli::Cli;
use dicomstar_core::{
    collect_dicom_files, extract_records, load_dotenv, IngestConfig, IngestSummary, Ingestor,
    JpegConverter, KeyedStore, MemoryStore, SqliteStore, StoreTarget, StudyRecord, TextReport,
};
use log::{error, info};
use std::process;

fn main() {
    let dotenv = load_dotenv();
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = cli.to_config();

    let mut store: Box<dyn KeyedStore> = match &config.store {
        StoreTarget::Sqlite(path) => {
            match SqliteStore::open_path(path).and_then(|s| s.ping().map(|_| s)) {
                Ok(store) => {
                    info!("Connected to {}", path.display());
                    Box::new(store)
                }
                Err(e) => {
                    error!("Database connection failed: {}", e);
                    eprintln!("Error: Database connection failed: {}", e);
                    process::exit(1);
                }
            }
        }
        StoreTarget::Memory => {
            info!("Dry run: rows are kept in memory");
            Box::new(MemoryStore::new())
        }
    };

    // Verify directory exists
    if !config.data_path.is_dir() {
        eprintln!("Error: {} is not a directory", config.data_path.display());
        process::exit(1);
    }

    info!("Processing directory: {}", config.data_path.display());

    let dicom_files = match collect_dicom_files(&config.data_path) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            eprintln!("Error: Failed to read directory: {}", e);
            process::exit(1);
        }
    };

    if dicom_files.is_empty() {
        eprintln!("Error: No DICOM files (.dcm) found in directory");
        process::exit(1);
    }

    info!("Found {} DICOM files", dicom_files.len());

    let records = extract_records(&dicom_files);
    if records.is_empty() {
        eprintln!("Error: No valid DICOM files could be processed");
        process::exit(1);
    }

    info!("Successfully processed {} files", records.len());
    let skipped = dicom_files.len() - records.len();

    let summary = run(store.as_mut(), &config, &records);

    println!("{}", TextReport::new(&config, &summary, skipped));
}

fn run<S: KeyedStore + ?Sized>(
    store: &mut S,
    config: &IngestConfig,
    records: &[StudyRecord],
) -> IngestSummary {
    let raster = JpegConverter::new(&config.output_dir, config.raster_size);

    match Ingestor::new(store, &raster).ingest_all(records) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Ingest aborted: {}", e);
            eprintln!("Error: Ingest aborted: {}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
