use clap::{Parser, ValueEnum};
use dicomstar_core::config::DEFAULT_DATA_PATH;
use dicomstar_core::{
    collect_dicom_files, extract_records, load_dotenv, write_csv, DicomstarError, FlatRecord,
    FLAT_COLUMNS,
};
use log::{error, info};
use std::fs::File;
use std::path::PathBuf;
use std::process;

/// Number of rows echoed to stdout
const PREVIEW_ROWS: usize = 5;

/// CLI tool for flattening DICOM metadata into a single table
#[derive(Parser, Debug)]
#[command(name = "dicomflat")]
#[command(about = "Flatten DICOM metadata into one row per file")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(long, env = "DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    data_path: PathBuf,

    /// Write the full table to this CSV file
    #[arg(long, value_name = "FILE")]
    out_csv: Option<PathBuf>,

    /// Output format of the preview
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Comma-separated rows with a header
    Text,
    /// JSON array of row objects
    Json,
}

fn main() {
    load_dotenv();
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if !cli.data_path.is_dir() {
        eprintln!("Error: {} is not a directory", cli.data_path.display());
        process::exit(1);
    }

    let dicom_files = match collect_dicom_files(&cli.data_path) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            eprintln!("Error: Failed to read directory: {}", e);
            process::exit(1);
        }
    };
    info!("Found {} DICOM files", dicom_files.len());

    let rows: Vec<FlatRecord> = extract_records(&dicom_files)
        .iter()
        .map(FlatRecord::from)
        .collect();

    println!(
        "Built table with {} rows and {} columns.",
        rows.len(),
        FLAT_COLUMNS.len()
    );

    if let Some(path) = &cli.out_csv {
        let written = File::create(path)
            .map_err(DicomstarError::from)
            .and_then(|file| write_csv(&rows, file));
        if let Err(e) = written {
            error!("Failed to write {}: {}", path.display(), e);
            eprintln!("Error: Failed to write {}: {}", path.display(), e);
            process::exit(1);
        }
        info!("Wrote {}", path.display());
    }

    let preview = &rows[..rows.len().min(PREVIEW_ROWS)];
    match cli.format {
        OutputFormat::Text => {
            if let Err(e) = write_csv(preview, std::io::stdout()) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(preview) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
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
