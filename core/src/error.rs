use thiserror::Error;

/// Result type for dicomstar operations
pub type Result<T> = std::result::Result<T, DicomstarError>;

/// Error types for dicomstar operations
#[derive(Error, Debug)]
pub enum DicomstarError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// Generic extraction error
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// Backing store error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// A row with the same key already exists in the table
    #[error("Duplicate key {key} in {table}")]
    DuplicateKey { table: &'static str, key: String },

    /// Column name not declared for the table
    #[error("Unknown column {column} for {table}")]
    UnknownColumn { table: &'static str, column: String },

    /// Pixel decoding or raster export error
    #[error("Raster error: {0}")]
    RasterError(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// CSV writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for DicomstarError {
    fn from(s: String) -> Self {
        DicomstarError::ExtractionError(s)
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for DicomstarError {
    fn from(e: dicom_object::ReadError) -> Self {
        DicomstarError::DicomError(format!("{}", e))
    }
}

impl From<dicom_pixeldata::Error> for DicomstarError {
    fn from(e: dicom_pixeldata::Error) -> Self {
        DicomstarError::RasterError(format!("{}", e))
    }
}
