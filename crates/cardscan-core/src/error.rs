//! Error types for the cardscan-core library.

use thiserror::Error;

/// Main error type for the cardscan library.
#[derive(Error, Debug)]
pub enum CardscanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Export or import error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),
}

/// Errors related to spreadsheet export and import.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The table had a header but no data row.
    #[error("table has no data row")]
    MissingRow,

    /// A required column is absent from the header.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Written bytes were not valid UTF-8.
    #[error("invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Flushing the in-memory writer failed.
    #[error("failed to flush writer: {0}")]
    Flush(String),
}

/// Result type for the cardscan library.
pub type Result<T> = std::result::Result<T, CardscanError>;
