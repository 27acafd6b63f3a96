//! Error types for extraction and renaming
//!
//! Every variant here is contained at the per-file boundary: extractors turn
//! [`ExtractError`] into "not found", the pipeline turns [`RenameError`] into
//! [`crate::domain::FileOutcome::Failed`].

use std::path::PathBuf;

use thiserror::Error;

/// Failure inside the barcode or OCR extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened or decoded as an image
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    /// A barcode payload was not valid UTF-8 text
    #[error("barcode payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// Tesseract refused the image or failed to run
    #[error("tesseract OCR failed: {0}")]
    Ocr(String),
}

/// Failure while moving a file to its serial-number name
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("destination '{}' already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
