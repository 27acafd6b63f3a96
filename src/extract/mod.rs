//! Serial number extraction from images
//!
//! This module consolidates:
//! - OCR preprocessing (preprocess.rs)
//! - Barcode/QR decoding (qr.rs)
//! - OCR text recognition (ocr.rs)

pub mod ocr;
pub mod preprocess;
pub mod qr;

pub use ocr::{TesseractRecognizer, TextRecognizer};
pub use qr::{BarcodeDecoder, RqrrDecoder};
