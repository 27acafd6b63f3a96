//! OCR (Optical Character Recognition) extraction using rusty-tesseract

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use image::{DynamicImage, GrayImage};

use super::preprocess::preprocess;
use crate::domain::SerialNumber;
use crate::error::ExtractError;
use crate::journal::Journal;

/// A text recognition engine: one text blob per image
pub trait TextRecognizer {
    fn recognize(&self, img: &GrayImage) -> Result<String, ExtractError>;
}

/// Text recognition through the system tesseract binary
#[derive(Clone, Debug)]
pub struct TesseractRecognizer {
    lang: String,
}

impl TesseractRecognizer {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, img: &GrayImage) -> Result<String, ExtractError> {
        use rusty_tesseract::{Args, Image};

        log::debug!(
            "Running OCR with rusty-tesseract on {}x{} image...",
            img.width(),
            img.height()
        );

        let dynamic_img = DynamicImage::ImageLuma8(img.clone());

        // Tesseract works best with text that's at least 10-12 pixels tall
        let min_dimension = img.width().min(img.height());
        let processed_img = match upscale_factor(min_dimension) {
            1 => dynamic_img,
            factor => {
                let new_width = img.width() * factor;
                let new_height = img.height() * factor;
                log::debug!(
                    "Upscaling small image {}x to {}x{}",
                    factor,
                    new_width,
                    new_height
                );
                dynamic_img.resize(
                    new_width,
                    new_height,
                    image::imageops::FilterType::Lanczos3,
                )
            }
        };

        let tess_img = Image::from_dynamic_image(&processed_img)
            .map_err(|e| ExtractError::Ocr(format!("failed to create tesseract image: {}", e)))?;

        let dpi = if min_dimension < 200 { 300 } else { 150 };
        let args = Args {
            lang: self.lang.clone(),
            config_variables: HashMap::new(),
            dpi: Some(dpi),
            psm: Some(3), // Fully automatic page segmentation, no OSD
            oem: Some(3), // Default OCR Engine Mode
        };

        rusty_tesseract::image_to_string(&tess_img, &args)
            .map_err(|e| ExtractError::Ocr(e.to_string()))
    }
}

fn upscale_factor(min_dimension: u32) -> u32 {
    if min_dimension < 100 {
        4
    } else if min_dimension < 200 {
        2
    } else {
        1
    }
}

/// Look for an `S/N:` labelled serial in the text of the image at `path`.
///
/// Any failure is written to the journal at ERROR and reported as not found.
pub fn extract_serial<W: Write>(
    path: &Path,
    recognizer: &dyn TextRecognizer,
    journal: &mut Journal<W>,
) -> Option<SerialNumber> {
    match try_extract_serial(path, recognizer, journal) {
        Ok(serial) => serial,
        Err(err) => {
            journal.error(format!("Error processing {} with OCR: {}", path.display(), err));
            None
        }
    }
}

fn try_extract_serial<W: Write>(
    path: &Path,
    recognizer: &dyn TextRecognizer,
    journal: &mut Journal<W>,
) -> Result<Option<SerialNumber>, ExtractError> {
    let img = image::open(path)?;
    let text = recognizer.recognize(&preprocess(&img))?;
    log::debug!("OCR text from {}:\n{}", path.display(), text);

    let serial = SerialNumber::from_labeled_text(&text);
    if serial.is_none() {
        journal.info(format!(
            "No serial number found in {} using OCR",
            path.display()
        ));
    }
    Ok(serial)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::extract::qr::testing::write_blank_image;
    use crate::journal::testing as journal;

    #[test]
    fn test_serial_after_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img002.png");
        write_blank_image(&path);

        let recognizer = ScriptedRecognizer::text("ACME Router\nS/N: XJ44Q7ZT\nRev B");
        let mut log = journal::memory();
        let serial = extract_serial(&path, &recognizer, &mut log);
        assert_eq!(serial.unwrap().as_str(), "XJ44Q7ZT");
        assert_eq!(recognizer.calls.get(), 1);
    }

    #[test]
    fn test_missing_label_is_logged_as_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img003.png");
        write_blank_image(&path);

        let recognizer = ScriptedRecognizer::text("Serial XJ44Q7ZT");
        let mut log = journal::memory();
        assert_eq!(extract_serial(&path, &recognizer, &mut log), None);

        let entries = journal::entries(log);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "INFO");
        assert!(entries[0].1.ends_with("using OCR"));
    }

    #[test]
    fn test_engine_failure_is_logged_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        write_blank_image(&path);

        let recognizer = ScriptedRecognizer::failing("tesseract not installed");
        let mut log = journal::memory();
        assert_eq!(extract_serial(&path, &recognizer, &mut log), None);

        let entries = journal::entries(log);
        assert_eq!(entries[0].0, "ERROR");
        assert!(entries[0].1.contains("tesseract not installed"));
    }

    #[test]
    fn test_missing_file_never_reaches_engine() {
        let dir = tempfile::tempdir().unwrap();
        let recognizer = ScriptedRecognizer::text("S/N: ABC123");
        let mut log = journal::memory();
        let serial = extract_serial(&dir.path().join("gone.png"), &recognizer, &mut log);
        assert_eq!(serial, None);
        assert_eq!(recognizer.calls.get(), 0);
        assert_eq!(journal::entries(log)[0].0, "ERROR");
    }

    #[test]
    fn test_upscale_factor_thresholds() {
        assert_eq!(upscale_factor(50), 4);
        assert_eq!(upscale_factor(150), 2);
        assert_eq!(upscale_factor(200), 1);
    }
}
