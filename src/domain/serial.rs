//! Serial number type and the patterns that find one in decoded text

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Eight uppercase letters or digits, anywhere in a barcode payload
static BARCODE_SERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]{8}").expect("barcode serial pattern is valid"));

/// An `S/N:` label (any case) followed by an alphanumeric token
static LABELED_SERIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)S/N:\s*([A-Za-z0-9]+)").expect("labeled serial pattern is valid")
});

/// A non-empty serial number, safe to use as a file stem
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Find a serial in barcode payload text.
    ///
    /// Takes the leftmost run of eight `[A-Z0-9]` characters; a longer run
    /// yields its first eight characters.
    pub fn from_barcode_text(text: &str) -> Option<Self> {
        BARCODE_SERIAL
            .find(text)
            .map(|m| Self(m.as_str().to_string()))
    }

    /// Find a serial following the first `S/N:` label in OCR text
    pub fn from_labeled_text(text: &str) -> Option<Self> {
        LABELED_SERIAL
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which extractor produced a serial number
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerialSource {
    Barcode,
    Ocr,
}

impl SerialSource {
    /// Human name used in journal lines
    pub fn label(self) -> &'static str {
        match self {
            SerialSource::Barcode => "Barcode decoder",
            SerialSource::Ocr => "OCR",
        }
    }
}
