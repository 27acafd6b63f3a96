//! Barcode-then-OCR fallback and the rename step for one image

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{CollisionPolicy, RenamerConfig};
use crate::domain::{FileOutcome, RenameRecord, SerialNumber, SerialSource};
use crate::error::RenameError;
use crate::extract::{BarcodeDecoder, TextRecognizer, ocr, qr};
use crate::journal::Journal;

/// Extension given to every renamed file unless the source one is kept
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Highest `-N` suffix tried before a collision is reported
const MAX_SUFFIX: u32 = 999;

/// Decoders plus the settings that shape each rename
pub struct Pipeline {
    barcode: Box<dyn BarcodeDecoder>,
    ocr: Box<dyn TextRecognizer>,
    config: RenamerConfig,
}

impl Pipeline {
    pub fn new(
        barcode: Box<dyn BarcodeDecoder>,
        ocr: Box<dyn TextRecognizer>,
        config: RenamerConfig,
    ) -> Self {
        Self {
            barcode,
            ocr,
            config,
        }
    }

    pub fn config(&self) -> &RenamerConfig {
        &self.config
    }

    /// Find a serial: barcode first, OCR only if the barcode yields nothing
    pub fn find_serial<W: Write>(
        &self,
        path: &Path,
        journal: &mut Journal<W>,
    ) -> Option<(SerialNumber, SerialSource)> {
        if let Some(serial) =
            qr::extract_serial(path, self.barcode.as_ref(), self.config.payloads, journal)
        {
            return Some((serial, SerialSource::Barcode));
        }

        journal.info(format!(
            "Barcode decoder failed, falling back to OCR for {}",
            path.display()
        ));
        ocr::extract_serial(path, self.ocr.as_ref(), journal).map(|serial| (serial, SerialSource::Ocr))
    }

    /// Process one image in `folder`: find its serial and rename it.
    ///
    /// `planned` holds destinations already claimed earlier in a dry run;
    /// they count as taken alongside files on disk. Never fails; every
    /// problem ends up in the journal and the outcome.
    pub fn process<W: Write>(
        &self,
        path: &Path,
        folder: &Path,
        planned: &mut HashSet<PathBuf>,
        journal: &mut Journal<W>,
    ) -> FileOutcome {
        let Some((serial, source)) = self.find_serial(path, journal) else {
            journal.warn(format!(
                "No valid serial number found for {}, skipping.",
                path.display()
            ));
            return FileOutcome::Skipped(path.to_path_buf());
        };
        journal.info(format!(
            "{} extracted serial number {} from {}",
            source.label(),
            serial,
            path.display()
        ));

        let extension = self.output_extension(path);
        let record = match self.destination(path, folder, &serial, &extension, planned) {
            Ok(record) => record,
            Err(err) => {
                journal.error(format!("Failed to rename {}: {}", path.display(), err));
                return FileOutcome::Failed(path.to_path_buf());
            }
        };

        if record.is_noop() {
            journal.info(format!(
                "'{}' is already named after its serial number",
                path.display()
            ));
            return FileOutcome::Unchanged(record.from);
        }

        if self.config.dry_run {
            journal.info(format!(
                "Would rename '{}' to '{}'",
                record.from.display(),
                record.to.display()
            ));
            planned.insert(record.to.clone());
            return FileOutcome::Planned(record);
        }

        match std::fs::rename(&record.from, &record.to) {
            Ok(()) => {
                journal.info(format!(
                    "Renamed '{}' to '{}'",
                    record.from.display(),
                    record.to.display()
                ));
                FileOutcome::Renamed {
                    record,
                    serial,
                    source,
                }
            }
            Err(err) => {
                journal.error(format!(
                    "Failed to rename {}: {}",
                    path.display(),
                    RenameError::from(err)
                ));
                FileOutcome::Failed(record.from)
            }
        }
    }

    fn output_extension(&self, path: &Path) -> String {
        if self.config.keep_extension {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                return ext.to_string();
            }
        }
        OUTPUT_EXTENSION.to_string()
    }

    /// Pick the destination, applying the collision policy
    fn destination(
        &self,
        path: &Path,
        folder: &Path,
        serial: &SerialNumber,
        extension: &str,
        planned: &HashSet<PathBuf>,
    ) -> Result<RenameRecord, RenameError> {
        let is_free = |record: &RenameRecord| {
            record.is_noop() || !(record.to.exists() || planned.contains(&record.to))
        };

        let record = RenameRecord::new(path, folder, serial.as_str(), extension);
        if is_free(&record) {
            return Ok(record);
        }

        match self.config.collision {
            CollisionPolicy::Fail => Err(RenameError::DestinationExists(record.to)),
            CollisionPolicy::Suffix => (1..=MAX_SUFFIX)
                .map(|n| {
                    RenameRecord::new(path, folder, &format!("{}-{}", serial, n), extension)
                })
                .find(|candidate| is_free(candidate))
                .ok_or(RenameError::DestinationExists(suffix_limit_path(
                    folder, serial, extension,
                ))),
        }
    }
}

fn suffix_limit_path(folder: &Path, serial: &SerialNumber, extension: &str) -> PathBuf {
    folder.join(format!("{}-{}.{}", serial, MAX_SUFFIX, extension))
}
