//! Per-file rename records and batch results

use std::path::{Path, PathBuf};

use super::serial::{SerialNumber, SerialSource};

/// An original path paired with the destination computed from its serial
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameRecord {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenameRecord {
    /// Build `<folder>/<stem>.<extension>` as the destination for `from`
    pub fn new(from: &Path, folder: &Path, stem: &str, extension: &str) -> Self {
        Self {
            from: from.to_path_buf(),
            to: folder.join(format!("{stem}.{extension}")),
        }
    }

    /// The file already carries its destination name
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Terminal state of one image
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was moved to its serial-number name
    Renamed {
        record: RenameRecord,
        serial: SerialNumber,
        source: SerialSource,
    },
    /// The file was already named after its serial
    Unchanged(PathBuf),
    /// Dry run: the rename that would have happened
    Planned(RenameRecord),
    /// Neither extractor found a serial
    Skipped(PathBuf),
    /// A serial was found but the rename failed; the source is untouched
    Failed(PathBuf),
}

/// Counts of outcomes across a batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Renamed { .. } => self.renamed += 1,
            FileOutcome::Unchanged(_) => self.unchanged += 1,
            FileOutcome::Planned(_) => self.planned += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Number of images processed
    pub fn total(&self) -> usize {
        self.renamed + self.unchanged + self.planned + self.skipped + self.failed
    }
}
