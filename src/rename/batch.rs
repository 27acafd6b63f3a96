//! Folder enumeration and the per-file loop

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::orchestrator::Pipeline;
use crate::domain::BatchSummary;
use crate::journal::Journal;

/// Extensions treated as images
const IMAGE_EXTENSIONS: [&str; 2] = [".jpg", ".png"];

/// Whether `file_name` ends in an image extension
pub fn is_image_name(file_name: &str, ignore_case: bool) -> bool {
    if ignore_case {
        let lower = file_name.to_ascii_lowercase();
        IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    } else {
        IMAGE_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
    }
}

/// List the image files in `folder`, sorted by name.
///
/// The listing is complete before any file is renamed.
pub fn list_images(folder: &Path, ignore_case: bool) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        match name.to_str() {
            Some(name) if is_image_name(name, ignore_case) => images.push(entry.path()),
            Some(_) => {}
            None => log::debug!("Skipping non UTF-8 file name {:?}", name),
        }
    }
    images.sort();
    Ok(images)
}

/// Run the pipeline over every image in its configured folder
pub fn run<W: Write>(pipeline: &Pipeline, journal: &mut Journal<W>) -> io::Result<BatchSummary> {
    let config = pipeline.config();
    let folder = config.folder.as_path();
    let images = list_images(folder, config.ignore_case)?;
    log::info!("Found {} image(s) in {}", images.len(), folder.display());

    let mut summary = BatchSummary::default();
    let mut planned = HashSet::new();
    for path in &images {
        let outcome = pipeline.process(path, folder, &mut planned, journal);
        summary.record(&outcome);
    }
    Ok(summary)
}
