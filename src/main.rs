mod config;
mod domain;
mod error;
mod extract;
mod journal;
mod rename;

use anyhow::Context;
use clap::Parser;

use crate::config::{Cli, RenamerConfig};
use crate::extract::{RqrrDecoder, TesseractRecognizer};
use crate::journal::Journal;
use crate::rename::{Pipeline, batch};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let config = RenamerConfig::from_cli(Cli::parse());
    let log_file = config.log_file.clone();
    let mut journal = Journal::open(&log_file)
        .with_context(|| format!("Failed to open rename log {:?}", log_file))?;

    let folder = config.folder.clone();
    let pipeline = Pipeline::new(
        Box::new(RqrrDecoder),
        Box::new(TesseractRecognizer::new(config.ocr_lang.clone())),
        config,
    );
    let summary = batch::run(&pipeline, &mut journal)
        .with_context(|| format!("Failed to list images in {:?}", folder))?;

    log::info!(
        "{} image(s): {} renamed, {} unchanged, {} planned, {} skipped, {} failed",
        summary.total(),
        summary.renamed,
        summary.unchanged,
        summary.planned,
        summary.skipped,
        summary.failed
    );
    println!(
        "Batch processing complete. Check {} for details.",
        log_file.display()
    );
    Ok(())
}
