//! Append-only rename log
//!
//! Each entry is written as `<timestamp> - <LEVEL> - <message>` and mirrored
//! to the console through the `log` facade.

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::Level;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Rename log handle, passed explicitly to everything that records events
pub struct Journal<W: Write> {
    sink: W,
}

impl Journal<File> {
    /// Open (or create) a journal file in append mode
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> Journal<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn info(&mut self, message: impl Display) {
        self.record(Level::Info, message);
    }

    pub fn warn(&mut self, message: impl Display) {
        self.record(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl Display) {
        self.record(Level::Error, message);
    }

    /// Write one entry and mirror it to the console
    pub fn record(&mut self, level: Level, message: impl Display) {
        let message = message.to_string();
        log::log!(level, "{}", message);

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let written = writeln!(self.sink, "{} - {} - {}", timestamp, level_label(level), message)
            .and_then(|()| self.sink.flush());
        if let Err(err) = written {
            log::error!("Failed to write rename log entry: {}", err);
        }
    }

    /// Consume the journal and return its sink
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Test helpers for reading back what a journal wrote
#[cfg(test)]
pub mod testing {
    use super::Journal;

    pub fn memory() -> Journal<Vec<u8>> {
        Journal::new(Vec::new())
    }

    /// Split journal output into `(LEVEL, message)` pairs, dropping timestamps
    pub fn entries(journal: Journal<Vec<u8>>) -> Vec<(String, String)> {
        let text = String::from_utf8(journal.into_inner()).expect("journal is UTF-8");
        text.lines()
            .map(|line| {
                let mut parts = line.splitn(3, " - ");
                let _timestamp = parts.next();
                let level = parts.next().unwrap_or_default().to_string();
                let message = parts.next().unwrap_or_default().to_string();
                (level, message)
            })
            .collect()
    }
}
