//! Command line and persisted configuration for sn-renamer

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Which barcode payloads are searched for a serial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadPolicy {
    /// Only the first payload the decoder reports
    #[default]
    First,
    /// Every payload in decoder order, first serial wins
    Any,
}

/// What to do when the destination name is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Refuse the rename and log an error
    #[default]
    Fail,
    /// Append `-1`, `-2`, ... to the serial until the name is free
    Suffix,
}

#[derive(Debug, Parser)]
#[command(name = "sn-renamer")]
#[command(about = "Rename images after the serial number in their QR code or S/N label")]
pub struct Cli {
    /// Folder containing the images to rename
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Rename log, opened in append mode
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Config file to use instead of the per-user one
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Match .jpg/.png regardless of case
    #[arg(long, overrides_with = "no_ignore_case")]
    pub ignore_case: bool,

    /// Match only lowercase .jpg/.png, even if the config says otherwise
    #[arg(long, overrides_with = "ignore_case")]
    pub no_ignore_case: bool,

    /// Keep the source extension instead of renaming to .jpg
    #[arg(long, overrides_with = "no_keep_extension")]
    pub keep_extension: bool,

    /// Always rename to .jpg, even if the config says otherwise
    #[arg(long, overrides_with = "keep_extension")]
    pub no_keep_extension: bool,

    /// Behaviour when the destination name already exists
    #[arg(long, value_enum)]
    pub collision: Option<CollisionPolicy>,

    /// Which barcode payloads to search
    #[arg(long, value_enum)]
    pub payloads: Option<PayloadPolicy>,

    /// Tesseract language
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Log planned renames without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamerConfig {
    /// Folder scanned for images
    pub folder: PathBuf,
    /// Rename log path
    pub log_file: PathBuf,
    /// Match image extensions case-insensitively
    pub ignore_case: bool,
    /// Keep the source extension (otherwise always `.jpg`)
    pub keep_extension: bool,
    pub collision: CollisionPolicy,
    pub payloads: PayloadPolicy,
    /// Tesseract language code
    pub ocr_lang: String,
    /// Plan only; never rename
    #[serde(skip)]
    pub dry_run: bool,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("."),
            log_file: PathBuf::from("rename_log.txt"),
            ignore_case: false,
            keep_extension: false,
            collision: CollisionPolicy::Fail,
            payloads: PayloadPolicy::First,
            ocr_lang: "eng".to_string(),
            dry_run: false,
        }
    }
}

impl RenamerConfig {
    /// Directory name under the user config dir
    pub const APP_DIR: &'static str = "sn-renamer";

    /// Config file location, e.g. `~/.config/sn-renamer/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path);
                return Self::default();
            }
            Err(err) => {
                log::warn!("Could not read config {:?}, using defaults: {}", path, err);
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config {:?}, using defaults: {}", path, err);
                Self::default()
            }
        }
    }

    /// Resolve the config for a run: file settings overridden by CLI flags
    pub fn from_cli(cli: Cli) -> Self {
        let base = cli
            .config
            .clone()
            .or_else(Self::default_path)
            .map(|path| Self::load(&path))
            .unwrap_or_default();
        base.merge(cli)
    }

    fn merge(mut self, cli: Cli) -> Self {
        if let Some(folder) = cli.folder {
            self.folder = folder;
        }
        if let Some(log_file) = cli.log_file {
            self.log_file = log_file;
        }
        if let Some(collision) = cli.collision {
            self.collision = collision;
        }
        if let Some(payloads) = cli.payloads {
            self.payloads = payloads;
        }
        if let Some(lang) = cli.lang {
            self.ocr_lang = lang;
        }
        if let Some(ignore_case) = switch(cli.ignore_case, cli.no_ignore_case) {
            self.ignore_case = ignore_case;
        }
        if let Some(keep_extension) = switch(cli.keep_extension, cli.no_keep_extension) {
            self.keep_extension = keep_extension;
        }
        self.dry_run = cli.dry_run;
        self
    }
}

/// Resolve a `--flag` / `--no-flag` pair; `None` leaves the file setting
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sn-renamer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = RenamerConfig::default();
        assert_eq!(config.log_file, PathBuf::from("rename_log.txt"));
        assert!(!config.ignore_case);
        assert!(!config.keep_extension);
        assert_eq!(config.collision, CollisionPolicy::Fail);
        assert_eq!(config.payloads, PayloadPolicy::First);
    }

    #[test]
    fn test_cli_overrides_file_settings() {
        let file = RenamerConfig {
            folder: PathBuf::from("/from/file"),
            ocr_lang: "deu".to_string(),
            ..Default::default()
        };
        let cli = parse(&[
            "/from/cli",
            "--collision",
            "suffix",
            "--payloads",
            "any",
            "--ignore-case",
            "--dry-run",
        ]);
        let config = file.merge(cli);
        assert_eq!(config.folder, PathBuf::from("/from/cli"));
        assert_eq!(config.ocr_lang, "deu");
        assert_eq!(config.collision, CollisionPolicy::Suffix);
        assert_eq!(config.payloads, PayloadPolicy::Any);
        assert!(config.ignore_case);
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_can_switch_off_file_flags() {
        let file = RenamerConfig {
            ignore_case: true,
            keep_extension: true,
            ..Default::default()
        };
        let config = file.clone().merge(parse(&["--no-ignore-case", "--no-keep-extension"]));
        assert!(!config.ignore_case);
        assert!(!config.keep_extension);

        let config = file.merge(parse(&[]));
        assert!(config.ignore_case);
        assert!(config.keep_extension);
    }

    #[test]
    fn test_last_of_flag_pair_wins() {
        let config = RenamerConfig::default().merge(parse(&["--no-ignore-case", "--ignore-case"]));
        assert!(config.ignore_case);

        let config = RenamerConfig::default().merge(parse(&["--keep-extension", "--no-keep-extension"]));
        assert!(!config.keep_extension);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "folder": "/photos", "collision": "suffix" }"#).unwrap();

        let config = RenamerConfig::load(&path);
        assert_eq!(config.folder, PathBuf::from("/photos"));
        assert_eq!(config.collision, CollisionPolicy::Suffix);
        assert_eq!(config.ocr_lang, "eng");
    }

    #[test]
    fn test_load_missing_or_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            RenamerConfig::load(&dir.path().join("absent.json")),
            RenamerConfig::default()
        );

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(RenamerConfig::load(&path), RenamerConfig::default());
    }

    #[test]
    fn test_explicit_config_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "keep_extension": true }"#).unwrap();

        let cli = parse(&["--config", path.to_str().unwrap()]);
        let config = RenamerConfig::from_cli(cli);
        assert!(config.keep_extension);
        assert_eq!(config.folder, PathBuf::from("."));
    }
}
