use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::ValueEnum;

use crate::errors::{HandicapError, HandicapResult};

pub const DEF_DATABASE_PATH: &str = "db/handicap.db";
pub const DEF_OUTPUT_PATH: &str = "output/handicap.pdf";
pub const DEF_RULES_PATH: &str = "config/handicap.csv";
pub const DEF_FONTS_DIR: &str = "fonts";
pub const DEF_DELIMITER: &str = ";";
pub const DEF_CHECK_FREQUENCY: u64 = 5;

/// Which of the two tracked ratings feeds the handicap lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RatingBasis {
    National,
    Fide,
}

impl RatingBasis {
    pub fn column(&self) -> &'static str {
        match self {
            RatingBasis::National => "national_rating",
            RatingBasis::Fide => "fide_rating",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingBasis::National => "Rating",
            RatingBasis::Fide => "FIDE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PairingLayout {
    /// One row per board
    Classic,
    /// One row per player
    Individual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Xlsx,
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> HandicapResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(OutputFormat::Pdf),
            Some("xlsx") => Ok(OutputFormat::Xlsx),
            Some("json") => Ok(OutputFormat::Json),
            _ => Err(HandicapError::Config(format!(
                "unsupported output format for {} (use .pdf, .xlsx or .json)",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathSettings {
    pub export_file: PathBuf,
    pub rules_file: PathBuf,
    pub database_file: PathBuf,
    pub output_file: PathBuf,
    /// Holds the Unicode TrueType faces used for PDF output
    pub fonts_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub delimiter: String,
    pub poll_interval: Duration,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            delimiter: DEF_DELIMITER.to_string(),
            poll_interval: Duration::from_secs(DEF_CHECK_FREQUENCY),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub rating_basis: RatingBasis,
    pub layout: PairingLayout,
    pub timestamp_output: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: PathSettings,
    pub import: ImportSettings,
    pub report: ReportSettings,
}

impl AppConfig {
    /// Builds the configuration, rejecting an output path with no known format.
    pub fn new(
        paths: PathSettings,
        import: ImportSettings,
        rating_basis: RatingBasis,
        layout: PairingLayout,
        timestamp_output: bool,
    ) -> HandicapResult<Self> {
        if import.delimiter.len() != 1 {
            return Err(HandicapError::Config(format!(
                "field delimiter must be a single ASCII character, got '{}'",
                import.delimiter
            )));
        }
        if import.poll_interval.is_zero() {
            return Err(HandicapError::Config("check frequency must be greater than zero".to_string()));
        }

        let format = OutputFormat::from_path(&paths.output_file)?;

        Ok(Self {
            paths,
            import,
            report: ReportSettings {
                rating_basis,
                layout,
                timestamp_output,
                format,
            },
        })
    }

    /// The field delimiter as the single byte validated in [`AppConfig::new`].
    pub fn delimiter(&self) -> u8 {
        self.import.delimiter.bytes().next().unwrap_or(b';')
    }

    /// Where this cycle's report goes; with timestamping on, the stem gets
    /// a `_YYYYMMDD_HHMMSS` suffix.
    pub fn output_path_at(&self, now: DateTime<Local>) -> PathBuf {
        let output = &self.paths.output_file;
        if !self.report.timestamp_output {
            return output.clone();
        }

        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stamped = match output.extension() {
            Some(ext) => format!("{}_{}.{}", stem, now.format("%Y%m%d_%H%M%S"), ext.to_string_lossy()),
            None => format!("{}_{}", stem, now.format("%Y%m%d_%H%M%S")),
        };
        output.with_file_name(stamped)
    }
}
