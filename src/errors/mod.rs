use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a parsed row set could not be matched to a known entity shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("input contains no rows")]
    Empty,

    #[error("row width {0} matches no known export schema (expected 24 for players or 13 for games)")]
    UnknownWidth(usize),

    /// `row` counts non-blank rows, header included, starting at 1.
    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Error, Debug)]
pub enum HandicapError {
    #[error("Classification failed: {0}")]
    Classification(#[from] ClassificationError),

    #[error("Invalid handicap rules: {0}")]
    InvalidRules(String),

    #[error("Failed to read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type HandicapResult<T> = Result<T, HandicapError>;

impl HandicapError {
    pub fn source_io(path: &Path, source: io::Error) -> Self {
        Self::Source {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn render(path: &Path, source: anyhow::Error) -> Self {
        Self::Render {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Transient failures are retried by the ingestion loop; everything else ends the process.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::InvalidRules(_)
            | Self::Source { .. }
            | Self::Storage(_)
            | Self::Pool(_)
            | Self::Render { .. } => true,
            Self::Classification(_) | Self::Config(_) => false,
        }
    }
}
