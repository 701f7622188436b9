//! Error types for reading tournament results

use std::path::PathBuf;

use trp_core::ReportError;

#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("invalid match records")]
    Json(#[from] serde_json::Error),

    #[error("no tournament results found under {0}")]
    NotFound(PathBuf),

    #[error("in {path}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<TournamentError>,
    },

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl TournamentError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        TournamentError::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Attach the file the error came from
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        TournamentError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;
