//! Error types for report generation

/// Errors that abort a single report request.
///
/// None of these are retried: the computation is pure, so running it again on
/// the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("malformed record {record}: {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("duplicate bot identity: {0}")]
    DuplicateBotIdentity(String),

    #[error("unknown bot: {0}")]
    UnknownBot(String),
}

impl ReportError {
    pub fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::MalformedRecord {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
