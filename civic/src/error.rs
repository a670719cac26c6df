//! Error types for the civic library.

use thiserror::Error;

/// Errors raised by the issue store, dataset loading and value parsing.
///
/// The analytics engine and report exporter never fail, so nothing here
/// originates from them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),

    #[error("issue not found: {0}")]
    IssueNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user {0} is not staff and cannot be assigned issues")]
    NotStaff(String),

    #[error("invalid issue {id}: {reason}")]
    InvalidIssue { id: String, reason: String },

    #[error("failed to decode dataset: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("issue store lock poisoned")]
    StorePoisoned,

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
