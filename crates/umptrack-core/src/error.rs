use thiserror::Error;

/// Errors raised by game storage and field updates.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("{0} not recognized")]
    UnknownSite(String),

    #[error("{0} not recognized")]
    UnknownLeague(String),

    #[error("No game found with ID {0}")]
    GameNotFound(i64),

    #[error("Invalid field selection: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid game IDs {0:?}. Enter only unpaid game IDs.")]
    NotUnpaid(Vec<i64>),

    #[error("No game IDs given")]
    NoGameIds,

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Whether the error came from user input rather than the database
    pub fn is_validation(&self) -> bool {
        !matches!(self, TrackerError::Storage(_) | TrackerError::Io(_))
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TrackerError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
