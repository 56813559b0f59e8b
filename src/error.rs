use thiserror::Error;

/// Application error types.
///
/// Empty or filtered-out results are not errors; they are reported through
/// [`crate::types::ScoreOutcome`].
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl ScoutError {
    /// Shorthand for an [`ScoutError::InvalidInput`] with a formatted message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        ScoutError::InvalidInput(msg.into())
    }

    /// Whether this error came from bad caller-supplied data rather than I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ScoutError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
