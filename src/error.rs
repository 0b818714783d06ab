use thiserror::Error;

/// Errors raised while building, running or publishing a weekly roster
#[derive(Error, Debug)]
pub enum RosterError {
    /// A personnel record, a preference cell or a slot index failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The preference feed or the personnel store could not be read
    #[error("{source_name} is unavailable: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    /// The finished roster could not be handed to the publishing collaborator
    #[error("failed to publish roster: {0}")]
    Publication(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RosterError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        RosterError::InvalidInput(msg.into())
    }

    pub fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        RosterError::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
