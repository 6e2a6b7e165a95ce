use thiserror::Error;

/// Coarse classification of a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Protocol,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("prediction service unreachable: {0}")]
    Transport(String),
    #[error("prediction service responded with status {status}")]
    Protocol { status: u16 },
    #[error("prediction response was malformed: {0}")]
    Parse(String),
}

impl SubmitError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmitError::Transport(_) => FailureKind::Transport,
            SubmitError::Protocol { .. } => FailureKind::Protocol,
            SubmitError::Parse(_) => FailureKind::Parse,
        }
    }

    /// Message shown to the user when the submission ends in `Failed`.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Transport(_) => {
                "Could not reach the prediction service. Check that it is running and retry."
                    .to_string()
            }
            SubmitError::Protocol { status } => format!(
                "Prediction service did not respond as expected (HTTP {status}). Check the prediction backend."
            ),
            SubmitError::Parse(_) => {
                "Prediction service returned a result in an unexpected format.".to_string()
            }
        }
    }
}
