use thiserror::Error;
use uuid::Uuid;

use crate::classifier::RuntimeErrorReport;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Challenge not found: {0}")]
    ChallengeNotFound(Uuid),

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Submission is empty")]
    EmptySubmission,

    #[error("Submitted code failed: {0}")]
    CandidateFailed(RuntimeErrorReport),

    #[error("Reference solution failed: {0}")]
    ReferenceFailed(RuntimeErrorReport),

    #[error("Sandbox error: {0}")]
    Sandbox(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the engine itself rather than of submitted code.
    /// These map to 5xx-class responses at the API layer.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Error::Sandbox(_) | Error::Io(_))
    }

    /// True for failures detected before any process is spawned.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::ChallengeNotFound(_) | Error::UnsupportedLanguage(_) | Error::EmptySubmission
        )
    }
}
