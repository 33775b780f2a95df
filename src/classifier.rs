use serde::{Deserialize, Serialize};

use crate::languages::profile_for;
use crate::runner::{FailureKind, RunFailure};
use crate::types::Language;

/// Stable, language-aware record of a failed run.
///
/// `message` is stderr with interpreter-specific noise stripped by the
/// language profile's filter; `details` describes the underlying failure
/// (exit code, signal, timeout). Serializes with a literal `type` field for
/// API compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeErrorReport {
    #[serde(rename = "type")]
    pub error_type: String,
    pub kind: FailureKind,
    pub message: String,
    pub details: String,
}

impl std::fmt::Display for RuntimeErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.details)
    }
}

/// Turn a raw failure into the structured report. Never fails: stderr that
/// matches no known pattern passes through unmodified.
pub fn classify(language: Language, failure: &RunFailure) -> RuntimeErrorReport {
    let profile = profile_for(language);
    RuntimeErrorReport {
        error_type: "Runtime Error".to_string(),
        kind: failure.kind,
        message: profile.clean_stderr(&failure.stderr),
        details: failure.details.clone(),
    }
}
