//! # Challenge Evaluation Engine
//!
//! Executes user-submitted code-challenge solutions in isolated child
//! processes, bounds their running time, and compares their output against a
//! live run of the stored reference solution to produce a pass/fail verdict.
//! Supports multiple target languages, each with its own invocation and
//! error-reporting conventions.

mod classifier;
mod error;
mod evaluator;
mod languages;
mod runner;
mod service;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use classifier::{classify, RuntimeErrorReport};
pub use error::Error;
pub use evaluator::Evaluator;
pub use languages::{profile_for, JavaScriptProfile, LanguageProfile, PythonProfile};
pub use runner::{ExecEnv, FailureKind, ProcessRunner, RunFailure, RunOutcome};
pub use service::ChallengeService;
pub use store::{ChallengeStore, MemoryStore};
pub use types::{
    Challenge, ChallengePage, ChallengeSeed, EvalLimits, ExecutionRequest, Language, RunOutput,
    SubmissionReport, Verdict,
};

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, Error>;
