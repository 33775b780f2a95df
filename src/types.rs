use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Supported target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

impl Language {
    /// Permissive resolution: unrecognized names fall back to Python.
    ///
    /// This is the historical policy of the platform. The service boundary
    /// parses strictly instead; callers that want the fallback must opt in
    /// here.
    pub fn from_name_or_default(name: &str) -> Language {
        name.parse().unwrap_or(Language::Python)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::JavaScript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
        }
    }
}

/// The tuple produced by the external challenge generation collaborator.
/// The engine only requires these five fields to be well-formed strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSeed {
    pub title: String,
    pub description: String,
    /// Harness that invokes the function the user must define. Must never
    /// itself define that function.
    pub driver_code: String,
    /// Complete, correct implementation satisfying `description`.
    pub ideal_solution: String,
    /// Single-line/word stdout the ideal solution prints under the driver.
    pub expected_output: String,
}

/// A persisted coding problem with its harness and reference solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub topic: String,
    pub title: String,
    pub description: String,
    pub driver_code: String,
    pub ideal_solution: String,
    /// Cached at generation time. Display hint only: verdicts always compare
    /// against a live run of `ideal_solution`.
    pub expected_output: String,
    /// Most recent candidate; empty until the first submission.
    #[serde(default)]
    pub user_submitted_code: String,
    /// Verdict of the most recent submission, unset until one completes.
    #[serde(default)]
    pub review: Option<Verdict>,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    pub fn new(topic: impl Into<String>, seed: ChallengeSeed) -> Self {
        Challenge {
            id: Uuid::new_v4(),
            topic: topic.into(),
            title: seed.title,
            description: seed.description,
            driver_code: seed.driver_code,
            ideal_solution: seed.ideal_solution,
            expected_output: seed.expected_output,
            user_submitted_code: String::new(),
            review: None,
            created_at: Utc::now(),
        }
    }
}

/// A single evaluation request. Constructed per call, discarded after the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub challenge_id: Uuid,
    pub language: Language,
    /// Ordered stdin lines fed to the child, newline-terminated.
    #[serde(default)]
    pub stdin_lines: Vec<String>,
}

/// Captured output of a clean (exit 0) run. stderr being non-empty is not
/// itself a failure signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Outcome of comparing candidate output against the reference output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected,
}

/// What the caller gets back from a completed submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub stdout: String,
    pub stderr: String,
    /// Live output of the reference solution, untrimmed.
    pub expected_output: String,
    pub verdict: Verdict,
}

/// One page of stored challenges, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengePage {
    pub challenges: Vec<Challenge>,
    pub total_challenges: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Execution limits for a single run
#[derive(Debug, Clone)]
pub struct EvalLimits {
    /// Hard wall-clock limit per child process.
    pub timeout: Duration,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
        }
    }
}
