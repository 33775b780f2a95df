use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::Error;
use crate::evaluator::Evaluator;
use crate::runner::{ExecEnv, ProcessRunner};
use crate::store::ChallengeStore;
use crate::types::{
    Challenge, ChallengePage, ChallengeSeed, EvalLimits, ExecutionRequest, Language,
    SubmissionReport,
};

const DEFAULT_PAGE_LIMIT: usize = 10;

/// Entry point for callers (e.g. an HTTP handler). Bounds concurrent
/// evaluations with a semaphore and validates preconditions before any
/// process is spawned.
#[derive(Clone)]
pub struct ChallengeService {
    store: Arc<dyn ChallengeStore>,
    evaluator: Arc<Evaluator>,
    semaphore: Arc<Semaphore>,
}

impl ChallengeService {
    pub fn new(
        store: Arc<dyn ChallengeStore>,
        max_concurrent_evaluations: usize,
        limits: EvalLimits,
    ) -> Self {
        Self::with_env(
            store,
            max_concurrent_evaluations,
            limits,
            ExecEnv::default(),
        )
    }

    pub fn with_env(
        store: Arc<dyn ChallengeStore>,
        max_concurrent_evaluations: usize,
        limits: EvalLimits,
        env: ExecEnv,
    ) -> Self {
        let runner = ProcessRunner::with_env(limits, env);
        Self {
            evaluator: Arc::new(Evaluator::new(store.clone(), runner)),
            store,
            semaphore: Arc::new(Semaphore::new(max_concurrent_evaluations)),
        }
    }

    /// Store a challenge built from the generation collaborator's seed tuple.
    /// The generative call itself happens outside this crate.
    pub async fn create_challenge(
        &self,
        topic: &str,
        seed: ChallengeSeed,
    ) -> Result<Challenge, Error> {
        let challenge = Challenge::new(topic, seed);
        self.store.save(challenge.clone()).await?;
        info!(challenge_id = %challenge.id, topic = topic, "challenge created");
        Ok(challenge)
    }

    /// Evaluate a submission against a stored challenge.
    ///
    /// The language name parses strictly here: unknown names are rejected as
    /// a precondition failure rather than silently falling back to a default
    /// profile. Empty or whitespace-only submissions are likewise rejected
    /// before anything is assembled or spawned.
    pub async fn submit(
        &self,
        code: &str,
        challenge_id: Uuid,
        language: &str,
        stdin_lines: Vec<String>,
    ) -> Result<SubmissionReport, Error> {
        if code.trim().is_empty() {
            return Err(Error::EmptySubmission);
        }
        let language: Language = language.parse().map_err(Error::UnsupportedLanguage)?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::Sandbox(format!("Failed to acquire execution permit: {}", e)))?;

        debug!(%challenge_id, %language, "starting evaluation");

        let result = self
            .evaluator
            .evaluate(ExecutionRequest {
                source_code: code.to_string(),
                challenge_id,
                language,
                stdin_lines,
            })
            .await;

        match &result {
            Ok(report) => info!(verdict = ?report.verdict, "submission evaluated"),
            Err(e) => error!("submission failed: {}", e),
        }

        result
    }

    /// Paginated persistence passthrough, newest first. A limit of 0 means
    /// the default of 10; pages are 1-based.
    pub async fn list_challenges(&self, page: usize, limit: usize) -> Result<ChallengePage, Error> {
        let limit = if limit == 0 { DEFAULT_PAGE_LIMIT } else { limit };
        self.store.list(page.max(1), limit).await
    }

    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}
