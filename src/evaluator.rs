use std::sync::Arc;
use tracing::{debug, info};

use crate::classifier::classify;
use crate::error::Error;
use crate::languages::profile_for;
use crate::runner::{ProcessRunner, RunOutcome};
use crate::store::ChallengeStore;
use crate::types::{ExecutionRequest, SubmissionReport, Verdict};

/// Orchestrates one submission: the candidate and the stored reference
/// solution go through the identical assemble-and-run pipeline, their trimmed
/// stdout is compared, and the verdict is written back onto the challenge.
pub struct Evaluator {
    store: Arc<dyn ChallengeStore>,
    runner: ProcessRunner,
}

impl Evaluator {
    pub fn new(store: Arc<dyn ChallengeStore>, runner: ProcessRunner) -> Self {
        Self { store, runner }
    }

    pub async fn evaluate(&self, request: ExecutionRequest) -> Result<SubmissionReport, Error> {
        let mut challenge = self
            .store
            .find_by_id(request.challenge_id)
            .await?
            .ok_or(Error::ChallengeNotFound(request.challenge_id))?;

        let profile = profile_for(request.language);
        let candidate_source = profile.assemble(&request.source_code, &challenge.driver_code);
        let reference_source = profile.assemble(&challenge.ideal_solution, &challenge.driver_code);

        debug!(
            challenge_id = %challenge.id,
            language = %request.language,
            "running candidate and reference solutions"
        );

        // The two runs share nothing, so they execute in parallel. Write-back
        // below happens only after both children have exited.
        let (candidate, reference) = tokio::join!(
            self.runner
                .run(&candidate_source, request.language, &request.stdin_lines),
            self.runner
                .run(&reference_source, request.language, &request.stdin_lines),
        );
        let candidate = candidate?;
        let reference = reference?;

        challenge.user_submitted_code = request.source_code.clone();

        let candidate = match candidate {
            RunOutcome::Completed(output) => output,
            RunOutcome::Failed(failure) => {
                // Record the attempted code; the previous review stands.
                self.store.save(challenge).await?;
                return Err(Error::CandidateFailed(classify(request.language, &failure)));
            }
        };
        let reference = match reference {
            RunOutcome::Completed(output) => output,
            RunOutcome::Failed(failure) => {
                self.store.save(challenge).await?;
                return Err(Error::ReferenceFailed(classify(request.language, &failure)));
            }
        };

        // The cached expected_output is a display hint only; the verdict
        // always compares against the live reference output.
        let verdict = if candidate.stdout.trim() == reference.stdout.trim() {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        };

        challenge.review = Some(verdict);
        self.store.save(challenge).await?;

        info!(
            challenge_id = %request.challenge_id,
            verdict = ?verdict,
            "evaluation complete"
        );

        Ok(SubmissionReport {
            stdout: candidate.stdout,
            stderr: candidate.stderr,
            expected_output: reference.stdout,
            verdict,
        })
    }
}
