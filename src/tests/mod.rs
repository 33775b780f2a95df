//! End-to-end evaluation tests. Tests that spawn real interpreters skip
//! themselves when the interpreter is not on PATH.


use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::languages::skip_if_not_available;
use crate::runner::FailureKind;
use crate::service::ChallengeService;
use crate::store::{ChallengeStore, MemoryStore};
use crate::types::{EvalLimits, Verdict};

fn service_with(store: Arc<MemoryStore>, limits: EvalLimits) -> ChallengeService {
    ChallengeService::new(store, 4, limits)
}

fn service(store: Arc<MemoryStore>) -> ChallengeService {
    service_with(store, EvalLimits::default())
}

#[tokio::test]
async fn python_ideal_solution_is_accepted() -> Result<(), Error> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());
    let challenge = service.create_challenge("math", fixtures::py_add()).await?;

    let ideal = challenge.ideal_solution.clone();
    let report = service
        .submit(&ideal, challenge.id, "python", Vec::new())
        .await?;

    assert_eq!(report.verdict, Verdict::Accepted);
    assert_eq!(report.stdout.trim(), "5");
    assert_eq!(report.expected_output.trim(), "5");

    // verdict and candidate code are written back onto the record
    let stored = store.find_by_id(challenge.id).await?.unwrap();
    assert_eq!(stored.review, Some(Verdict::Accepted));
    assert_eq!(stored.user_submitted_code, ideal);
    Ok(())
}

#[tokio::test]
async fn javascript_ideal_solution_is_accepted() -> Result<(), Error> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store);
    let challenge = service.create_challenge("math", fixtures::js_add()).await?;

    let report = service
        .submit(
            "function add(a,b){return a+b}",
            challenge.id,
            "javascript",
            Vec::new(),
        )
        .await?;

    assert_eq!(report.verdict, Verdict::Accepted);
    assert_eq!(report.stdout.trim(), "5");
    Ok(())
}

#[tokio::test]
async fn wrong_implementation_is_rejected_with_both_outputs() -> Result<(), Error> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());
    let challenge = service.create_challenge("math", fixtures::js_add()).await?;

    let report = service
        .submit(
            "function add(a,b){return a-b}",
            challenge.id,
            "javascript",
            Vec::new(),
        )
        .await?;

    assert_eq!(report.verdict, Verdict::Rejected);
    assert_eq!(report.stdout.trim(), "-1");
    assert_eq!(report.expected_output.trim(), "5");
    assert_ne!(report.stdout.trim(), report.expected_output.trim());

    let stored = store.find_by_id(challenge.id).await?.unwrap();
    assert_eq!(stored.review, Some(Verdict::Rejected));
    Ok(())
}

#[tokio::test]
async fn throwing_candidate_yields_classified_error_not_verdict() -> Result<(), Error> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());
    let challenge = service.create_challenge("math", fixtures::js_add()).await?;

    let err = service
        .submit(
            "function add(a,b){throw new Error('boom')}",
            challenge.id,
            "javascript",
            Vec::new(),
        )
        .await
        .unwrap_err();

    match err {
        Error::CandidateFailed(report) => {
            assert_eq!(report.error_type, "Runtime Error");
            assert_eq!(report.kind, FailureKind::NonZeroExit);
            assert!(report.message.contains("Error: boom"));
            // no temp file paths leak into the cleaned message
            assert!(!report.message.contains("/tmp"));
        }
        other => panic!("expected CandidateFailed, got {:?}", other),
    }

    // the attempted code is still recorded; no verdict was produced
    let stored = store.find_by_id(challenge.id).await?.unwrap();
    assert!(stored.user_submitted_code.contains("boom"));
    assert_eq!(stored.review, None);
    Ok(())
}

#[tokio::test]
async fn broken_reference_is_distinguishable_from_wrong_candidate() -> Result<(), Error> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store);
    let challenge = service
        .create_challenge("math", fixtures::py_broken_reference())
        .await?;

    let err = service
        .submit(
            "def add(a, b):\n    return a + b",
            challenge.id,
            "python",
            Vec::new(),
        )
        .await
        .unwrap_err();

    match err {
        Error::ReferenceFailed(report) => {
            assert!(report.message.contains("bad reference"));
            assert!(!report.message.contains("/tmp"));
        }
        other => panic!("expected ReferenceFailed, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn await_in_driver_runs_under_async_wrap() -> Result<(), Error> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store);
    let challenge = service
        .create_challenge("async", fixtures::js_async())
        .await?;

    let report = service
        .submit(
            "function add(a,b){return a+b}",
            challenge.id,
            "js",
            Vec::new(),
        )
        .await?;

    assert_eq!(report.verdict, Verdict::Accepted);
    assert_eq!(report.stdout.trim(), "5");
    Ok(())
}

#[tokio::test]
async fn stdin_lines_reach_both_runs() -> Result<(), Error> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store);
    let challenge = service.create_challenge("strings", fixtures::py_shout()).await?;

    let report = service
        .submit(
            "def shout(s):\n    return s.upper()",
            challenge.id,
            "python",
            vec!["hi".to_string()],
        )
        .await?;

    assert_eq!(report.verdict, Verdict::Accepted);
    assert_eq!(report.stdout.trim(), "HI");
    assert_eq!(report.expected_output.trim(), "HI");
    Ok(())
}

#[tokio::test]
async fn infinite_loop_is_reported_as_timeout() -> Result<(), Error> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service_with(
        store,
        EvalLimits {
            timeout: Duration::from_secs(1),
        },
    );
    let challenge = service.create_challenge("math", fixtures::py_add()).await?;

    let started = std::time::Instant::now();
    let err = service
        .submit(
            "def add(a, b):\n    while True:\n        pass",
            challenge.id,
            "python",
            Vec::new(),
        )
        .await
        .unwrap_err();

    match err {
        Error::CandidateFailed(report) => {
            assert_eq!(report.kind, FailureKind::Timeout);
            assert!(report.details.contains("timed out"));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(started.elapsed() < Duration::from_secs(6));
    Ok(())
}

#[tokio::test]
async fn concurrent_submissions_stay_isolated() -> Result<(), Error> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }

    let store = Arc::new(MemoryStore::new());
    let service = service(store);
    let challenge = service.create_challenge("math", fixtures::py_add()).await?;

    // Distinct wrong answers: every submission must get back its own output,
    // not a neighbor's.
    let mut handles = vec![];
    for i in 0..4 {
        let service = service.clone();
        let id = challenge.id;
        handles.push(tokio::spawn(async move {
            let code = format!("def add(a, b):\n    return {}", i * 100);
            let report = service.submit(&code, id, "python", Vec::new()).await?;
            Ok::<_, Error>((i, report))
        }));
    }

    for handle in handles {
        let (i, report) = handle.await.unwrap()?;
        assert_eq!(report.stdout.trim(), format!("{}", i * 100));
        assert_eq!(report.expected_output.trim(), "5");
        assert_eq!(report.verdict, Verdict::Rejected);
    }
    Ok(())
}
