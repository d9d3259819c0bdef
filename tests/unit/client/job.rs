use super::*;
use crate::workflow::builder::build_workflow;

#[test]
fn status_only_moves_forward() {
    let mut handle = JobHandle::new("job-1", "s");
    assert_eq!(handle.status(), JobStatus::Queued);

    assert!(handle.advance(JobStatus::Executing));
    assert!(!handle.advance(JobStatus::Queued));
    assert!(!handle.advance(JobStatus::Executing));
    assert_eq!(handle.status(), JobStatus::Executing);

    assert!(handle.advance(JobStatus::Complete));
    assert!(!handle.advance(JobStatus::Failed));
    assert_eq!(handle.status(), JobStatus::Complete);
}

#[test]
fn queued_job_can_fail_directly() {
    let mut handle = JobHandle::new("job-1", "s");
    assert!(handle.advance(JobStatus::Failed));
    assert!(handle.status().is_terminal());
    assert!(!handle.advance(JobStatus::Complete));
}

#[test]
fn session_ids_are_unique() {
    let a = new_session_id();
    let b = new_session_id();
    assert_ne!(a, b);
    assert!(a.starts_with("spritegen-"));
}

#[test]
fn request_body_carries_graph_and_session() {
    let graph = build_workflow("p", "n", 42, 128, 128).unwrap();
    let request = GenerationRequest::with_session(graph, "session-7");
    let body = request.to_body().unwrap();

    assert_eq!(body["client_id"], "session-7");
    assert_eq!(body["prompt"]["3"]["class_type"], "KSampler");
    assert_eq!(body["prompt"]["3"]["inputs"]["seed"], 42);
    assert_eq!(body["prompt"]["5"]["inputs"]["width"], 128);
}
