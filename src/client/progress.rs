//! Progress reporting.
//!
//! The job client and the animation pipeline never print. They describe what happens as
//! [`ProgressEvent`] values and hand them to a [`ProgressObserver`].

use std::time::Duration;

use crate::sprite::validate::ValidationResult;

/// Something observable happened during generation.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    /// The backend accepted a job.
    Submitted { job_id: String, session_id: String },
    /// The backend started a node of the job.
    Executing { job_id: String, node: String },
    /// The job's pipeline drained.
    Completed { job_id: String, elapsed: Duration },
    /// The backend reported an execution error.
    Failed { job_id: String, reason: String },
    /// No terminal event arrived before the deadline.
    TimedOut { job_id: String, deadline: Duration },
    /// Artifact bytes were downloaded.
    ArtifactFetched {
        job_id: String,
        filename: String,
        bytes: usize,
    },
    /// A frame of an animation is about to be generated.
    FrameStarted {
        entity: String,
        animation: String,
        index: usize,
        total: usize,
        seed: u64,
    },
    /// A frame was generated, normalized and saved.
    FrameFinished {
        entity: String,
        animation: String,
        index: usize,
        elapsed: Duration,
    },
    /// The animation's sheet was packed and written.
    SheetPacked {
        entity: String,
        animation: String,
        frames: usize,
        width: u32,
        height: u32,
    },
    /// The animation's frames were scored.
    Validated {
        entity: String,
        animation: String,
        result: ValidationResult,
    },
    /// An entity failed; siblings continue.
    EntityFailed { entity: String, error: String },
}

/// Receives progress events. Must be cheap; it runs inline on the generating task.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Forwards events to `tracing`: lifecycle at `info`, per-node chatter at `debug`,
/// failures at `warn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Submitted { job_id, session_id } => {
                tracing::debug!(job_id, session_id, "job submitted");
            }
            ProgressEvent::Executing { job_id, node } => {
                tracing::debug!(job_id, node, "executing node");
            }
            ProgressEvent::Completed { job_id, elapsed } => {
                tracing::debug!(job_id, elapsed_ms = elapsed.as_millis() as u64, "job complete");
            }
            ProgressEvent::Failed { job_id, reason } => {
                tracing::warn!(job_id, reason, "job failed");
            }
            ProgressEvent::TimedOut { job_id, deadline } => {
                tracing::warn!(job_id, deadline_ms = deadline.as_millis() as u64, "job timed out");
            }
            ProgressEvent::ArtifactFetched {
                job_id,
                filename,
                bytes,
            } => {
                tracing::debug!(job_id, filename, bytes, "artifact fetched");
            }
            ProgressEvent::FrameStarted {
                entity,
                animation,
                index,
                total,
                seed,
            } => {
                tracing::info!(
                    entity,
                    animation,
                    frame = index + 1,
                    total,
                    seed,
                    "generating frame"
                );
            }
            ProgressEvent::FrameFinished {
                entity,
                animation,
                index,
                elapsed,
            } => {
                tracing::info!(
                    entity,
                    animation,
                    frame = index + 1,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "frame done"
                );
            }
            ProgressEvent::SheetPacked {
                entity,
                animation,
                frames,
                width,
                height,
            } => {
                tracing::info!(entity, animation, frames, width, height, "sheet packed");
            }
            ProgressEvent::Validated {
                entity,
                animation,
                result,
            } => {
                tracing::info!(
                    entity,
                    animation,
                    size_consistent = result.size_consistent,
                    has_transparency = result.has_transparency,
                    similarity = result.visual_similarity,
                    passes = result.passes,
                    "frames validated"
                );
            }
            ProgressEvent::EntityFailed { entity, error } => {
                tracing::warn!(entity, error, "entity failed");
            }
        }
    }
}
