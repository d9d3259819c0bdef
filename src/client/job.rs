use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    client::{
        backend::{Backend, EventChannel},
        config::ClientConfig,
        http::HttpBackend,
        progress::{NoopObserver, ProgressEvent, ProgressObserver},
        protocol::{PromptAck, ServerEvent, parse_history},
    },
    foundation::error::{SpriteError, SpriteResult},
    workflow::{builder::WorkflowBuilder, graph::WorkflowGraph},
};

/// Lifecycle of a submitted job. Ordered: a job never moves to an earlier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobStatus {
    /// Accepted, not started.
    Queued,
    /// A node of this job has started.
    Executing,
    /// Finished; outputs can be fetched.
    Complete,
    /// Errored, timed out, or lost its event channel.
    Failed,
}

impl JobStatus {
    /// `Complete` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// A job accepted by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobHandle {
    job_id: String,
    session_id: String,
    status: JobStatus,
}

impl JobHandle {
    /// Queued handle for a job acknowledged on `session_id`.
    pub fn new(job_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            session_id: session_id.into(),
            status: JobStatus::Queued,
        }
    }

    /// Backend-assigned job id.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Session whose event channel reports on this job.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Move to `next` unless that would go backward or leave a terminal state.
    ///
    /// Returns whether the status changed.
    pub fn advance(&mut self, next: JobStatus) -> bool {
        if self.status.is_terminal() || next <= self.status {
            return false;
        }
        self.status = next;
        true
    }
}

/// A graph paired with the session that will observe its execution.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    graph: WorkflowGraph,
    session_id: String,
}

impl GenerationRequest {
    /// Request with a fresh session id.
    pub fn new(graph: WorkflowGraph) -> Self {
        Self::with_session(graph, new_session_id())
    }

    /// Request observed by an existing session.
    pub fn with_session(graph: WorkflowGraph, session_id: impl Into<String>) -> Self {
        Self {
            graph,
            session_id: session_id.into(),
        }
    }

    /// Graph to execute.
    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Session id sent as `client_id`.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// `POST /prompt` body: `{"prompt": <graph>, "client_id": <session>}`.
    pub fn to_body(&self) -> SpriteResult<serde_json::Value> {
        Ok(serde_json::json!({
            "prompt": self.graph.to_api_json()?,
            "client_id": self.session_id,
        }))
    }
}

/// Fresh, unique session id.
pub fn new_session_id() -> String {
    format!("spritegen-{}", uuid::Uuid::new_v4())
}

/// Drives jobs on a backend: submit, track, fetch.
///
/// Owns no per-job state, so one client can run independent jobs concurrently as long as
/// each uses its own session id.
#[derive(Clone)]
pub struct JobClient {
    backend: Arc<dyn Backend>,
    config: ClientConfig,
    builder: WorkflowBuilder,
    observer: Arc<dyn ProgressObserver>,
}

impl std::fmt::Debug for JobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobClient")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl JobClient {
    /// Client over `backend` with the default builder and no observer.
    pub fn new(backend: Arc<dyn Backend>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            builder: WorkflowBuilder::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Client over HTTP for `config`.
    pub fn connect(config: ClientConfig) -> SpriteResult<Self> {
        let backend = HttpBackend::new(config.clone())?;
        Ok(Self::new(Arc::new(backend), config))
    }

    /// Replace the workflow builder used by [`Self::generate_image`].
    pub fn with_builder(mut self, builder: WorkflowBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Send progress events to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Workflow builder.
    pub fn builder(&self) -> &WorkflowBuilder {
        &self.builder
    }

    /// Observer receiving this client's progress events.
    pub fn observer(&self) -> &dyn ProgressObserver {
        self.observer.as_ref()
    }

    /// Liveness probe. Every failure reads as "unavailable".
    pub async fn is_available(&self) -> bool {
        match self.backend.system_stats().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(backend = self.backend.name(), error = %e, "backend unavailable");
                false
            }
        }
    }

    /// Submit a request. Every failure is a [`SpriteError::Submission`].
    #[tracing::instrument(skip_all, fields(session_id = request.session_id()))]
    pub async fn submit(&self, request: &GenerationRequest) -> SpriteResult<JobHandle> {
        let body = request
            .to_body()
            .map_err(|e| SpriteError::submission(format!("encode workflow: {e}")))?;
        let ack_body = self
            .backend
            .queue_prompt(&body)
            .await
            .map_err(|e| SpriteError::submission(format!("{e:#}")))?;
        let ack = PromptAck::parse(&ack_body)?;

        let handle = JobHandle::new(ack.prompt_id, request.session_id());
        self.observer.on_event(&ProgressEvent::Submitted {
            job_id: handle.job_id().to_string(),
            session_id: handle.session_id().to_string(),
        });
        Ok(handle)
    }

    /// Track `handle` over its session's event channel until it completes, fails, or
    /// `deadline` elapses.
    ///
    /// The deadline covers opening the channel. The channel is opened here, so a job that
    /// finishes before the channel is up is only seen as a timeout. [`Self::generate_image`]
    /// opens the channel before submitting.
    pub async fn await_completion(
        &self,
        handle: &mut JobHandle,
        deadline: Duration,
    ) -> SpriteResult<()> {
        let expiry = tokio::time::Instant::now() + deadline;
        let opened =
            tokio::time::timeout_at(expiry, self.open_channel(handle.session_id())).await;
        let channel = match opened {
            Ok(channel) => channel?,
            Err(_) => return Err(self.timed_out(handle, deadline)),
        };
        self.track(channel, handle, expiry, deadline).await
    }

    async fn open_channel(&self, session_id: &str) -> SpriteResult<Box<dyn EventChannel>> {
        self.backend
            .open_events(session_id)
            .await
            .map_err(|e| SpriteError::tracking(format!("open event channel: {e:#}")))
    }

    #[tracing::instrument(skip_all, fields(job_id = handle.job_id()))]
    async fn track(
        &self,
        mut channel: Box<dyn EventChannel>,
        handle: &mut JobHandle,
        expiry: tokio::time::Instant,
        deadline: Duration,
    ) -> SpriteResult<()> {
        let started = Instant::now();
        let sleep = tokio::time::sleep_until(expiry);
        tokio::pin!(sleep);

        let outcome = loop {
            let text = tokio::select! {
                biased;
                _ = &mut sleep => break Err(self.timed_out(handle, deadline)),
                msg = channel.recv() => msg,
            };
            let text = match text {
                Some(Ok(text)) => text,
                Some(Err(e)) => {
                    break Err(self.failed(handle, format!("event channel error: {e:#}")));
                }
                None => {
                    break Err(self.failed(
                        handle,
                        "event channel closed before the job finished".to_string(),
                    ));
                }
            };
            let event = match ServerEvent::parse(&text) {
                Ok(event) => event,
                Err(e) => {
                    tracing::trace!(error = %e, "skipping unparseable event");
                    continue;
                }
            };
            match event {
                ServerEvent::Executing { node, prompt_id }
                    if prompt_id.as_deref() == Some(handle.job_id()) =>
                {
                    match node {
                        None => {
                            handle.advance(JobStatus::Complete);
                            self.observer.on_event(&ProgressEvent::Completed {
                                job_id: handle.job_id().to_string(),
                                elapsed: started.elapsed(),
                            });
                            break Ok(());
                        }
                        Some(node) => {
                            handle.advance(JobStatus::Executing);
                            self.observer.on_event(&ProgressEvent::Executing {
                                job_id: handle.job_id().to_string(),
                                node,
                            });
                        }
                    }
                }
                ServerEvent::ExecutionError { prompt_id, data }
                    if prompt_id.as_deref().is_none_or(|id| id == handle.job_id()) =>
                {
                    break Err(self.failed(handle, format!("backend execution error: {data}")));
                }
                _ => {}
            }
        };

        channel.close().await;
        outcome
    }

    fn timed_out(&self, handle: &mut JobHandle, deadline: Duration) -> SpriteError {
        handle.advance(JobStatus::Failed);
        self.observer.on_event(&ProgressEvent::TimedOut {
            job_id: handle.job_id().to_string(),
            deadline,
        });
        SpriteError::timeout(format!(
            "job '{}' did not finish within {} ms",
            handle.job_id(),
            deadline.as_millis()
        ))
    }

    fn failed(&self, handle: &mut JobHandle, reason: String) -> SpriteError {
        handle.advance(JobStatus::Failed);
        self.observer.on_event(&ProgressEvent::Failed {
            job_id: handle.job_id().to_string(),
            reason: reason.clone(),
        });
        SpriteError::tracking(reason)
    }

    /// Download the first retrievable image of `job_id`, scanning output nodes and their
    /// images in the order the backend lists them.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_artifact(&self, job_id: &str) -> SpriteResult<Vec<u8>> {
        let body = self
            .backend
            .history(job_id)
            .await
            .map_err(|e| SpriteError::artifact_fetch(format!("history lookup: {e:#}")))?
            .ok_or_else(|| SpriteError::artifact_not_found(format!("no history for '{job_id}'")))?;
        let record = parse_history(&body, job_id)?
            .ok_or_else(|| SpriteError::artifact_not_found(format!("no history for '{job_id}'")))?;

        let mut attempts = 0usize;
        let mut last_error = None;
        for (node, image) in record.images() {
            attempts += 1;
            match self.backend.view(image).await {
                Ok(bytes) => {
                    self.observer.on_event(&ProgressEvent::ArtifactFetched {
                        job_id: job_id.to_string(),
                        filename: image.filename.clone(),
                        bytes: bytes.len(),
                    });
                    return Ok(bytes);
                }
                Err(e) => {
                    tracing::warn!(node, filename = %image.filename, error = %e, "image download failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            None => Err(SpriteError::artifact_not_found(format!(
                "job '{job_id}' produced no images"
            ))),
            Some(e) => Err(SpriteError::artifact_fetch(format!(
                "all {attempts} image(s) of job '{job_id}' failed to download; last: {e:#}"
            ))),
        }
    }

    /// Build, submit, track and fetch one image. The first failing stage's error is
    /// returned as is.
    ///
    /// The completion timeout covers opening the channel, submitting and tracking.
    #[tracing::instrument(skip(self, prompt, negative_prompt))]
    pub async fn generate_image(
        &self,
        prompt: &str,
        negative_prompt: &str,
        seed: u64,
        width: u32,
        height: u32,
    ) -> SpriteResult<Vec<u8>> {
        let graph = self
            .builder
            .build(prompt, negative_prompt, seed, width, height)?;
        let request = GenerationRequest::new(graph);
        let deadline = self.config.completion_timeout();
        let expiry = tokio::time::Instant::now() + deadline;

        let mut channel =
            match tokio::time::timeout_at(expiry, self.open_channel(request.session_id())).await {
                Ok(channel) => channel?,
                Err(_) => return Err(session_timed_out(request.session_id(), deadline)),
            };
        let mut handle = match tokio::time::timeout_at(expiry, self.submit(&request)).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => {
                channel.close().await;
                return Err(e);
            }
            Err(_) => {
                channel.close().await;
                return Err(session_timed_out(request.session_id(), deadline));
            }
        };
        self.track(channel, &mut handle, expiry, deadline).await?;
        self.fetch_artifact(handle.job_id()).await
    }
}

fn session_timed_out(session_id: &str, deadline: Duration) -> SpriteError {
    SpriteError::timeout(format!(
        "session '{session_id}' had no accepted job within {} ms",
        deadline.as_millis()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/client/job.rs"]
mod tests;
