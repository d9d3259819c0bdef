/// Convenience result type used across spritegen.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Top-level error taxonomy used by the generation and composition APIs.
#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    /// The backend rejected the job, was unreachable, or sent a malformed acknowledgment.
    #[error("submission error: {0}")]
    Submission(String),

    /// The backend reported an execution error while the job was tracked.
    #[error("tracking error: {0}")]
    Tracking(String),

    /// No completion or error event arrived before the deadline.
    #[error("timeout error: {0}")]
    Timeout(String),

    /// The history record is missing or lists no images.
    #[error("artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Every image listed in the history record failed to download.
    #[error("artifact fetch error: {0}")]
    ArtifactFetch(String),

    /// Packing or validation was handed no frames.
    #[error("empty frame set: {0}")]
    EmptyFrameSet(String),

    /// Invalid caller-provided data (graph wiring, dimensions, settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpriteError {
    /// Build a [`SpriteError::Submission`] value.
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Build a [`SpriteError::Tracking`] value.
    pub fn tracking(msg: impl Into<String>) -> Self {
        Self::Tracking(msg.into())
    }

    /// Build a [`SpriteError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`SpriteError::ArtifactNotFound`] value.
    pub fn artifact_not_found(msg: impl Into<String>) -> Self {
        Self::ArtifactNotFound(msg.into())
    }

    /// Build a [`SpriteError::ArtifactFetch`] value.
    pub fn artifact_fetch(msg: impl Into<String>) -> Self {
        Self::ArtifactFetch(msg.into())
    }

    /// Build a [`SpriteError::EmptyFrameSet`] value.
    pub fn empty_frame_set(msg: impl Into<String>) -> Self {
        Self::EmptyFrameSet(msg.into())
    }

    /// Build a [`SpriteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SpriteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures raised by the job protocol (submit, track, fetch).
    pub fn is_job_failure(&self) -> bool {
        matches!(
            self,
            Self::Submission(_)
                | Self::Tracking(_)
                | Self::Timeout(_)
                | Self::ArtifactNotFound(_)
                | Self::ArtifactFetch(_)
        )
    }
}

impl From<serde_json::Error> for SpriteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
