//! Backend seam.
//!
//! [`Backend`] is the raw transport surface the job client drives: four HTTP calls and a
//! session-scoped event channel. Implementations return untyped bodies and plain
//! `anyhow` errors; classification into [`crate::SpriteError`] kinds happens in
//! [`crate::JobClient`], so every transport behaves the same to callers.

use async_trait::async_trait;

use crate::client::protocol::ImageRef;

/// Persistent, session-scoped stream of text events.
#[async_trait]
pub trait EventChannel: Send {
    /// Next text message in channel order.
    ///
    /// `None` once the peer closed the channel. Must be cancel-safe: dropping the future
    /// before it resolves loses no message.
    async fn recv(&mut self) -> Option<anyhow::Result<String>>;

    /// Close the channel. Idempotent.
    async fn close(&mut self);
}

/// Raw transport to an image-synthesis backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// `GET /system_stats`; `Ok` only for a success status.
    async fn system_stats(&self) -> anyhow::Result<()>;

    /// `POST /prompt` with `body`; returns the response body of a success status.
    async fn queue_prompt(&self, body: &serde_json::Value) -> anyhow::Result<String>;

    /// `GET /history/{job_id}`; `None` when the backend reports no such record.
    async fn history(&self, job_id: &str) -> anyhow::Result<Option<String>>;

    /// `GET /view` for one image descriptor; returns the raw bytes.
    async fn view(&self, image: &ImageRef) -> anyhow::Result<Vec<u8>>;

    /// Open the event channel for `session_id`.
    async fn open_events(&self, session_id: &str) -> anyhow::Result<Box<dyn EventChannel>>;
}
