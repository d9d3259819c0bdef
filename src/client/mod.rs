//! Job orchestration against a ComfyUI-compatible backend.

/// Transport seam.
pub mod backend;
/// Connection settings.
pub mod config;
/// HTTP + websocket transport.
pub mod http;
/// Job lifecycle and the client driving it.
pub mod job;
/// Structured progress events.
pub mod progress;
/// Wire types.
pub mod protocol;
