//! Backend connection settings.

use std::time::Duration;

use crate::foundation::error::{SpriteError, SpriteResult};

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BACKEND_URL: &str = "SPRITEGEN_BACKEND_URL";
/// Environment variable overriding the completion timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "SPRITEGEN_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// How to reach the backend and how long to wait for it.
pub struct ClientConfig {
    /// HTTP base URL, e.g. `http://localhost:8188`.
    pub base_url: String,
    /// Deadline for one job's completion, in milliseconds.
    pub completion_timeout_ms: u64,
    /// Deadline for the liveness probe, in milliseconds.
    pub probe_timeout_ms: u64,
    /// Per-request deadline for plain HTTP calls, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8188".to_string(),
            completion_timeout_ms: 120_000,
            probe_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    /// Config for `base_url` with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by [`ENV_BACKEND_URL`] and [`ENV_TIMEOUT_SECS`] when set.
    pub fn from_env() -> SpriteResult<Self> {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            cfg.base_url = url;
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                SpriteError::validation(format!("{ENV_TIMEOUT_SECS}='{secs}' is not a number: {e}"))
            })?;
            cfg.completion_timeout_ms = secs.saturating_mul(1000);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Replace the completion timeout.
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout_ms = timeout.as_millis().min(u128::from(u64::MAX)) as u64;
        self
    }

    /// Check settings invariants.
    pub fn validate(&self) -> SpriteResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SpriteError::validation(format!(
                "backend url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        for (name, v) in [
            ("completion_timeout_ms", self.completion_timeout_ms),
            ("probe_timeout_ms", self.probe_timeout_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ] {
            if v == 0 {
                return Err(SpriteError::validation(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }

    /// Completion deadline.
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }

    /// Liveness probe deadline.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Plain request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Base URL without a trailing slash.
    pub fn http_base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// `http(s)://` base rewritten to `ws(s)://`.
    pub fn ws_base(&self) -> String {
        let base = self.http_base();
        if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        }
    }

    /// Event channel URL for one session.
    pub fn events_url(&self, session_id: &str) -> String {
        format!("{}/ws?clientId={session_id}", self.ws_base())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/client/config.rs"]
mod tests;
