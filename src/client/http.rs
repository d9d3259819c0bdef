use anyhow::Context as _;
use async_trait::async_trait;
use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use crate::{
    client::{
        backend::{Backend, EventChannel},
        config::ClientConfig,
        protocol::ImageRef,
    },
    foundation::error::SpriteResult,
};

/// ComfyUI-compatible backend over HTTP and a websocket event channel.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Backend for `config`. Fails on invalid settings or TLS initialisation errors.
    pub fn new(config: ClientConfig) -> SpriteResult<Self> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("build http client")?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Settings in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.http_base())
    }
}

async fn error_for_status(response: reqwest::Response, what: &str) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("{what} returned {status}: {body}");
}

#[async_trait]
impl Backend for HttpBackend {
    fn name(&self) -> &'static str {
        "ComfyUI"
    }

    async fn system_stats(&self) -> anyhow::Result<()> {
        let response = self
            .http_client
            .get(self.url("/system_stats"))
            .timeout(self.config.probe_timeout())
            .send()
            .await?;
        error_for_status(response, "system_stats").await?;
        Ok(())
    }

    async fn queue_prompt(&self, body: &serde_json::Value) -> anyhow::Result<String> {
        let response = self
            .http_client
            .post(self.url("/prompt"))
            .json(body)
            .send()
            .await
            .context("send prompt")?;
        let response = error_for_status(response, "prompt").await?;
        Ok(response.text().await.context("read prompt acknowledgment")?)
    }

    async fn history(&self, job_id: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .http_client
            .get(self.url(&format!("/history/{job_id}")))
            .send()
            .await
            .context("send history request")?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = error_for_status(response, "history").await?;
        Ok(Some(response.text().await.context("read history body")?))
    }

    async fn view(&self, image: &ImageRef) -> anyhow::Result<Vec<u8>> {
        let response = self
            .http_client
            .get(self.url("/view"))
            .query(&[
                ("filename", image.filename.as_str()),
                ("subfolder", image.subfolder.as_str()),
                ("type", image.kind.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("request image '{}'", image.filename))?;
        let response = error_for_status(response, "view").await?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("read image '{}'", image.filename))?;
        Ok(bytes.to_vec())
    }

    async fn open_events(&self, session_id: &str) -> anyhow::Result<Box<dyn EventChannel>> {
        let url = self.config.events_url(session_id);
        let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .with_context(|| format!("connect event channel '{url}'"))?;
        tracing::debug!(%url, "event channel open");
        Ok(Box::new(WsEventChannel {
            stream,
            closed: false,
        }))
    }
}

/// Websocket event channel. Binary frames (image previews) are skipped.
struct WsEventChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

#[async_trait]
impl EventChannel for WsEventChannel {
    async fn recv(&mut self) -> Option<anyhow::Result<String>> {
        if self.closed {
            return None;
        }
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Close(_)) => {
                    self.closed = true;
                    return None;
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(anyhow::Error::new(e).context("event channel receive"))),
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.close(None).await {
            tracing::trace!(error = %e, "event channel close");
        }
    }
}
