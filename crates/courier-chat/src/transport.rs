//! HTTP boundary to the agent backend.
//!
//! Three operations, no business logic: a non-success status becomes
//! [`TransportError::Status`], bodies are otherwise passed through as decoded.
//! There is no retry at this layer.

use std::time::Duration;

use async_trait::async_trait;
use courier_core::config::BackendConfig;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TransportError;
use crate::types::{ChatReply, EmailDigest, EmailSummary, HealthStatus, UnreadEmails};

/// The backend calls the orchestrator depends on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET /emails/unread-today`
    async fn fetch_unread_today(&self) -> Result<UnreadEmails, TransportError>;

    /// `POST /emails/summarize` with `{ emails }`
    async fn summarize_emails(
        &self,
        emails: &[EmailSummary],
    ) -> Result<EmailDigest, TransportError>;

    /// `POST /chat` with `{ message }`
    async fn send_chat_message(&self, message: &str) -> Result<ChatReply, TransportError>;
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    emails: &'a [EmailSummary],
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// [`Transport`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport with default client settings.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Create a transport from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /` liveness probe.
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let url = self.endpoint("")?;
        tracing::debug!(url = %url, "GET health");
        let response = self.client.get(url).send().await.map_err(network)?;
        decode(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_unread_today(&self) -> Result<UnreadEmails, TransportError> {
        let url = self.endpoint("emails/unread-today")?;
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(url).send().await.map_err(network)?;
        decode(response).await
    }

    async fn summarize_emails(
        &self,
        emails: &[EmailSummary],
    ) -> Result<EmailDigest, TransportError> {
        self.post("emails/summarize", &SummarizeRequest { emails })
            .await
    }

    async fn send_chat_message(&self, message: &str) -> Result<ChatReply, TransportError> {
        self.post("chat", &ChatRequest { message }).await
    }
}

/// Normalize to a trailing slash so relative joins append instead of
/// replacing the last path segment.
fn parse_base_url(raw: &str) -> Result<Url, TransportError> {
    let mut normalized = raw.trim().trim_end_matches('/').to_string();
    normalized.push('/');
    let url = Url::parse(&normalized).map_err(|e| TransportError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(TransportError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

fn network(err: reqwest::Error) -> TransportError {
    TransportError::Network(err.to_string())
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, TransportError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), url = %response.url(), "Backend returned error status");
        return Err(TransportError::Status {
            status: status.as_u16(),
        });
    }
    response
        .json::<R>()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}
