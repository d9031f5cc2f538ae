//! HTTP implementation of the backend gateway
//!
//! Talks JSON to the tutor backend's `/api/*` endpoints with `reqwest`.
//! One request per operation, no retries.

use crate::config::GatewayConfig;
use crate::error::{Result, TutorError};
use crate::gateway::types::{HealthReport, Message, SessionSummary};
use crate::gateway::{Gateway, GatewayError, GatewayResult, EMPTY_REPLY};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Gateway backed by the tutor service's HTTP API
///
/// # Examples
///
/// ```
/// use tutorchat::config::GatewayConfig;
/// use tutorchat::gateway::HttpGateway;
///
/// let gateway = HttpGateway::new(&GatewayConfig::default()).unwrap();
/// assert_eq!(gateway.base_url(), "http://127.0.0.1:8000/");
/// ```
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct SessionsResponse {
    #[serde(default)]
    sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    prompt: &'a str,
    user_id: &'a str,
    session_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClearRequest<'a> {
    user_id: &'a str,
    session_id: &'a str,
}

impl HttpGateway {
    /// Create a gateway for the configured backend origin
    ///
    /// A request timeout is only applied when `timeout_seconds` is set;
    /// otherwise failures are whatever the transport reports.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL does not parse or the HTTP client
    /// cannot be built
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            TutorError::Config(format!("Invalid gateway base_url '{}': {}", config.base_url, e))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder =
            Client::builder().user_agent(concat!("tutorchat/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TutorError::Gateway(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Backend origin, always ending in `/`
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Transport(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> GatewayResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} request failed: {}", what, e);
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("Backend returned error {} for {}: {}", status, what, body);
        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response, what: &str) -> GatewayResult<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", what, e);
            GatewayError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_history(&self, user_id: &str, session_id: &str) -> GatewayResult<Vec<Message>> {
        let url = self.endpoint("api/history/")?;
        tracing::debug!("Fetching history for {}/{} from {}", user_id, session_id, url);

        let request = self
            .client
            .get(url)
            .query(&[("user_id", user_id), ("session_id", session_id)]);
        let response = self.send(request, "history").await?;
        let history: HistoryResponse = Self::decode(response, "history").await?;

        tracing::debug!("Loaded {} messages", history.messages.len());
        Ok(history.messages)
    }

    async fn fetch_sessions(&self, user_id: &str) -> GatewayResult<Vec<SessionSummary>> {
        let url = self.endpoint("api/sessions/")?;
        tracing::debug!("Fetching sessions for {} from {}", user_id, url);

        let request = self.client.get(url).query(&[("user_id", user_id)]);
        let response = self.send(request, "sessions").await?;
        let sessions: SessionsResponse = Self::decode(response, "sessions").await?;

        Ok(sessions.sessions)
    }

    async fn send_prompt(
        &self,
        user_id: &str,
        session_id: &str,
        prompt: &str,
    ) -> GatewayResult<String> {
        let url = self.endpoint("api/chat/")?;
        tracing::debug!(
            "Posting prompt ({} chars) for {}/{}",
            prompt.len(),
            user_id,
            session_id
        );

        let request = self.client.post(url).json(&ChatRequest {
            prompt,
            user_id,
            session_id,
        });
        let response = self.send(request, "chat").await?;
        let chat: ChatResponse = Self::decode(response, "chat").await?;

        if let Some(error) = chat.error {
            tracing::error!("Backend reported chat error: {}", error);
            return Err(GatewayError::Application(error));
        }

        match chat.reply {
            Some(reply) if !reply.is_empty() => Ok(reply),
            _ => {
                tracing::warn!("Backend returned an empty reply");
                Ok(EMPTY_REPLY.to_string())
            }
        }
    }

    async fn clear_session(&self, user_id: &str, session_id: &str) -> GatewayResult<bool> {
        let url = self.endpoint("api/clear/")?;
        tracing::debug!("Clearing session {}/{}", user_id, session_id);

        let request = self.client.post(url).json(&ClearRequest {
            user_id,
            session_id,
        });
        match self.send(request, "clear").await {
            Ok(_) => Ok(true),
            Err(GatewayError::Status { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn health(&self) -> GatewayResult<HealthReport> {
        let url = self.endpoint("api/health/")?;

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!("health request failed: {}", e);
            GatewayError::Transport(e.to_string())
        })?;

        // An unhealthy backend answers 503 with the same report shape.
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<HealthReport>(&body) {
            Ok(report) => Ok(report),
            Err(_) if !status.is_success() => Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(GatewayError::Decode(e.to_string())),
        }
    }
}
