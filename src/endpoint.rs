use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EndpointError;
use crate::message::ChatMessage;

/// Body of a `POST /chat` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
}

/// Successful reply from the endpoint. Any extra fields (such as `role`)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub content: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// The external service that turns a transcript into a reply
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, EndpointError>;
}

#[derive(Clone)]
pub struct HttpEndpoint {
    client: Client,
    base_url: String,
}

impl HttpEndpoint {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, EndpointError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

#[async_trait]
impl ChatEndpoint for HttpEndpoint {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, EndpointError> {
        let url = self.chat_url();
        debug!(%url, model = %request.model, messages = request.messages.len(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            warn!(status = status.as_u16(), detail = ?detail, "chat endpoint returned an error");
            return Err(EndpointError::Application {
                status: status.as_u16(),
                detail,
            });
        }

        let reply: ChatReply = response.json().await?;
        debug!(chars = reply.content.chars().count(), "received chat reply");
        Ok(reply)
    }
}

/// Pull the `detail` field out of an error body.
///
/// A string detail is used verbatim; structured details (validation error
/// lists) are rendered as compact JSON. Empty or missing details yield None.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
