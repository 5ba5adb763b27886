use reqwest::StatusCode;
use thiserror::Error;

/// Notice shown when a request could not be completed at all
pub const TRANSPORT_FAILURE_NOTICE: &str = "Sorry, something went wrong. Please try again.";

/// Failure of a single round trip to the chat endpoint
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The endpoint answered with a non-success status.
    #[error("chat endpoint returned status {status}")]
    Application {
        status: u16,
        /// Human-readable `detail` from the response body, if any
        detail: Option<String>,
    },

    /// The request could not be completed (connect error, timeout,
    /// unreadable response body, aborted task).
    #[error("chat request failed: {0}")]
    Transport(String),
}

impl EndpointError {
    pub fn application(status: u16, detail: Option<&str>) -> Self {
        Self::Application {
            status,
            detail: detail.map(str::to_string),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Text of the notice rendered in the chat panel for this failure
    pub fn notice_text(&self) -> String {
        match self {
            EndpointError::Application { status, detail } => {
                let detail = detail
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| status_phrase(*status));
                format!("Error: {}", detail)
            }
            EndpointError::Transport(_) => TRANSPORT_FAILURE_NOTICE.to_string(),
        }
    }
}

impl From<reqwest::Error> for EndpointError {
    fn from(err: reqwest::Error) -> Self {
        EndpointError::Transport(err.to_string())
    }
}

/// Canonical reason phrase for a status code, falling back to the number
fn status_phrase(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
