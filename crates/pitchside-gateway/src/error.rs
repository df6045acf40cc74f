// Gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The upstream refused the request (bad team id, unknown gameweek).
    #[error("request to {url} failed with status {status}")]
    BadRequest { status: u16, url: String },

    /// The upstream failed or asked us to back off.
    #[error("upstream error {status} from {url}")]
    Upstream { status: u16, url: String },

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl GatewayError {
    /// Map a non-success status. 429 counts as upstream pressure, not a bad request.
    pub fn from_status(status: u16, url: impl Into<String>) -> Self {
        let url = url.into();
        if status == 429 || status >= 500 {
            GatewayError::Upstream { status, url }
        } else {
            GatewayError::BadRequest { status, url }
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Upstream { .. } | GatewayError::Transport { .. }
        )
    }

    /// HTTP status, when the upstream answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::BadRequest { status, .. } | GatewayError::Upstream { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
