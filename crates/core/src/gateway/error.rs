use thiserror::Error;

/// Failure of a single gateway call.
///
/// Transport, parse and credential failures stay distinct so the relay can map
/// them to different HTTP statuses.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invoked without upstream authentication configured
    #[error("{env} not configured")]
    MissingCredential { env: &'static str },

    /// The HTTP request never produced a response
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status
    #[error("API call failed: {status} {message}")]
    Transport { status: u16, message: String },

    /// Upstream succeeded but carried no text block
    #[error("No text content in response")]
    NoTextContent,

    /// Neither the strict parse nor the brace-matched fallback produced JSON
    #[error("Failed to parse agent response as JSON: {strict}")]
    Parse {
        strict: serde_json::Error,
        fallback: Option<serde_json::Error>,
    },

    /// Upstream answered 2xx with a body that is not a Messages API response
    #[error("Malformed Messages API response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// A relay answered 2xx with a body that is not JSON
    #[error("Invalid relay response: {0}")]
    InvalidRelayResponse(String),
}

impl GatewayError {
    /// Upstream HTTP status, when the failure came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
