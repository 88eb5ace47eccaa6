/// Message shown to users when the backend could not be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "network error, please retry";

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request target could not be parsed; no attempt was made.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Request headers or body could not be built; no attempt was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The attempt did not settle within the per-attempt deadline.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// Response with status >= 500, raised so it takes the retry path.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    /// Non-success status below 500 whose body is not an API envelope.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Envelope with `code != 200`.
    #[error("api error {code}: {msg}")]
    Api {
        /// Application-level code from the envelope.
        code: i64,
        /// Server-provided message.
        msg: String,
    },
    /// Response decoding or envelope-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether the executor would schedule another attempt for this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => !err.is_builder(),
            Self::Timeout { .. } | Self::Server { .. } => true,
            Self::InvalidUrl { .. }
            | Self::InvalidRequest(_)
            | Self::Http { .. }
            | Self::Api { .. }
            | Self::Decode(_) => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Text suitable for showing to an end user.
    ///
    /// Transport and server failures collapse into a generic retry hint;
    /// application-level failures surface the server's own message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { msg, .. } if !msg.trim().is_empty() => msg.clone(),
            Self::Api { code, .. } => format!("request failed (code {code})"),
            _ => NETWORK_ERROR_MESSAGE.to_owned(),
        }
    }
}
