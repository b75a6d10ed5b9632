use thiserror::Error;

/// Top-level error type for the `sae-api` crate.
///
/// Every request failure ends up here: the transport could not deliver the
/// request, the server answered with a non-success status, or a payload could
/// not be (de)serialized. Callers that only care about success can treat it
/// as opaque; the variants exist so they can tell causes apart when needed.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-success HTTP status from the SAE backend.
    #[error("Server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A record could not be encoded as a request body.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The HTTP status attached to this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client itself never retries; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Server { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}
