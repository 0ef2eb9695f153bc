use thiserror::Error;

/// Top-level error type for the `haven-api` crate.
///
/// Covers every failure mode at the transport boundary: authentication,
/// network transport, rejected writes, and malformed payloads.
/// `haven-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed, or the hub answered 401/403 on any endpoint.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Hub responses ───────────────────────────────────────────────
    /// The hub rejected the request with a non-success status.
    #[error("Hub rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Payload parsed but violates the wire contract (e.g. wrong forecast
    /// arity). Treated as a failed poll by the sync loop.
    #[error("Malformed payload: {message}")]
    Malformed { message: String },
}

impl Error {
    /// Whether this error indicates the session is no longer valid.
    ///
    /// The sync loop treats any 401/403 as an implicit logout.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
