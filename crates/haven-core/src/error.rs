// ── Core error taxonomy ──

use thiserror::Error;

/// Errors surfaced by the core layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Login was rejected or the session is gone.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// An operation that needs an active session was called without one.
    #[error("not connected to the hub")]
    Disconnected,

    /// The hub rejected a device write. The mirror has already been
    /// rolled back (or superseded by a later write) when this surfaces.
    #[error("failed to control {device}")]
    WriteRejected {
        device: &'static str,
        #[source]
        source: haven_api::Error,
    },

    /// Transport, deserialization, or hub-side failure from the API layer.
    #[error(transparent)]
    Api(#[from] haven_api::Error),

    /// Re-serializing a log snapshot for download failed.
    #[error("serializing snapshot failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether this error means the hub no longer accepts our session.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::AuthenticationFailed { .. } => true,
            Self::Api(e) | Self::WriteRejected { source: e, .. } => e.is_unauthorized(),
            _ => false,
        }
    }
}
