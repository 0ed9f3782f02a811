use thiserror::Error;

/// Failure of a single provider query, normalized to a display-ready message.
///
/// The provider reports policy failures (plan gating, invalid queries) inside
/// an `error` envelope that may arrive with any HTTP status, including 200.
/// Both envelope and transport failures collapse into this one shape so that
/// callers only ever deal with `err.to_string()`.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The response body carried a provider error envelope.
    #[error("{message}")]
    Provider { message: String, code: Option<i64> },

    /// Network failure, non-2xx status without an envelope, or an unreadable body.
    #[error("{message}")]
    Transport { message: String },
}

impl WeatherError {
    /// The human-readable message, identical to the `Display` output.
    pub fn message(&self) -> &str {
        match self {
            WeatherError::Provider { message, .. } | WeatherError::Transport { message } => message,
        }
    }

    /// Provider error code, when the envelope carried one.
    pub fn code(&self) -> Option<i64> {
        match self {
            WeatherError::Provider { code, .. } => *code,
            WeatherError::Transport { .. } => None,
        }
    }

    /// Build a transport error, substituting `fallback` when the caught
    /// message is empty.
    pub(crate) fn transport(message: String, fallback: &str) -> Self {
        let message =
            if message.trim().is_empty() { fallback.to_string() } else { message };
        WeatherError::Transport { message }
    }
}
