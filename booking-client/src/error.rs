//! Client error types.

use crate::domain::{DecodingError, InvalidDate};

/// Errors from the booking client.
///
/// Each variant names the stage that failed. Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Network failure or timeout
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Bootstrap response carried no session cookie
    #[error("session error: {0}")]
    Session(String),

    /// Anti-bot token fragment missing from the page or failed to evaluate
    #[error("token extraction failed: {0}")]
    TokenExtraction(String),

    /// Envelope with a truthy `error`; carries the server's message
    #[error("bad response from {endpoint}: {message}")]
    BadResponse { endpoint: String, message: String },

    /// Payload contained a code or value the domain model cannot represent
    #[error("decoding error: {0}")]
    Decoding(#[from] DecodingError),

    /// Session rejected by the server; there is no renewal
    #[error("unauthorized ({status}): session expired or rejected")]
    Unauthorized { status: u16 },

    /// Non-success HTTP status
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected JSON shape
    #[error("JSON parse error from {endpoint}: {message}")]
    Json {
        endpoint: String,
        message: String,
        body: Option<String>,
    },

    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),

    /// Client could not be configured
    #[error("configuration error: {0}")]
    Config(String),
}

impl BookingError {
    /// Whether the enrichment pipeline may skip the failing coach type or
    /// coach and continue with the next one.
    ///
    /// Only server-side rejections of a single request qualify. Transport,
    /// authorization and decoding failures abort the whole call.
    pub fn stage_is_skippable(&self) -> bool {
        matches!(self, BookingError::BadResponse { .. })
    }
}
