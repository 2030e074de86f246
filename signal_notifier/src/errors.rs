use thiserror::Error;

/// Why a single delivery attempt did not succeed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network failure or timeout before a response arrived.
    #[error("notification request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The channel answered, but not with success.
    #[error("notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The channel cannot be reached for a reason other than HTTP.
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
}
