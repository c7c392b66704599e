use thiserror::Error;

/// Failure talking to the Make API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Make answered with a non-2xx status.
    #[error("Make API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Make API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Make API returned an invalid response: {0}")]
    InvalidResponse(String),
}
