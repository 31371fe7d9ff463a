use thiserror::Error;

/// Errors from the geocoding and forecast clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Could not find coordinates for city '{city}'. Please try a different name.")]
    NotFound { city: String },
    /// Transport failure or non-success status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(String),
}
