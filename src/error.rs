use std::time::Duration;

use thiserror::Error;

use crate::model::error::ApiError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Spotify rate limited the request and automatic retrying is disabled in the client.
    #[error("Request rate limit hit; retry after {} seconds", .0.as_secs())]
    RateLimit(Duration),

    /// Spotify returned an error response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation was cancelled while sending a request or while waiting to retry one.
    #[error("The operation was cancelled")]
    Cancelled,

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Expected a response body but the response was empty")]
    EmptyResponse,
    #[error("The response is missing the expected '{0}' object")]
    MissingObject(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Access token unavailable: {0}")]
    AccessTokenUnavailable(String),

    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
}

impl Error {
    /// Returns whether this error is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimit(_))
    }

    /// Returns how long Spotify asked to wait before retrying, if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit(duration) => Some(*duration),
            _ => None,
        }
    }

    /// Returns the HTTP status code of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::HttpError(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
