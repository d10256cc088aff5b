use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode, Url,
};
use serde::Serialize;

use super::retry::RetryOn;
use crate::error::Result;

/// Which response statuses count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SuccessRange {
    /// Only `200 OK`.
    Ok,
    /// Any 2xx status.
    Successful,
}

/// A single logical request to Spotify. The same request may be sent more than once if it gets retried.
///
/// Requests created with [new](ApiRequest::new) accept any 2xx response as success, along with any status given with
/// [accept_status](ApiRequest::accept_status), and are retried on `429 Too Many Requests` and `202 Accepted`. Requests
/// created with [get](ApiRequest::get) accept only `200 OK` and are retried only on `429 Too Many Requests`.
///
/// In both cases a `204 No Content` response is a success without a body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) success_range: SuccessRange,
    pub(crate) extra_success_statuses: Vec<StatusCode>,
    pub(crate) retry_on: RetryOn,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            success_range: SuccessRange::Successful,
            extra_success_statuses: Vec::new(),
            retry_on: RetryOn::RateLimitOrAccepted,
        }
    }

    pub fn get(url: Url) -> Self {
        Self {
            success_range: SuccessRange::Ok,
            retry_on: RetryOn::RateLimitOnly,
            ..Self::new(Method::GET, url)
        }
    }

    /// Sets the request's body, serialized as JSON.
    pub fn json<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Treat the given status as success in addition to the statuses the request accepts by default.
    pub fn accept_status(mut self, status: StatusCode) -> Self {
        self.extra_success_statuses.push(status);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub(crate) fn is_success(&self, status: StatusCode) -> bool {
        let in_range = match self.success_range {
            SuccessRange::Ok => status == StatusCode::OK,
            SuccessRange::Successful => status.is_success(),
        };

        in_range || self.extra_success_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://api.spotify.com/v1/me/player/play").unwrap()
    }

    #[test]
    fn general_request_accepts_any_2xx_and_extra_statuses() {
        let request = ApiRequest::new(Method::PUT, url()).accept_status(StatusCode::NOT_MODIFIED);

        assert!(request.is_success(StatusCode::OK));
        assert!(request.is_success(StatusCode::CREATED));
        assert!(request.is_success(StatusCode::NOT_MODIFIED));
        assert!(!request.is_success(StatusCode::NOT_FOUND));
        assert_eq!(request.retry_on, RetryOn::RateLimitOrAccepted);
    }

    #[test]
    fn get_request_accepts_only_ok() {
        let request = ApiRequest::get(url());

        assert_eq!(request.method(), &Method::GET);
        assert!(request.is_success(StatusCode::OK));
        assert!(!request.is_success(StatusCode::CREATED));
        assert_eq!(request.retry_on, RetryOn::RateLimitOnly);
    }

    #[test]
    fn json_body_is_serialized() {
        let request = ApiRequest::new(Method::PUT, url())
            .json(&serde_json::json!({ "uris": ["spotify:track:4iV5W9uYEdYUVa79Axb7Rh"] }))
            .unwrap();

        assert_eq!(
            request.body.as_deref(),
            Some(br#"{"uris":["spotify:track:4iV5W9uYEdYUVa79Axb7Rh"]}"#.as_slice())
        );
    }
}
