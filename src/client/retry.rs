use std::time::Duration;

use log::{debug, warn};
use reqwest::{
    header::{self, HeaderMap},
    StatusCode,
};

/// The time to wait before retrying when Spotify tells us to retry but doesn't say how long to wait.
pub const DEFAULT_RETRY_DURATION: Duration = Duration::from_secs(5);

/// Which response statuses mean the request should be retried at a later time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// Only `429 Too Many Requests`. Used by plain GET requests.
    RateLimitOnly,
    /// `429 Too Many Requests` and `202 Accepted`. Used by all other requests.
    RateLimitOrAccepted,
}

impl RetryOn {
    /// Returns whether the given status means the request should be retried.
    pub fn should_retry(self, status: StatusCode) -> bool {
        match self {
            RetryOn::RateLimitOnly => status == StatusCode::TOO_MANY_REQUESTS,
            RetryOn::RateLimitOrAccepted => status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::ACCEPTED,
        }
    }
}

/// Returns how long to wait before retrying a request based on the response's `Retry-After` header. Falls back to
/// [DEFAULT_RETRY_DURATION] if the header is missing, isn't a positive number of seconds, or is zero.
pub fn retry_duration(headers: &HeaderMap) -> Duration {
    let Some(raw) = headers.get(header::RETRY_AFTER) else {
        return DEFAULT_RETRY_DURATION;
    };

    match raw.to_str().ok().and_then(|value| value.trim().parse::<u32>().ok()) {
        Some(0) => {
            debug!("Zero Retry-After in response, using default {DEFAULT_RETRY_DURATION:?}");
            DEFAULT_RETRY_DURATION
        }

        Some(seconds) => Duration::from_secs(u64::from(seconds)),

        None => {
            warn!("Invalid Retry-After header in response: {raw:?}");
            DEFAULT_RETRY_DURATION
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers_with_retry_after(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::RETRY_AFTER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn retry_after_seconds() {
        assert_eq!(retry_duration(&headers_with_retry_after("2")), Duration::from_secs(2));
        assert_eq!(retry_duration(&headers_with_retry_after(" 30 ")), Duration::from_secs(30));
    }

    #[test]
    fn missing_retry_after_uses_default() {
        assert_eq!(retry_duration(&HeaderMap::new()), DEFAULT_RETRY_DURATION);
    }

    #[test]
    fn invalid_retry_after_uses_default() {
        for value in ["abc", "-3", "1.5", "", "Wed, 21 Oct 2015 07:28:00 GMT"] {
            assert_eq!(
                retry_duration(&headers_with_retry_after(value)),
                DEFAULT_RETRY_DURATION,
                "Retry-After: {value}"
            );
        }
    }

    #[test]
    fn zero_retry_after_uses_default() {
        assert_eq!(retry_duration(&headers_with_retry_after("0")), DEFAULT_RETRY_DURATION);
    }

    #[test]
    fn get_requests_retry_only_on_rate_limit() {
        assert!(RetryOn::RateLimitOnly.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(!RetryOn::RateLimitOnly.should_retry(StatusCode::ACCEPTED));
        assert!(!RetryOn::RateLimitOnly.should_retry(StatusCode::OK));
    }

    #[test]
    fn other_requests_retry_on_rate_limit_and_accepted() {
        assert!(RetryOn::RateLimitOrAccepted.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(RetryOn::RateLimitOrAccepted.should_retry(StatusCode::ACCEPTED));
        assert!(!RetryOn::RateLimitOrAccepted.should_retry(StatusCode::NO_CONTENT));
        assert!(!RetryOn::RateLimitOrAccepted.should_retry(StatusCode::SERVICE_UNAVAILABLE));
    }
}
