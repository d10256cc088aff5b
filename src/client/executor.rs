use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use reqwest::{
    header::{self, HeaderValue},
    Method, Request, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::{metrics::ExecutionEvent, request::ApiRequest, retry, SpotifyClient, USER_AGENT};
use crate::{
    error::{Error, Result},
    model::error::{decode_error_response, read_body},
};

impl SpotifyClient {
    /// Sends a request and deserializes a successful response's body into the given type. Returns `None` if Spotify
    /// responded with `204 No Content`.
    ///
    /// Rate limited requests are retried after waiting if the client is configured to automatically retry, otherwise
    /// they fail with [Error::RateLimit]. Unsuccessful responses fail with [Error::Api]. Cancelling the given token
    /// aborts the request, or the wait before retrying it, with [Error::Cancelled].
    pub async fn execute<T>(&self, cancel: &CancellationToken, request: ApiRequest) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(response) = self.send_until_settled(cancel, &request).await? else {
            return Ok(None);
        };

        let body = read_body(cancel, response).await?;
        trace!("Response body: {}", String::from_utf8_lossy(&body));

        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Sends a request without reading a successful response's body. Otherwise works like
    /// [execute](SpotifyClient::execute).
    pub async fn execute_discarding_body(&self, cancel: &CancellationToken, request: ApiRequest) -> Result<()> {
        self.send_until_settled(cancel, &request).await?;
        Ok(())
    }

    /// Sends the request until it's no longer being rate limited. Returns the successful response, or `None` if it was
    /// `204 No Content`.
    async fn send_until_settled(&self, cancel: &CancellationToken, request: &ApiRequest) -> Result<Option<Response>> {
        loop {
            let http_request = self.build_http_request(request);
            debug!("Requesting {} {}", request.method, request.url);

            let started = Instant::now();
            let result = tokio::select! {
                biased;

                _ = cancel.cancelled() => Err(Error::Cancelled),
                result = self.inner.transport.send(http_request) => result.map_err(Error::from),
            };
            let elapsed = started.elapsed();

            self.inner.sink.record(&ExecutionEvent {
                elapsed,
                status: result.as_ref().ok().map(Response::status),
                route: request.url.path().to_owned(),
            });

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    warn!("Request to {} failed after {elapsed:?}: {e}", request.url);
                    return Err(e);
                }
            };

            let status = response.status();
            debug!("Got {status} response from {} in {elapsed:?}", request.url);

            if request.retry_on.should_retry(status) {
                let retry_after = retry::retry_duration(response.headers());

                if self.inner.auto_retry {
                    info!("Got {status} response, retrying in {retry_after:?}");
                    rate_limit_sleep(cancel, retry_after).await?;
                    continue;
                }

                warn!("Got {status} response, retry after {retry_after:?}, and automatic retrying is disabled");
                return Err(Error::RateLimit(retry_after));
            }

            if status == StatusCode::NO_CONTENT {
                return Ok(None);
            }

            if !request.is_success(status) {
                let error = decode_error_response(cancel, response).await;
                warn!("Got {status} response from {}: {error}", request.url);

                return Err(error);
            }

            return Ok(Some(response));
        }
    }

    fn build_http_request(&self, request: &ApiRequest) -> Request {
        let mut http_request = Request::new(request.method.clone(), request.url.clone());
        let headers = http_request.headers_mut();

        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.extend(request.headers.clone());

        if let Some(accept_language) = &self.inner.accept_language {
            headers.insert(header::ACCEPT_LANGUAGE, accept_language.clone());
        }

        if let Some(body) = &request.body {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *http_request.body_mut() = Some(body.clone().into());
        // Spotify requires that all empty POST and PUT have a Content-Length header set to 0. reqwest doesn't set it
        // for bodiless requests so it has to be done here
        } else if request.method == Method::POST || request.method == Method::PUT {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        }

        http_request
    }
}

/// Waits before retrying a request. Returns early with [Error::Cancelled] if the token is cancelled.
async fn rate_limit_sleep(cancel: &CancellationToken, sleep_time: Duration) -> Result<()> {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(sleep_time) => Ok(()),
    }
}
