//! The Spotify client and its configuration.
//!
//! A [SpotifyClient] is built with a [SpotifyClientBuilder] from a [Transport] that authenticates the requests the
//! client sends. Every request goes through [execute](SpotifyClient::execute), which handles rate limiting, error
//! responses and reporting the requests to the client's [ObservabilitySink].

mod catalog;
mod executor;
pub mod metrics;
mod request;
pub mod retry;
mod transport;

pub use self::{
    catalog::RequestOption,
    metrics::{ExecutionEvent, LatencyRecorder, LogSink, NoopSink, ObservabilitySink},
    request::ApiRequest,
    retry::RetryOn,
    transport::{BearerTokenTransport, Transport},
};

use std::{fmt, sync::Arc};

use const_format::concatcp;
use reqwest::{header::HeaderValue, Url};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

pub(crate) const API_BASE_URL: &str = "https://api.spotify.com/v1/";
pub(crate) const USER_AGENT: &str = concatcp!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A client for the Spotify Web API.
///
/// Cloning the client is cheap; the clones share the same transport and configuration. The configuration cannot be
/// changed after the client is built.
#[derive(Clone)]
pub struct SpotifyClient {
    inner: Arc<SpotifyClientRef>,
}

struct SpotifyClientRef {
    transport: Arc<dyn Transport>,
    base_url: Url,
    auto_retry: bool,
    accept_language: Option<HeaderValue>,
    sink: Arc<dyn ObservabilitySink>,
}

pub struct SpotifyClientBuilder {
    transport: Arc<dyn Transport>,
    base_url: String,
    auto_retry: bool,
    accept_language: Option<String>,
    sink: Arc<dyn ObservabilitySink>,
}

impl SpotifyClient {
    /// Returns a client with the default configuration that sends its requests through the given transport.
    pub fn new<T>(transport: T) -> Result<Self>
    where
        T: Transport + 'static,
    {
        SpotifyClientBuilder::new(transport).build()
    }

    /// Returns a client with the default configuration that authenticates its requests with the given access token.
    pub fn with_access_token<S>(access_token: S) -> Result<Self>
    where
        S: AsRef<str>,
    {
        Self::new(BearerTokenTransport::new(access_token)?)
    }

    pub fn builder<T>(transport: T) -> SpotifyClientBuilder
    where
        T: Transport + 'static,
    {
        SpotifyClientBuilder::new(transport)
    }

    /// Returns the access token the client's transport currently uses.
    pub fn token(&self) -> Result<String> {
        self.inner.transport.access_token()
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns whether the client automatically retries rate limited requests.
    pub fn auto_retry(&self) -> bool {
        self.inner.auto_retry
    }

    /// Returns the URL of an endpoint relative to the client's base URL.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Gets an endpoint relative to the client's base URL and deserializes the response into the given type. Returns
    /// `None` if Spotify responded with `204 No Content`.
    pub async fn get<T>(&self, cancel: &CancellationToken, path: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        self.get_url(cancel, self.endpoint_url(path)?).await
    }

    /// Gets an absolute URL, such as a page's `next` URL, and deserializes the response into the given type. Returns
    /// `None` if Spotify responded with `204 No Content`.
    pub async fn get_url<T>(&self, cancel: &CancellationToken, url: Url) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        self.execute(cancel, ApiRequest::get(url)).await
    }
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auto_retry", &self.inner.auto_retry)
            .field("accept_language", &self.inner.accept_language)
            .finish_non_exhaustive()
    }
}

impl SpotifyClientBuilder {
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            transport: Arc::new(transport),
            base_url: API_BASE_URL.to_owned(),
            auto_retry: false,
            accept_language: None,
            sink: Arc::new(NoopSink),
        }
    }

    /// Use an alternative base URL for all requests, for example to connect to a staging environment. Defaults to
    /// `https://api.spotify.com/v1/`.
    pub fn base_url<S>(self, base_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Whether or not to automatically retry requests that got rate limited, after waiting the time Spotify asked for.
    /// When disabled, rate limited requests fail with [Error::RateLimit]. Defaults to `false`.
    pub fn auto_retry(self, auto_retry: bool) -> Self {
        Self { auto_retry, ..self }
    }

    /// Send the given `Accept-Language` header with every request.
    pub fn accept_language<S>(self, accept_language: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            accept_language: Some(accept_language.into()),
            ..self
        }
    }

    /// Report every HTTP attempt the client makes to the given sink. Defaults to [NoopSink].
    pub fn observability_sink<S>(self, sink: S) -> Self
    where
        S: ObservabilitySink + 'static,
    {
        Self {
            sink: Arc::new(sink),
            ..self
        }
    }

    pub fn build(self) -> Result<SpotifyClient> {
        let mut base_url = self.base_url;

        // Url::join replaces the last path segment unless the base ends with a slash
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let accept_language = self
            .accept_language
            .map(|language| HeaderValue::from_str(&language))
            .transpose()?;

        Ok(SpotifyClient {
            inner: Arc::new(SpotifyClientRef {
                transport: self.transport,
                base_url,
                auto_retry: self.auto_retry,
                accept_language,
                sink: self.sink,
            }),
        })
    }
}
