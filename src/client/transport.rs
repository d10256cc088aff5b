use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderValue},
    Request, Response,
};

use crate::error::{Error, Result};

/// Sends already-built HTTP requests to Spotify with authentication applied.
///
/// The client never manages authentication itself; obtaining and refreshing access tokens is up to the transport, or
/// whatever keeps the transport's token up to date.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Authenticates and sends a request. Dropping the returned future aborts the request.
    async fn send(&self, request: Request) -> reqwest::Result<Response>;

    /// Returns the access token currently used to authenticate requests.
    fn access_token(&self) -> Result<String> {
        Err(Error::AccessTokenUnavailable(
            "the transport doesn't expose an access token".to_owned(),
        ))
    }
}

/// A transport that authenticates requests with a bearer access token.
///
/// The token can be swapped at any time with [set_access_token](BearerTokenTransport::set_access_token), for example
/// by a task that refreshes it before it expires. Requests already in flight keep the token they were sent with.
#[derive(Debug)]
pub struct BearerTokenTransport {
    http_client: reqwest::Client,
    authorization: RwLock<HeaderValue>,
}

impl BearerTokenTransport {
    /// Returns a new transport using a default HTTP client.
    pub fn new<S>(access_token: S) -> Result<Self>
    where
        S: AsRef<str>,
    {
        Self::with_client(reqwest::Client::new(), access_token)
    }

    /// Returns a new transport using the given HTTP client.
    pub fn with_client<S>(http_client: reqwest::Client, access_token: S) -> Result<Self>
    where
        S: AsRef<str>,
    {
        Ok(Self {
            http_client,
            authorization: RwLock::new(bearer_header(access_token.as_ref())?),
        })
    }

    /// Replaces the access token used for all subsequent requests.
    pub fn set_access_token<S>(&self, access_token: S) -> Result<()>
    where
        S: AsRef<str>,
    {
        let authorization = bearer_header(access_token.as_ref())?;
        *self.authorization.write().expect("access token rwlock poisoned") = authorization;

        Ok(())
    }

    fn authorization(&self) -> HeaderValue {
        self.authorization.read().expect("access token rwlock poisoned").clone()
    }
}

#[async_trait]
impl Transport for BearerTokenTransport {
    async fn send(&self, mut request: Request) -> reqwest::Result<Response> {
        request.headers_mut().insert(header::AUTHORIZATION, self.authorization());
        self.http_client.execute(request).await
    }

    fn access_token(&self) -> Result<String> {
        let authorization = self.authorization();
        let value = authorization
            .to_str()
            .map_err(|e| Error::AccessTokenUnavailable(e.to_string()))?;

        Ok(value.strip_prefix("Bearer ").unwrap_or(value).to_owned())
    }
}

/// Sends requests as they are. The client is expected to authenticate them on its own, for example with default
/// headers.
#[async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: Request) -> reqwest::Result<Response> {
        self.execute(request).await
    }
}

fn bearer_header(access_token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_transport_exposes_access_token() {
        let transport = BearerTokenTransport::new("abc123").unwrap();
        assert_eq!(transport.access_token().unwrap(), "abc123");

        transport.set_access_token("def456").unwrap();
        assert_eq!(transport.access_token().unwrap(), "def456");
    }

    #[test]
    fn invalid_access_token_is_rejected() {
        assert!(matches!(
            BearerTokenTransport::new("bad\ntoken"),
            Err(Error::InvalidHeaderValue(_))
        ));
    }

    #[test]
    fn plain_client_has_no_access_token() {
        assert!(matches!(
            reqwest::Client::new().access_token(),
            Err(Error::AccessTokenUnavailable(_))
        ));
    }
}
