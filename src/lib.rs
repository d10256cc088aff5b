//! An async client core for the [Spotify Web API](https://developer.spotify.com/documentation/web-api).
//!
//! Every request funnels through a single [SpotifyClient], which sends it through an authenticated [Transport],
//! retries it when Spotify rate limits it (if configured to), decodes Spotify's error responses into
//! [ApiError](model::error::ApiError)s and reports the latency of every HTTP attempt to an
//! [ObservabilitySink](client::ObservabilitySink).
//!
//! Obtaining and refreshing access tokens is outside the scope of this crate. Either give the client an access token
//! with [SpotifyClient::with_access_token] and keep it fresh through its [BearerTokenTransport], or implement
//! [Transport] yourself.
//!
//! Every operation takes a [CancellationToken](tokio_util::sync::CancellationToken). Cancelling it aborts the request
//! in flight, or the wait before retrying a rate limited request, with [Error::Cancelled].
//!
//! ```no_run
//! use spotify_core::{client::RequestOption, SpotifyClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> spotify_core::Result<()> {
//! let client = SpotifyClient::builder(spotify_core::BearerTokenTransport::new("access token")?)
//!     .auto_retry(true)
//!     .accept_language("fi")
//!     .build()?;
//!
//! let cancel = CancellationToken::new();
//! let releases = client.new_releases(&cancel, &[RequestOption::Limit(10)]).await?;
//!
//! for album in releases.items {
//!     println!("{} ({})", album.name, album.release_date);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
mod error;
pub mod model;
mod util;

pub use crate::{
    client::{BearerTokenTransport, SpotifyClient, SpotifyClientBuilder, Transport},
    error::{Error, Result},
    model::error::ApiError,
    util::datetime::{format_timestamp, parse_date, parse_timestamp, DATE_FORMAT, TIMESTAMP_FORMAT},
};

/// The version of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
