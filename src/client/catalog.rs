use std::collections::HashMap;

use log::debug;
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;

use super::SpotifyClient;
use crate::{
    error::{Error, Result},
    model::{album::SimpleAlbum, page::Page},
};

const NEW_RELEASES_PATH: &str = "browse/new-releases";
const NEW_RELEASES_OBJECT: &str = "albums";

/// Query options for endpoints. Each endpoint documents which options it supports; unsupported options are sent
/// anyway and ignored by Spotify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    /// An ISO 3166-1 alpha-2 country code.
    Country(String),
    /// The maximum amount of items to return.
    Limit(u32),
    /// The index of the first item to return.
    Offset(u32),
    /// An ISO 3166-1 alpha-2 country code, or `from_token` for the current user's country.
    Market(String),
    /// An ISO 639-1 language code and an ISO 3166-1 alpha-2 country code joined by an underscore, such as `es_MX`.
    Locale(String),
}

impl RequestOption {
    fn query_pair(&self) -> (&'static str, String) {
        match self {
            RequestOption::Country(country) => ("country", country.clone()),
            RequestOption::Limit(limit) => ("limit", limit.to_string()),
            RequestOption::Offset(offset) => ("offset", offset.to_string()),
            RequestOption::Market(market) => ("market", market.clone()),
            RequestOption::Locale(locale) => ("locale", locale.clone()),
        }
    }
}

impl SpotifyClient {
    /// Get a list of new album releases featured in Spotify.
    ///
    /// Supported options: [Country](RequestOption::Country), [Limit](RequestOption::Limit),
    /// [Offset](RequestOption::Offset).
    pub async fn new_releases(
        &self,
        cancel: &CancellationToken,
        options: &[RequestOption],
    ) -> Result<Page<SimpleAlbum>> {
        let mut url = self.endpoint_url(NEW_RELEASES_PATH)?;

        if !options.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(options.iter().map(RequestOption::query_pair));
        }

        // the page is wrapped in an object keyed by the item type
        let objects: HashMap<String, Box<RawValue>> = self.get_url(cancel, url).await?.ok_or(Error::EmptyResponse)?;
        let albums = objects
            .get(NEW_RELEASES_OBJECT)
            .ok_or(Error::MissingObject(NEW_RELEASES_OBJECT))?;

        let page: Page<SimpleAlbum> = serde_json::from_str(albums.get())?;
        debug!("Got {} of {} new releases", page.items.len(), page.total);

        Ok(page)
    }
}
