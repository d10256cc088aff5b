use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DatePrecision, ExternalUrls, Image, SimpleArtist};
use crate::util::datetime;

/// A simplified album object, as returned in album pages such as new releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAlbum {
    pub album_type: AlbumType,
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub available_markets: Vec<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub id: String,
    pub images: Vec<Image>,
    pub name: String,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    #[serde(default)]
    pub total_tracks: u32,
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumType {
    #[serde(alias = "ALBUM")]
    Album,
    #[serde(alias = "SINGLE")]
    Single,
    #[serde(alias = "COMPILATION")]
    Compilation,
}

impl SimpleAlbum {
    /// Returns the album's release date as a calendar date. Dates with year or month precision resolve to the first
    /// day of the year or month. Returns `None` if the release date doesn't match its precision.
    pub fn release_date(&self) -> Option<NaiveDate> {
        let full_date = match self.release_date_precision {
            DatePrecision::Year => format!("{}-01-01", self.release_date),
            DatePrecision::Month => format!("{}-01", self.release_date),
            DatePrecision::Day => self.release_date.clone(),
        };

        datetime::parse_date(&full_date).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(release_date: &str, release_date_precision: DatePrecision) -> SimpleAlbum {
        serde_json::from_value(serde_json::json!({
            "album_type": "single",
            "artists": [{ "id": "0TnOYISbd1XYRBk9myaseg", "name": "Pitbull", "uri": "spotify:artist:0TnOYISbd1XYRBk9myaseg" }],
            "id": "4aawyAB9vmqN3uQ7FjRGTy",
            "images": [{ "url": "https://i.scdn.co/image/ab67616d00001e02", "width": 300, "height": 300 }],
            "name": "Global Warming",
            "release_date": release_date,
            "release_date_precision": release_date_precision,
            "total_tracks": 18,
            "uri": "spotify:album:4aawyAB9vmqN3uQ7FjRGTy"
        }))
        .unwrap()
    }

    #[test]
    fn release_date_with_day_precision() {
        let album = album("2012-11-16", DatePrecision::Day);

        assert_eq!(album.album_type, AlbumType::Single);
        assert_eq!(album.release_date(), NaiveDate::from_ymd_opt(2012, 11, 16));
    }

    #[test]
    fn release_date_with_year_precision() {
        let album = album("1981", DatePrecision::Year);
        assert_eq!(album.release_date(), NaiveDate::from_ymd_opt(1981, 1, 1));
    }

    #[test]
    fn release_date_with_month_precision() {
        let album = album("1981-12", DatePrecision::Month);
        assert_eq!(album.release_date(), NaiveDate::from_ymd_opt(1981, 12, 1));
    }

    #[test]
    fn mismatched_precision_is_none() {
        let album = album("1981", DatePrecision::Day);
        assert_eq!(album.release_date(), None);
    }
}
