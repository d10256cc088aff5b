use serde::{Deserialize, Serialize};

/// A page of items returned from a list endpoint.
///
/// The `next` and `previous` fields contain the full URLs to the neighbouring pages, if they exist. They can be fetched
/// with [get_url](crate::client::SpotifyClient::get_url).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub href: String,
    pub items: Vec<T>,
    pub limit: u32,
    pub next: Option<String>,
    pub offset: u32,
    pub previous: Option<String>,
    pub total: u32,
}

impl<T> Page<T> {
    /// Returns whether there are more items after this page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Return the items in this page while consuming the page.
    pub fn take_items(self) -> Vec<T> {
        self.items
    }
}
