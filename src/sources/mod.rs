pub mod feed;
pub mod file;
pub mod traits;

pub use feed::FeedSource;
pub use file::JsonFileSource;
pub use traits::ListingSource;

use crate::models::Property;
use serde::Deserialize;

/// Listing payloads come either as a bare array or wrapped in an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListingPayload {
    Bare(Vec<Property>),
    Wrapped { properties: Vec<Property> },
}

impl ListingPayload {
    pub(crate) fn into_properties(self) -> Vec<Property> {
        match self {
            ListingPayload::Bare(properties) => properties,
            ListingPayload::Wrapped { properties } => properties,
        }
    }
}
