use crate::models::Property;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for anything that hands us property listings.
/// The store imports from whichever sources are configured at start-up.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the full set of properties this source knows about
    async fn fetch(&self) -> Result<Vec<Property>>;

    /// Get the name of the source, for logging
    fn source_name(&self) -> &'static str;
}
