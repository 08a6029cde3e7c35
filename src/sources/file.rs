use crate::models::Property;
use crate::sources::traits::ListingSource;
use crate::sources::ListingPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Reads listings from a JSON file on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Property>> {
        debug!("Reading listings from {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let payload: ListingPayload = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse listings in {}", self.path.display()))?;

        let properties = payload.into_properties();
        info!("Loaded {} properties from {}", properties.len(), self.path.display());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "json-file"
    }
}
