use std::sync::Arc;

use anyhow::Context;
use dubai_estates::config::Config;
use dubai_estates::server::{self, AppState};
use dubai_estates::session::{AdminCredentials, InMemorySessions};
use dubai_estates::sources::{FeedSource, JsonFileSource, ListingSource};
use dubai_estates::store::{Content, Store};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const PRUNE_INTERVAL_SECS: u64 = 600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Dubai Estates");

    let config = Config::load().context("Failed to load configuration")?;

    let store = match &config.data_path {
        Some(path) => Store::open(path)
            .await
            .with_context(|| format!("Failed to open data file {}", path.display()))?,
        None => {
            warn!("ESTATES_DATA_PATH not set, content will not survive a restart");
            Store::in_memory(Content::default())
        }
    };

    let mut sources: Vec<Box<dyn ListingSource>> = Vec::new();
    if let Some(path) = &config.seed_path {
        sources.push(Box::new(JsonFileSource::new(path)));
    }
    if let Some(url) = &config.feed_url {
        sources.push(Box::new(FeedSource::new(url.as_str())?));
    }

    for source in &sources {
        match source.fetch().await {
            Ok(properties) => {
                let added = store.import_properties(properties).await?;
                info!("Imported {} new properties from {}", added, source.source_name());
            }
            // The site still serves what it already has
            Err(e) => warn!("Listings import from {} failed: {:#}", source.source_name(), e),
        }
    }

    let sessions = InMemorySessions::new(
        AdminCredentials {
            username: config.admin_user.clone(),
            password: config.admin_password.clone(),
        },
        config.session_ttl(),
    );
    let sessions = Arc::new(sessions);
    tokio::spawn(prune_sessions(sessions.clone()));

    let state = AppState::new(Arc::new(store), sessions, config.similar_limit);
    server::run_server(state, &config.bind_address()).await
}

/// Expired sessions are also dropped on every login; this catches the quiet periods.
async fn prune_sessions(sessions: Arc<InMemorySessions>) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(PRUNE_INTERVAL_SECS));
    loop {
        ticker.tick().await;
        let dropped = sessions.prune().await;
        if dropped > 0 {
            debug!("Pruned {} expired sessions", dropped);
        }
    }
}
