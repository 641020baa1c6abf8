use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::cache::{CacheManager, CachedData};
use crate::config::Config;
use crate::models::Document;

use super::{degrade_silently, LoadError, LoadEvent, LoadResult, LoadState};

/// Buffer size for the load event channel.
/// A load emits at most two events, so sends never wait on the receiver.
pub(crate) const CHANNEL_BUFFER_SIZE: usize = 4;

/// Outcome of the cache step. `Ok(None)` means nothing was persisted.
pub type CacheResult = Result<Option<CachedData<Document>>, LoadError>;

/// Outcome of the fetch step.
pub type FetchResult = Result<Document, LoadError>;

/// Runs the cache-then-fetch sequence.
///
/// The loader is the only writer of the persisted document, and writes it
/// only after a complete, successfully parsed fetch.
pub struct CityLoader {
    api: ApiClient,
    cache: CacheManager,
}

impl CityLoader {
    pub fn new(api: ApiClient, cache: CacheManager) -> Self {
        Self { api, cache }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let cache_dir = config.cache_dir().unwrap_or_else(|e| {
            warn!(error = %e, "No platform cache directory, using ./cache");
            PathBuf::from("./cache")
        });
        debug!(?cache_dir, url = config.remote_url(), "Loader configured");

        let api = ApiClient::new(config.remote_url(), config.request_timeout())?;
        Ok(Self::new(api, CacheManager::new(cache_dir)))
    }

    /// Step one: read the persisted document.
    pub fn read_cache(&self) -> CacheResult {
        self.cache.load_document().map_err(LoadError::CacheRead)
    }

    /// Step two: fetch and parse the remote document.
    pub async fn fetch_remote(&self) -> FetchResult {
        Ok(self.api.fetch_document().await?)
    }

    /// Helper to send load events, logging if nobody is listening anymore
    async fn send_event(tx: &mpsc::Sender<LoadEvent>, event: LoadEvent) {
        if let Err(e) = tx.send(event).await {
            debug!(error = %e, "Load event dropped - receiver closed");
        }
    }

    /// Run the whole load: cache first, then the remote document.
    ///
    /// Every state change is applied locally and forwarded on `events`, so
    /// observers see exactly what the returned `LoadResult` is built from.
    pub async fn load_cities(&self, events: &mpsc::Sender<LoadEvent>) -> LoadResult {
        info!(url = self.api.url(), "Loading city data");
        let mut state = LoadState::new();

        let cache_event = match self.read_cache() {
            Ok(Some(cached)) => LoadEvent::CacheLoaded {
                document: cached.data,
                cached_at: cached.cached_at,
            },
            Ok(None) => {
                debug!("No cached city data");
                LoadEvent::CacheEmpty
            }
            Err(e) => {
                degrade_silently(&e);
                LoadEvent::CacheEmpty
            }
        };
        state.apply(cache_event.clone());
        Self::send_event(events, cache_event).await;

        let fresh = match self.fetch_remote().await {
            Ok(document) => {
                if let Err(e) = self.cache.save_document(&document) {
                    warn!(error = %e, "Failed to cache city data");
                }
                info!(cities = document.len(), "City data refreshed");
                Some(document)
            }
            Err(e) => {
                degrade_silently(&e);
                None
            }
        };

        let settled = LoadEvent::Settled { fresh };
        state.apply(settled.clone());
        Self::send_event(events, settled).await;

        state.into_result()
    }

    /// Run the load without an observer.
    pub async fn load(&self) -> LoadResult {
        let (tx, _rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        self.load_cities(&tx).await
    }

    /// Spawn the load as a background task reporting on `events`.
    pub fn spawn(self, events: mpsc::Sender<LoadEvent>) -> JoinHandle<LoadResult> {
        tokio::spawn(async move { self.load_cities(&events).await })
    }
}
