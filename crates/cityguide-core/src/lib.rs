//! Core library for cityguide.
//!
//! Provides everything needed to obtain the city/places document:
//!
//! - `models`: `Document`, `City` and `Place`
//! - `cache`: the persisted copy of the last fetched document
//! - `api`: HTTP client for the remote document
//! - `config`: user configuration and directory resolution
//! - `loader`: the cache-first load flow and the controller that owns its state

pub mod api;
pub mod cache;
pub mod config;
pub mod loader;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use cache::{CacheManager, CachedData};
pub use config::Config;
pub use loader::{
    degrade_silently, CacheResult, CityLoader, FetchResult, LoadController, LoadError,
    LoadEvent, LoadOutcome, LoadPhase, LoadResult, LoadState,
};
pub use models::{City, Document, Place};
