//! Persisted copy of the city document.
//!
//! The `CacheManager` keeps exactly one slot, the JSON text of the last
//! successfully fetched `Document`, so the guide has something to show
//! before (or without) a network round trip.

pub mod manager;

pub use manager::{CacheManager, CachedData, CACHE_KEY};
