//! The cache-first load flow.
//!
//! Loading runs once per session as a two-step pipeline:
//!
//! 1. `CityLoader::read_cache` produces a `CacheResult`; a usable cached
//!    document is published right away.
//! 2. `CityLoader::fetch_remote` produces a `FetchResult`; a fresh document
//!    replaces the current one and is persisted.
//!
//! `CityLoader::load_cities` composes both steps and reports progress as
//! `LoadEvent`s. `LoadController` owns the resulting `LoadState` and is what
//! the presentation layer polls.
//!
//! Failures never reach the presentation layer. They go through
//! `degrade_silently`, which logs them and keeps whatever data is available.

pub mod controller;
pub mod error;
pub mod flow;
pub mod state;

pub use controller::LoadController;
pub use error::{degrade_silently, LoadError};
pub use flow::{CacheResult, CityLoader, FetchResult};
pub use state::{LoadEvent, LoadOutcome, LoadPhase, LoadResult, LoadState};
