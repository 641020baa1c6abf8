use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::Document;

/// Progress reported by the load flow, in order: one cache event
/// (`CacheLoaded` or `CacheEmpty`), then exactly one `Settled`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// A valid persisted document is available
    CacheLoaded {
        document: Document,
        cached_at: DateTime<Utc>,
    },
    /// Nothing usable was persisted
    CacheEmpty,
    /// The fetch attempt resolved; `fresh` holds the new document on success
    Settled { fresh: Option<Document> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Uninitialized,
    CacheLoaded,
    Empty,
    Settled,
}

/// How a settled load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetched from the remote source and persisted
    Fresh,
    /// Refresh failed; the cached document stays current
    Stale,
    /// Refresh failed and nothing was cached
    Unavailable,
}

/// Final product of one load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub document: Option<Document>,
    pub outcome: LoadOutcome,
}

/// In-memory state of the load: current document and loading flag.
///
/// `loading` is true from creation until the single `Settled` event, then
/// false for good. Events arriving out of order are ignored.
#[derive(Debug, Clone)]
pub struct LoadState {
    document: Option<Document>,
    cached_at: Option<DateTime<Utc>>,
    loading: bool,
    phase: LoadPhase,
    outcome: Option<LoadOutcome>,
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadState {
    pub fn new() -> Self {
        Self {
            document: None,
            cached_at: None,
            loading: true,
            phase: LoadPhase::Uninitialized,
            outcome: None,
        }
    }

    /// Apply one event. Returns true if the state changed.
    pub fn apply(&mut self, event: LoadEvent) -> bool {
        match (self.phase, event) {
            (LoadPhase::Uninitialized, LoadEvent::CacheLoaded { document, cached_at }) => {
                debug!(cities = document.len(), "Cached city data available");
                self.document = Some(document);
                self.cached_at = Some(cached_at);
                self.phase = LoadPhase::CacheLoaded;
                true
            }
            (LoadPhase::Uninitialized, LoadEvent::CacheEmpty) => {
                self.phase = LoadPhase::Empty;
                true
            }
            (LoadPhase::Settled, LoadEvent::Settled { .. }) => {
                warn!("Ignoring duplicate settle event");
                false
            }
            (_, LoadEvent::Settled { fresh }) => {
                self.outcome = Some(match fresh {
                    Some(document) => {
                        self.document = Some(document);
                        self.cached_at = Some(Utc::now());
                        LoadOutcome::Fresh
                    }
                    None if self.document.is_some() => LoadOutcome::Stale,
                    None => LoadOutcome::Unavailable,
                });
                self.loading = false;
                self.phase = LoadPhase::Settled;
                true
            }
            (phase, event) => {
                debug!(?phase, ?event, "Ignoring out-of-order load event");
                false
            }
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.cached_at
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == LoadPhase::Settled
    }

    /// Set once settled.
    pub fn outcome(&self) -> Option<LoadOutcome> {
        self.outcome
    }

    /// Settled without any document: the "data unavailable" case.
    pub fn is_unavailable(&self) -> bool {
        self.outcome == Some(LoadOutcome::Unavailable)
    }

    pub fn into_result(self) -> LoadResult {
        let outcome = self.outcome.unwrap_or(if self.document.is_some() {
            LoadOutcome::Stale
        } else {
            LoadOutcome::Unavailable
        });
        LoadResult {
            document: self.document,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::City;

    fn doc(name: &str) -> Document {
        Document {
            cities: vec![City {
                name: name.to_string(),
                description: String::new(),
                places: vec![],
            }],
        }
    }

    fn cache_loaded(name: &str) -> LoadEvent {
        LoadEvent::CacheLoaded {
            document: doc(name),
            cached_at: Utc::now(),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = LoadState::new();
        assert!(state.loading());
        assert_eq!(state.phase(), LoadPhase::Uninitialized);
        assert!(state.document().is_none());
        assert!(state.outcome().is_none());
        assert!(!state.is_unavailable());
    }

    #[test]
    fn test_cache_loaded_keeps_loading() {
        let mut state = LoadState::new();
        assert!(state.apply(cache_loaded("Brno")));
        assert!(state.loading());
        assert_eq!(state.phase(), LoadPhase::CacheLoaded);
        assert_eq!(state.document(), Some(&doc("Brno")));
    }

    #[test]
    fn test_fresh_document_replaces_cached() {
        let mut state = LoadState::new();
        state.apply(cache_loaded("Brno"));
        state.apply(LoadEvent::Settled {
            fresh: Some(doc("Prague")),
        });

        assert!(!state.loading());
        assert_eq!(state.outcome(), Some(LoadOutcome::Fresh));
        assert_eq!(state.document(), Some(&doc("Prague")));
    }

    #[test]
    fn test_failed_refresh_keeps_cached() {
        let mut state = LoadState::new();
        state.apply(cache_loaded("Brno"));
        state.apply(LoadEvent::Settled { fresh: None });

        assert!(!state.loading());
        assert_eq!(state.outcome(), Some(LoadOutcome::Stale));
        assert_eq!(state.document(), Some(&doc("Brno")));
    }

    #[test]
    fn test_failed_refresh_without_cache_is_unavailable() {
        let mut state = LoadState::new();
        state.apply(LoadEvent::CacheEmpty);
        assert!(state.loading());
        state.apply(LoadEvent::Settled { fresh: None });

        assert!(state.is_unavailable());
        assert!(state.document().is_none());
    }

    #[test]
    fn test_loading_flag_transitions_once() {
        let mut state = LoadState::new();
        state.apply(LoadEvent::CacheEmpty);
        assert!(state.apply(LoadEvent::Settled {
            fresh: Some(doc("Prague")),
        }));

        // Nothing after settling can bring the flag back or change the document
        assert!(!state.apply(LoadEvent::Settled { fresh: None }));
        assert!(!state.apply(cache_loaded("Brno")));
        assert!(!state.apply(LoadEvent::CacheEmpty));
        assert!(!state.loading());
        assert_eq!(state.document(), Some(&doc("Prague")));
        assert_eq!(state.outcome(), Some(LoadOutcome::Fresh));
    }

    #[test]
    fn test_second_cache_event_ignored() {
        let mut state = LoadState::new();
        state.apply(LoadEvent::CacheEmpty);
        assert!(!state.apply(cache_loaded("Brno")));
        assert!(state.document().is_none());
    }

    #[test]
    fn test_settle_without_cache_event() {
        let mut state = LoadState::new();
        state.apply(LoadEvent::Settled { fresh: None });
        assert!(state.is_settled());
        assert!(state.is_unavailable());
    }

    #[test]
    fn test_into_result() {
        let mut state = LoadState::new();
        state.apply(cache_loaded("Brno"));
        state.apply(LoadEvent::Settled { fresh: None });
        let result = state.into_result();
        assert_eq!(result.outcome, LoadOutcome::Stale);
        assert_eq!(result.document, Some(doc("Brno")));
    }
}
