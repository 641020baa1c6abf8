use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::error;

use super::flow::CHANNEL_BUFFER_SIZE;
use super::{CityLoader, LoadEvent, LoadResult, LoadState};

/// Owns the load state for one session.
///
/// `start` spawns the load in the background; the presentation layer then
/// calls `poll` from its event loop (or awaits `wait_settled`) and reads the
/// current document and loading flag from `state`.
pub struct LoadController {
    state: LoadState,
    rx: mpsc::Receiver<LoadEvent>,
    task: Option<JoinHandle<LoadResult>>,
}

impl LoadController {
    /// Spawn the load. Must be called from within a Tokio runtime.
    pub fn start(loader: CityLoader) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let task = loader.spawn(tx);
        Self {
            state: LoadState::new(),
            rx,
            task: Some(task),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Apply any events that have arrived. Returns true if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(event) => changed |= self.state.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    changed |= self.settle_abandoned();
                    break;
                }
            }
        }
        changed
    }

    /// Wait until the load has settled.
    pub async fn wait_settled(&mut self) -> &LoadState {
        while !self.state.is_settled() {
            match self.rx.recv().await {
                Some(event) => {
                    self.state.apply(event);
                }
                None => {
                    self.settle_abandoned();
                }
            }
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "City data load task failed");
            }
        }
        &self.state
    }

    /// The load task ended without settling (it panicked). Settle with
    /// whatever is available so the loading flag still clears.
    fn settle_abandoned(&mut self) -> bool {
        if self.state.is_settled() {
            return false;
        }
        error!("City data load ended without settling");
        self.state.apply(LoadEvent::Settled { fresh: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOutcome, LoadPhase};
    use crate::models::Document;
    use chrono::Utc;

    /// Controller fed by a hand-held sender instead of a spawned load.
    fn detached() -> (LoadController, mpsc::Sender<LoadEvent>) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let controller = LoadController {
            state: LoadState::new(),
            rx,
            task: None,
        };
        (controller, tx)
    }

    #[test]
    fn test_poll_settles_when_sender_dropped_early() {
        let (mut controller, tx) = detached();
        tx.try_send(LoadEvent::CacheEmpty).unwrap();
        drop(tx);

        assert!(controller.poll());
        let state = controller.state();
        assert!(!state.loading());
        assert_eq!(state.phase(), LoadPhase::Settled);
        assert_eq!(state.outcome(), Some(LoadOutcome::Unavailable));

        // Abandoned settle happens once
        assert!(!controller.poll());
    }

    #[test]
    fn test_poll_abandoned_after_cache_keeps_cached() {
        let (mut controller, tx) = detached();
        tx.try_send(LoadEvent::CacheLoaded {
            document: Document::default(),
            cached_at: Utc::now(),
        })
        .unwrap();
        drop(tx);

        controller.poll();
        assert!(!controller.state().loading());
        assert_eq!(controller.state().outcome(), Some(LoadOutcome::Stale));
    }

    #[test]
    fn test_poll_without_events_keeps_loading() {
        let (mut controller, _tx) = detached();
        assert!(!controller.poll());
        assert!(controller.state().loading());
    }

    #[tokio::test]
    async fn test_wait_settled_when_sender_dropped() {
        let (mut controller, tx) = detached();
        drop(tx);

        let state = controller.wait_settled().await;
        assert!(!state.loading());
        assert!(state.is_unavailable());
    }
}
