use crate::CollectionRecord;

use tokio::sync::watch;

use std::ops::RangeInclusive;
use std::sync::Arc;

/// Every record in the store, newest first.
pub type Snapshot = Arc<[CollectionRecord]>;

/// A live query against the store.
///
/// Each mutation publishes a fresh [`Snapshot`]; an observer sees the latest one
/// through [`Observer::poll`] or [`Observer::changed`]. Dropping the observer
/// (or calling [`Observer::unsubscribe`]) ends the subscription.
#[derive(Debug)]
pub struct Observer {
    rx: watch::Receiver<Snapshot>,
    window: Option<RangeInclusive<u64>>,
}

impl Observer {
    pub(crate) fn new(rx: watch::Receiver<Snapshot>, window: Option<RangeInclusive<u64>>) -> Self {
        Self { rx, window }
    }

    /// Records matching this query in the latest published snapshot.
    pub fn current(&self) -> Vec<CollectionRecord> {
        let snapshot = self.rx.borrow();
        self.select(&snapshot)
    }

    /// Returns the matching records if the store changed since the last look.
    pub fn poll(&mut self) -> Option<Vec<CollectionRecord>> {
        match self.rx.has_changed() {
            Ok(true) => {
                let snapshot = self.rx.borrow_and_update().clone();
                Some(self.select(&snapshot))
            }
            Ok(false) => None,
            Err(_) => {
                log::debug!("record store dropped, observer is stale");
                None
            }
        }
    }

    /// Waits for the next published snapshot. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Vec<CollectionRecord>> {
        self.rx.changed().await.ok()?;
        let snapshot = self.rx.borrow_and_update().clone();
        Some(self.select(&snapshot))
    }

    pub fn unsubscribe(self) {}

    fn select(&self, snapshot: &[CollectionRecord]) -> Vec<CollectionRecord> {
        match &self.window {
            Some(window) => snapshot
                .iter()
                .filter(|record| window.contains(&record.timestamp))
                .cloned()
                .collect(),
            None => snapshot.to_vec(),
        }
    }
}
