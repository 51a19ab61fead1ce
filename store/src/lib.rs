pub mod error;
pub mod export;
mod observe;
pub mod persist;
pub mod record;

pub use error::StoreError;
pub use observe::{Observer, Snapshot};
pub use record::{CollectionRecord, PaymentStatus, RecordId, Session, now_millis};

use persist::StoreFile;

use rustc_hash::FxHashMap;
use tokio::sync::watch;

use std::path::PathBuf;

/// Keyed storage of collection records with live queries.
///
/// The store is the only writer. Every successful mutation publishes a new
/// snapshot to all observers and, when backed by a file, rewrites it.
#[derive(Debug)]
pub struct RecordStore {
    records: FxHashMap<RecordId, CollectionRecord>,
    next_id: u64,
    backing: Option<PathBuf>,
    tx: watch::Sender<Snapshot>,
}

impl RecordStore {
    pub fn in_memory() -> Self {
        Self::from_parts(StoreFile::default(), None)
    }

    /// Opens (or starts) a store backed by the JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = match persist::load(&path)? {
            Some(file) => {
                log::info!(
                    "loaded {} records from {}",
                    file.records.len(),
                    path.display()
                );
                file
            }
            None => {
                log::info!("no record store at {}, starting empty", path.display());
                StoreFile::default()
            }
        };

        Ok(Self::from_parts(file, Some(path)))
    }

    fn from_parts(file: StoreFile, backing: Option<PathBuf>) -> Self {
        let mut records = FxHashMap::default();
        let mut next_id = file
            .records
            .iter()
            .filter_map(|record| record.id)
            .map(|id| id.0 + 1)
            .fold(file.next_id.max(1), u64::max);

        for mut record in file.records {
            let id = match record.id {
                Some(id) => id,
                None => {
                    let id = RecordId(next_id);
                    next_id += 1;
                    record.id = Some(id);
                    id
                }
            };
            records.insert(id, record);
        }

        let (tx, _) = watch::channel(Self::ordered(&records));

        Self {
            records,
            next_id,
            backing,
            tx,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&CollectionRecord> {
        self.records.get(&id)
    }

    /// All records, newest first.
    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// The `n` most recent records.
    pub fn latest(&self, n: usize) -> Vec<CollectionRecord> {
        self.tx.borrow().iter().take(n).cloned().collect()
    }

    pub fn observe_all(&self) -> Observer {
        Observer::new(self.tx.subscribe(), None)
    }

    /// Live query for records with `start_ms <= timestamp <= end_ms`.
    pub fn observe_day_range(&self, start_ms: u64, end_ms: u64) -> Observer {
        Observer::new(self.tx.subscribe(), Some(start_ms..=end_ms))
    }

    /// Stores the record, replacing any record that already has its id.
    pub fn insert(&mut self, mut record: CollectionRecord) -> Result<RecordId, StoreError> {
        let id = match record.id {
            Some(id) => {
                self.next_id = self.next_id.max(id.0 + 1);
                id
            }
            None => {
                let id = RecordId(self.next_id);
                self.next_id += 1;
                record.id = Some(id);
                id
            }
        };

        if self.records.insert(id, record).is_some() {
            log::debug!("replaced record {id}");
        } else {
            log::debug!("inserted record {id}");
        }

        self.commit()?;
        Ok(id)
    }

    pub fn update(&mut self, mut record: CollectionRecord) -> Result<(), StoreError> {
        let id = record.id.ok_or(StoreError::Unpersisted)?;
        let slot = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        record.updated_at = now_millis();
        *slot = record;
        log::debug!("updated record {id}");

        self.commit()
    }

    /// Returns whether a record was removed.
    pub fn delete_by_id(&mut self, id: RecordId) -> Result<bool, StoreError> {
        if self.records.remove(&id).is_none() {
            return Ok(false);
        }
        log::debug!("deleted record {id}");

        self.commit()?;
        Ok(true)
    }

    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        let count = self.records.len();
        self.records.clear();
        log::info!("cleared {count} records");

        self.commit()
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.tx.send_replace(Self::ordered(&self.records));

        match &self.backing {
            Some(path) => {
                let file = StoreFile {
                    version: persist::FILE_VERSION,
                    next_id: self.next_id,
                    records: self.tx.borrow().to_vec(),
                };
                persist::save(path, &file)
            }
            None => Ok(()),
        }
    }

    fn ordered(records: &FxHashMap<RecordId, CollectionRecord>) -> Snapshot {
        let mut ordered: Vec<CollectionRecord> = records.values().cloned().collect();
        ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));
        ordered.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: u64 = 86_400_000;

    fn record(timestamp: u64, session: Session, litres: f64) -> CollectionRecord {
        CollectionRecord::new(timestamp, session, litres, 4.0, 30.0)
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut store = RecordStore::in_memory();
        let a = store.insert(record(DAY_MS, Session::Morning, 5.0)).unwrap();
        let b = store.insert(record(DAY_MS, Session::Evening, 6.0)).unwrap();

        assert_eq!(a, RecordId(1));
        assert_eq!(b, RecordId(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_with_existing_id_replaces() {
        let mut store = RecordStore::in_memory();
        let id = store.insert(record(DAY_MS, Session::Morning, 5.0)).unwrap();
        store
            .insert(record(DAY_MS, Session::Morning, 9.0).with_id(id))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().quantity_litres, 9.0);
    }

    #[test]
    fn snapshot_is_newest_first() {
        let mut store = RecordStore::in_memory();
        store.insert(record(DAY_MS, Session::Morning, 1.0)).unwrap();
        store.insert(record(3 * DAY_MS, Session::Morning, 3.0)).unwrap();
        store.insert(record(2 * DAY_MS, Session::Morning, 2.0)).unwrap();

        let litres: Vec<f64> = store.snapshot().iter().map(|r| r.quantity_litres).collect();
        assert_eq!(litres, vec![3.0, 2.0, 1.0]);
        assert_eq!(store.latest(2).len(), 2);
        assert_eq!(store.latest(2)[0].quantity_litres, 3.0);
    }

    #[test]
    fn update_requires_a_known_id() {
        let mut store = RecordStore::in_memory();
        assert!(matches!(
            store.update(record(0, Session::Morning, 1.0)),
            Err(StoreError::Unpersisted)
        ));
        assert!(matches!(
            store.update(record(0, Session::Morning, 1.0).with_id(RecordId(42))),
            Err(StoreError::NotFound(RecordId(42)))
        ));

        let id = store.insert(record(0, Session::Morning, 1.0)).unwrap();
        let mut edited = store.get(id).unwrap().clone();
        edited.payment_status = PaymentStatus::Paid;
        store.update(edited).unwrap();
        assert_eq!(store.get(id).unwrap().payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn delete_and_clear() {
        let mut store = RecordStore::in_memory();
        let id = store.insert(record(0, Session::Morning, 1.0)).unwrap();
        store.insert(record(0, Session::Evening, 1.0)).unwrap();

        assert!(store.delete_by_id(id).unwrap());
        assert!(!store.delete_by_id(id).unwrap());
        assert_eq!(store.len(), 1);

        store.clear_all().unwrap();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn observers_see_mutations() {
        let mut store = RecordStore::in_memory();
        let mut all = store.observe_all();
        let mut today = store.observe_day_range(DAY_MS, 2 * DAY_MS - 1);

        assert!(all.poll().is_none());

        store.insert(record(DAY_MS + 10, Session::Morning, 5.0)).unwrap();
        store.insert(record(3 * DAY_MS, Session::Morning, 7.0)).unwrap();

        assert_eq!(all.poll().map(|r| r.len()), Some(2));
        assert!(all.poll().is_none());

        let in_range = today.poll().unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].quantity_litres, 5.0);
    }

    #[test]
    fn records_without_ids_get_one_on_load() {
        let file = StoreFile {
            version: persist::FILE_VERSION,
            next_id: 1,
            records: vec![
                record(0, Session::Morning, 1.0).with_id(RecordId(5)),
                record(0, Session::Evening, 2.0),
            ],
        };
        let store = RecordStore::from_parts(file, None);

        assert_eq!(store.len(), 2);
        assert!(store.get(RecordId(5)).is_some());
        assert!(store.get(RecordId(6)).is_some());
    }
}
