//! File-backed store behaviour and the async observer path.

use dairy_ledger_store::{CollectionRecord, PaymentStatus, RecordId, RecordStore, Session, StoreError};

const DAY_MS: u64 = 86_400_000;

fn record(day: u64, session: Session, litres: f64, price: f64) -> CollectionRecord {
    CollectionRecord::new(day * DAY_MS + 6 * 3_600_000, session, litres, 4.1, price)
}

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");

    {
        let mut store = RecordStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.insert(record(10, Session::Morning, 10.0, 30.0)).unwrap();
        let evening = store.insert(record(10, Session::Evening, 8.0, 32.0)).unwrap();
        let mut paid = store.get(evening).unwrap().clone();
        paid.payment_status = PaymentStatus::Paid;
        store.update(paid).unwrap();
    }

    let mut reopened = RecordStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(
        reopened.get(RecordId(2)).unwrap().payment_status,
        PaymentStatus::Paid
    );

    let next = reopened.insert(record(11, Session::Morning, 9.0, 30.0)).unwrap();
    assert_eq!(next, RecordId(3));
}

#[test]
fn missing_parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("records.json");

    let mut store = RecordStore::open(&path).unwrap();
    store.insert(record(1, Session::Morning, 1.0, 1.0)).unwrap();

    assert!(path.exists());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(RecordStore::open(&path), Err(StoreError::Json(_))));
}

#[test]
fn newer_file_versions_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, r#"{"version": 99, "next_id": 1, "records": []}"#).unwrap();

    assert!(matches!(
        RecordStore::open(&path),
        Err(StoreError::Version(99))
    ));
}

#[tokio::test]
async fn observer_wakes_on_change() {
    let mut store = RecordStore::in_memory();
    let mut observer = store.observe_all();

    store.insert(record(3, Session::Evening, 4.0, 31.0)).unwrap();

    let records = observer.changed().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].session, Session::Evening);

    drop(store);
    assert!(observer.changed().await.is_none());
}
