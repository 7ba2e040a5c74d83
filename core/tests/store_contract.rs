//! Record store contract tests.
//!
//! Every test runs against both representations: the same calls
//! must behave the same whichever backend is underneath.

use txnscope_core::{
    metrics,
    store::new_store,
    Backend, IndexedStore, RandomAccess, Record, RecordStore, SequentialStore,
};

fn txn(id: &str, location: &str) -> Record {
    Record {
        transaction_id: id.into(),
        location: location.into(),
        payment_channel: "card".into(),
        ..Record::default()
    }
}

fn ids(store: &dyn RecordStore) -> Vec<String> {
    store.iter().map(|r| r.transaction_id.clone()).collect()
}

fn each_backend(limit: Option<usize>, check: impl Fn(&mut dyn RecordStore)) {
    for backend in Backend::ALL {
        let mut store = new_store(backend, limit);
        assert_eq!(store.backend(), backend);
        check(store.as_mut());
    }
}

#[test]
fn add_preserves_insertion_order_and_counts() {
    each_backend(None, |store| {
        assert!(store.is_empty());
        for i in 0..25 {
            assert!(store.add(txn(&format!("T{i}"), "Tokyo")));
        }
        assert_eq!(store.len(), 25, "{} store size", store.backend());
        assert_eq!(store.get(0).transaction_id, "T0");
        assert_eq!(store.get(24).transaction_id, "T24");
        assert_eq!(ids(store), (0..25).map(|i| format!("T{i}")).collect::<Vec<_>>());
    });
}

#[test]
fn bounded_store_drops_adds_past_capacity() {
    each_backend(Some(3), |store| {
        for i in 0..5 {
            let accepted = store.add(txn(&format!("T{i}"), "Dubai"));
            assert_eq!(accepted, i < 3, "add #{i} on {} store", store.backend());
        }
        assert_eq!(store.len(), 3);
        assert_eq!(store.dropped(), 2);
        assert_eq!(store.capacity_limit(), Some(3));
        assert_eq!(ids(store), vec!["T0", "T1", "T2"]);
    });
}

#[test]
fn clear_releases_records_and_resets_drops() {
    each_backend(Some(2), |store| {
        for i in 0..4 {
            store.add(txn(&format!("T{i}"), "Berlin"));
        }
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.dropped(), 0);
        assert!(store.try_get(0).is_none());

        // Usable again after a clear, as on reload.
        store.add(txn("R1", "London"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).transaction_id, "R1");
    });
}

#[test]
fn try_get_reports_out_of_range() {
    each_backend(None, |store| {
        store.add(txn("A", "Sydney"));
        assert!(store.try_get(0).is_some());
        assert!(store.try_get(1).is_none());
    });
}

#[test]
#[should_panic(expected = "out of range")]
fn indexed_get_past_end_panics() {
    let store = IndexedStore::from_records(vec![txn("A", "Tokyo")]);
    store.get(1);
}

#[test]
#[should_panic(expected = "out of range")]
fn sequential_get_past_end_panics() {
    let store = SequentialStore::from_records(vec![txn("A", "Tokyo")]);
    store.get(5);
}

#[test]
fn take_all_drains_in_order() {
    each_backend(None, |store| {
        for id in ["x", "y", "z"] {
            store.add(txn(id, "Toronto"));
        }
        let drained: Vec<_> = store.take_all().into_iter().map(|r| r.transaction_id).collect();
        assert_eq!(drained, vec!["x", "y", "z"]);
        assert!(store.is_empty());
    });
}

#[test]
fn records_are_copied_in() {
    let original = txn("A", "Tokyo");
    let mut indexed = IndexedStore::new();
    let mut sequential = SequentialStore::new();
    indexed.add(original.clone());
    sequential.add(original.clone());

    let mut changed = original.clone();
    changed.location = "Berlin".into();
    indexed.add(changed);

    assert_eq!(indexed.get(0).location, "Tokyo");
    assert_eq!(sequential.get(0), &original);
}

#[test]
fn indexed_swap_exchanges_positions() {
    let mut store = IndexedStore::from_records(vec![txn("A", "Tokyo"), txn("B", "Dubai"), txn("C", "Berlin")]);
    store.swap(0, 2);
    assert_eq!(ids(&store), vec!["C", "B", "A"]);
    assert_eq!(store.as_slice().len(), 3);
}

#[test]
fn sequential_adopt_sequence_recomputes_size() {
    let mut store = SequentialStore::from_records(vec![txn("A", "Tokyo"), txn("B", "Dubai"), txn("C", "Berlin")]);
    let second = store.next_of(store.head().expect("head")).expect("second node");

    // Adopt the chain starting at the second node: B -> C.
    store.adopt_sequence(Some(second));
    assert_eq!(store.len(), 2);
    assert_eq!(ids(&store), vec!["B", "C"]);
}

#[test]
fn footprint_counts_links_only_for_sequential() {
    let records = vec![txn("A", "Tokyo"), txn("B", "Dubai")];
    let indexed = IndexedStore::from_records(records.clone());
    let sequential = SequentialStore::from_records(records);

    let fi = metrics::footprint(&indexed);
    let fs = metrics::footprint(&sequential);
    assert_eq!(fi.records, 2);
    assert_eq!(fi.link_bytes, 0);
    assert!(fs.link_bytes > 0);
    assert_eq!(fi.heap_bytes, fs.heap_bytes);
    assert!(fs.total_bytes() > fi.total_bytes());
    assert_eq!(metrics::format_bytes(512), "512 B");
    assert_eq!(metrics::format_bytes(2048), "2.00 KiB");
}
