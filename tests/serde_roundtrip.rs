//! Round-trip serialization tests, gated behind the `serde` feature.

#![cfg(feature = "serde")]

use notebook_crdt::prelude::*;

#[test]
fn grow_counter_round_trips() {
    let mut counter = GrowCounter::new("alice");
    counter.add(7).unwrap();

    let json = serde_json::to_string(&counter).unwrap();
    let restored: GrowCounter = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.get(), counter.get());
}

#[test]
fn sequence_round_trips_full_state() {
    let mut seq = Sequence::new("alice");
    seq.append_many(['a', 'b', 'c']).unwrap();
    seq.remove(1).unwrap();

    let json = serde_json::to_string(&seq).unwrap();
    let restored: Sequence<char> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.get(), seq.get());
    assert_eq!(restored.operation_count(), seq.operation_count());
}

#[test]
fn notebook_round_trips_and_still_merges() {
    let mut nb = Notebook::new("alice");
    nb.create_cell(None).unwrap();
    nb.update_cell(0, "hello").unwrap();

    let json = serde_json::to_string(&nb).unwrap();
    let mut restored: Notebook = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.get_cell_data(), nb.get_cell_data());

    restored.create_cell(None).unwrap();
    restored.update_cell(1, "world").unwrap();
    nb.merge(&restored).unwrap();
    assert_eq!(nb.get_cell_data(), restored.get_cell_data());
}
