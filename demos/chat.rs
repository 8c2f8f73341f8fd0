//! Demo: two replicas editing a shared notebook while offline, then
//! reconciling via a single `merge` call each.

use notebook_crdt::prelude::*;

fn main() {
    println!("=== Collaborative Notebook (offline-first merge) ===\n");

    let mut alice = Notebook::new("alice");
    alice.create_cell(None).unwrap();
    alice.update_cell(0, "# Shared notebook").unwrap();
    println!("Alice: {:?}", alice.get_cell_data());

    let mut bob = Notebook::new("bob");
    bob.merge(&alice).unwrap();
    println!("Bob syncs:   {:?}", bob.get_cell_data());

    println!("\n--- Both go offline and edit concurrently ---");
    alice.create_cell(None).unwrap();
    alice.update_cell(1, "print('hello from alice')").unwrap();
    bob.update_cell(0, "# Shared notebook (edited by bob)").unwrap();

    println!("Alice: {:?}", alice.get_cell_data());
    println!("Bob:   {:?}", bob.get_cell_data());

    println!("\n--- Reconnect and merge ---");
    alice.merge(&bob).unwrap();
    bob.merge(&alice).unwrap();

    println!("Alice: {:?}", alice.get_cell_data());
    println!("Bob:   {:?}", bob.get_cell_data());
    assert_eq!(alice.get_cell_data(), bob.get_cell_data());
    println!("\nConverged.");
}
