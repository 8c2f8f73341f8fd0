//! Property-based tests for `Sequence`'s convergence laws, generating
//! random interleavings of append/insert/remove across two replicas.

use notebook_crdt::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Append(char),
    Insert(usize, char),
    Remove(usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (b'a'..=b'z').prop_map(|c| Edit::Append(c as char)),
        (0usize..20, b'a'..=b'z').prop_map(|(pos, c)| Edit::Insert(pos, c as char)),
        (0usize..20).prop_map(Edit::Remove),
    ]
}

fn apply_edit(seq: &mut Sequence<char>, edit: &Edit) {
    let len = seq.len();
    match *edit {
        Edit::Append(c) => {
            seq.append(c).unwrap();
        }
        Edit::Insert(pos, c) => {
            let _ = seq.insert(pos.min(len), c);
        }
        Edit::Remove(pos) => {
            if len > 0 {
                let _ = seq.remove(pos % len);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn merge_converges_regardless_of_direction(
        a_edits in prop::collection::vec(edit_strategy(), 0..15),
        b_edits in prop::collection::vec(edit_strategy(), 0..15),
    ) {
        let mut seed = Sequence::new("seed");
        seed.append_many(['x', 'y', 'z']).unwrap();

        let mut a = Sequence::new("a");
        a.merge(&seed).unwrap();
        let mut b = Sequence::new("b");
        b.merge(&seed).unwrap();

        for edit in &a_edits {
            apply_edit(&mut a, edit);
        }
        for edit in &b_edits {
            apply_edit(&mut b, edit);
        }

        let mut ab = a.clone();
        ab.merge(&b).unwrap();
        let mut ba = b.clone();
        ba.merge(&a).unwrap();

        prop_assert_eq!(ab.get(), ba.get());
    }

    #[test]
    fn merge_is_idempotent_under_random_edits(
        edits in prop::collection::vec(edit_strategy(), 0..20),
    ) {
        let mut a = Sequence::new("a");
        for edit in &edits {
            apply_edit(&mut a, edit);
        }
        let mut b = Sequence::new("b");
        b.append('!').unwrap();

        a.merge(&b).unwrap();
        let once = a.get();
        a.merge(&b).unwrap();
        prop_assert_eq!(a.get(), once);
    }

    #[test]
    fn merge_only_grows_the_operation_log(
        a_edits in prop::collection::vec(edit_strategy(), 0..15),
        b_edits in prop::collection::vec(edit_strategy(), 0..15),
    ) {
        let mut a = Sequence::new("a");
        for edit in &a_edits {
            apply_edit(&mut a, edit);
        }
        let before = a.operation_count();

        let mut b = Sequence::new("b");
        for edit in &b_edits {
            apply_edit(&mut b, edit);
        }

        a.merge(&b).unwrap();
        prop_assert!(a.operation_count() >= before);
    }
}
