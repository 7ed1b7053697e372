// State-machine property tests for ChainedTable kept inside the crate so
// they can audit chains through `check_invariants` after every step.

use crate::chained_table::{ChainedTable, Handle};
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Insert(String),
    Delete(String),
    Contains(String),
    Count(String),
    Rank,
}

// Short lowercase values over a small alphabet so repeats and collisions
// happen often.
prop_compose! {
    fn arb_ops()(ops in proptest::collection::vec(
        prop_oneof![
            3 => "[a-d]{0,3}".prop_map(Op::Insert),
            2 => "[a-d]{0,3}".prop_map(Op::Delete),
            1 => "[a-d]{0,3}".prop_map(Op::Contains),
            1 => "[a-d]{0,3}".prop_map(Op::Count),
            1 => Just(Op::Rank),
        ], 1..150)) -> Vec<Op> { ops }
}

fn run<S: BuildHasher>(mut sut: ChainedTable<S>, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, usize> = HashMap::new();
    let mut inserts = 0usize;
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(v) => {
                let h = sut.insert(&v);
                inserts += 1;
                let c = model.entry(v.clone()).or_insert(0);
                *c += 1;
                prop_assert_eq!(h.count(&sut), Some(*c));
                prop_assert_eq!(h.value(&sut), Some(v.as_str()));
            }
            Op::Delete(v) => {
                let h = sut.find(&v);
                let deleted = sut.delete(&v);
                prop_assert_eq!(deleted, model.contains_key(&v));
                if let Some(c) = model.get_mut(&v) {
                    *c -= 1;
                    if *c == 0 {
                        model.remove(&v);
                        stale.push(h.expect("present before delete"));
                    }
                }
            }
            Op::Contains(v) => {
                prop_assert_eq!(sut.contains(&v), model.contains_key(&v));
            }
            Op::Count(v) => {
                prop_assert_eq!(sut.count(&v), model.get(&v).copied().unwrap_or(0));
            }
            Op::Rank => {
                let ranked = sut.ranked_entries();
                prop_assert_eq!(ranked.len(), model.len());
                for w in ranked.windows(2) {
                    prop_assert!(w[0].count >= w[1].count);
                }
                // Equal counts keep traversal order.
                let position: HashMap<&str, usize> = sut
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v, _))| (v, i))
                    .collect();
                for w in ranked.windows(2) {
                    if w[0].count == w[1].count {
                        prop_assert!(position[w[0].value] < position[w[1].value]);
                    }
                }
                let got: BTreeMap<&str, usize> =
                    ranked.iter().map(|r| (r.value, r.count)).collect();
                let want: BTreeMap<&str, usize> =
                    model.iter().map(|(k, &c)| (k.as_str(), c)).collect();
                prop_assert_eq!(got, want);
            }
        }

        // Post-conditions after each op
        if let Err(e) = sut.check_invariants() {
            return Err(TestCaseError::fail(e.to_string()));
        }
        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        prop_assert_eq!(sut.unique_keys(), model.len());
        prop_assert_eq!(sut.total_insertions(), inserts);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_state_machine(capacity in 1usize..16, ops in arb_ops()) {
        run(ChainedTable::new(capacity).unwrap(), ops)?;
    }
}

// Collision variant: a constant hasher puts every value in one chain, so
// head, middle and tail unlinking all get exercised.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #[test]
    fn prop_state_machine_with_collisions(capacity in 1usize..4, ops in arb_ops()) {
        run(ChainedTable::with_hasher(capacity, ConstBuildHasher).unwrap(), ops)?;
    }
}
