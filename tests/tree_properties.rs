use std::collections::BTreeMap;

use proptest::prelude::*;
use radix_art::{AdaptiveRadixTree, TreeStatsTrait};

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u64),
    Remove(Vec<u8>),
    Get(Vec<u8>),
}

/// Any bytes, zeros included.
fn raw_key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop::collection::vec(any::<u8>(), 0..=24)
}

/// Keys that share long runs, so prefixes outgrow the inline buffer and get split, merged and
/// recovered from leaves.
fn prefixed_key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    let stems = prop_oneof![
        Just(b"".to_vec()),
        Just(b"service/".to_vec()),
        Just(b"service/registry/entries/".to_vec()),
        Just(b"service/registry/entries/long-tail-".to_vec()),
    ];
    (stems, prop::collection::vec(0u8..4, 0..=6)).prop_map(|(mut stem, tail)| {
        stem.extend(tail);
        stem
    })
}

fn ops_strategy(key: impl Strategy<Value = Vec<u8>> + Clone) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        30 => key.clone().prop_map(Op::Remove),
        20 => key.prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=1000)
}

fn check_against_model(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut t: AdaptiveRadixTree<u64> = AdaptiveRadixTree::new();
    let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                let old_t = t.insert(&key, value);
                let old_m = m.insert(key, value);
                prop_assert_eq!(old_t, old_m);
            }
            Op::Remove(key) => {
                let old_t = t.remove(&key);
                let old_m = m.remove(key.as_slice());
                prop_assert_eq!(old_t, old_m);
                prop_assert_eq!(t.get(&key), None);
            }
            Op::Get(key) => {
                prop_assert_eq!(t.get(&key).copied(), m.get(key.as_slice()).copied());
            }
        }
        prop_assert_eq!(t.len(), m.len());
    }

    let stats = t.get_tree_stats();
    prop_assert_eq!(stats.num_leaves, m.len());

    prop_assert_eq!(
        t.minimum().map(|(k, v)| (k, *v)),
        m.first_key_value().map(|(k, v)| (k.clone(), *v))
    );
    prop_assert_eq!(
        t.maximum().map(|(k, v)| (k, *v)),
        m.last_key_value().map(|(k, v)| (k.clone(), *v))
    );

    let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
    let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
    prop_assert_eq!(got, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_raw_keys(ops in ops_strategy(raw_key_strategy())) {
        check_against_model(ops)?;
    }

    #[test]
    fn prop_equivalence_prefixed_keys(ops in ops_strategy(prefixed_key_strategy())) {
        check_against_model(ops)?;
    }

    #[test]
    fn prop_min_max_bound_every_key(keys in prop::collection::vec(raw_key_strategy(), 1..200)) {
        let t: AdaptiveRadixTree<usize> =
            keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect();
        let (min, _) = t.minimum().unwrap();
        let (max, _) = t.maximum().unwrap();
        for key in &keys {
            prop_assert!(t.contains_key(key));
            prop_assert!(min.as_slice() <= key.as_slice());
            prop_assert!(key.as_slice() <= max.as_slice());
        }
    }

    #[test]
    fn prop_insert_order_does_not_matter(
        keys in prop::collection::btree_set(prefixed_key_strategy(), 0..64),
        seed in any::<u64>(),
    ) {
        let forward: AdaptiveRadixTree<()> = keys.iter().map(|k| (k, ())).collect();
        let mut shuffled: Vec<&Vec<u8>> = keys.iter().collect();
        let n = shuffled.len();
        for i in 0..n {
            let j = (seed.rotate_left(i as u32) as usize ^ i) % n;
            shuffled.swap(i, j);
        }
        let reordered: AdaptiveRadixTree<()> = shuffled.into_iter().map(|k| (k, ())).collect();

        let a: Vec<Vec<u8>> = forward.iter().map(|(k, _)| k).collect();
        let b: Vec<Vec<u8>> = reordered.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, keys.into_iter().collect::<Vec<_>>());
    }
}

#[test]
fn fan_out_thresholds_keep_lookups_intact() {
    // Grow one node through every variant, then shrink it back, checking all keys each step.
    let mut t = AdaptiveRadixTree::new();
    for b in 0..=255u8 {
        t.insert([b'k', b], b);
        assert_eq!(t.get([b'k', b]), Some(&b));
    }
    let stats = t.get_tree_stats();
    assert_eq!(stats.node_stats["Node256"].total_children, 255);
    assert_eq!(t.len(), 256);

    for b in (0..=255u8).rev() {
        assert_eq!(t.remove([b'k', b]), Some(b));
        for rest in 0..b {
            assert_eq!(t.get([b'k', rest]), Some(&rest), "after removing {b}");
        }
    }
    assert!(t.is_empty());
}
