//! # Concurrent Submissions
//!
//! Verification runs outside the protocol lock; commitment insertion and
//! nullifier consumption run under it. Parallel callers must observe the
//! same results as some sequential order.

mod common;

use std::sync::Arc;

use common::*;
use pop_crypto::{root_from_leaves, HashFunction};
use proptest::prelude::*;

#[test]
fn parallel_registrations_equal_sequential_root() {
    let protocol = Arc::new(protocol());
    const N: u64 = 64;

    std::thread::scope(|s| {
        for i in 0..N {
            let protocol = Arc::clone(&protocol);
            s.spawn(move || {
                protocol.validate_proof(&register_call(i + 1, 10_000 + i), ALG.id()).unwrap();
            });
        }
    });

    let (leaves, root) = protocol.read(|state| (state.commitments.leaves().to_vec(), state.commitments.current_root()));
    assert_eq!(leaves.len(), N as usize);
    assert_eq!(root, root_from_leaves(&HashFunction::Poseidon, &leaves));

    let mut sorted: Vec<_> = leaves.iter().copied().collect();
    sorted.sort();
    let mut expected: Vec<_> = (0..N).map(|i| fe(10_000 + i)).collect();
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn racing_replays_register_once() {
    let protocol = Arc::new(protocol());
    let call = register_call(1, 42);

    let successes: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let protocol = Arc::clone(&protocol);
                let call = call.clone();
                s.spawn(move || protocol.validate_proof(&call, ALG.id()).is_ok())
            })
            .collect();
        handles.into_iter().map(|h| usize::from(h.join().unwrap())).sum()
    });

    assert_eq!(successes, 1);
    assert_eq!(protocol.stats().commitments, 1);
    assert_eq!(protocol.stats().register_nullifiers, 1);
}

#[test]
fn disclosures_racing_a_registration_see_one_root() {
    let protocol = Arc::new(protocol());
    protocol.validate_proof(&register_call(1, 42), ALG.id()).unwrap();
    let observed = protocol.current_root();

    std::thread::scope(|s| {
        let p = Arc::clone(&protocol);
        s.spawn(move || p.validate_proof(&register_call(2, 43), ALG.id()).unwrap());
        for n in 0..8u64 {
            let p = Arc::clone(&protocol);
            s.spawn(move || {
                // Either minted against the old root before the insert, or
                // rejected as stale after it.
                match p.mint(&disclose_call(observed, 100 + n), noon()) {
                    Ok(receipt) => assert_eq!(receipt.nullifier.value(), fe(100 + n)),
                    Err(e) => assert_eq!(e.code(), "INVALID_MERKLE_ROOT"),
                }
            });
        }
    });

    let stats = protocol.stats();
    assert_eq!(stats.commitments, 2);
    assert_eq!(stats.tokens as usize, stats.disclose_nullifiers);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn registry_root_matches_independent_computation(commitments in prop::collection::btree_set(1u64..u64::MAX, 1..40)) {
        let protocol = protocol();
        for (i, c) in commitments.iter().enumerate() {
            protocol.validate_proof(&register_call(i as u64 + 1, *c), ALG.id()).unwrap();
        }
        let leaves: Vec<_> = commitments.iter().map(|c| fe(*c)).collect();
        prop_assert_eq!(protocol.current_root(), root_from_leaves(&HashFunction::Poseidon, &leaves));
    }
}
