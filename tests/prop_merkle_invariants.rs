// Copyright (c) 2026 Emberchain
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]

use proptest::prelude::*;

use emberchain::core::state::merkle::{
    merkle_proof_sorted, merkle_root_sorted, verify_proof, verify_proof_truncated,
};

proptest! {
    #[test]
    fn merkle_proof_verifies_for_any_nonempty_set(mut pairs in proptest::collection::vec((proptest::collection::vec(any::<u8>(), 1..16), proptest::collection::vec(any::<u8>(), 0..32)), 1..64)) {
        // Canonical ordering requirement
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs.dedup_by(|a, b| a.0 == b.0);

        let root = merkle_root_sorted(&pairs);
        let idx = (pairs[0].1.len()) % pairs.len();

        let proof = merkle_proof_sorted(&pairs, idx).expect("proof exists for non-empty set");
        prop_assert!(verify_proof(root, &proof));

        // The truncated-root form accepts the same proof.
        let mut root20 = [0u8; 20];
        root20.copy_from_slice(&root[..20]);
        prop_assert!(verify_proof_truncated(&root20, &proof));
    }

    #[test]
    fn merkle_root_changes_when_a_value_changes(mut pairs in proptest::collection::vec((proptest::collection::vec(any::<u8>(), 1..16), proptest::collection::vec(any::<u8>(), 0..32)), 1..32)) {
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs.dedup_by(|a, b| a.0 == b.0);

        let root = merkle_root_sorted(&pairs);
        let mut mutated = pairs.clone();
        mutated[0].1.push(0xff);
        prop_assert_ne!(root, merkle_root_sorted(&mutated));
    }
}
