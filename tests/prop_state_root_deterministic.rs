// Copyright (c) 2026 Emberchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]

use emberchain::core::state::{KvWrite, VersionedTree};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn temp_tree() -> VersionedTree {
    let db = sled::Config::new()
        .temporary(true)
        .open()
        .expect("temporary sled db");
    VersionedTree::open(db, "state").expect("open tree")
}

proptest! {
    #[test]
    fn prop_state_root_deterministic(
        kvs in prop::collection::vec((prop::collection::vec(any::<u8>(), 1..16),
                                      prop::collection::vec(any::<u8>(), 0..32)), 1..50)
    ) {
        let mut t1 = temp_tree();
        let mut t2 = temp_tree();

        let mut map: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
        for (k, v) in kvs.into_iter() { map.insert(k, v); }

        // Insertion order must not matter for the committed root.
        for (k, v) in map.iter() {
            t1.set(k.clone(), v.clone());
        }
        for (k, v) in map.iter().rev() {
            t2.set(k.clone(), v.clone());
        }

        let (r1, v1) = t1.save_version().unwrap();
        let (r2, v2) = t2.save_version().unwrap();

        prop_assert_eq!(r1, r2);
        prop_assert_eq!(v1, v2);
    }
}
