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
#![warn(missing_docs)]

//! Versioned Merkle-tree state store.
//!
//! Write handlers mutate the working copy of a tree between commits; readers
//! see only committed, versioned snapshots. "Not found" is `None`, a normal
//! control path.

/// Deterministic Merkle tree (roots, inclusion proofs).
pub mod merkle;
/// Versioned key-value tree over sled.
pub mod tree;

pub use tree::{Snapshot, StateError, VersionedTree};

/// Read access to a key-value view (committed snapshot or working copy).
pub trait KvRead {
    /// Point lookup.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
}

/// Write access to the mutable working copy.
pub trait KvWrite: KvRead {
    /// Insert or overwrite a key.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);
    /// Remove a key.
    fn delete(&mut self, key: &[u8]);
}
