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

//! Versioned key-value tree persisted in sled.
//!
//! The working copy is an in-memory ordered map. `save_version` freezes it
//! into an immutable snapshot, persists the snapshot under a per-version sled
//! tree, and returns the deterministic Merkle root. Old versions can be
//! deleted independently; the caller drives retention.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::core::state::merkle::{
    merkle_proof_sorted, merkle_root_sorted, Hash32, MerkleProof,
};
use crate::core::state::{KvRead, KvWrite};

/// State store errors.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("db open")]
    DbOpen,
    #[error("db io")]
    DbIo,
    #[error("corrupt version record")]
    Corrupt,
}

type Pairs = BTreeMap<Vec<u8>, Vec<u8>>;

/// A read-only committed snapshot, cheap to clone and share across readers.
#[derive(Clone, Debug, Default)]
pub struct Snapshot(Arc<Pairs>);

impl Snapshot {
    /// An empty snapshot (no committed version yet).
    pub fn empty() -> Self {
        Self(Arc::new(BTreeMap::new()))
    }

    fn sorted_pairs(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Merkle root of this snapshot.
    pub fn root(&self) -> Hash32 {
        merkle_root_sorted(&self.sorted_pairs())
    }

    /// Inclusion proof for `key`, if present.
    pub fn prove_key(&self, key: &[u8]) -> Option<MerkleProof> {
        let pairs = self.sorted_pairs();
        let idx = pairs.binary_search_by(|p| p.0.as_slice().cmp(key)).ok()?;
        merkle_proof_sorted(&pairs, idx)
    }
}

impl KvRead for Snapshot {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.0.get(key).cloned()
    }
}

/// A versioned tree: mutable working copy plus committed snapshots.
pub struct VersionedTree {
    name: &'static str,
    db: sled::Db,
    working: Pairs,
    versions: BTreeMap<u64, Snapshot>,
    latest: u64,
}

impl VersionedTree {
    /// Open the named tree inside `db`, restoring all retained versions.
    /// The working copy starts as a copy of the latest committed version.
    pub fn open(db: sled::Db, name: &'static str) -> Result<Self, StateError> {
        let mut versions: BTreeMap<u64, Snapshot> = BTreeMap::new();
        let prefix = format!("{name}:v");
        for tree_name in db.tree_names() {
            let Ok(s) = std::str::from_utf8(&tree_name) else {
                continue;
            };
            let Some(rest) = s.strip_prefix(&prefix) else {
                continue;
            };
            let version: u64 = rest.parse().map_err(|_| StateError::Corrupt)?;
            let tree = db.open_tree(&tree_name).map_err(|_| StateError::DbOpen)?;
            let mut pairs = Pairs::new();
            for item in tree.iter() {
                let (k, v) = item.map_err(|_| StateError::DbIo)?;
                pairs.insert(k.to_vec(), v.to_vec());
            }
            versions.insert(version, Snapshot(Arc::new(pairs)));
        }

        let latest = versions.keys().next_back().copied().unwrap_or(0);
        let working = versions
            .get(&latest)
            .map(|s| (*s.0).clone())
            .unwrap_or_default();
        if latest > 0 {
            debug!(tree = name, version = latest, "restored versioned tree");
        }
        Ok(Self {
            name,
            db,
            working,
            versions,
            latest,
        })
    }

    fn version_tree_name(&self, version: u64) -> String {
        format!("{}:v{}", self.name, version)
    }

    /// Latest committed version number (0 = none).
    pub fn version(&self) -> u64 {
        self.latest
    }

    /// Whether the given committed version is retained.
    pub fn version_exists(&self, version: u64) -> bool {
        self.versions.contains_key(&version)
    }

    /// Read-only snapshot of a committed version.
    pub fn get_immutable(&self, version: u64) -> Option<Snapshot> {
        self.versions.get(&version).cloned()
    }

    /// Snapshot of the latest committed version; empty before the first save.
    pub fn latest_snapshot(&self) -> Snapshot {
        self.versions
            .get(&self.latest)
            .cloned()
            .unwrap_or_else(Snapshot::empty)
    }

    /// Freeze the working copy as the next version, persist it, and return
    /// the Merkle root and the new version number.
    pub fn save_version(&mut self) -> Result<(Hash32, u64), StateError> {
        let version = self.latest + 1;
        let snapshot = Snapshot(Arc::new(self.working.clone()));
        let root = snapshot.root();

        let tree = self
            .db
            .open_tree(self.version_tree_name(version))
            .map_err(|_| StateError::DbIo)?;
        let mut batch = sled::Batch::default();
        for (k, v) in snapshot.0.iter() {
            batch.insert(k.as_slice(), v.as_slice());
        }
        tree.apply_batch(batch).map_err(|_| StateError::DbIo)?;

        self.versions.insert(version, snapshot);
        self.latest = version;
        Ok((root, version))
    }

    /// Drop a committed version. Returns whether it existed.
    pub fn delete_version(&mut self, version: u64) -> Result<bool, StateError> {
        if self.versions.remove(&version).is_none() {
            return Ok(false);
        }
        self.db
            .drop_tree(self.version_tree_name(version))
            .map_err(|_| StateError::DbIo)?;
        debug!(tree = self.name, version, "dropped state version");
        Ok(true)
    }
}

impl KvRead for VersionedTree {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.working.get(key).cloned()
    }
}

impl KvWrite for VersionedTree {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.working.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.working.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::merkle::verify_proof;

    fn temp_db() -> sled::Db {
        sled::Config::new()
            .temporary(true)
            .open()
            .expect("temporary sled db")
    }

    #[test]
    fn save_version_returns_increasing_versions() {
        let mut tree = VersionedTree::open(temp_db(), "state").unwrap();
        tree.set(b"a".to_vec(), b"1".to_vec());
        let (_, v1) = tree.save_version().unwrap();
        tree.set(b"b".to_vec(), b"2".to_vec());
        let (_, v2) = tree.save_version().unwrap();
        assert_eq!((v1, v2), (1, 2));
        assert!(tree.version_exists(1));
        assert!(tree.version_exists(2));
    }

    #[test]
    fn snapshots_do_not_see_working_writes() {
        let mut tree = VersionedTree::open(temp_db(), "state").unwrap();
        tree.set(b"k".to_vec(), b"old".to_vec());
        tree.save_version().unwrap();
        tree.set(b"k".to_vec(), b"new".to_vec());
        let snap = tree.latest_snapshot();
        assert_eq!(snap.get(b"k"), Some(b"old".to_vec()));
        assert_eq!(tree.get(b"k"), Some(b"new".to_vec()));
    }

    #[test]
    fn delete_version_forgets_the_snapshot() {
        let mut tree = VersionedTree::open(temp_db(), "state").unwrap();
        tree.set(b"k".to_vec(), b"v".to_vec());
        tree.save_version().unwrap();
        tree.save_version().unwrap();
        assert!(tree.delete_version(1).unwrap());
        assert!(!tree.version_exists(1));
        assert!(tree.version_exists(2));
        assert!(!tree.delete_version(1).unwrap());
    }

    #[test]
    fn reopen_restores_latest_version() {
        let db = temp_db();
        {
            let mut tree = VersionedTree::open(db.clone(), "state").unwrap();
            tree.set(b"k".to_vec(), b"v".to_vec());
            tree.save_version().unwrap();
        }
        let tree = VersionedTree::open(db, "state").unwrap();
        assert_eq!(tree.version(), 1);
        assert_eq!(tree.get(b"k"), Some(b"v".to_vec()));
    }

    #[test]
    fn snapshot_proof_verifies_against_root() {
        let mut tree = VersionedTree::open(temp_db(), "state").unwrap();
        tree.set(b"a".to_vec(), b"1".to_vec());
        tree.set(b"b".to_vec(), b"2".to_vec());
        tree.set(b"c".to_vec(), b"3".to_vec());
        let (root, _) = tree.save_version().unwrap();
        let snap = tree.latest_snapshot();
        let proof = snap.prove_key(b"b").expect("proof");
        assert!(verify_proof(root, &proof));
        assert!(snap.prove_key(b"missing").is_none());
    }
}
