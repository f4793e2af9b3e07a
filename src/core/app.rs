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

//! Lifecycle controller exposed to the consensus host.
//!
//! The engine is single-writer: the host invokes CheckTx, DeliverTx,
//! BeginBlock, EndBlock and Commit sequentially from one logical caller.
//! CheckTx reads the last committed snapshot and never mutates; DeliverTx
//! mutates the working trees only between BeginBlock and Commit. Commit
//! saves a version of both trees, runs the retention sweep and returns
//! `state_root(32) || withdraw_root[..20]` as the app hash.
//!
//! Storage failures at commit are fatal: a replica that cannot commit
//! deterministically must not continue, so the engine logs and halts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::core::config::StorageConfig;
use crate::core::handlers::{self, DeliverCtx};
use crate::core::query::{self, QueryRequest, QueryResponse};
use crate::core::response::{code, Response};
use crate::core::state::{StateError, VersionedTree};
use crate::core::tx::Transaction;
use crate::core::types::{decode_canonical_limited, encode_canonical};
use crate::core::crypto::keccak256;
use crate::monitoring::metrics::Metrics;

const META_TREE: &str = "meta";
const META_KEY: &[u8] = b"engine";
const META_MAX_SIZE: usize = 4096;

/// Truncated withdraw-root length inside the app hash.
pub const WITHDRAW_ROOT_LEN: usize = 20;
/// Total app hash length: 32-byte state root + truncated withdraw root.
pub const APP_HASH_LEN: usize = 32 + WITHDRAW_ROOT_LEN;

/// Per-block lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    InBlock,
    Committing,
}

/// Persisted engine metadata, written at every commit.
#[derive(Debug, Serialize, Deserialize)]
struct EngineMeta {
    height: u64,
    app_hash: Vec<u8>,
}

/// Snapshot of the engine's committed position, as reported to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoData {
    /// Height of the last committed block (0 before the first commit).
    pub last_block_height: u64,
    /// App hash returned by the last commit (empty before the first commit).
    pub app_hash: Vec<u8>,
}

/// The deterministic ledger application engine.
pub struct Application {
    db: sled::Db,
    state_tree: VersionedTree,
    withdraw_tree: VersionedTree,
    keep_blocks: u64,
    phase: Phase,
    block_height: u64,
    last_height: u64,
    last_app_hash: Vec<u8>,
    metrics: Option<Arc<Metrics>>,
}

fn must<T>(res: Result<T, StateError>, what: &str) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, what, "storage failure; engine halting");
            panic!("storage failure during {what}: {e}");
        }
    }
}

impl Application {
    /// Open the engine at the configured path, restoring the committed
    /// position of a previous run.
    pub fn open(cfg: &StorageConfig) -> Result<Self, StateError> {
        let mut sled_cfg = sled::Config::new().path(&cfg.db_path);
        if cfg.cache_size > 0 {
            sled_cfg = sled_cfg.cache_capacity(cfg.cache_size);
        }
        let db = sled_cfg.open().map_err(|_| StateError::DbOpen)?;
        Self::open_with_db(db, cfg.keep_blocks)
    }

    /// Open a throwaway engine on temporary storage (mock-context style,
    /// used by tests and tooling).
    pub fn open_temporary(keep_blocks: u64) -> Result<Self, StateError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|_| StateError::DbOpen)?;
        Self::open_with_db(db, keep_blocks)
    }

    fn open_with_db(db: sled::Db, keep_blocks: u64) -> Result<Self, StateError> {
        let state_tree = VersionedTree::open(db.clone(), "state")?;
        let withdraw_tree = VersionedTree::open(db.clone(), "withdraw")?;

        let meta_tree = db.open_tree(META_TREE).map_err(|_| StateError::DbOpen)?;
        let meta = meta_tree
            .get(META_KEY)
            .map_err(|_| StateError::DbIo)?
            .map(|raw| decode_canonical_limited::<EngineMeta>(&raw, META_MAX_SIZE))
            .transpose()
            .map_err(|_| StateError::Corrupt)?;

        let (last_height, last_app_hash) = match meta {
            Some(m) => (m.height, m.app_hash),
            None => (0, Vec::new()),
        };

        Ok(Self {
            db,
            state_tree,
            withdraw_tree,
            keep_blocks,
            phase: Phase::Idle,
            block_height: 0,
            last_height,
            last_app_hash,
            metrics: None,
        })
    }

    /// Wire a metrics registry into the engine.
    pub fn attach_metrics(&mut self, metrics: Arc<Metrics>) {
        self.metrics = Some(metrics);
    }

    /// InitChain: called once by the host when the chain is created.
    pub fn init_chain(&mut self) {
        self.phase = Phase::Idle;
        info!(
            state_version = self.state_tree.version(),
            "chain initialized"
        );
    }

    /// Info: the committed position, used by the host for replay sync.
    pub fn info(&self) -> InfoData {
        InfoData {
            last_block_height: self.last_height,
            app_hash: self.last_app_hash.clone(),
        }
    }

    /// BeginBlock: enter the block at `height`.
    pub fn begin_block(&mut self, height: u64) {
        self.phase = Phase::InBlock;
        self.block_height = height;
    }

    /// CheckTx: advisory admission check against the last committed
    /// snapshot. Permitted in Idle and InBlock; never mutates.
    pub fn check_tx(&self, raw: &[u8]) -> Response {
        let tx = match Transaction::decode(raw) {
            Ok(tx) => tx,
            Err(_) => {
                return Response::error(code::UNKNOWN_TRANSACTION, "cannot parse transaction")
            }
        };
        let snapshot = self.state_tree.latest_snapshot();
        handlers::check_tx(&snapshot, &tx)
    }

    /// DeliverTx: apply an ordered transaction to the working trees and
    /// record its terminal status. Permitted only inside a block.
    pub fn deliver_tx(&mut self, raw: &[u8]) -> Response {
        if self.phase != Phase::InBlock {
            warn!("DeliverTx outside BeginBlock/EndBlock");
            return Response::error(
                code::UNKNOWN_TRANSACTION,
                "transaction delivered outside a block",
            );
        }

        let tx = match Transaction::decode(raw) {
            Ok(tx) => tx,
            Err(_) => {
                return Response::error(code::UNKNOWN_TRANSACTION, "cannot parse transaction")
            }
        };
        let tx_hash = keccak256(raw);

        let mut ctx = DeliverCtx {
            state: &mut self.state_tree,
            withdraw: &mut self.withdraw_tree,
        };
        let r = handlers::deliver_tx(&mut ctx, &tx, &tx_hash);

        if let Some(m) = &self.metrics {
            m.txs_delivered_total.inc();
            if !r.is_ok() {
                m.txs_failed_total.inc();
            }
        }
        r
    }

    /// EndBlock: leave the block; the next call is Commit.
    pub fn end_block(&mut self, height: u64) {
        self.block_height = height;
        self.phase = Phase::Committing;
    }

    /// Commit: save a version of both trees, sweep old versions, persist the
    /// committed position and return the app hash.
    pub fn commit(&mut self) -> Vec<u8> {
        let (state_root, version) = must(self.state_tree.save_version(), "state save");
        let (withdraw_root, withdraw_version) =
            must(self.withdraw_tree.save_version(), "withdraw save");
        debug_assert_eq!(version, withdraw_version);

        let mut app_hash = Vec::with_capacity(APP_HASH_LEN);
        app_hash.extend_from_slice(&state_root);
        app_hash.extend_from_slice(&withdraw_root[..WITHDRAW_ROOT_LEN]);

        self.sweep_old_versions(version);

        self.last_height = if self.block_height > 0 {
            self.block_height
        } else {
            version
        };
        self.last_app_hash = app_hash.clone();

        let meta = EngineMeta {
            height: self.last_height,
            app_hash: app_hash.clone(),
        };
        let encoded = encode_canonical(&meta).map_err(|_| StateError::Corrupt);
        let encoded = must(encoded, "meta encode");
        let meta_tree = must(
            self.db.open_tree(META_TREE).map_err(|_| StateError::DbIo),
            "meta open",
        );
        must(
            meta_tree
                .insert(META_KEY, encoded)
                .map(|_| ())
                .map_err(|_| StateError::DbIo),
            "meta write",
        );
        must(
            self.db.flush().map(|_| ()).map_err(|_| StateError::DbIo),
            "flush",
        );

        self.phase = Phase::Idle;
        self.block_height = 0;

        if let Some(m) = &self.metrics {
            m.block_height.set(self.last_height as i64);
        }
        info!(height = self.last_height, version, "committed block");

        app_hash
    }

    /// Delete the version falling out of the retention window, on both
    /// trees. The two most recent versions are always retained.
    fn sweep_old_versions(&mut self, version: u64) {
        if self.keep_blocks == 0 {
            return;
        }
        let target = version.saturating_sub(self.keep_blocks);
        if target == 0 || version - target < 2 {
            return;
        }
        must(self.state_tree.delete_version(target), "state gc");
        must(self.withdraw_tree.delete_version(target), "withdraw gc");
    }

    /// Query: read-only lookups against committed snapshots.
    pub fn query(&self, req: QueryRequest<'_>) -> QueryResponse {
        if let Some(m) = &self.metrics {
            m.queries_total.inc();
        }
        query::dispatch(&self.state_tree, &self.withdraw_tree, req)
    }

    /// The committed state tree (read-only; versions and snapshots).
    pub fn state_tree(&self) -> &VersionedTree {
        &self.state_tree
    }

    /// The committed withdraw tree (read-only; versions and snapshots).
    pub fn withdraw_tree(&self) -> &VersionedTree {
        &self.withdraw_tree
    }

    /// Host-side provisioning hook: mutable access to the working state
    /// tree, for genesis balance injection and test setup. Regular state
    /// transitions go through DeliverTx only.
    pub fn working_state(&mut self) -> &mut VersionedTree {
        &mut self.state_tree
    }
}
