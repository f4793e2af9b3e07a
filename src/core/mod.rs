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

//! Core protocol primitives (types, crypto, state, accounts, handlers, lifecycle).

/// Account model over the state tree.
pub mod account;
/// Lifecycle controller exposed to the consensus host.
pub mod app;
/// Engine configuration.
pub mod config;
/// Keccak-256 hashing and secp256k1 signature recovery.
pub mod crypto;
/// Transaction admission and delivery handlers.
pub mod handlers;
/// Read-only query layer.
pub mod query;
/// Handler outcome values and the return-code table.
pub mod response;
/// Versioned Merkle-tree state store.
pub mod state;
/// Transaction framing and hashing.
pub mod tx;
/// Deterministic core types and canonical encoding helpers.
pub mod types;
