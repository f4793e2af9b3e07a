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

//! Emberchain - deterministic ledger application engine for a BFT consensus host.
//!
//! This repository provides:
//! - Deterministic types & canonical binary encodings
//! - A dual versioned Merkle-tree state store (state + withdraw) with bounded retention
//! - Account model: balances, nonces, address <-> internal-ID bindings
//! - Transaction handlers (register, transfer, withdraw) with a fixed validation pipeline
//! - The ABCI-shaped lifecycle surface (CheckTx / DeliverTx / Commit / Query)
//! - Monitoring via Prometheus metrics and structured logging

/// Core engine (types, crypto, state store, accounts, transactions, lifecycle).
pub mod core;
/// Observability (metrics, structured logging helpers).
pub mod monitoring;
