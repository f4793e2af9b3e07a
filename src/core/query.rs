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

//! Read-only query layer.
//!
//! Queries read committed immutable snapshots only; the working trees are
//! never observable here. Response bodies are JSON.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::core::account;
use crate::core::response::code;
use crate::core::state::{Snapshot, VersionedTree};
use crate::core::types::{AccountId, Address, Identifier, TxStatus};

/// A query from the read gateway, forwarded by the host.
#[derive(Clone, Copy, Debug)]
pub struct QueryRequest<'a> {
    /// Query path, e.g. `account_info`.
    pub path: &'a str,
    /// Path-specific input bytes.
    pub data: &'a [u8],
    /// Committed version to read; 0 means the latest.
    pub height: u64,
}

/// Query outcome; code 0 is success and `value` carries the JSON body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryResponse {
    /// Return code; 0 means success.
    pub code: u32,
    /// JSON response body on success.
    pub value: Vec<u8>,
    /// Short reason for non-zero codes.
    pub info: &'static str,
}

impl QueryResponse {
    fn success<T: Serialize>(body: &T) -> Self {
        Self {
            code: code::SUCCESS,
            value: serde_json::to_vec(body).expect("query response serialization"),
            info: "",
        }
    }

    fn error(code: u32, info: &'static str) -> Self {
        Self {
            code,
            value: Vec::new(),
            info,
        }
    }

    /// Whether the query succeeded.
    pub fn is_ok(&self) -> bool {
        self.code == code::SUCCESS
    }
}

/// Account record returned by `account_info` and `address_info`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountInfoRes {
    /// Base64 internal ID; empty for an unregistered address with only an
    /// unclaimed balance.
    pub id: String,
    /// Decimal balance.
    pub balance: String,
    /// Next expected nonce; 0 for the synthetic unregistered record.
    #[serde(rename = "nextNonce")]
    pub next_nonce: u64,
}

/// Record returned by `tx_state`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TxStateRes {
    /// "success", "fail" or "pending".
    pub status: String,
}

/// Route a query to its handler.
pub fn dispatch(
    state_tree: &VersionedTree,
    withdraw_tree: &VersionedTree,
    req: QueryRequest<'_>,
) -> QueryResponse {
    let snapshot = state_tree.latest_snapshot();
    match req.path {
        "account_info" => account_info(&snapshot, req.data),
        "address_info" => address_info(&snapshot, req.data),
        "tx_state" => tx_state(&snapshot, req.data),
        "withdraw_proof" => withdraw_proof(withdraw_tree, req.data, req.height),
        _ => QueryResponse::error(code::QUERY_UNKNOWN_PATH, "unknown query path"),
    }
}

fn account_record(snapshot: &Snapshot, id: &AccountId) -> AccountInfoRes {
    AccountInfoRes {
        id: id.to_base64(),
        balance: account::fetch_balance(snapshot, id).to_string(),
        next_nonce: account::fetch_next_nonce(snapshot, id),
    }
}

fn account_info(snapshot: &Snapshot, data: &[u8]) -> QueryResponse {
    let Ok(text) = std::str::from_utf8(data) else {
        return QueryResponse::error(code::QUERY_INVALID_IDENTIFIER, "invalid identifier");
    };
    let Some(iden) = Identifier::parse_str(text) else {
        return QueryResponse::error(code::QUERY_INVALID_IDENTIFIER, "invalid identifier");
    };
    let Some(id) = account::identifier_to_id(snapshot, &iden) else {
        return QueryResponse::error(code::QUERY_INVALID_IDENTIFIER, "unknown identifier");
    };
    QueryResponse::success(&account_record(snapshot, &id))
}

fn address_info(snapshot: &Snapshot, data: &[u8]) -> QueryResponse {
    let Ok(text) = std::str::from_utf8(data) else {
        return QueryResponse::error(code::QUERY_INVALID_IDENTIFIER, "invalid address");
    };
    let Some(addr) = Address::from_hex(text) else {
        return QueryResponse::error(code::QUERY_INVALID_IDENTIFIER, "invalid address");
    };

    if let Some(id) = account::address_id(snapshot, &addr) {
        return QueryResponse::success(&account_record(snapshot, &id));
    }

    // Unbound address: report the unclaimed balance held against it, if any.
    let unclaimed = account::unclaimed_balance(snapshot, &addr);
    if unclaimed == BigUint::from(0u32) {
        return QueryResponse::error(code::QUERY_INVALID_IDENTIFIER, "unknown address");
    }
    QueryResponse::success(&AccountInfoRes {
        id: String::new(),
        balance: unclaimed.to_string(),
        next_nonce: 0,
    })
}

fn tx_state(snapshot: &Snapshot, data: &[u8]) -> QueryResponse {
    let status = match account::get_status(snapshot, data) {
        TxStatus::Success => "success",
        TxStatus::Fail => "fail",
        TxStatus::NotSet => "pending",
    };
    QueryResponse::success(&TxStateRes {
        status: status.to_string(),
    })
}

fn withdraw_proof(withdraw_tree: &VersionedTree, data: &[u8], height: u64) -> QueryResponse {
    let version = if height == 0 {
        withdraw_tree.version()
    } else {
        height
    };
    let Some(snapshot) = withdraw_tree.get_immutable(version) else {
        return QueryResponse::error(
            code::QUERY_WITHDRAW_PROOF_NOT_EXIST,
            "no withdraw record at that height",
        );
    };
    match snapshot.prove_key(data) {
        Some(proof) => QueryResponse::success(&proof),
        None => QueryResponse::error(
            code::QUERY_WITHDRAW_PROOF_NOT_EXIST,
            "no withdraw record at that height",
        ),
    }
}
