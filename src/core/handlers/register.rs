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

//! Register: bind a fresh internal account ID to an address.
//!
//! The sender must be an address with no existing binding. The new ID is the
//! first 20 bytes of Keccak-256 of the raw transaction bytes, which is also
//! the first 20 bytes of the canonical transaction hash.

use tracing::debug;

use crate::core::account;
use crate::core::crypto::recover_address;
use crate::core::handlers::DeliverCtx;
use crate::core::response::{code, Response};
use crate::core::state::KvRead;
use crate::core::tx::{RegisterTx, Transaction};
use crate::core::types::AccountId;

fn validate(state: &impl KvRead, tx: &RegisterTx, raw: &Transaction) -> Response {
    if account::address_id(state, &tx.addr).is_some() {
        debug!(addr = %tx.addr, "address already registered");
        return Response::error(code::REGISTER_DUPLICATED, "address already registered");
    }

    let hash = raw.signing_hash();
    match recover_address(&hash, &tx.sig) {
        Ok(recovered) if recovered == tx.addr => Response::success(),
        Ok(recovered) => {
            debug!(addr = %tx.addr, recovered = %recovered, "recovered address does not match");
            Response::error(
                code::REGISTER_INVALID_SIGNATURE,
                "recovered address does not match the registering address",
            )
        }
        Err(_) => Response::error(
            code::REGISTER_INVALID_SIGNATURE,
            "signature recovery failed",
        ),
    }
}

/// Admission check against a committed snapshot.
pub fn check(state: &impl KvRead, tx: &RegisterTx, raw: &Transaction) -> Response {
    validate(state, tx, raw)
}

/// Deliver: create the account, bind the address, adopt any unclaimed
/// balance. `Data` is the new 20-byte account ID.
pub fn deliver(
    ctx: &mut DeliverCtx<'_>,
    tx: &RegisterTx,
    raw: &Transaction,
    tx_hash: &[u8; 32],
) -> Response {
    let r = validate(ctx.state, tx, raw);
    if !r.is_ok() {
        return r;
    }

    let mut id_bytes = [0u8; 20];
    id_bytes.copy_from_slice(&tx_hash[..20]);
    let id = AccountId::from_bytes(id_bytes);

    account::new_account(ctx.state, &id, &tx.addr);
    debug!(addr = %tx.addr, id = %id, "account registered");

    Response::success_with(id.as_bytes().to_vec())
}
