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

//! Transaction admission and delivery.
//!
//! Dispatch is a `match` over the transaction union; the kind set is closed
//! at compile time, so there is no runtime handler registry. All kinds share
//! the same validation pipeline, executed in a fixed order: format, sender,
//! signature, nonce, balance. The first failing step terminates with its
//! specific code.

/// Register handler.
pub mod register;
/// Transfer handler.
pub mod transfer;
/// Withdraw handler.
pub mod withdraw;

use crate::core::account;
use crate::core::crypto::recover_address;
use crate::core::response::Response;
use crate::core::state::{KvRead, Snapshot, VersionedTree};
use crate::core::tx::Transaction;
use crate::core::types::{AccountId, Identifier, Signature, TxStatus};

/// Mutable handler context for DeliverTx: the working copies of both trees.
pub struct DeliverCtx<'a> {
    /// Working state tree.
    pub state: &'a mut VersionedTree,
    /// Working withdraw tree.
    pub withdraw: &'a mut VersionedTree,
}

/// Run the admission checks for a transaction against a committed snapshot.
/// Never mutates.
pub fn check_tx(state: &Snapshot, tx: &Transaction) -> Response {
    match tx {
        Transaction::Register(t) => register::check(state, t, tx),
        Transaction::Transfer(t) => transfer::check(state, t, tx),
        Transaction::Withdraw(t) => withdraw::check(state, t, tx),
    }
}

/// Deliver a transaction against the working trees and record its terminal
/// status. The first terminal outcome for a hash wins; replays do not
/// overwrite it.
pub fn deliver_tx(ctx: &mut DeliverCtx<'_>, tx: &Transaction, tx_hash: &[u8; 32]) -> Response {
    let r = match tx {
        Transaction::Register(t) => register::deliver(ctx, t, tx, tx_hash),
        Transaction::Transfer(t) => transfer::deliver(ctx, t, tx),
        Transaction::Withdraw(t) => withdraw::deliver(ctx, t, tx),
    };

    let status = if r.is_ok() {
        TxStatus::Success
    } else {
        TxStatus::Fail
    };
    if account::get_status(ctx.state, tx_hash) == TxStatus::NotSet {
        account::set_status(ctx.state, tx_hash, status);
    }

    r
}

/// Outcome of the nonce step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NonceCheck {
    /// Matches the next expected nonce.
    Ok,
    /// Above the next expected nonce.
    TooHigh,
    /// Below the next expected nonce (replay).
    TooLow,
}

/// Compare a transaction nonce against the account's next expected one.
pub fn check_nonce(state: &impl KvRead, id: &AccountId, nonce: u64) -> NonceCheck {
    let next = account::fetch_next_nonce(state, id);
    if nonce > next {
        NonceCheck::TooHigh
    } else if nonce < next {
        NonceCheck::TooLow
    } else {
        NonceCheck::Ok
    }
}

/// Verify that the signature over the whole-transaction signing hash was
/// made by the sender: the recovered address must equal `from` when `from`
/// is an address, or be bound to `from` when it is an internal ID.
pub fn verify_sender_signature(
    state: &impl KvRead,
    from: &Identifier,
    tx: &Transaction,
    sig: &Signature,
) -> bool {
    let hash = tx.signing_hash();
    let Ok(recovered) = recover_address(&hash, sig) else {
        return false;
    };
    match from {
        Identifier::Addr(addr) => recovered == *addr,
        Identifier::Id(id) => account::id_has_address(state, id, &recovered),
    }
}
