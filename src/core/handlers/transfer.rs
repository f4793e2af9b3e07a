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

//! Transfer: move value from the sender to one or more receivers.
//!
//! Receivers in address form with no binding are credited on their unclaimed
//! slot and adopted at registration. Duplicate outputs with equal resolved
//! identifiers merge by summation. The sender nonce is consumed before the
//! balance step, so an insufficient balance (or bad receiver) burns the
//! nonce slot and records a failed status.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use tracing::debug;

use crate::core::account;
use crate::core::handlers::{check_nonce, verify_sender_signature, DeliverCtx, NonceCheck};
use crate::core::response::{code, Response};
use crate::core::state::KvRead;
use crate::core::tx::{Transaction, TransferTx};
use crate::core::types::Identifier;

/// Maximum remark size per output, in bytes.
pub const MAX_REMARK_SIZE: usize = 4096;

fn validate_format(tx: &TransferTx) -> bool {
    if tx.outputs.is_empty() {
        debug!("no receiver in transfer transaction");
        return false;
    }
    for out in &tx.outputs {
        if out.remark.len() > MAX_REMARK_SIZE {
            debug!(size = out.remark.len(), "remark exceeds limit");
            return false;
        }
    }
    true
}

/// Admission check against a committed snapshot.
pub fn check(state: &impl KvRead, tx: &TransferTx, raw: &Transaction) -> Response {
    if !validate_format(tx) {
        return Response::error(code::TRANSFER_INVALID_FORMAT, "invalid transfer format");
    }

    let Some(sender) = account::identifier_to_id(state, &tx.from) else {
        return Response::error(
            code::TRANSFER_SENDER_NOT_REGISTERED,
            "sender not registered",
        );
    };

    if !verify_sender_signature(state, &tx.from, raw, &tx.sig) {
        return Response::error(code::TRANSFER_INVALID_SIGNATURE, "invalid signature");
    }

    match check_nonce(state, &sender, tx.nonce) {
        NonceCheck::TooHigh => {
            return Response::error(code::TRANSFER_INVALID_NONCE, "invalid nonce")
        }
        NonceCheck::TooLow => {
            return Response::error(code::TRANSFER_DUPLICATED, "duplicated transaction")
        }
        NonceCheck::Ok => {}
    }

    let balance = account::fetch_balance(state, &sender);
    let mut total = tx.fee.clone();
    for out in &tx.outputs {
        if out.to.as_id().is_some() && account::identifier_to_id(state, &out.to).is_none() {
            debug!(to = %out.to, "unknown receiver id");
            return Response::error(code::TRANSFER_INVALID_RECEIVER, "invalid receiver");
        }
        total += &out.value;
        if balance < total {
            return Response::error(code::TRANSFER_NOT_ENOUGH_BALANCE, "not enough balance");
        }
    }

    Response::success()
}

/// Deliver against the working tree: consume the nonce, stage all credits,
/// then apply them and debit the sender once for fee + total value.
pub fn deliver(ctx: &mut DeliverCtx<'_>, tx: &TransferTx, raw: &Transaction) -> Response {
    if !validate_format(tx) {
        return Response::error(code::TRANSFER_INVALID_FORMAT, "invalid transfer format");
    }

    let Some(sender) = account::identifier_to_id(ctx.state, &tx.from) else {
        return Response::error(
            code::TRANSFER_SENDER_NOT_REGISTERED,
            "sender not registered",
        );
    };

    if !verify_sender_signature(ctx.state, &tx.from, raw, &tx.sig) {
        return Response::error(code::TRANSFER_INVALID_SIGNATURE, "invalid signature");
    }

    match check_nonce(ctx.state, &sender, tx.nonce) {
        NonceCheck::TooHigh => {
            return Response::error(code::TRANSFER_INVALID_NONCE, "invalid nonce")
        }
        NonceCheck::TooLow => {
            return Response::error(code::TRANSFER_DUPLICATED, "duplicated transaction")
        }
        NonceCheck::Ok => {}
    }

    // Nonce is consumed from here on, even when a later step fails.
    account::increment_next_nonce(ctx.state, &sender);

    let balance = account::fetch_balance(ctx.state, &sender);
    let mut total = tx.fee.clone();
    let mut credits: BTreeMap<Identifier, BigUint> = BTreeMap::new();
    for out in &tx.outputs {
        // Resolve to the owning ID where bound; a bare unbound address keeps
        // its address form and is credited on the unclaimed slot.
        let target = match account::identifier_to_id(ctx.state, &out.to) {
            Some(id) => Identifier::Id(id),
            None => match out.to {
                Identifier::Addr(addr) => Identifier::Addr(addr),
                Identifier::Id(_) => {
                    debug!(to = %out.to, "unknown receiver id");
                    return Response::error(code::TRANSFER_INVALID_RECEIVER, "invalid receiver");
                }
            },
        };

        total += &out.value;
        if balance < total {
            return Response::error(code::TRANSFER_NOT_ENOUGH_BALANCE, "not enough balance");
        }

        *credits.entry(target).or_default() += &out.value;
    }

    for (target, amount) in &credits {
        match target {
            Identifier::Id(id) => account::add_balance(ctx.state, id, amount),
            Identifier::Addr(addr) => account::add_unclaimed_balance(ctx.state, addr, amount),
        }
    }
    account::minus_balance(ctx.state, &sender, &total);

    Response::success()
}
