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

//! Withdraw: debit the sender and record a provable withdrawal entry.
//!
//! The packed record `from || to_addr || value || nonce || fee` becomes a
//! key in the withdraw tree; the inclusion proof of that key at the commit
//! height is the artifact clients take to the external chain. `Data` echoes
//! the packed bytes. As with transfers, the nonce is consumed before the
//! balance step.

use tracing::debug;

use crate::core::account;
use crate::core::handlers::{check_nonce, verify_sender_signature, DeliverCtx, NonceCheck};
use crate::core::response::{code, Response};
use crate::core::state::{KvRead, KvWrite};
use crate::core::tx::{Transaction, WithdrawTx};

/// Admission check against a committed snapshot.
pub fn check(state: &impl KvRead, tx: &WithdrawTx, raw: &Transaction) -> Response {
    let Some(sender) = account::identifier_to_id(state, &tx.from) else {
        return Response::error(
            code::WITHDRAW_SENDER_NOT_REGISTERED,
            "sender not registered",
        );
    };

    if !verify_sender_signature(state, &tx.from, raw, &tx.sig) {
        return Response::error(code::WITHDRAW_INVALID_SIGNATURE, "invalid signature");
    }

    match check_nonce(state, &sender, tx.nonce) {
        NonceCheck::TooHigh => {
            return Response::error(code::WITHDRAW_INVALID_NONCE, "invalid nonce")
        }
        NonceCheck::TooLow => {
            return Response::error(code::WITHDRAW_DUPLICATED, "duplicated transaction")
        }
        NonceCheck::Ok => {}
    }

    let total = &tx.value + &tx.fee;
    if account::fetch_balance(state, &sender) < total {
        return Response::error(code::WITHDRAW_NOT_ENOUGH_BALANCE, "not enough balance");
    }

    Response::success()
}

/// Deliver against the working trees: consume the nonce, debit value + fee,
/// insert the packed record into the withdraw tree.
pub fn deliver(ctx: &mut DeliverCtx<'_>, tx: &WithdrawTx, raw: &Transaction) -> Response {
    let Some(sender) = account::identifier_to_id(ctx.state, &tx.from) else {
        return Response::error(
            code::WITHDRAW_SENDER_NOT_REGISTERED,
            "sender not registered",
        );
    };

    if !verify_sender_signature(ctx.state, &tx.from, raw, &tx.sig) {
        return Response::error(code::WITHDRAW_INVALID_SIGNATURE, "invalid signature");
    }

    match check_nonce(ctx.state, &sender, tx.nonce) {
        NonceCheck::TooHigh => {
            return Response::error(code::WITHDRAW_INVALID_NONCE, "invalid nonce")
        }
        NonceCheck::TooLow => {
            return Response::error(code::WITHDRAW_DUPLICATED, "duplicated transaction")
        }
        NonceCheck::Ok => {}
    }

    // Nonce is consumed from here on, even when the balance step fails.
    account::increment_next_nonce(ctx.state, &sender);

    let total = &tx.value + &tx.fee;
    if account::fetch_balance(ctx.state, &sender) < total {
        return Response::error(code::WITHDRAW_NOT_ENOUGH_BALANCE, "not enough balance");
    }

    account::minus_balance(ctx.state, &sender, &total);

    let packed = tx.pack();
    ctx.withdraw.set(packed.clone(), vec![1]);
    debug!(to = %tx.to_addr, "withdraw recorded");

    Response::success_with(packed)
}
