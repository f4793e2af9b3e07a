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

//! Handler outcome values.
//!
//! Handler errors are not exceptions: they are first-class `{code, info}`
//! values and never mutate state. Code 0 is success; the non-zero codes are
//! grouped per transaction kind (Register 1xxx, Transfer 2xxx, Withdraw
//! 3xxx) and query layer (5xxx).

/// Outcome of CheckTx / DeliverTx, returned to the consensus host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// Return code; 0 means success.
    pub code: u32,
    /// Short human-readable reason for non-zero codes.
    pub info: &'static str,
    /// Kind-specific payload (e.g. the new account ID for Register).
    pub data: Vec<u8>,
}

impl Response {
    /// Success with no payload.
    pub fn success() -> Self {
        Self {
            code: code::SUCCESS,
            info: "",
            data: Vec::new(),
        }
    }

    /// Success carrying a payload.
    pub fn success_with(data: Vec<u8>) -> Self {
        Self {
            code: code::SUCCESS,
            info: "",
            data,
        }
    }

    /// Failure with the given code and reason.
    pub fn error(code: u32, info: &'static str) -> Self {
        Self {
            code,
            info,
            data: Vec::new(),
        }
    }

    /// Whether this outcome is a success.
    pub fn is_ok(&self) -> bool {
        self.code == code::SUCCESS
    }
}

/// The return-code table.
pub mod code {
    /// Success.
    pub const SUCCESS: u32 = 0;
    /// The blob did not decode to a known transaction kind.
    pub const UNKNOWN_TRANSACTION: u32 = 1;

    /// Register: address already bound.
    pub const REGISTER_DUPLICATED: u32 = 1001;
    /// Register: recovered address does not match the registering address.
    pub const REGISTER_INVALID_SIGNATURE: u32 = 1002;

    /// Transfer: structural or size-limit violation.
    pub const TRANSFER_INVALID_FORMAT: u32 = 2001;
    /// Transfer: sender address has no binding.
    pub const TRANSFER_SENDER_NOT_REGISTERED: u32 = 2002;
    /// Transfer: recovery failed or signer is not the sender.
    pub const TRANSFER_INVALID_SIGNATURE: u32 = 2003;
    /// Transfer: nonce above the next expected one.
    pub const TRANSFER_INVALID_NONCE: u32 = 2004;
    /// Transfer: nonce below the next expected one.
    pub const TRANSFER_DUPLICATED: u32 = 2005;
    /// Transfer: sender balance below fee + accumulated values.
    pub const TRANSFER_NOT_ENOUGH_BALANCE: u32 = 2006;
    /// Transfer: receiver is an internal ID with no account.
    pub const TRANSFER_INVALID_RECEIVER: u32 = 2007;

    /// Withdraw: sender address has no binding.
    pub const WITHDRAW_SENDER_NOT_REGISTERED: u32 = 3002;
    /// Withdraw: recovery failed or signer is not the sender.
    pub const WITHDRAW_INVALID_SIGNATURE: u32 = 3003;
    /// Withdraw: nonce above the next expected one.
    pub const WITHDRAW_INVALID_NONCE: u32 = 3004;
    /// Withdraw: nonce below the next expected one.
    pub const WITHDRAW_DUPLICATED: u32 = 3005;
    /// Withdraw: sender balance below value + fee.
    pub const WITHDRAW_NOT_ENOUGH_BALANCE: u32 = 3006;

    /// Query: unknown path.
    pub const QUERY_UNKNOWN_PATH: u32 = 5000;
    /// Query: input parses as neither identifier form, or is unknown.
    pub const QUERY_INVALID_IDENTIFIER: u32 = 5001;
    /// Query: no withdraw record for the packed bytes at that height.
    pub const QUERY_WITHDRAW_PROOF_NOT_EXIST: u32 = 5002;
}
