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
#![allow(dead_code)]

//! Shared helpers: deterministic test accounts, transaction builders and
//! query shorthands.

use k256::ecdsa::SigningKey;
use num_bigint::BigUint;

use emberchain::core::account;
use emberchain::core::app::Application;
use emberchain::core::crypto::{address_from_verifying_key, keccak256};
use emberchain::core::query::{AccountInfoRes, QueryRequest, TxStateRes};
use emberchain::core::tx::{
    RegisterTx, Transaction, TransferOutput, TransferTx, WithdrawTx,
};
use emberchain::core::types::{AccountId, Address, Identifier, Signature};

/// A deterministic secp256k1 test identity.
pub struct TestAccount {
    pub key: SigningKey,
    pub addr: Address,
}

/// Deterministic account from a seed byte.
pub fn test_account(seed: u8) -> TestAccount {
    let mut bytes = [seed; 32];
    bytes[0] = 1; // keep the scalar nonzero and in range
    let key = SigningKey::from_slice(&bytes).expect("valid test scalar");
    let addr = address_from_verifying_key(key.verifying_key());
    TestAccount { key, addr }
}

/// Sign the transaction in place over its signing-message hash.
pub fn sign_tx(key: &SigningKey, tx: &mut Transaction) {
    let hash = tx.signing_hash();
    let (sig, recid) = key.sign_prehash_recoverable(&hash).expect("sign");
    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&sig.to_bytes());
    bytes[64] = 27 + recid.to_byte();
    let sig = Signature(bytes);
    match tx {
        Transaction::Register(t) => t.sig = sig,
        Transaction::Transfer(t) => t.sig = sig,
        Transaction::Withdraw(t) => t.sig = sig,
    }
}

/// An unsigned placeholder signature.
pub fn zero_sig() -> Signature {
    Signature([0u8; 65])
}

/// A signed register transaction for the account, framed.
pub fn register_tx(acct: &TestAccount) -> Vec<u8> {
    let mut tx = Transaction::Register(RegisterTx {
        addr: acct.addr,
        sig: zero_sig(),
    });
    sign_tx(&acct.key, &mut tx);
    tx.encode()
}

/// An output with no remark.
pub fn output(to: Identifier, value: u64) -> TransferOutput {
    TransferOutput {
        to,
        value: BigUint::from(value),
        remark: Vec::new(),
    }
}

/// A signed transfer, framed.
pub fn transfer_tx(
    signer: &TestAccount,
    from: Identifier,
    outputs: Vec<TransferOutput>,
    fee: u64,
    nonce: u64,
) -> Vec<u8> {
    let mut tx = Transaction::Transfer(TransferTx {
        from,
        outputs,
        fee: BigUint::from(fee),
        nonce,
        sig: zero_sig(),
    });
    sign_tx(&signer.key, &mut tx);
    tx.encode()
}

/// A signed withdraw, framed.
pub fn withdraw_tx(
    signer: &TestAccount,
    from: Identifier,
    to_addr: Address,
    value: u64,
    fee: u64,
    nonce: u64,
) -> Vec<u8> {
    let mut tx = Transaction::Withdraw(WithdrawTx {
        from,
        to_addr,
        value: BigUint::from(value),
        fee: BigUint::from(fee),
        nonce,
        sig: zero_sig(),
    });
    sign_tx(&signer.key, &mut tx);
    tx.encode()
}

/// Deliver a register transaction, asserting success, and return the new ID.
pub fn register_account(app: &mut Application, acct: &TestAccount) -> AccountId {
    let raw = register_tx(acct);
    let r = app.deliver_tx(&raw);
    assert_eq!(r.code, 0, "register failed: {}", r.info);
    AccountId::from_slice(&r.data).expect("20-byte id")
}

/// Provision a balance directly on the working state (genesis-style).
pub fn fund(app: &mut Application, id: &AccountId, amount: u64) {
    account::save_balance(app.working_state(), id, &BigUint::from(amount));
}

/// `account_info` for an identifier string; panics on a query error.
pub fn account_info(app: &Application, identifier: &str) -> AccountInfoRes {
    let res = app.query(QueryRequest {
        path: "account_info",
        data: identifier.as_bytes(),
        height: 0,
    });
    assert_eq!(res.code, 0, "account_info failed: {}", res.info);
    serde_json::from_slice(&res.value).expect("account info json")
}

/// `address_info` for an address string; panics on a query error.
pub fn address_info(app: &Application, address: &str) -> AccountInfoRes {
    let res = app.query(QueryRequest {
        path: "address_info",
        data: address.as_bytes(),
        height: 0,
    });
    assert_eq!(res.code, 0, "address_info failed: {}", res.info);
    serde_json::from_slice(&res.value).expect("address info json")
}

/// `tx_state` status string for a raw transaction blob.
pub fn tx_status(app: &Application, raw: &[u8]) -> String {
    let hash = keccak256(raw);
    let res = app.query(QueryRequest {
        path: "tx_state",
        data: &hash,
        height: 0,
    });
    assert_eq!(res.code, 0, "tx_state failed: {}", res.info);
    let body: TxStateRes = serde_json::from_slice(&res.value).expect("tx state json");
    body.status
}
