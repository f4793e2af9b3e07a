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

//! Transaction framing, hashing and signing-message derivation.
//!
//! A transaction is a tagged union: one kind byte followed by the kind's
//! fields in a fixed order, the 65-byte signature always last. The canonical
//! transaction hash is Keccak-256 of the framed bytes; the signing-message
//! hash is Keccak-256 of the framed bytes with the signature field zeroed.

/// Canonical binary reader/writer.
pub mod codec;

use num_bigint::BigUint;

use crate::core::crypto::keccak256;
use crate::core::types::{Address, Identifier, Signature};
use codec::{Reader, WireError, Writer};

/// Wire tag for Register.
pub const TAG_REGISTER: u8 = 1;
/// Wire tag for Transfer.
pub const TAG_TRANSFER: u8 = 2;
/// Wire tag for Withdraw.
pub const TAG_WITHDRAW: u8 = 3;
/// Reserved wire tag for the (undefined) Deposit kind.
pub const TAG_DEPOSIT: u8 = 4;

/// Hard cap on the raw transaction blob handed in by the consensus host.
pub const MAX_TX_SIZE: usize = 512 * 1024;

const SIG_LEN: usize = 65;

/// Binds a new address to a fresh internal account ID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterTx {
    /// The registering address.
    pub addr: Address,
    /// Recoverable signature by that address.
    pub sig: Signature,
}

/// One transfer output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferOutput {
    /// Receiver.
    pub to: Identifier,
    /// Transferred value.
    pub value: BigUint,
    /// Free-form remark, at most 4096 bytes.
    pub remark: Vec<u8>,
}

/// Moves value from the sender to one or more receivers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferTx {
    /// Sender.
    pub from: Identifier,
    /// Ordered outputs.
    pub outputs: Vec<TransferOutput>,
    /// Fee debited from the sender.
    pub fee: BigUint,
    /// Sender nonce, >= 1.
    pub nonce: u64,
    /// Recoverable signature.
    pub sig: Signature,
}

/// Records an external withdrawal with a provable ledger entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawTx {
    /// Sender.
    pub from: Identifier,
    /// External destination address.
    pub to_addr: Address,
    /// Withdrawn value.
    pub value: BigUint,
    /// Fee debited from the sender.
    pub fee: BigUint,
    /// Sender nonce, >= 1.
    pub nonce: u64,
    /// Recoverable signature.
    pub sig: Signature,
}

/// The transaction tagged union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    /// Register a new account.
    Register(RegisterTx),
    /// Transfer value.
    Transfer(TransferTx),
    /// Withdraw value to an external chain.
    Withdraw(WithdrawTx),
}

impl Transaction {
    /// Encode to the canonical framed bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        match self {
            Transaction::Register(tx) => {
                w.put_u8(TAG_REGISTER);
                w.put_raw(tx.addr.as_bytes());
                w.put_signature(&tx.sig);
            }
            Transaction::Transfer(tx) => {
                w.put_u8(TAG_TRANSFER);
                w.put_identifier(&tx.from);
                w.put_u16(tx.outputs.len() as u16);
                for out in &tx.outputs {
                    w.put_identifier(&out.to);
                    w.put_biguint(&out.value);
                    w.put_bytes(&out.remark);
                }
                w.put_biguint(&tx.fee);
                w.put_u64(tx.nonce);
                w.put_signature(&tx.sig);
            }
            Transaction::Withdraw(tx) => {
                w.put_u8(TAG_WITHDRAW);
                w.put_identifier(&tx.from);
                w.put_raw(tx.to_addr.as_bytes());
                w.put_biguint(&tx.value);
                w.put_biguint(&tx.fee);
                w.put_u64(tx.nonce);
                w.put_signature(&tx.sig);
            }
        }
        w.into_bytes()
    }

    /// Decode framed bytes. The buffer must contain exactly one transaction.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() > MAX_TX_SIZE {
            return Err(WireError::Malformed);
        }
        let mut r = Reader::new(bytes);
        let tx = match r.u8()? {
            TAG_REGISTER => {
                let addr =
                    Address::from_slice(r.take(20)?).ok_or(WireError::Malformed)?;
                let sig = r.signature()?;
                Transaction::Register(RegisterTx { addr, sig })
            }
            TAG_TRANSFER => {
                let from = r.identifier()?;
                let count = r.u16()? as usize;
                let mut outputs = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let to = r.identifier()?;
                    let value = r.biguint()?;
                    let remark = r.bytes()?.to_vec();
                    outputs.push(TransferOutput { to, value, remark });
                }
                let fee = r.biguint()?;
                let nonce = r.u64()?;
                let sig = r.signature()?;
                Transaction::Transfer(TransferTx {
                    from,
                    outputs,
                    fee,
                    nonce,
                    sig,
                })
            }
            TAG_WITHDRAW => {
                let from = r.identifier()?;
                let to_addr =
                    Address::from_slice(r.take(20)?).ok_or(WireError::Malformed)?;
                let value = r.biguint()?;
                let fee = r.biguint()?;
                let nonce = r.u64()?;
                let sig = r.signature()?;
                Transaction::Withdraw(WithdrawTx {
                    from,
                    to_addr,
                    value,
                    fee,
                    nonce,
                    sig,
                })
            }
            _ => return Err(WireError::UnknownTag),
        };
        r.finish()?;
        Ok(tx)
    }

    /// Canonical transaction hash: Keccak-256 of the framed bytes.
    pub fn hash(&self) -> [u8; 32] {
        keccak256(&self.encode())
    }

    /// Signing-message hash: Keccak-256 of the framed bytes with the
    /// trailing signature field zeroed.
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut bytes = self.encode();
        let len = bytes.len();
        for b in &mut bytes[len - SIG_LEN..] {
            *b = 0;
        }
        keccak256(&bytes)
    }
}

impl WithdrawTx {
    /// Canonical packed withdraw record:
    /// `from(wire) || to_addr || value || nonce || fee`.
    ///
    /// These bytes are the withdraw-tree key, returned in `DeliverTx.Data`
    /// and echoed back by clients requesting a proof.
    pub fn pack(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_identifier(&self.from);
        w.put_raw(self.to_addr.as_bytes());
        w.put_biguint(&self.value);
        w.put_u64(self.nonce);
        w.put_biguint(&self.fee);
        w.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AccountId;

    fn sig(fill: u8) -> Signature {
        Signature([fill; 65])
    }

    fn sample_transfer() -> Transaction {
        Transaction::Transfer(TransferTx {
            from: Identifier::Id(AccountId::from_bytes([1; 20])),
            outputs: vec![
                TransferOutput {
                    to: Identifier::Addr(Address::from_bytes([2; 20])),
                    value: BigUint::from(100u32),
                    remark: b"coffee".to_vec(),
                },
                TransferOutput {
                    to: Identifier::Id(AccountId::from_bytes([3; 20])),
                    value: BigUint::from(0u32),
                    remark: Vec::new(),
                },
            ],
            fee: BigUint::from(1u32),
            nonce: 7,
            sig: sig(0xcd),
        })
    }

    #[test]
    fn transfer_round_trips() {
        let tx = sample_transfer();
        let bytes = tx.encode();
        assert_eq!(Transaction::decode(&bytes).unwrap(), tx);
    }

    #[test]
    fn register_and_withdraw_round_trip() {
        let reg = Transaction::Register(RegisterTx {
            addr: Address::from_bytes([5; 20]),
            sig: sig(0xab),
        });
        assert_eq!(Transaction::decode(&reg.encode()).unwrap(), reg);

        let wd = Transaction::Withdraw(WithdrawTx {
            from: Identifier::Id(AccountId::from_bytes([1; 20])),
            to_addr: Address::from_bytes([6; 20]),
            value: BigUint::from(42u32),
            fee: BigUint::from(1u32),
            nonce: 3,
            sig: sig(0xef),
        });
        assert_eq!(Transaction::decode(&wd.encode()).unwrap(), wd);
    }

    #[test]
    fn unknown_and_reserved_tags_are_rejected() {
        assert_eq!(Transaction::decode(&[0xff]), Err(WireError::UnknownTag));
        // Deposit is scaffolded but undefined; its tag does not decode.
        assert_eq!(
            Transaction::decode(&[TAG_DEPOSIT, 0, 0]),
            Err(WireError::UnknownTag)
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = sample_transfer().encode();
        bytes.push(0);
        assert_eq!(Transaction::decode(&bytes), Err(WireError::TrailingBytes));
    }

    #[test]
    fn signing_hash_ignores_the_signature() {
        let tx = sample_transfer();
        let mut other = tx.clone();
        if let Transaction::Transfer(t) = &mut other {
            t.sig = sig(0x11);
        }
        assert_eq!(tx.signing_hash(), other.signing_hash());
        assert_ne!(tx.hash(), other.hash());
    }

    #[test]
    fn packed_withdraw_differs_per_field() {
        let base = WithdrawTx {
            from: Identifier::Id(AccountId::from_bytes([1; 20])),
            to_addr: Address::from_bytes([2; 20]),
            value: BigUint::from(5u32),
            fee: BigUint::from(0u32),
            nonce: 1,
            sig: sig(0),
        };
        let mut other = base.clone();
        other.nonce = 2;
        assert_ne!(base.pack(), other.pack());
        // The signature is not part of the packed record.
        let mut signed = base.clone();
        signed.sig = sig(9);
        assert_eq!(base.pack(), signed.pack());
    }
}
