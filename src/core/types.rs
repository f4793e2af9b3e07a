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

//! Deterministic core types and canonical encoding helpers.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bincode::Options;
use num_bigint::BigUint;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use thiserror::Error;

/// Canonical serialization error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization")]
    Serialize,
    #[error("deserialization")]
    Deserialize,
    #[error("size limit exceeded")]
    TooLarge,
}

/// Canonical bincode options (deterministic).
fn bincode_opts() -> impl Options {
    // Fixint encoding provides a stable integer representation.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode with deterministic rules. Requires deterministic container ordering (use BTreeMap/BTreeSet).
pub fn encode_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, CodecError> {
    bincode_opts()
        .serialize(v)
        .map_err(|_| CodecError::Serialize)
}

/// Decode with a hard size cap.
pub fn decode_canonical_limited<T: DeserializeOwned>(
    bytes: &[u8],
    max: usize,
) -> Result<T, CodecError> {
    if bytes.len() > max {
        return Err(CodecError::TooLarge);
    }
    bincode_opts()
        .with_limit(max as u64)
        .deserialize(bytes)
        .map_err(|_| CodecError::Deserialize)
}

/// A 20-byte account address: the lower 20 bytes of Keccak-256 of an
/// uncompressed secp256k1 public key. String form is `0x` + 40 hex digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Construct from raw bytes.
    pub fn from_bytes(b: [u8; 20]) -> Self {
        Self(b)
    }

    /// Construct from a slice, if it is exactly 20 bytes.
    pub fn from_slice(b: &[u8]) -> Option<Self> {
        let mut out = [0u8; 20];
        if b.len() != 20 {
            return None;
        }
        out.copy_from_slice(b);
        Some(Self(out))
    }

    /// Parse the `0x`-prefixed hex string form.
    pub fn from_hex(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("0x")?;
        if rest.len() != 40 {
            return None;
        }
        let bytes = hex::decode(rest).ok()?;
        Self::from_slice(&bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// `0x`-prefixed lower-hex string form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A 20-byte internal account ID, assigned at registration as the first 20
/// bytes of Keccak-256 of the raw registration transaction. String form is
/// standard base64 of the 20 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 20]);

impl AccountId {
    /// Construct from raw bytes.
    pub fn from_bytes(b: [u8; 20]) -> Self {
        Self(b)
    }

    /// Construct from a slice, if it is exactly 20 bytes.
    pub fn from_slice(b: &[u8]) -> Option<Self> {
        let mut out = [0u8; 20];
        if b.len() != 20 {
            return None;
        }
        out.copy_from_slice(b);
        Some(Self(out))
    }

    /// Parse the base64 string form.
    pub fn from_base64(s: &str) -> Option<Self> {
        let bytes = BASE64.decode(s).ok()?;
        Self::from_slice(&bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Base64 string form.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// Wire discriminator for an address-form identifier.
pub const IDENTIFIER_TAG_ADDRESS: u8 = 1;
/// Wire discriminator for an internal-ID-form identifier.
pub const IDENTIFIER_TAG_ID: u8 = 2;

/// A tagged account reference: either a bare address or an internal ID.
///
/// Wire form: one discriminator byte followed by the 20-byte payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    /// Address form.
    Addr(Address),
    /// Internal-ID form.
    Id(AccountId),
}

impl Identifier {
    /// Wire form: discriminator + 20 bytes.
    pub fn to_wire(&self) -> [u8; 21] {
        let mut out = [0u8; 21];
        match self {
            Identifier::Addr(a) => {
                out[0] = IDENTIFIER_TAG_ADDRESS;
                out[1..].copy_from_slice(a.as_bytes());
            }
            Identifier::Id(id) => {
                out[0] = IDENTIFIER_TAG_ID;
                out[1..].copy_from_slice(id.as_bytes());
            }
        }
        out
    }

    /// Parse a wire form identifier.
    pub fn from_wire(tag: u8, payload: &[u8]) -> Option<Self> {
        match tag {
            IDENTIFIER_TAG_ADDRESS => Address::from_slice(payload).map(Identifier::Addr),
            IDENTIFIER_TAG_ID => AccountId::from_slice(payload).map(Identifier::Id),
            _ => None,
        }
    }

    /// Parse either string form: `0x` hex address or base64 internal ID.
    pub fn parse_str(s: &str) -> Option<Self> {
        if s.starts_with("0x") {
            return Address::from_hex(s).map(Identifier::Addr);
        }
        AccountId::from_base64(s).map(Identifier::Id)
    }

    /// The address, if this is the address form.
    pub fn as_addr(&self) -> Option<&Address> {
        match self {
            Identifier::Addr(a) => Some(a),
            Identifier::Id(_) => None,
        }
    }

    /// The internal ID, if this is the ID form.
    pub fn as_id(&self) -> Option<&AccountId> {
        match self {
            Identifier::Addr(_) => None,
            Identifier::Id(id) => Some(id),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Addr(a) => a.fmt(f),
            Identifier::Id(id) => id.fmt(f),
        }
    }
}

/// A 65-byte recoverable ECDSA signature, `r || s || v` with v in {27, 28}.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 65]);

impl Signature {
    /// Construct from a slice, if it is exactly 65 bytes.
    pub fn from_slice(b: &[u8]) -> Option<Self> {
        let mut out = [0u8; 65];
        if b.len() != 65 {
            return None;
        }
        out.copy_from_slice(b);
        Some(Self(out))
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The recovery byte v.
    pub fn v(&self) -> u8 {
        self.0[64]
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}

/// Terminal outcome of a delivered transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    /// No terminal outcome recorded.
    NotSet,
    /// Delivered successfully.
    Success,
    /// Delivered and rejected.
    Fail,
}

impl TxStatus {
    /// One-byte storage form.
    pub fn to_byte(self) -> u8 {
        match self {
            TxStatus::NotSet => 0,
            TxStatus::Success => 1,
            TxStatus::Fail => 2,
        }
    }

    /// Decode from stored bytes; absent or unrecognized bytes mean NotSet.
    pub fn from_bytes(b: Option<&[u8]>) -> Self {
        match b {
            Some([1]) => TxStatus::Success,
            Some([2]) => TxStatus::Fail,
            _ => TxStatus::NotSet,
        }
    }
}

/// Canonical big-integer bytes: minimal big-endian, zero encodes as empty.
pub fn biguint_to_canonical(v: &BigUint) -> Vec<u8> {
    let bytes = v.to_bytes_be();
    if bytes == [0] {
        return Vec::new();
    }
    bytes
}

/// Decode canonical big-integer bytes. Rejects a leading zero byte.
pub fn biguint_from_canonical(bytes: &[u8]) -> Option<BigUint> {
    if bytes.first() == Some(&0) {
        return None;
    }
    Some(BigUint::from_bytes_be(bytes))
}
