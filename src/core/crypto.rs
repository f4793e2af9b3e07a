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

//! Keccak-256 hashing and secp256k1 ECDSA signature recovery.
//!
//! An address is the lower 20 bytes of Keccak-256 of the uncompressed public
//! key (without the 0x04 prefix). Recovery accepts v in {27, 28} only.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use sha3::{Digest, Keccak256};
use thiserror::Error;
use zeroize::Zeroize;

use crate::core::types::{Address, Signature};

/// Recovery errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid recovery byte")]
    InvalidRecoveryByte,
    #[error("invalid signature scalars")]
    InvalidSignature,
    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Address derived from a verifying key: Keccak-256 of the uncompressed
/// point without its 0x04 prefix, lower 20 bytes.
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    Address::from_bytes(out)
}

/// Recover the signer address from a 32-byte message hash and a 65-byte
/// `r || s || v` signature.
pub fn recover_address(hash: &[u8; 32], sig: &Signature) -> Result<Address, CryptoError> {
    let v = sig.v();
    if v != 27 && v != 28 {
        return Err(CryptoError::InvalidRecoveryByte);
    }
    let recovery_id =
        RecoveryId::from_byte(v - 27).ok_or(CryptoError::InvalidRecoveryByte)?;

    let mut scalars = [0u8; 64];
    scalars.copy_from_slice(&sig.as_bytes()[..64]);
    let parsed = EcdsaSignature::from_slice(&scalars);
    scalars.zeroize();
    let parsed = parsed.map_err(|_| CryptoError::InvalidSignature)?;

    let key = VerifyingKey::recover_from_prehash(hash, &parsed, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(address_from_verifying_key(&key))
}
