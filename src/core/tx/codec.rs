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

//! Canonical binary reader/writer for the transaction wire format.
//!
//! All integers are big-endian. Big integers are `u16 length || minimal
//! big-endian bytes` (zero encodes as length 0; a leading zero byte is
//! rejected). Variable byte strings are `u32 length || bytes`.

use num_bigint::BigUint;
use thiserror::Error;

use crate::core::types::{biguint_from_canonical, biguint_to_canonical, Identifier, Signature};

/// Wire decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("trailing bytes after transaction")]
    TrailingBytes,
    #[error("unknown tag")]
    UnknownTag,
    #[error("non-canonical integer encoding")]
    NonCanonicalInt,
    #[error("malformed field")]
    Malformed,
}

/// Canonical wire writer.
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Fresh writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish and take the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Append a single byte.
    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Append a big-endian u16.
    pub fn put_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian u32.
    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian u64.
    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append raw bytes with no length prefix.
    pub fn put_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a u32-length-prefixed byte string.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.put_u32(bytes.len() as u32);
        self.put_raw(bytes);
    }

    /// Append a canonical big integer (`u16 length || bytes`).
    pub fn put_biguint(&mut self, v: &BigUint) {
        let bytes = biguint_to_canonical(v);
        self.put_u16(bytes.len() as u16);
        self.put_raw(&bytes);
    }

    /// Append an identifier in wire form.
    pub fn put_identifier(&mut self, iden: &Identifier) {
        self.put_raw(&iden.to_wire());
    }

    /// Append a 65-byte signature.
    pub fn put_signature(&mut self, sig: &Signature) {
        self.put_raw(sig.as_bytes());
    }
}

/// Canonical wire reader over a borrowed buffer.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Reader over the full buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Take `n` raw bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self.pos.checked_add(n).ok_or(WireError::UnexpectedEnd)?;
        if end > self.buf.len() {
            return Err(WireError::UnexpectedEnd);
        }
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    /// Read a single byte.
    pub fn u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian u16.
    pub fn u16(&mut self) -> Result<u16, WireError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a big-endian u32.
    pub fn u32(&mut self) -> Result<u32, WireError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian u64.
    pub fn u64(&mut self) -> Result<u64, WireError> {
        let b = self.take(8)?;
        let mut out = [0u8; 8];
        out.copy_from_slice(b);
        Ok(u64::from_be_bytes(out))
    }

    /// Read a u32-length-prefixed byte string.
    pub fn bytes(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.u32()? as usize;
        self.take(len)
    }

    /// Read a canonical big integer.
    pub fn biguint(&mut self) -> Result<BigUint, WireError> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        biguint_from_canonical(bytes).ok_or(WireError::NonCanonicalInt)
    }

    /// Read an identifier in wire form.
    pub fn identifier(&mut self) -> Result<Identifier, WireError> {
        let tag = self.u8()?;
        let payload = self.take(20)?;
        Identifier::from_wire(tag, payload).ok_or(WireError::Malformed)
    }

    /// Read a 65-byte signature.
    pub fn signature(&mut self) -> Result<Signature, WireError> {
        Signature::from_slice(self.take(65)?).ok_or(WireError::Malformed)
    }

    /// Assert the buffer is fully consumed.
    pub fn finish(&self) -> Result<(), WireError> {
        if self.pos != self.buf.len() {
            return Err(WireError::TrailingBytes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AccountId, Address};

    #[test]
    fn integers_round_trip_big_endian() {
        let mut w = Writer::new();
        w.put_u16(0x0102);
        w.put_u32(0x03040506);
        w.put_u64(0x0708090a0b0c0d0e);
        let bytes = w.into_bytes();
        assert_eq!(bytes[0..2], [1, 2]);

        let mut r = Reader::new(&bytes);
        assert_eq!(r.u16().unwrap(), 0x0102);
        assert_eq!(r.u32().unwrap(), 0x03040506);
        assert_eq!(r.u64().unwrap(), 0x0708090a0b0c0d0e);
        r.finish().unwrap();
    }

    #[test]
    fn biguint_round_trips_and_rejects_padding() {
        let mut w = Writer::new();
        w.put_biguint(&BigUint::from(0u32));
        w.put_biguint(&BigUint::from(0x1234u32));
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        assert_eq!(r.biguint().unwrap(), BigUint::from(0u32));
        assert_eq!(r.biguint().unwrap(), BigUint::from(0x1234u32));
        r.finish().unwrap();

        // Length 2, leading zero byte: non-canonical.
        let padded = [0u8, 2, 0, 1];
        let mut r = Reader::new(&padded);
        assert_eq!(r.biguint(), Err(WireError::NonCanonicalInt));
    }

    #[test]
    fn identifier_round_trips() {
        let iden = Identifier::Id(AccountId::from_bytes([3; 20]));
        let mut w = Writer::new();
        w.put_identifier(&iden);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(r.identifier().unwrap(), iden);

        let iden = Identifier::Addr(Address::from_bytes([4; 20]));
        let mut w = Writer::new();
        w.put_identifier(&iden);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(r.identifier().unwrap(), iden);
    }

    #[test]
    fn truncated_input_is_rejected() {
        let mut w = Writer::new();
        w.put_bytes(b"hello");
        let mut bytes = w.into_bytes();
        bytes.pop();
        let mut r = Reader::new(&bytes);
        assert_eq!(r.bytes().unwrap_err(), WireError::UnexpectedEnd);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let bytes = [1u8, 2, 3];
        let mut r = Reader::new(&bytes);
        r.u16().unwrap();
        assert_eq!(r.finish(), Err(WireError::TrailingBytes));
    }
}
