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

//! Account model over the state tree.
//!
//! Key layout (all byte strings, raw 20-byte ids/addresses embedded):
//! - `acc/<id>/balance`    canonical big-int bytes
//! - `acc/<id>/nextNonce`  8-byte big-endian
//! - `acc/<id>/addr/<addr>` membership marker
//! - `addr/<addr>/id`      reverse lookup
//! - `addr/<addr>/unclaimed` balance credited before registration
//! - `tx/<txHash>/status`  1-byte terminal outcome
//!
//! The prefixes are disjoint by construction.

use num_bigint::BigUint;

use crate::core::state::{KvRead, KvWrite};
use crate::core::types::{
    biguint_from_canonical, biguint_to_canonical, AccountId, Address, Identifier, TxStatus,
};

fn balance_key(id: &AccountId) -> Vec<u8> {
    let mut k = b"acc/".to_vec();
    k.extend_from_slice(id.as_bytes());
    k.extend_from_slice(b"/balance");
    k
}

fn next_nonce_key(id: &AccountId) -> Vec<u8> {
    let mut k = b"acc/".to_vec();
    k.extend_from_slice(id.as_bytes());
    k.extend_from_slice(b"/nextNonce");
    k
}

fn binding_key(id: &AccountId, addr: &Address) -> Vec<u8> {
    let mut k = b"acc/".to_vec();
    k.extend_from_slice(id.as_bytes());
    k.extend_from_slice(b"/addr/");
    k.extend_from_slice(addr.as_bytes());
    k
}

fn address_id_key(addr: &Address) -> Vec<u8> {
    let mut k = b"addr/".to_vec();
    k.extend_from_slice(addr.as_bytes());
    k.extend_from_slice(b"/id");
    k
}

fn unclaimed_key(addr: &Address) -> Vec<u8> {
    let mut k = b"addr/".to_vec();
    k.extend_from_slice(addr.as_bytes());
    k.extend_from_slice(b"/unclaimed");
    k
}

fn status_key(tx_hash: &[u8]) -> Vec<u8> {
    let mut k = b"tx/".to_vec();
    k.extend_from_slice(tx_hash);
    k.extend_from_slice(b"/status");
    k
}

/// The internal ID an address is bound to, if any.
pub fn address_id(state: &impl KvRead, addr: &Address) -> Option<AccountId> {
    state
        .get(&address_id_key(addr))
        .and_then(|v| AccountId::from_slice(&v))
}

/// Whether an account exists for this ID.
pub fn account_exists(state: &impl KvRead, id: &AccountId) -> bool {
    state.get(&next_nonce_key(id)).is_some()
}

/// Resolve an identifier to its internal ID.
///
/// Address form resolves through the reverse index; ID form passes through
/// iff the account exists. `None` means "unregistered".
pub fn identifier_to_id(state: &impl KvRead, iden: &Identifier) -> Option<AccountId> {
    match iden {
        Identifier::Addr(addr) => address_id(state, addr),
        Identifier::Id(id) => account_exists(state, id).then_some(*id),
    }
}

/// Whether `addr` is bound to the account `id`.
pub fn id_has_address(state: &impl KvRead, id: &AccountId, addr: &Address) -> bool {
    state.get(&binding_key(id, addr)).is_some()
}

/// Account balance; absent means zero.
pub fn fetch_balance(state: &impl KvRead, id: &AccountId) -> BigUint {
    state
        .get(&balance_key(id))
        .and_then(|v| biguint_from_canonical(&v))
        .unwrap_or_default()
}

/// Overwrite the account balance.
pub fn save_balance(state: &mut impl KvWrite, id: &AccountId, balance: &BigUint) {
    state.set(balance_key(id), biguint_to_canonical(balance));
}

/// Credit an account.
pub fn add_balance(state: &mut impl KvWrite, id: &AccountId, amount: &BigUint) {
    let balance = fetch_balance(state, id) + amount;
    save_balance(state, id, &balance);
}

/// Debit an account. Returns false (and leaves the balance untouched) if the
/// balance is insufficient; callers validate before mutating, so a false here
/// is a handler bug surfacing, not a user error.
pub fn minus_balance(state: &mut impl KvWrite, id: &AccountId, amount: &BigUint) -> bool {
    let balance = fetch_balance(state, id);
    if balance < *amount {
        return false;
    }
    save_balance(state, id, &(balance - amount));
    true
}

/// Next expected nonce for the account; accounts start at 1.
pub fn fetch_next_nonce(state: &impl KvRead, id: &AccountId) -> u64 {
    state
        .get(&next_nonce_key(id))
        .and_then(|v| v.try_into().ok().map(u64::from_be_bytes))
        .unwrap_or(1)
}

/// Store the next expected nonce.
pub fn save_next_nonce(state: &mut impl KvWrite, id: &AccountId, nonce: u64) {
    state.set(next_nonce_key(id), nonce.to_be_bytes().to_vec());
}

/// Consume the current nonce slot.
pub fn increment_next_nonce(state: &mut impl KvWrite, id: &AccountId) {
    let next = fetch_next_nonce(state, id).saturating_add(1);
    save_next_nonce(state, id, next);
}

/// Balance held against a bare address before its registration.
pub fn unclaimed_balance(state: &impl KvRead, addr: &Address) -> BigUint {
    state
        .get(&unclaimed_key(addr))
        .and_then(|v| biguint_from_canonical(&v))
        .unwrap_or_default()
}

/// Credit the unclaimed slot of a bare address.
pub fn add_unclaimed_balance(state: &mut impl KvWrite, addr: &Address, amount: &BigUint) {
    let balance = unclaimed_balance(state, addr) + amount;
    state.set(unclaimed_key(addr), biguint_to_canonical(&balance));
}

/// Create a fresh account bound to `addr`, adopting any unclaimed balance
/// held against that address.
pub fn new_account(state: &mut impl KvWrite, id: &AccountId, addr: &Address) {
    let inherited = unclaimed_balance(state, addr);
    state.delete(&unclaimed_key(addr));

    save_balance(state, id, &inherited);
    save_next_nonce(state, id, 1);
    state.set(binding_key(id, addr), vec![1]);
    state.set(address_id_key(addr), id.as_bytes().to_vec());
}

/// Terminal status recorded for a transaction hash.
pub fn get_status(state: &impl KvRead, tx_hash: &[u8]) -> TxStatus {
    TxStatus::from_bytes(state.get(&status_key(tx_hash)).as_deref())
}

/// Record the terminal status for a transaction hash.
pub fn set_status(state: &mut impl KvWrite, tx_hash: &[u8], status: TxStatus) {
    state.set(status_key(tx_hash), vec![status.to_byte()]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::tree::VersionedTree;

    fn temp_tree() -> VersionedTree {
        let db = sled::Config::new().temporary(true).open().unwrap();
        VersionedTree::open(db, "state").unwrap()
    }

    fn id(b: u8) -> AccountId {
        AccountId::from_bytes([b; 20])
    }

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn new_account_binds_and_starts_at_nonce_one() {
        let mut state = temp_tree();
        new_account(&mut state, &id(1), &addr(2));
        assert_eq!(fetch_next_nonce(&state, &id(1)), 1);
        assert_eq!(fetch_balance(&state, &id(1)), BigUint::from(0u32));
        assert_eq!(address_id(&state, &addr(2)), Some(id(1)));
        assert!(id_has_address(&state, &id(1), &addr(2)));
        assert!(!id_has_address(&state, &id(1), &addr(3)));
    }

    #[test]
    fn new_account_adopts_unclaimed_balance() {
        let mut state = temp_tree();
        add_unclaimed_balance(&mut state, &addr(2), &BigUint::from(7u32));
        new_account(&mut state, &id(1), &addr(2));
        assert_eq!(fetch_balance(&state, &id(1)), BigUint::from(7u32));
        assert_eq!(unclaimed_balance(&state, &addr(2)), BigUint::from(0u32));
    }

    #[test]
    fn identifier_resolution_requires_existing_account() {
        let mut state = temp_tree();
        assert_eq!(identifier_to_id(&state, &Identifier::Id(id(1))), None);
        new_account(&mut state, &id(1), &addr(2));
        assert_eq!(
            identifier_to_id(&state, &Identifier::Id(id(1))),
            Some(id(1))
        );
        assert_eq!(
            identifier_to_id(&state, &Identifier::Addr(addr(2))),
            Some(id(1))
        );
        assert_eq!(identifier_to_id(&state, &Identifier::Addr(addr(9))), None);
    }

    #[test]
    fn minus_balance_refuses_overdraft() {
        let mut state = temp_tree();
        new_account(&mut state, &id(1), &addr(2));
        save_balance(&mut state, &id(1), &BigUint::from(10u32));
        assert!(!minus_balance(&mut state, &id(1), &BigUint::from(11u32)));
        assert_eq!(fetch_balance(&state, &id(1)), BigUint::from(10u32));
        assert!(minus_balance(&mut state, &id(1), &BigUint::from(10u32)));
        assert_eq!(fetch_balance(&state, &id(1)), BigUint::from(0u32));
    }

    #[test]
    fn status_keys_do_not_collide_with_account_keys() {
        let mut state = temp_tree();
        let hash = [0xaa; 32];
        set_status(&mut state, &hash, TxStatus::Success);
        assert_eq!(get_status(&state, &hash), TxStatus::Success);
        assert_eq!(get_status(&state, &[0xbb; 32]), TxStatus::NotSet);
        // An account whose raw id begins like a status key still resolves.
        new_account(&mut state, &id(0xaa), &addr(0xcc));
        assert_eq!(get_status(&state, &hash), TxStatus::Success);
    }
}
