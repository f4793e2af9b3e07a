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

mod common;

use common::*;
use emberchain::core::app::Application;
use emberchain::core::types::{AccountId, Identifier};
use num_bigint::BigUint;
use proptest::prelude::*;

const ACCOUNTS: usize = 3;

/// A scripted run: register three accounts with the given balances, commit,
/// then deliver the scripted transfers in order and commit again.
fn run_script(
    balances: &[u64; ACCOUNTS],
    transfers: &[(u8, u8, u64)],
) -> (Application, Vec<AccountId>, [u64; ACCOUNTS]) {
    let mut app = Application::open_temporary(0).expect("open temporary engine");
    app.init_chain();

    let accounts: Vec<TestAccount> = (0..ACCOUNTS as u8).map(|i| test_account(10 + i)).collect();
    let mut ids = Vec::new();
    app.begin_block(1);
    for (acct, balance) in accounts.iter().zip(balances) {
        let id = register_account(&mut app, acct);
        fund(&mut app, &id, *balance);
        ids.push(id);
    }
    app.end_block(1);
    app.commit();

    let mut nonces = [1u64; ACCOUNTS];
    app.begin_block(2);
    for &(from, to, value) in transfers {
        let from = from as usize % ACCOUNTS;
        let to = to as usize % ACCOUNTS;
        let raw = transfer_tx(
            &accounts[from],
            Identifier::Id(ids[from]),
            vec![output(Identifier::Id(ids[to]), value)],
            0,
            nonces[from],
        );
        // Any outcome is acceptable; a correct-nonce delivery consumes the
        // slot whether or not the balance sufficed.
        let r = app.deliver_tx(&raw);
        if r.code != emberchain::core::response::code::TRANSFER_INVALID_NONCE {
            nonces[from] += 1;
        }
    }
    app.end_block(2);
    app.commit();

    (app, ids, nonces)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_app_hash_deterministic(
        balances in proptest::array::uniform3(0u64..1_000),
        transfers in proptest::collection::vec((any::<u8>(), any::<u8>(), 0u64..500), 0..12),
    ) {
        let (app1, _, _) = run_script(&balances, &transfers);
        let (app2, _, _) = run_script(&balances, &transfers);
        prop_assert_eq!(app1.info().app_hash, app2.info().app_hash);
        prop_assert_eq!(app1.info().last_block_height, app2.info().last_block_height);
    }

    #[test]
    fn prop_transfers_conserve_total_value(
        balances in proptest::array::uniform3(0u64..1_000),
        transfers in proptest::collection::vec((any::<u8>(), any::<u8>(), 0u64..500), 0..12),
    ) {
        let (app, ids, _) = run_script(&balances, &transfers);
        let total: BigUint = ids
            .iter()
            .map(|id| {
                account_info(&app, &id.to_base64())
                    .balance
                    .parse::<BigUint>()
                    .expect("decimal balance")
            })
            .sum();
        let funded: BigUint = balances.iter().map(|b| BigUint::from(*b)).sum();
        prop_assert_eq!(total, funded);
    }

    #[test]
    fn prop_nonces_are_contiguous_and_monotonic(
        balances in proptest::array::uniform3(0u64..1_000),
        transfers in proptest::collection::vec((any::<u8>(), any::<u8>(), 0u64..500), 0..12),
    ) {
        let (app, ids, nonces) = run_script(&balances, &transfers);
        // Every correct-nonce delivery consumed exactly one slot, so the
        // committed next-nonce matches the scripted count.
        for (id, expected) in ids.iter().zip(nonces) {
            prop_assert_eq!(account_info(&app, &id.to_base64()).next_nonce, expected);
        }
    }
}
