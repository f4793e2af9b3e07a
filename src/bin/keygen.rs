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

//! Generate a secp256k1 account key and print its ledger address.

use anyhow::Result;
use k256::ecdsa::SigningKey;
use rand_core::OsRng;

use emberchain::core::crypto::address_from_verifying_key;

fn main() -> Result<()> {
    let key = SigningKey::random(&mut OsRng);
    let addr = address_from_verifying_key(key.verifying_key());

    println!("secret: {}", hex::encode(key.to_bytes()));
    println!("address: {addr}");
    Ok(())
}
