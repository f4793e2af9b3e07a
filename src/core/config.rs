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

//! Engine configuration.

use serde::{Deserialize, Serialize};

fn default_cache_size() -> u64 {
    64 * 1024 * 1024
}

/// Storage configuration for the two versioned trees.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the trees' storage backend.
    pub db_path: String,
    /// In-memory cache capacity for the backend, in bytes. 0 = backend default.
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,
    /// Version retention window. 0 or unset = retain all versions.
    #[serde(default)]
    pub keep_blocks: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "./data".to_string(),
            cache_size: default_cache_size(),
            keep_blocks: 0,
        }
    }
}

impl StorageConfig {
    /// Read the configuration from `EMBER_DB_PATH`, `EMBER_CACHE_SIZE` and
    /// `EMBER_KEEP_BLOCKS`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("EMBER_DB_PATH") {
            if !v.trim().is_empty() {
                cfg.db_path = v;
            }
        }
        if let Some(v) = env_u64("EMBER_CACHE_SIZE") {
            cfg.cache_size = v;
        }
        if let Some(v) = env_u64("EMBER_KEEP_BLOCKS") {
            cfg.keep_blocks = v;
        }
        cfg
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
