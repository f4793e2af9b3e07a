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

use prometheus::{IntCounter, IntGauge, Registry};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Last committed block height.
    pub block_height: IntGauge,
    /// Total transactions delivered.
    pub txs_delivered_total: IntCounter,
    /// Delivered transactions with a non-zero code.
    pub txs_failed_total: IntCounter,
    /// Queries served.
    pub queries_total: IntCounter,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let block_height = IntGauge::new("emberchain_block_height", "Last committed block height")
            .map_err(|_| MetricsError::Prom)?;
        let txs_delivered_total =
            IntCounter::new("emberchain_txs_delivered_total", "Total tx delivered")
                .map_err(|_| MetricsError::Prom)?;
        let txs_failed_total = IntCounter::new(
            "emberchain_txs_failed_total",
            "Delivered tx with non-zero code",
        )
        .map_err(|_| MetricsError::Prom)?;
        let queries_total = IntCounter::new("emberchain_queries_total", "Queries served")
            .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(block_height.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(txs_delivered_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(txs_failed_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(queries_total.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            block_height,
            txs_delivered_total,
            txs_failed_total,
            queries_total,
        })
    }
}
