/// Esplora HTTP client
///
/// Leaf I/O for the watcher: per-address transaction lists and
/// confirmed balances. Addresses are validated before any network
/// round trip.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::WatcherError;
use crate::esplora::types::{AddressStats, TxSummary};
use crate::validate::is_valid_address;

/// Source of an address's incoming transactions.
///
/// The poller depends on this seam rather than on the HTTP client
/// directly, so tests can substitute a scripted implementation.
#[async_trait]
pub trait TxFetcher: Send + Sync {
    /// Fetch all transactions touching `address`. An empty list is a
    /// valid result, not an error.
    async fn fetch_transactions(&self, address: &str) -> Result<Vec<TxSummary>, WatcherError>;
}

pub struct EsploraClient {
    client: reqwest::Client,
    base_url: String,
}

impl EsploraClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WatcherError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WatcherError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Confirmed balance in satoshis (funded minus spent)
    pub async fn get_balance(&self, address: &str) -> Result<u64, WatcherError> {
        let address = address.trim();
        if !is_valid_address(address) {
            return Err(WatcherError::InvalidAddress(address.to_string()));
        }

        let url = format!("{}/address/{}", self.base_url, address);
        let body = self.get_text(&url).await?;
        let stats: AddressStats = serde_json::from_str(&body)
            .map_err(|e| WatcherError::Upstream(format!("malformed address stats: {}", e)))?;

        Ok(stats
            .chain_stats
            .funded_txo_sum
            .saturating_sub(stats.chain_stats.spent_txo_sum))
    }

    async fn get_text(&self, url: &str) -> Result<String, WatcherError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WatcherError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WatcherError::Upstream(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| WatcherError::Upstream(e.to_string()))
    }
}

#[async_trait]
impl TxFetcher for EsploraClient {
    async fn fetch_transactions(&self, address: &str) -> Result<Vec<TxSummary>, WatcherError> {
        let address = address.trim();
        if !is_valid_address(address) {
            return Err(WatcherError::InvalidAddress(address.to_string()));
        }

        let url = format!("{}/address/{}/txs", self.base_url, address);
        let body = self.get_text(&url).await?;
        let txs: Vec<TxSummary> = serde_json::from_str(&body)
            .map_err(|e| WatcherError::Upstream(format!("malformed transaction list: {}", e)))?;

        log::debug!("Fetched {} transactions for {}", txs.len(), address);
        Ok(txs)
    }
}
