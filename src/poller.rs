/// Polling orchestration
///
/// Walks the externally supplied per-network worklists, fetches
/// transaction data for addresses whose throttle has expired, and
/// republishes the ledger once per cycle that changed anything.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::esplora::client::TxFetcher;
use crate::ledger::AddressLedger;

/// Wall-clock seconds source, injectable for tests
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// One worklist entry: the invoice address to watch plus an opaque
/// reference to the sale it belongs to
#[derive(Clone, Debug)]
pub struct WatchTarget {
    pub address: String,
    pub reference: String,
}

/// Addresses to monitor, grouped by sale key, per network. Supplied by
/// the embedding application on every cycle and treated as read-only.
#[derive(Clone, Debug, Default)]
pub struct Worklists {
    pub mainnet: BTreeMap<String, Vec<WatchTarget>>,
    pub testnet: BTreeMap<String, Vec<WatchTarget>>,
}

pub struct PaymentPoller {
    fetcher: Arc<dyn TxFetcher>,
    clock: Arc<dyn Clock>,
}

impl PaymentPoller {
    pub fn new(fetcher: Arc<dyn TxFetcher>, clock: Arc<dyn Clock>) -> Self {
        Self { fetcher, clock }
    }

    /// One polling cycle. Mainnet and testnet are processed
    /// concurrently; the ledger is re-published at most once, after
    /// both finish. Returns whether any address's data changed.
    ///
    /// Must not be invoked reentrantly for the same ledger: the
    /// throttle's check-then-attempt sequence is what prevents
    /// duplicate in-flight fetches for one address.
    pub async fn poll(&self, worklists: &Worklists, ledger: &AddressLedger) -> bool {
        let (mainnet, testnet) = tokio::join!(
            self.poll_network("mainnet", &worklists.mainnet, ledger),
            self.poll_network("testnet", &worklists.testnet, ledger),
        );

        let changed = mainnet || testnet;
        if changed {
            ledger.publish();
        }
        changed
    }

    async fn poll_network(
        &self,
        network: &str,
        groups: &BTreeMap<String, Vec<WatchTarget>>,
        ledger: &AddressLedger,
    ) -> bool {
        let mut changed = false;
        for targets in groups.values() {
            for target in targets {
                if self.poll_address(network, &target.address, ledger).await {
                    changed = true;
                }
            }
        }
        changed
    }

    /// Returns true when the address's stored data changed
    async fn poll_address(&self, network: &str, address: &str, ledger: &AddressLedger) -> bool {
        let address = address.trim();
        ledger.ensure(address);

        let now = self.clock.now_unix();
        if !ledger.is_due(address, now) {
            return false;
        }
        // Advances whether or not the fetch succeeds, so a failing
        // address cannot hot-loop
        ledger.record_attempt(address, now);

        match self.fetcher.fetch_transactions(address).await {
            Ok(transactions) if transactions.is_empty() => {
                log::debug!("no transactions yet for {} ({})", address, network);
                false
            }
            Ok(transactions) => {
                ledger.record_success(address, transactions, self.clock.now_unix())
            }
            Err(e) => {
                log::warn!(
                    "failed to fetch transactions for {} ({}): {}",
                    address,
                    network,
                    e
                );
                false
            }
        }
    }
}
