/// Per-address polling ledger
///
/// In-memory record of what was fetched for each monitored address and
/// when. Records are created on first sight and never removed; raw
/// transaction data is replaced wholesale, never merged. The ledger is
/// re-published through a watch channel once per polling cycle that
/// changed anything.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;

use crate::esplora::types::TxSummary;

pub const DEFAULT_MIN_POLL_INTERVAL_SECS: u64 = 3;

/// Polling state for one monitored address
#[derive(Clone, Debug)]
pub struct AddressRecord {
    /// Trimmed address string, same as the ledger key
    pub address: String,
    /// Unix seconds of the last successful non-empty fetch
    pub last_update: u64,
    /// Unix seconds of the last fetch attempt, successful or not
    pub last_attempt: u64,
    /// Raw transactions from the last successful non-empty fetch
    pub transactions: Vec<TxSummary>,
}

impl AddressRecord {
    fn new(address: String) -> Self {
        Self {
            address,
            last_update: 0,
            last_attempt: 0,
            transactions: Vec::new(),
        }
    }
}

/// Value re-published to subscribers whenever a poll changed a record
#[derive(Clone, Debug, Default)]
pub struct LedgerSnapshot {
    pub revision: u64,
    pub records: HashMap<String, AddressRecord>,
}

pub struct AddressLedger {
    records: Mutex<HashMap<String, AddressRecord>>,
    publisher: watch::Sender<LedgerSnapshot>,
    min_interval: u64,
}

impl Default for AddressLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_POLL_INTERVAL_SECS)
    }
}

impl AddressLedger {
    pub fn new(min_interval_secs: u64) -> Self {
        let (publisher, _) = watch::channel(LedgerSnapshot::default());
        Self {
            records: Mutex::new(HashMap::new()),
            publisher,
            min_interval: min_interval_secs,
        }
    }

    /// Create the record for `address` if it is not tracked yet.
    /// Existing records keep their timestamps and data.
    pub fn ensure(&self, address: &str) {
        let key = address.trim();
        let mut records = self.lock();
        if !records.contains_key(key) {
            records.insert(key.to_string(), AddressRecord::new(key.to_string()));
        }
    }

    /// Whether the throttle allows another fetch attempt at `now`.
    /// Unknown addresses are never due.
    pub fn is_due(&self, address: &str, now: u64) -> bool {
        self.lock()
            .get(address.trim())
            .map(|record| now > record.last_attempt + self.min_interval)
            .unwrap_or(false)
    }

    /// Advance the throttle. Called before the fetch so a failing
    /// address cannot hot-loop.
    pub fn record_attempt(&self, address: &str, now: u64) {
        if let Some(record) = self.lock().get_mut(address.trim()) {
            record.last_attempt = now;
        }
    }

    /// Store a successful fetch, replacing prior data wholesale. An
    /// empty list is not stored: it must not erase transactions seen
    /// earlier and does not count as an update. Returns whether the
    /// record changed.
    pub fn record_success(&self, address: &str, transactions: Vec<TxSummary>, now: u64) -> bool {
        if transactions.is_empty() {
            return false;
        }
        match self.lock().get_mut(address.trim()) {
            Some(record) => {
                record.transactions = transactions;
                record.last_update = now;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, address: &str) -> Option<AddressRecord> {
        self.lock().get(address.trim()).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.publisher.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LedgerSnapshot> {
        self.publisher.subscribe()
    }

    /// Re-emit the ledger to subscribers. Called once per polling cycle
    /// that changed anything, not once per address.
    pub fn publish(&self) {
        let records = self.lock().clone();
        self.publisher.send_modify(|snapshot| {
            snapshot.revision += 1;
            snapshot.records = records;
        });
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, AddressRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
