//! Bitcoin payment watcher
//!
//! Tracks the Bitcoin chain tip through two independent block
//! explorers and monitors a dynamic set of invoice addresses for
//! incoming payments, inferring the likely sender of each observed
//! transaction. Lets an auction or sales system detect that a buyer
//! paid an invoice address without running a full node.
//!
//! - Tip tracking: [`TipTracker`] polls two [`tip::TipSource`]s
//!   concurrently with last-write-wins publication and derives a
//!   cache-invalidation tag from the published tip.
//! - Address polling: [`PaymentPoller`] walks per-network worklists,
//!   throttled per address through the [`AddressLedger`], and
//!   republishes the ledger when anything changed.
//! - Sender inference: [`infer_senders`] heuristically attributes each
//!   observed payment to the transaction's input addresses and picks a
//!   change output when exactly one candidate exists.
//!
//! Not a wallet: no keys, no fee computation, no signature validation,
//! and nothing survives a process restart.

pub mod config;
pub mod error;
pub mod esplora;
pub mod infer;
pub mod ledger;
pub mod poller;
pub mod tip;
pub mod validate;

// Re-export main types
pub use config::WatcherConfig;
pub use error::WatcherError;
pub use esplora::{EsploraClient, TxFetcher};
pub use infer::{infer_senders, PaymentObservation};
pub use ledger::{AddressLedger, AddressRecord, LedgerSnapshot, DEFAULT_MIN_POLL_INTERVAL_SECS};
pub use poller::{Clock, PaymentPoller, SystemClock, WatchTarget, Worklists};
pub use tip::{ChainTip, TipTracker};
pub use validate::is_valid_address;
