//! Esplora API access
//!
//! - typed views of the consumed wire shapes
//! - address transaction and balance queries

pub mod client;
pub mod types;

// Re-export main types
pub use client::{EsploraClient, TxFetcher};
pub use types::{AddressStats, BlockSummary, Prevout, TxIn, TxOut, TxStatus, TxSummary, TxoStats};
