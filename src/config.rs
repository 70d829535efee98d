/// Watcher configuration
///
/// Endpoints, polling cadence and request timeout for the payment
/// watcher. Constructed by the embedding application and passed in;
/// nothing here reads the environment.

use std::time::Duration;

use crate::ledger::DEFAULT_MIN_POLL_INTERVAL_SECS;

#[derive(Clone, Debug)]
pub struct WatcherConfig {
    /// Latest-blocks endpoints of the two independent tip providers.
    /// Each must answer with a JSON array of block summaries, newest
    /// first.
    pub tip_endpoints: [String; 2],
    /// Esplora-compatible API base for address balance and transaction
    /// queries
    pub esplora_url: String,
    /// Minimum seconds between fetch attempts for a single address
    pub poll_min_interval_secs: u64,
    /// Bound on every outbound HTTP request
    pub request_timeout: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            tip_endpoints: [
                "https://blockstream.info/api/blocks".to_string(),
                "https://mempool.space/api/blocks".to_string(),
            ],
            esplora_url: "https://mempool.space/api".to_string(),
            poll_min_interval_secs: DEFAULT_MIN_POLL_INTERVAL_SECS,
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_two_distinct_providers() {
        let config = WatcherConfig::default();
        assert_ne!(config.tip_endpoints[0], config.tip_endpoints[1]);
    }

    #[test]
    fn test_default_cadence() {
        let config = WatcherConfig::default();
        assert_eq!(config.poll_min_interval_secs, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
