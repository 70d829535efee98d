/// Chain tip tracking
///
/// Two independent block explorers are polled for their view of the
/// current tip. Whichever source completes later overwrites the
/// published value: neither provider is authoritative, so no ordering
/// is negotiated between them and a brief inconsistency is accepted.

use tokio::sync::watch;

use crate::config::WatcherConfig;
use crate::error::WatcherError;
use crate::esplora::types::BlockSummary;

/// Most recent known block height and hash, used as a cache/versioning
/// key by downstream consumers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainTip {
    pub height: u64,
    pub hash: String,
}

impl ChainTip {
    pub fn is_valid(&self) -> bool {
        self.height > 0 && !self.hash.is_empty()
    }
}

/// One provider's view of the latest blocks
pub struct TipSource {
    client: reqwest::Client,
    endpoint: String,
}

impl TipSource {
    fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Fetch the provider's current tip. Every failure degrades to
    /// None: a stale published tip is an acceptable state, an aborted
    /// refresh is not.
    pub async fn fetch(&self) -> Option<ChainTip> {
        let response = self.client.get(&self.endpoint).send().await.ok()?;
        if !response.status().is_success() {
            log::debug!("tip endpoint {} returned {}", self.endpoint, response.status());
            return None;
        }

        let blocks: Vec<BlockSummary> = response.json().await.ok()?;
        tip_from_blocks(&blocks)
    }
}

/// Extract the tip from a newest-first block listing
fn tip_from_blocks(blocks: &[BlockSummary]) -> Option<ChainTip> {
    let newest = blocks.first()?;
    let tip = ChainTip {
        height: newest.height,
        hash: newest.id.clone(),
    };
    tip.is_valid().then_some(tip)
}

/// Owns the published canonical tip and the sources feeding it
pub struct TipTracker {
    sources: Vec<TipSource>,
    published: watch::Sender<ChainTip>,
}

impl TipTracker {
    pub fn new(config: &WatcherConfig) -> Result<Self, WatcherError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WatcherError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let sources = config
            .tip_endpoints
            .iter()
            .map(|endpoint| TipSource::new(client.clone(), endpoint.clone()))
            .collect();

        let (published, _) = watch::channel(ChainTip::default());

        Ok(Self { sources, published })
    }

    /// Query every source concurrently. Each source that comes back
    /// with a valid tip overwrites the published value as it completes;
    /// failed sources are absorbed silently.
    pub async fn refresh(&self) {
        let polls = self.sources.iter().map(|source| async move {
            if let Some(tip) = source.fetch().await {
                self.set(tip);
            }
        });
        futures::future::join_all(polls).await;
    }

    /// Unconditionally publish a new tip (last writer wins)
    pub fn set(&self, tip: ChainTip) {
        log::debug!("chain tip {}:{}", tip.height, tip.hash);
        self.published.send_replace(tip);
    }

    pub fn current(&self) -> ChainTip {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChainTip> {
        self.published.subscribe()
    }

    /// Cache-key descriptor for the published tip: `("bitcoin", "")`
    /// until a valid tip has been seen, then
    /// `("bitcoin", "{height}:{hash}")`.
    pub fn tag(&self) -> (&'static str, String) {
        let tip = self.published.borrow();
        if tip.is_valid() {
            ("bitcoin", format!("{}:{}", tip.height, tip.hash))
        } else {
            ("bitcoin", String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> TipTracker {
        TipTracker::new(&WatcherConfig::default()).unwrap()
    }

    #[test]
    fn test_tag_is_empty_until_first_valid_tip() {
        let tracker = tracker();
        assert_eq!(tracker.tag(), ("bitcoin", String::new()));
        assert!(!tracker.current().is_valid());
    }

    #[test]
    fn test_tag_reflects_published_tip() {
        let tracker = tracker();
        tracker.set(ChainTip {
            height: 840000,
            hash: "00ab".to_string(),
        });
        assert_eq!(tracker.tag(), ("bitcoin", "840000:00ab".to_string()));
    }

    #[test]
    fn test_last_writer_wins_even_on_lower_height() {
        let tracker = tracker();
        tracker.set(ChainTip {
            height: 840001,
            hash: "00cd".to_string(),
        });
        tracker.set(ChainTip {
            height: 840000,
            hash: "00ab".to_string(),
        });
        assert_eq!(tracker.tag(), ("bitcoin", "840000:00ab".to_string()));
    }

    #[test]
    fn test_subscribers_see_updates() {
        let tracker = tracker();
        let rx = tracker.subscribe();
        tracker.set(ChainTip {
            height: 1,
            hash: "aa".to_string(),
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow().height, 1);
    }

    #[test]
    fn test_tip_from_blocks_takes_newest() {
        let blocks = vec![
            BlockSummary {
                id: "new".to_string(),
                height: 10,
            },
            BlockSummary {
                id: "old".to_string(),
                height: 9,
            },
        ];
        let tip = tip_from_blocks(&blocks).unwrap();
        assert_eq!(tip.height, 10);
        assert_eq!(tip.hash, "new");
    }

    #[test]
    fn test_tip_from_blocks_rejects_empty_and_invalid() {
        assert!(tip_from_blocks(&[]).is_none());
        assert!(tip_from_blocks(&[BlockSummary {
            id: String::new(),
            height: 10,
        }])
        .is_none());
        assert!(tip_from_blocks(&[BlockSummary {
            id: "aa".to_string(),
            height: 0,
        }])
        .is_none());
    }
}
