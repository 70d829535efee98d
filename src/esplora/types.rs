/// Esplora API response types
///
/// Typed views of the subset of the Esplora wire format the watcher
/// consumes. Only the fields that are actually read are modeled.

use serde::{Deserialize, Deserializer, Serialize};

/// Block summary from a latest-blocks endpoint (newest first; only
/// element 0 is consumed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSummary {
    pub id: String,
    pub height: u64,
}

/// Address info from /address/{address}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressStats {
    pub chain_stats: TxoStats,
}

/// Confirmed funded/spent output sums. Some deployments serve these
/// counters as decimal strings, so both forms are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxoStats {
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub funded_txo_sum: u64,
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub spent_txo_sum: u64,
}

/// Transaction from /address/{address}/txs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxSummary {
    pub txid: String,
    pub status: TxStatus,
    pub vout: Vec<TxOut>,
    pub vin: Vec<TxIn>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxStatus {
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_address: Option<String>,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxIn {
    /// Absent for coinbase inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevout: Option<Prevout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prevout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_address: Option<String>,
    pub value: u64,
}

fn u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_listing() {
        let body = r#"[
            {"id": "00000000000000000001a0b2", "height": 850001, "timestamp": 1718000000},
            {"id": "00000000000000000000ffee", "height": 850000, "timestamp": 1717999000}
        ]"#;
        let blocks: Vec<BlockSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(blocks[0].height, 850001);
        assert_eq!(blocks[0].id, "00000000000000000001a0b2");
    }

    #[test]
    fn test_parse_address_stats_numbers() {
        let body = r#"{"address": "x", "chain_stats": {"funded_txo_count": 2, "funded_txo_sum": 7000, "spent_txo_count": 1, "spent_txo_sum": 2000, "tx_count": 3}}"#;
        let stats: AddressStats = serde_json::from_str(body).unwrap();
        assert_eq!(stats.chain_stats.funded_txo_sum, 7000);
        assert_eq!(stats.chain_stats.spent_txo_sum, 2000);
    }

    #[test]
    fn test_parse_address_stats_decimal_strings() {
        let body = r#"{"chain_stats": {"funded_txo_sum": "7000", "spent_txo_sum": "2000"}}"#;
        let stats: AddressStats = serde_json::from_str(body).unwrap();
        assert_eq!(stats.chain_stats.funded_txo_sum, 7000);
        assert_eq!(stats.chain_stats.spent_txo_sum, 2000);
    }

    #[test]
    fn test_parse_transaction_with_coinbase_input() {
        let body = r#"[{
            "txid": "ab12",
            "status": {"confirmed": true, "block_height": 840000},
            "vout": [{"scriptpubkey_address": "bc1qexample", "value": 5000},
                     {"scriptpubkey": "6a24aa21a9ed", "value": 0}],
            "vin": [{"is_coinbase": true}]
        }]"#;
        let txs: Vec<TxSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(txs[0].status.block_height, Some(840000));
        assert_eq!(txs[0].vout[0].value, 5000);
        assert!(txs[0].vout[1].scriptpubkey_address.is_none());
        assert!(txs[0].vin[0].prevout.is_none());
    }

    #[test]
    fn test_parse_unconfirmed_transaction() {
        let body = r#"[{
            "txid": "cd34",
            "status": {"confirmed": false},
            "vout": [],
            "vin": [{"prevout": {"scriptpubkey_address": "bc1qsender", "value": 9000}}]
        }]"#;
        let txs: Vec<TxSummary> = serde_json::from_str(body).unwrap();
        assert!(txs[0].status.block_height.is_none());
        assert_eq!(
            txs[0].vin[0].prevout.as_ref().unwrap().scriptpubkey_address,
            Some("bc1qsender".to_string())
        );
    }
}
