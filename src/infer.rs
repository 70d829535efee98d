/// Sender inference
///
/// Bitcoin transactions carry no sender label. This derives the likely
/// funding address(es) for payments into a tracked address from each
/// transaction's input set, and picks a change output when exactly one
/// candidate exists.

use std::collections::HashMap;

use crate::ledger::AddressRecord;
use crate::validate::is_valid_address;

/// One observed payment into a tracked address. Derived on demand,
/// never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentObservation {
    pub txid: String,
    pub from_address: String,
    pub to_address: String,
    pub amount_sats: u64,
    /// 0 while the transaction is unconfirmed
    pub block_height: u64,
    /// The single non-owned output, when there is exactly one
    pub change_address: Option<String>,
}

/// Map each plausible sending address to its latest observed payment.
///
/// The amount is computed per transaction (the sum of outputs paying
/// the tracked address) and attributed unchanged to every valid input
/// of that transaction. A transaction funded by several distinct
/// senders therefore over-attributes: each sender key carries the full
/// amount. This is a known heuristic limit, kept as-is; callers must
/// tolerate it. A sender appearing in several transactions keeps only
/// the last transaction's observation.
pub fn infer_senders(record: &AddressRecord) -> HashMap<String, PaymentObservation> {
    let tracked = record.address.trim();
    let mut observations = HashMap::new();

    for tx in &record.transactions {
        let height = tx.status.block_height.unwrap_or(0);
        let mut amount: u64 = 0;
        // Non-owned outputs are change candidates. Outputs without an
        // address still count toward the candidate total, so they can
        // disqualify an otherwise-single candidate.
        let mut change: Vec<Option<String>> = Vec::new();

        for output in &tx.vout {
            match output.scriptpubkey_address.as_deref() {
                Some(address) if address.trim() == tracked => amount += output.value,
                other => change.push(other.map(str::to_string)),
            }
        }

        let change_address = if change.len() == 1 {
            change[0].clone()
        } else {
            None
        };

        for input in &tx.vin {
            let from = input
                .prevout
                .as_ref()
                .and_then(|prevout| prevout.scriptpubkey_address.as_deref());
            match from {
                Some(address) if !address.is_empty() && is_valid_address(address) => {
                    observations.insert(
                        address.to_string(),
                        PaymentObservation {
                            txid: tx.txid.clone(),
                            from_address: address.to_string(),
                            to_address: tracked.to_string(),
                            amount_sats: amount,
                            block_height: height,
                            change_address: change_address.clone(),
                        },
                    );
                }
                _ => {
                    log::debug!("skipping input without usable prevout address in {}", tx.txid);
                }
            }
        }
    }

    observations
}
