//! Address validity predicate

use bitcoin::address::{Address, NetworkUnchecked};

/// Returns true when the string parses as a Bitcoin address in any
/// known encoding (base58 or bech32, mainnet or test networks).
pub fn is_valid_address(address: &str) -> bool {
    address.parse::<Address<NetworkUnchecked>>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_mainnet_addresses() {
        // P2PKH (genesis) and P2WPKH
        assert!(is_valid_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"));
        assert!(is_valid_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"));
    }

    #[test]
    fn test_accepts_testnet_addresses() {
        assert!(is_valid_address("mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn"));
        assert!(is_valid_address("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid_address("not-an-address"));
        assert!(!is_valid_address(""));
        // bad bech32 checksum
        assert!(!is_valid_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5"));
    }

    #[test]
    fn test_rejects_untrimmed_input() {
        assert!(!is_valid_address(" 1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"));
    }
}
