use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::CompressedPublicKey;

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Derive a P2WPKH (native SegWit bech32) address from a compressed public key.
///
/// HASH160 of the 33-byte key becomes a version-0 witness program, encoded
/// as `bc1...` on mainnet and `tb1...` on signet.
pub fn pubkey_to_p2wpkh_address(
    pubkey_bytes: &[u8; 33],
    network: BtcNetwork,
) -> Result<String, BtcError> {
    let compressed_pk = CompressedPublicKey::from_slice(pubkey_bytes).map_err(|e| {
        BtcError::InvalidPublicKey(format!("failed to parse compressed public key: {e}"))
    })?;

    let address = Address::p2wpkh(&compressed_pk, network.to_bitcoin_network());

    Ok(address.to_string())
}

/// Decode an address string and require it to belong to `network`.
///
/// Any standard address type is accepted as a destination.
pub fn parse_address(address: &str, network: BtcNetwork) -> Result<Address, BtcError> {
    address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("failed to decode {address}: {e}")))?
        .require_network(network.to_bitcoin_network())
        .map_err(|e| BtcError::InvalidAddress(format!("{address} is not a {network} address: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::Secp256k1;

    const GENERATOR_PUBKEY: &str =
        "0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798";

    fn generator_pubkey() -> [u8; 33] {
        hex::decode(GENERATOR_PUBKEY).unwrap().try_into().unwrap()
    }

    /// BIP-173 test vector: pubkey of private key 1.
    #[test]
    fn p2wpkh_mainnet_test_vector() {
        let address = pubkey_to_p2wpkh_address(&generator_pubkey(), BtcNetwork::Mainnet).unwrap();
        assert_eq!(address, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    }

    #[test]
    fn p2wpkh_signet_uses_tb_prefix() {
        let address = pubkey_to_p2wpkh_address(&generator_pubkey(), BtcNetwork::Signet).unwrap();
        assert_eq!(address, "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx");
    }

    #[test]
    fn invalid_pubkey_returns_error() {
        let result = pubkey_to_p2wpkh_address(&[0u8; 33], BtcNetwork::Mainnet);
        assert!(matches!(result, Err(BtcError::InvalidPublicKey(_))));
    }

    #[test]
    fn pubkey_from_secp256k1() {
        let secp = Secp256k1::new();
        let secret_key = bitcoin::secp256k1::SecretKey::from_slice(&[0xcd; 32]).unwrap();
        let public_key = bitcoin::secp256k1::PublicKey::from_secret_key(&secp, &secret_key);

        let address = pubkey_to_p2wpkh_address(&public_key.serialize(), BtcNetwork::Mainnet).unwrap();
        assert!(address.starts_with("bc1q"));
        assert_eq!(address.len(), 42);
    }

    #[test]
    fn parse_known_mainnet_address() {
        let addr = parse_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", BtcNetwork::Mainnet)
            .unwrap();
        assert!(addr.script_pubkey().is_p2wpkh());
    }

    #[test]
    fn parse_legacy_destination() {
        let addr = parse_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", BtcNetwork::Mainnet).unwrap();
        assert!(addr.script_pubkey().is_p2pkh());
    }

    #[test]
    fn mainnet_address_rejected_on_signet() {
        let result = parse_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", BtcNetwork::Signet);
        assert!(matches!(result, Err(BtcError::InvalidAddress(_))));
    }

    #[test]
    fn garbage_address_rejected() {
        let result = parse_address("notanaddress!!!", BtcNetwork::Mainnet);
        assert!(matches!(result, Err(BtcError::InvalidAddress(_))));
    }
}
