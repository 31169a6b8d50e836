use chain_btc::error::BtcError;
use chain_eth::error::EthError;
use crypto_utils::error::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Seed storage not found: {0}")]
    StorageNotFound(String),

    #[error("Seed storage corrupt: {0}")]
    StorageCorrupt(String),

    #[error("Seed storage write failed: {0}")]
    StorageWriteFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid path component: {0}")]
    InvalidPathComponent(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount is too small: {0}")]
    AmountTooSmall(String),

    #[error("Address decode failed: {0}")]
    AddressDecodeFailed(String),

    #[error("Script build failed: {0}")]
    ScriptBuildFailed(String),

    #[error("Network request failed: {0}")]
    NetworkRequestFailed(String),

    #[error("Gas estimation failed: {0}")]
    GasEstimationFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::DecryptionFailed(msg) => WalletError::DecryptionFailed(msg),
            CryptoError::EncryptionFailed(msg) => {
                WalletError::StorageWriteFailed(format!("sealing seed: {msg}"))
            }
        }
    }
}

impl From<BtcError> for WalletError {
    fn from(e: BtcError) -> Self {
        match e {
            BtcError::InvalidAddress(msg) => WalletError::AddressDecodeFailed(msg),
            BtcError::InvalidPrevout(msg) => WalletError::SerializationFailed(msg),
            BtcError::InvalidPrivateKey(msg) => WalletError::SigningFailed(msg),
            BtcError::SigningError(msg) => WalletError::SigningFailed(msg),
            BtcError::InvalidPublicKey(msg) => WalletError::DerivationFailed(msg),
            BtcError::AmountTooSmall {
                requested_sat,
                selected_sat,
                fee_sat,
            } => WalletError::AmountTooSmall(format!(
                "requested {requested_sat} sat, selected {selected_sat} sat, fee {fee_sat} sat"
            )),
            BtcError::Request(msg) => WalletError::NetworkRequestFailed(msg),
            BtcError::Decode(msg) => WalletError::NetworkRequestFailed(msg),
        }
    }
}

impl From<EthError> for WalletError {
    fn from(e: EthError) -> Self {
        match e {
            EthError::InvalidAddress(msg) => WalletError::AddressDecodeFailed(msg),
            EthError::InvalidPrivateKey(msg) => WalletError::SigningFailed(msg),
            EthError::SigningError(msg) => WalletError::SigningFailed(msg),
            EthError::InvalidPublicKey(msg) => WalletError::DerivationFailed(msg),
            EthError::EncodingError(msg) => WalletError::SerializationFailed(msg),
            rpc @ (EthError::Request(_) | EthError::Rpc { .. } | EthError::Decode(_)) => {
                WalletError::NetworkRequestFailed(rpc.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btc_amount_too_small_keeps_figures() {
        let err: WalletError = BtcError::AmountTooSmall {
            requested_sat: 1_000,
            selected_sat: 1_100,
            fee_sat: 282,
        }
        .into();
        assert!(matches!(err, WalletError::AmountTooSmall(_)));
        assert_eq!(
            err.to_string(),
            "Amount is too small: requested 1000 sat, selected 1100 sat, fee 282 sat"
        );
    }

    #[test]
    fn address_errors_map_to_decode_failure() {
        let btc: WalletError = BtcError::InvalidAddress("bad".into()).into();
        let eth: WalletError = EthError::InvalidAddress("bad".into()).into();
        assert!(matches!(btc, WalletError::AddressDecodeFailed(_)));
        assert!(matches!(eth, WalletError::AddressDecodeFailed(_)));
    }

    #[test]
    fn transport_errors_map_to_network_failure() {
        let btc: WalletError = BtcError::Request("503".into()).into();
        let eth: WalletError = EthError::Rpc {
            code: -32000,
            message: "nonce too low".into(),
        }
        .into();
        assert!(matches!(btc, WalletError::NetworkRequestFailed(_)));
        match eth {
            WalletError::NetworkRequestFailed(msg) => assert!(msg.contains("nonce too low")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn crypto_errors_map_by_direction() {
        let open: WalletError = CryptoError::DecryptionFailed("tag".into()).into();
        let seal: WalletError = CryptoError::EncryptionFailed("rng".into()).into();
        assert!(matches!(open, WalletError::DecryptionFailed(_)));
        assert!(matches!(seal, WalletError::StorageWriteFailed(_)));
    }
}
