use bip39::{Language, Mnemonic};
use crypto_utils::SecretBytes;

use crate::error::WalletError;

/// Parse an English BIP-39 phrase. Runs of whitespace are collapsed first.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic, WalletError> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(WalletError::InvalidMnemonic("empty mnemonic".into()));
    }
    Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}

/// 64-byte BIP-39 seed with an empty passphrase.
pub fn mnemonic_to_seed(phrase: &str) -> Result<SecretBytes, WalletError> {
    let mnemonic = parse_mnemonic(phrase)?;
    let mut seed = mnemonic.to_seed("");
    let out = SecretBytes::from(&seed[..]);
    zeroize::Zeroize::zeroize(&mut seed);
    Ok(out)
}
