use bip32::{ChildNumber, XPrv};
use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::error::WalletError;

/// A parsed derivation path such as `m/84'/0'/0'/0/0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// Parse a slash-separated path.
    ///
    /// A leading `m` is skipped. Each remaining component is a decimal index
    /// below 2^31, optionally suffixed with `'` or `h` for a hardened child.
    pub fn parse(path: &str) -> Result<Self, WalletError> {
        let mut components = path.split('/').peekable();
        if components.peek() == Some(&"m") {
            components.next();
        }

        components
            .map(|component| {
                let (digits, hardened) = match component
                    .strip_suffix('\'')
                    .or_else(|| component.strip_suffix('h'))
                {
                    Some(rest) => (rest, true),
                    None => (component, false),
                };

                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(WalletError::InvalidPathComponent(format!(
                        "{component:?} in {path:?}"
                    )));
                }
                let index: u32 = digits.parse().map_err(|e| {
                    WalletError::InvalidPathComponent(format!("{component:?} in {path:?}: {e}"))
                })?;

                ChildNumber::new(index, hardened).map_err(|e| {
                    WalletError::InvalidPathComponent(format!("{component:?} in {path:?}: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn components(&self) -> &[ChildNumber] {
        &self.0
    }
}

/// BIP-32 master key from a BIP-39 seed.
pub fn master_key(seed: &[u8]) -> Result<XPrv, WalletError> {
    XPrv::new(seed).map_err(|e| WalletError::DerivationFailed(format!("master key: {e}")))
}

/// Walk `path` from `master` and return the leaf key material.
pub fn derive(master: &XPrv, path: &DerivationPath) -> Result<LeafKey, WalletError> {
    let mut xprv = master.clone();
    for child in path.components() {
        xprv = xprv
            .derive_child(*child)
            .map_err(|e| WalletError::DerivationFailed(format!("child {child}: {e}")))?;
    }
    LeafKey::from_xprv(&xprv)
}

/// secp256k1 key at the end of a derivation path. The private scalar is
/// wiped on drop.
pub struct LeafKey {
    private_key: [u8; 32],
    public_key_compressed: [u8; 33],
}

impl LeafKey {
    fn from_xprv(xprv: &XPrv) -> Result<Self, WalletError> {
        let mut private_key: [u8; 32] = xprv.to_bytes().into();
        let signing_key = SigningKey::from_bytes(&private_key.into());
        let signing_key = match signing_key {
            Ok(key) => key,
            Err(e) => {
                private_key.zeroize();
                return Err(WalletError::DerivationFailed(e.to_string()));
            }
        };

        let verifying_key = signing_key.verifying_key();
        let public_key_compressed: [u8; 33] = verifying_key
            .to_encoded_point(true)
            .as_bytes()
            .try_into()
            .map_err(|_| WalletError::DerivationFailed("invalid compressed public key".into()))?;

        Ok(Self {
            private_key,
            public_key_compressed,
        })
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn public_key_compressed(&self) -> &[u8; 33] {
        &self.public_key_compressed
    }
}

impl Drop for LeafKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}
