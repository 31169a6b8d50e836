//! Per-currency providers behind one closed enum.

pub mod bitcoin;
pub mod ethereum;

use chain_btc::utxo::UtxoSet;
use rust_decimal::Decimal;

use crate::amount::Balance;
use crate::error::WalletError;

pub use self::bitcoin::BitcoinProvider;
pub use self::ethereum::{EthereumProvider, TokenProvider};

pub enum ChainProvider {
    /// The UTXO set is the coin-selection context for this provider. It is
    /// filled by `balance` (or lazily by `send`) and emptied after each
    /// broadcast.
    Bitcoin {
        provider: BitcoinProvider,
        utxos: UtxoSet,
    },
    EthereumNative(EthereumProvider),
    EthereumToken(TokenProvider),
}

impl ChainProvider {
    pub fn bitcoin(provider: BitcoinProvider) -> Self {
        ChainProvider::Bitcoin {
            provider,
            utxos: UtxoSet::new(),
        }
    }

    pub fn address(&self) -> &str {
        match self {
            ChainProvider::Bitcoin { provider, .. } => provider.address(),
            ChainProvider::EthereumNative(provider) => provider.address(),
            ChainProvider::EthereumToken(provider) => provider.address(),
        }
    }

    pub fn balance(&mut self) -> Result<Balance, WalletError> {
        match self {
            ChainProvider::Bitcoin { provider, utxos } => provider.balance(utxos),
            ChainProvider::EthereumNative(provider) => provider.balance(),
            ChainProvider::EthereumToken(provider) => provider.balance(),
        }
    }

    /// Send `amount` whole units to `recipient`; returns the transaction id.
    pub fn send(&mut self, recipient: &str, amount: Decimal) -> Result<String, WalletError> {
        match self {
            ChainProvider::Bitcoin { provider, utxos } => provider.send(utxos, recipient, amount),
            ChainProvider::EthereumNative(provider) => provider.send(recipient, amount),
            ChainProvider::EthereumToken(provider) => provider.send(recipient, amount),
        }
    }
}
