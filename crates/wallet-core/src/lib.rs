//! Multi-chain wallet core.
//!
//! A single BIP-39 seed, stored by [`vault::SeedVault`], is expanded into one
//! BIP-32 key per configured currency. [`wallet::MultiWallet`] routes address,
//! balance and send requests to the matching [`provider::ChainProvider`]:
//! Bitcoin P2WPKH, native ETH or an ERC-20 token.

pub mod amount;
pub mod config;
pub mod error;
pub mod hd_derivation;
pub mod mnemonic;
pub mod provider;
pub mod vault;
pub mod wallet;

pub use amount::Balance;
pub use config::Config;
pub use error::WalletError;
pub use vault::SeedVault;
pub use wallet::{Connector, HttpConnector, MultiWallet};
