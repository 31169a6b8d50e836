//! Bitcoin chain support for the wallet.
//!
//! Native SegWit (P2WPKH) only: address derivation, largest-first coin
//! selection over an explicit UTXO set, analytic vsize fee estimation,
//! transaction assembly with BIP-143 signing, and a blocking Esplora-style
//! HTTP client for UTXO lookup and broadcast.

pub mod address;
pub mod error;
pub mod esplora;
pub mod fee;
pub mod network;
pub mod transaction;
pub mod utxo;
