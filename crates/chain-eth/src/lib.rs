//! Ethereum support for the wallet.
//!
//! This crate provides:
//! - Address derivation from secp256k1 public keys and strict EIP-55 parsing
//! - EIP-1559 transaction building and signing
//! - ERC-20 `transfer`, `balanceOf` and `decimals` call encoding
//! - The fee-market policy used for native and token sends
//! - A JSON-RPC client behind the [`rpc::EthRpc`] trait

pub mod abi;
pub mod address;
pub mod erc20;
pub mod error;
pub mod fee;
pub mod rpc;
pub mod transaction;
