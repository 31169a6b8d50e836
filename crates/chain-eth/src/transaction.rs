use alloy_primitives::U256;
use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::erc20;
use crate::error::EthError;
use crate::fee::FeeQuote;

/// EIP-2718 type byte for dynamic-fee transactions.
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// An unsigned EIP-1559 (type 2) transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
    pub to: [u8; 20],
    /// Value in wei.
    pub value: U256,
    /// Calldata, empty for plain transfers.
    pub data: Vec<u8>,
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct SignedEthTransaction {
    /// `0x02 || rlp(signed fields)`.
    pub raw_tx: Vec<u8>,
    /// `0x`-prefixed Keccak-256 of `raw_tx`.
    pub tx_hash: String,
    pub y_parity: bool,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl SignedEthTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw_tx))
    }
}

/// Plain value transfer.
pub fn build_transfer(
    chain_id: u64,
    nonce: u64,
    to: [u8; 20],
    value_wei: U256,
    fees: FeeQuote,
    gas_limit: u64,
) -> EthTransaction {
    EthTransaction {
        chain_id,
        nonce,
        max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        max_fee_per_gas: fees.max_fee_per_gas,
        gas_limit,
        to,
        value: value_wei,
        data: Vec::new(),
    }
}

/// Token transfer: a zero-value call to `token` carrying
/// `transfer(recipient, amount)`.
pub fn build_erc20_transfer(
    chain_id: u64,
    nonce: u64,
    token: [u8; 20],
    recipient: &[u8; 20],
    amount: U256,
    fees: FeeQuote,
    gas_limit: u64,
) -> EthTransaction {
    EthTransaction {
        chain_id,
        nonce,
        max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        max_fee_per_gas: fees.max_fee_per_gas,
        gas_limit,
        to: token,
        value: U256::ZERO,
        data: erc20::encode_transfer(recipient, amount),
    }
}

/// Encodes the signing payload `0x02 || rlp([chain_id, nonce, tip, cap,
/// gas, to, value, data, access_list])`.
pub fn encode_unsigned_tx(tx: &EthTransaction) -> Vec<u8> {
    let fields = UnsignedTxFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
        max_fee_per_gas: tx.max_fee_per_gas,
        gas_limit: tx.gas_limit,
        to: RlpAddress(tx.to),
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpBytes(tx.data.clone()),
        access_list: EmptyAccessList,
    };

    let mut payload = Vec::with_capacity(1 + fields.length());
    payload.push(EIP1559_TX_TYPE);
    fields.encode(&mut payload);
    payload
}

/// Keccak-256 of the signing payload.
pub fn signing_hash(tx: &EthTransaction) -> [u8; 32] {
    Keccak256::digest(encode_unsigned_tx(tx)).into()
}

/// Signs `tx` and produces the typed-envelope encoding.
pub fn sign_transaction(
    tx: &EthTransaction,
    private_key: &[u8; 32],
) -> Result<SignedEthTransaction, EthError> {
    let msg_hash = signing_hash(tx);

    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    let signing_key = signing_key?;

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(&msg_hash)
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature.r().to_bytes());
    s.copy_from_slice(&signature.s().to_bytes());
    let y_parity = recovery_id.is_y_odd();

    let fields = SignedTxFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
        max_fee_per_gas: tx.max_fee_per_gas,
        gas_limit: tx.gas_limit,
        to: RlpAddress(tx.to),
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpBytes(tx.data.clone()),
        access_list: EmptyAccessList,
        signature_y_parity: y_parity,
        signature_r: RlpU256(r),
        signature_s: RlpU256(s),
    };

    let mut raw_tx = Vec::with_capacity(1 + fields.length());
    raw_tx.push(EIP1559_TX_TYPE);
    fields.encode(&mut raw_tx);

    let tx_hash = format!("0x{}", hex::encode(Keccak256::digest(&raw_tx)));

    Ok(SignedEthTransaction {
        raw_tx,
        tx_hash,
        y_parity,
        r,
        s,
    })
}

#[derive(RlpEncodable)]
struct UnsignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: RlpBytes,
    access_list: EmptyAccessList,
}

#[derive(RlpEncodable)]
struct SignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: RlpBytes,
    access_list: EmptyAccessList,
    signature_y_parity: bool,
    signature_r: RlpU256,
    signature_s: RlpU256,
}

/// EIP-2930 access list. Always empty here, but the list is part of the
/// type-2 field layout.
struct EmptyAccessList;

impl Encodable for EmptyAccessList {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        alloy_rlp::Header {
            list: true,
            payload_length: 0,
        }
        .encode(out);
    }

    fn length(&self) -> usize {
        1
    }
}

/// 20-byte string.
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// Big-endian integer with leading zeros stripped.
struct RlpU256([u8; 32]);

impl RlpU256 {
    fn trimmed(&self) -> &[u8] {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        &self.0[start..]
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.trimmed().encode(out);
    }

    fn length(&self) -> usize {
        self.trimmed().length()
    }
}

/// Byte string. A bare `Vec<u8>` would encode as a list of integers.
struct RlpBytes(Vec<u8>);

impl Encodable for RlpBytes {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}
