use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{EncodedPoint, PublicKey};
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Raw 20-byte account address from an uncompressed secp256k1 public key
/// (65 bytes, `0x04` prefix): the last 20 bytes of Keccak-256 over the
/// 64-byte point.
pub fn address_from_uncompressed(uncompressed_pubkey: &[u8; 65]) -> Result<[u8; 20], EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    Ok(addr)
}

/// EIP-55 checksummed address for a compressed secp256k1 public key.
pub fn pubkey_bytes_to_eth_address(pubkey_33_bytes: &[u8; 33]) -> Result<String, EthError> {
    let encoded = EncodedPoint::from_bytes(pubkey_33_bytes).map_err(|e| {
        EthError::InvalidPublicKey(format!("invalid compressed key encoding: {e}"))
    })?;

    let pubkey: Option<PublicKey> = PublicKey::from_encoded_point(&encoded).into();
    let pubkey = pubkey.ok_or_else(|| {
        EthError::InvalidPublicKey("point is not on the secp256k1 curve".into())
    })?;

    let uncompressed = pubkey.to_encoded_point(false);
    let mut key_65 = [0u8; 65];
    key_65.copy_from_slice(uncompressed.as_bytes());

    Ok(to_checksum(&address_from_uncompressed(&key_65)?))
}

/// Applies EIP-55 mixed-case encoding to a raw address.
pub fn to_checksum(addr: &[u8; 20]) -> String {
    let lower = hex::encode(addr);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode a user-supplied address.
///
/// Requires `0x` + 40 hex digits. All-lowercase and all-uppercase forms are
/// accepted as-is; mixed case must carry a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> Result<[u8; 20], EthError> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress(format!("{address}: missing 0x prefix")))?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "{address}: expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| EthError::InvalidAddress(format!("{address}: {e}")))?;
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&addr)[2..] != *hex_part {
        return Err(EthError::InvalidAddress(format!(
            "{address}: EIP-55 checksum mismatch"
        )));
    }

    Ok(addr)
}
