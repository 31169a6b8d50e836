use alloy_primitives::U256;

use crate::abi::{decode_uint, encode_call, Token};
use crate::error::EthError;

/// `transfer(address,uint256)`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// `decimals()`
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Calldata for `transfer(to, amount)`; 68 bytes.
pub fn encode_transfer(to: &[u8; 20], amount: U256) -> Vec<u8> {
    encode_call(TRANSFER_SELECTOR, &[Token::Address(*to), Token::Uint(amount)])
}

/// Calldata for `balanceOf(owner)`.
pub fn encode_balance_of(owner: &[u8; 20]) -> Vec<u8> {
    encode_call(BALANCE_OF_SELECTOR, &[Token::Address(*owner)])
}

/// Calldata for `decimals()`.
pub fn encode_decimals() -> Vec<u8> {
    encode_call(DECIMALS_SELECTOR, &[])
}

/// Decode a `balanceOf` return value.
pub fn decode_balance(data: &[u8]) -> Result<U256, EthError> {
    decode_uint(data)
}

/// Decode a `decimals()` return value. The ABI type is `uint8`, so any
/// larger value is malformed.
pub fn decode_decimals(data: &[u8]) -> Result<u8, EthError> {
    let value = decode_uint(data)?;
    u8::try_from(value).map_err(|_| EthError::Decode(format!("decimals out of range: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: [u8; 20] = [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0xde, 0xad,
    ];

    #[test]
    fn transfer_calldata_matches_abi() {
        let data = encode_transfer(&RECIPIENT, U256::from(1_000_000u64));

        let expected = concat!(
            "a9059cbb",
            "000000000000000000000000000000000000000000000000000000000000dead",
            "00000000000000000000000000000000000000000000000000000000000f4240",
        );
        assert_eq!(hex::encode(&data), expected);
    }

    #[test]
    fn transfer_handles_full_width_amount() {
        let data = encode_transfer(&RECIPIENT, U256::MAX);
        assert_eq!(&data[36..], &[0xff; 32]);
    }

    #[test]
    fn balance_of_calldata_matches_abi() {
        let data = encode_balance_of(&RECIPIENT);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &BALANCE_OF_SELECTOR);
        assert_eq!(&data[34..], &[0xde, 0xad]);
    }

    #[test]
    fn decimals_calldata_is_selector() {
        assert_eq!(hex::encode(encode_decimals()), "313ce567");
    }

    #[test]
    fn decodes_balance() {
        let mut data = [0u8; 32];
        data[29] = 0x01;
        data[30] = 0x86;
        data[31] = 0xa0;
        assert_eq!(decode_balance(&data).unwrap(), U256::from(100_000u64));
    }

    #[test]
    fn decodes_decimals() {
        let mut data = [0u8; 32];
        data[31] = 6;
        assert_eq!(decode_decimals(&data).unwrap(), 6);
    }

    #[test]
    fn rejects_oversized_decimals() {
        let mut data = [0u8; 32];
        data[30] = 1;
        assert!(matches!(decode_decimals(&data), Err(EthError::Decode(_))));
    }

    #[test]
    fn rejects_empty_return_data() {
        // Calling a non-contract address returns `0x`.
        assert!(decode_decimals(&[]).is_err());
        assert!(decode_balance(&[]).is_err());
    }
}
