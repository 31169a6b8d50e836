//! Just enough of the contract ABI for static-argument calls: each argument
//! is one 32-byte word after the 4-byte selector.

use alloy_primitives::U256;

use crate::error::EthError;

/// ABI word size in bytes.
pub const WORD_SIZE: usize = 32;

/// A static ABI argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Left-padded to a full word.
    Address([u8; 20]),
    /// Big-endian, left-padded to a full word.
    Uint(U256),
}

impl Token {
    fn to_word(&self) -> [u8; WORD_SIZE] {
        match self {
            Token::Address(addr) => {
                let mut word = [0u8; WORD_SIZE];
                word[12..].copy_from_slice(addr);
                word
            }
            Token::Uint(value) => value.to_be_bytes::<WORD_SIZE>(),
        }
    }
}

/// `selector || word(args[0]) || word(args[1]) || ...`
pub fn encode_call(selector: [u8; 4], args: &[Token]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD_SIZE);
    data.extend_from_slice(&selector);
    for arg in args {
        data.extend_from_slice(&arg.to_word());
    }
    data
}

/// Read the first return word as an unsigned integer.
pub fn decode_uint(data: &[u8]) -> Result<U256, EthError> {
    if data.len() < WORD_SIZE {
        return Err(EthError::Decode(format!(
            "expected a {WORD_SIZE}-byte word, got {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(&data[..WORD_SIZE]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_left_padded() {
        let mut addr = [0u8; 20];
        addr[0] = 0xde;
        addr[19] = 0xad;

        let word = Token::Address(addr).to_word();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], &addr);
    }

    #[test]
    fn uint_is_big_endian() {
        let word = Token::Uint(U256::from(0x0102u64)).to_word();
        assert_eq!(&word[..30], &[0u8; 30]);
        assert_eq!(&word[30..], &[0x01, 0x02]);
    }

    #[test]
    fn call_without_args_is_selector_only() {
        let data = encode_call([0x31, 0x3c, 0xe5, 0x67], &[]);
        assert_eq!(data, vec![0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn call_layout() {
        let mut addr = [0u8; 20];
        addr[19] = 0x01;
        let data = encode_call(
            [0xa9, 0x05, 0x9c, 0xbb],
            &[Token::Address(addr), Token::Uint(U256::from(100u64))],
        );

        assert_eq!(data.len(), 68);
        assert_eq!(data[35], 0x01);
        assert_eq!(data[67], 100);
    }

    #[test]
    fn decode_reads_first_word_only() {
        let mut data = vec![0u8; 64];
        data[31] = 7;
        data[63] = 9;
        assert_eq!(decode_uint(&data).unwrap(), U256::from(7u64));
    }

    #[test]
    fn decode_short_data_fails() {
        assert!(matches!(decode_uint(&[0u8; 31]), Err(EthError::Decode(_))));
        assert!(decode_uint(&[]).is_err());
    }
}
