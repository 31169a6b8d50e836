use thiserror::Error;

/// Bitcoin chain operation errors.
#[derive(Debug, Error)]
pub enum BtcError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid previous output: {0}")]
    InvalidPrevout(String),

    /// The requested amount does not fit in the selected inputs once the fee
    /// is paid, leaving no positive change.
    #[error("amount is too small: requested {requested_sat} sat, selected {selected_sat} sat, fee {fee_sat} sat")]
    AmountTooSmall {
        requested_sat: u64,
        selected_sat: u64,
        fee_sat: u64,
    },

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_address() {
        let err = BtcError::InvalidAddress("bad checksum".into());
        assert_eq!(err.to_string(), "invalid address: bad checksum");
    }

    #[test]
    fn display_amount_too_small() {
        let err = BtcError::AmountTooSmall {
            requested_sat: 10_000,
            selected_sat: 10_100,
            fee_sat: 282,
        };
        assert_eq!(
            err.to_string(),
            "amount is too small: requested 10000 sat, selected 10100 sat, fee 282 sat"
        );
    }

    #[test]
    fn display_request_keeps_body_verbatim() {
        let err = BtcError::Request("400 Bad Request: sendrawtransaction RPC error".into());
        assert!(err.to_string().ends_with("sendrawtransaction RPC error"));
    }

    #[test]
    fn debug_format_works() {
        let err = BtcError::SigningError("fail".into());
        assert!(format!("{:?}", err).contains("SigningError"));
    }
}
