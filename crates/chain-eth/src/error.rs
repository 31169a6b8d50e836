use thiserror::Error;

/// Ethereum chain operation errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    /// Transport failure or non-success HTTP status.
    #[error("request failed: {0}")]
    Request(String),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered, but the result could not be interpreted.
    #[error("unexpected response: {0}")]
    Decode(String),
}
