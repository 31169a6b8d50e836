use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authentication tag did not verify, or the blob is malformed.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_encryption_failed() {
        let err = CryptoError::EncryptionFailed("aead seal error".into());
        assert_eq!(err.to_string(), "encryption failed: aead seal error");
    }

    #[test]
    fn display_decryption_failed() {
        let err = CryptoError::DecryptionFailed("tag mismatch".into());
        assert_eq!(err.to_string(), "decryption failed: tag mismatch");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(CryptoError::DecryptionFailed("bad tag".into()));
        assert!(err.to_string().contains("bad tag"));
    }
}
