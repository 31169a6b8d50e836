use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::kdf::password_key;
use crate::random::random_bytes_fixed;
use crate::zeroizing::SecretBytes;

/// AES-256-GCM nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// AES-256-GCM authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Seals `plaintext` under a key derived from `password`.
///
/// Output layout: `[nonce (12 bytes) | ciphertext | tag (16 bytes)]`.
pub fn seal(plaintext: &[u8], password: &SecretString) -> Result<Vec<u8>, CryptoError> {
    let mut key = password_key(password.expose_secret().as_bytes());
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    key.zeroize();

    let nonce_bytes: [u8; NONCE_SIZE] = random_bytes_fixed();
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&ciphertext);

    Ok(output)
}

/// Opens a blob produced by [`seal`].
///
/// A wrong password and a corrupted blob are indistinguishable: both fail the
/// tag check and yield [`CryptoError::DecryptionFailed`].
pub fn open(sealed: &[u8], password: &SecretString) -> Result<SecretBytes, CryptoError> {
    if sealed.len() < NONCE_SIZE {
        return Err(CryptoError::DecryptionFailed(format!(
            "sealed data too short: expected at least {} bytes, got {}",
            NONCE_SIZE,
            sealed.len()
        )));
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);

    let mut key = password_key(password.expose_secret().as_bytes());
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    key.zeroize();

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map(SecretBytes::new)
        .map_err(|_| CryptoError::DecryptionFailed("authentication tag mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn seal_open_roundtrip() {
        let seed = [0x5Au8; 64];
        let sealed = seal(&seed, &password("correct horse")).unwrap();
        let opened = open(&sealed, &password("correct horse")).unwrap();
        assert_eq!(&*opened, &seed[..]);
    }

    #[test]
    fn sealed_layout_is_nonce_ciphertext_tag() {
        let sealed = seal(b"test", &password("pw")).unwrap();
        assert_eq!(sealed.len(), NONCE_SIZE + 4 + TAG_SIZE);
    }

    #[test]
    fn fresh_nonce_every_seal() {
        let a = seal(b"same seed", &password("pw")).unwrap();
        let b = seal(b"same seed", &password("pw")).unwrap();
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_password_fails() {
        let sealed = seal(b"secret seed", &password("right")).unwrap();
        match open(&sealed, &password("wrong")) {
            Err(CryptoError::DecryptionFailed(_)) => {}
            other => panic!("expected DecryptionFailed, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn tampered_tag_fails() {
        let mut sealed = seal(b"tamper test", &password("pw")).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(open(&sealed, &password("pw")).is_err());
    }

    #[test]
    fn tampered_nonce_fails() {
        let mut sealed = seal(b"tamper test", &password("pw")).unwrap();
        sealed[0] ^= 0x80;
        assert!(open(&sealed, &password("pw")).is_err());
    }

    #[test]
    fn shorter_than_nonce_fails() {
        let err = open(&[0u8; 5], &password("pw")).unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn nonce_only_fails_tag_check() {
        assert!(open(&[0u8; NONCE_SIZE], &password("pw")).is_err());
    }
}
