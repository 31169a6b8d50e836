use sha2::{Digest, Sha256};

/// Derives the 32-byte AES-256 key used to seal the master seed.
///
/// The key is a single unsalted SHA-256 over the UTF-8 password bytes.
pub fn password_key(password: &[u8]) -> [u8; 32] {
    Sha256::digest(password).into()
}
