//! # crypto-utils
//!
//! Password-keyed sealing of secret material at rest, OS randomness, and
//! zeroize-on-drop buffers for seeds and passwords.

pub mod encryption;
pub mod error;
pub mod kdf;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
pub use zeroizing::SecretBytes;
