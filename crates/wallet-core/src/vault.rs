//! On-disk master seed storage.
//!
//! The vault holds exactly one [`SeedRecord`]: the 64-byte BIP-39 seed,
//! either in plaintext or sealed with AES-256-GCM under SHA-256(password).

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crypto_utils::encryption;
use crypto_utils::SecretBytes;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;
use crate::mnemonic::mnemonic_to_seed;

/// Default seed file, relative to the working directory.
pub const DEFAULT_SEED_FILE: &str = "seed.dat";

/// The persisted seed record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SeedRecord {
    /// Plain seed, or `nonce || ciphertext || tag` when encrypted.
    pub master_seed: Vec<u8>,
    #[zeroize(skip)]
    pub is_encrypted: bool,
}

impl SeedRecord {
    /// Seal `seed` under `password`. An empty password stores it in the clear.
    pub fn seal(seed: &[u8], password: &SecretString) -> Result<Self, WalletError> {
        if password.expose_secret().is_empty() {
            return Ok(Self {
                master_seed: seed.to_vec(),
                is_encrypted: false,
            });
        }

        Ok(Self {
            master_seed: encryption::seal(seed, password)?,
            is_encrypted: true,
        })
    }

    /// Recover the raw seed. The password is ignored for plaintext records.
    pub fn unseal(&self, password: &SecretString) -> Result<SecretBytes, WalletError> {
        if !self.is_encrypted {
            return Ok(SecretBytes::from(self.master_seed.as_slice()));
        }
        Ok(encryption::open(&self.master_seed, password)?)
    }
}

impl fmt::Debug for SeedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedRecord")
            .field("master_seed", &format_args!("[REDACTED; {}]", self.master_seed.len()))
            .field("is_encrypted", &self.is_encrypted)
            .finish()
    }
}

/// A seed file at a fixed path.
#[derive(Debug, Clone)]
pub struct SeedVault {
    path: PathBuf,
}

impl Default for SeedVault {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_FILE)
    }
}

impl SeedVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Import `mnemonic`, seal its seed and overwrite the vault file.
    pub fn generate(
        &self,
        mnemonic: &str,
        password: &SecretString,
    ) -> Result<SeedRecord, WalletError> {
        let seed = mnemonic_to_seed(mnemonic)?;
        let record = SeedRecord::seal(&seed, password)?;
        self.save(&record)?;
        tracing::info!(
            path = %self.path.display(),
            encrypted = record.is_encrypted,
            "seed record written"
        );
        Ok(record)
    }

    /// Replace the record atomically: the JSON goes to an owner-only
    /// (0600) temporary file beside the target, which is then renamed over it.
    pub fn save(&self, record: &SeedRecord) -> Result<(), WalletError> {
        let write_failed = |e: &dyn fmt::Display| {
            WalletError::StorageWriteFailed(format!("{}: {e}", self.path.display()))
        };

        let mut bytes = serde_json::to_vec(record).map_err(|e| write_failed(&e))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let written = NamedTempFile::new_in(dir).and_then(|mut tmp| {
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            Ok(tmp)
        });
        bytes.zeroize();

        written
            .map_err(|e| write_failed(&e))?
            .persist(&self.path)
            .map_err(|e| write_failed(&e.error))?;
        Ok(())
    }

    pub fn load(&self) -> Result<SeedRecord, WalletError> {
        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                WalletError::StorageNotFound(format!("{}: {e}", self.path.display()))
            }
            _ => WalletError::StorageCorrupt(format!("{}: {e}", self.path.display())),
        })?;

        serde_json::from_slice(&bytes)
            .map_err(|e| WalletError::StorageCorrupt(format!("{}: {e}", self.path.display())))
    }

    /// Load the record and unseal it in one step.
    pub fn unlock(&self, password: &SecretString) -> Result<SecretBytes, WalletError> {
        self.load()?.unseal(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::mnemonic_to_seed;
    use tempfile::TempDir;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn vault_in(dir: &TempDir) -> SeedVault {
        SeedVault::new(dir.path().join("seed.dat"))
    }

    fn password(p: &str) -> SecretString {
        SecretString::from(p.to_owned())
    }

    #[test]
    fn encrypted_round_trip() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);

        let record = vault.generate(TEST_MNEMONIC, &password("hunter2")).unwrap();
        assert!(record.is_encrypted);

        let loaded = vault.load().unwrap();
        assert_eq!(loaded, record);

        let seed = loaded.unseal(&password("hunter2")).unwrap();
        let expected = mnemonic_to_seed(TEST_MNEMONIC).unwrap();
        assert_eq!(&seed[..], &expected[..]);
    }

    #[test]
    fn wrong_password_fails() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);
        vault.generate(TEST_MNEMONIC, &password("hunter2")).unwrap();

        assert!(matches!(
            vault.unlock(&password("hunter3")),
            Err(WalletError::DecryptionFailed(_))
        ));
        assert!(matches!(
            vault.unlock(&password("")),
            Err(WalletError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn empty_password_stores_plaintext() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);

        let record = vault.generate(TEST_MNEMONIC, &password("")).unwrap();
        assert!(!record.is_encrypted);
        assert_eq!(record.master_seed.len(), 64);

        // Any password opens a plaintext record.
        let seed = vault.unlock(&password("ignored")).unwrap();
        assert_eq!(&seed[..], record.master_seed.as_slice());
    }

    #[test]
    fn sealed_seed_has_nonce_and_tag() {
        let seed = [7u8; 64];
        let record = SeedRecord::seal(&seed, &password("pw")).unwrap();
        assert_eq!(
            record.master_seed.len(),
            encryption::NONCE_SIZE + 64 + encryption::TAG_SIZE
        );
    }

    #[test]
    fn truncated_blob_fails_decryption() {
        let record = SeedRecord {
            master_seed: vec![0u8; 5],
            is_encrypted: true,
        };
        assert!(matches!(
            record.unseal(&password("pw")),
            Err(WalletError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn invalid_mnemonic_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);

        let result = vault.generate("not a mnemonic", &password("pw"));
        assert!(matches!(result, Err(WalletError::InvalidMnemonic(_))));
        assert!(!vault.path().exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);
        assert!(matches!(vault.load(), Err(WalletError::StorageNotFound(_))));
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);
        fs::write(vault.path(), b"\x00\x01not json").unwrap();
        assert!(matches!(vault.load(), Err(WalletError::StorageCorrupt(_))));
    }

    #[test]
    fn generate_overwrites_previous_record() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);
        vault.generate(TEST_MNEMONIC, &password("")).unwrap();
        vault.generate(TEST_MNEMONIC, &password("pw")).unwrap();
        assert!(vault.load().unwrap().is_encrypted);
    }

    #[test]
    fn save_replaces_record_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);
        vault.generate(TEST_MNEMONIC, &password("")).unwrap();
        vault.generate(TEST_MNEMONIC, &password("pw")).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("seed.dat")]);
    }

    #[cfg(unix)]
    #[test]
    fn record_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir);
        vault.generate(TEST_MNEMONIC, &password("")).unwrap();

        let mode = fs::metadata(vault.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let vault = SeedVault::new(dir.path().join("absent").join("seed.dat"));
        assert!(matches!(
            vault.generate(TEST_MNEMONIC, &password("")),
            Err(WalletError::StorageWriteFailed(_))
        ));
    }

    #[test]
    fn debug_redacts_seed() {
        let record = SeedRecord {
            master_seed: vec![0xab; 64],
            is_encrypted: false,
        };
        let debug = format!("{record:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }
}
