//! AES-256-GCM protection of owner tracker credentials.
//!
//! Stored form: standard base64 of `nonce (12 bytes) || ciphertext+tag`. A
//! fresh random nonce is drawn for every encryption.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use domain::{Credential, CredentialVault, EncryptedCredential, VaultError};
use rand::rngs::OsRng;
use rand::RngCore;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Symmetric vault keyed by one 256-bit master key.
#[derive(Clone)]
pub struct AesGcmVault {
    cipher: Aes256Gcm,
}

impl AesGcmVault {
    /// Creates a vault from raw key bytes.
    ///
    /// # Errors
    ///
    /// [`VaultError::Key`] unless `key` is exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, VaultError> {
        if key.len() != KEY_LEN {
            return Err(VaultError::Key(format!(
                "expected {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|_| VaultError::Key("rejected by cipher".into()))?;
        Ok(Self { cipher })
    }

    /// Creates a vault from a base64-encoded key (as held in configuration).
    pub fn from_base64_key(encoded: &str) -> Result<Self, VaultError> {
        let key = BASE64
            .decode(encoded.trim().as_bytes())
            .map_err(|err| VaultError::Key(format!("not valid base64: {err}")))?;
        Self::new(&key)
    }

    /// Generates a random key, base64-encoded, suitable for configuration.
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }

    /// Encrypts a plaintext credential for storage.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedCredential, VaultError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| VaultError::Decryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(EncryptedCredential::new(BASE64.encode(sealed)))
    }

    fn open(&self, ciphertext: &EncryptedCredential) -> Result<Credential, VaultError> {
        let sealed = BASE64
            .decode(ciphertext.as_str().as_bytes())
            .map_err(|_| VaultError::Decryption)?;
        if sealed.len() <= NONCE_LEN {
            return Err(VaultError::Decryption);
        }
        let (nonce, body) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|_| VaultError::Decryption)?;
        let secret = String::from_utf8(plaintext).map_err(|_| VaultError::Decryption)?;
        Ok(Credential::new(secret))
    }
}

impl std::fmt::Debug for AesGcmVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesGcmVault(<key redacted>)")
    }
}

#[async_trait]
impl CredentialVault for AesGcmVault {
    async fn decrypt(&self, ciphertext: &EncryptedCredential) -> Result<Credential, VaultError> {
        self.open(ciphertext)
    }
}
