use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// Authenticated encryption for values stored in client cookies.
///
/// The 256-bit key is the SHA-256 digest of the server secret, so rotating
/// `SESSION_SECRET` invalidates every stored value. Ciphertexts are
/// `base64url(nonce || ciphertext)` without padding.
#[derive(Clone)]
pub struct CookieCipher {
    cipher: Aes256Gcm,
}

impl CookieCipher {
    pub fn from_secret(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    /// Encrypts `plaintext` under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| anyhow!("Encryption failed: {e}"))?;

        let mut combined = nonce.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(combined))
    }

    /// Decrypts a value produced by [`CookieCipher::encrypt`].
    /// Fails on bad encoding, truncation, tampering or a different key.
    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let combined = general_purpose::URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| anyhow!("Failed to decode ciphertext: {e}"))?;

        if combined.len() <= NONCE_LEN {
            return Err(anyhow!("Ciphertext too short"));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|e| anyhow!("Decryption failed: {e}"))?;

        String::from_utf8(plaintext).map_err(|e| anyhow!("Decrypted value is not UTF-8: {e}"))
    }
}
