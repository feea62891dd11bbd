use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

use personnel_core_api::{CoreError, CoreResult};

/// Fixed sentinel returned for any unreadable ciphertext. A corrupt sensitive
/// field must not block viewing the rest of the record.
pub const DECRYPT_ERROR_SENTINEL: &str = "[Decryption Error]";

/// AES-GCM nonce size (96 bits).
const NONCE_SIZE: usize = 12;

/// AES-256 key size.
const KEY_SIZE: usize = 32;

/// Symmetric cipher for sensitive field values.
///
/// Constructed once at process start and injected into every consumer; the
/// key is read-only after initialization and safe to share across callers.
/// Tokens are `base64(nonce || ciphertext)`. Key rotation is out of scope
/// and requires re-encrypting stored values out of band.
pub struct FieldCipher {
    cipher: Option<Aes256Gcm>,
}

impl FieldCipher {
    /// Strict constructor: rejects missing or malformed key material so a
    /// deployment that requires confidentiality refuses to start.
    pub fn new(key: &[u8]) -> CoreResult<Self> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| {
            CoreError::EncryptionUnavailable(format!(
                "expected a {KEY_SIZE}-byte key, got {} bytes",
                key.len()
            ))
        })?;
        Ok(Self {
            cipher: Some(cipher),
        })
    }

    /// Strict constructor from a base64-encoded key.
    pub fn from_base64(key: &str) -> CoreResult<Self> {
        let bytes = BASE64
            .decode(key)
            .map_err(|e| CoreError::EncryptionUnavailable(format!("key is not valid base64: {e}")))?;
        Self::new(&bytes)
    }

    /// Explicitly degraded mode: with no usable key, both paths pass data
    /// through unchanged. Callers opt in knowingly; never the default.
    pub fn permissive(key: Option<&[u8]>) -> Self {
        let cipher = key.and_then(|k| Aes256Gcm::new_from_slice(k).ok());
        if cipher.is_none() {
            tracing::warn!("field cipher running without a key; sensitive fields are stored in plaintext");
        }
        Self { cipher }
    }

    pub fn is_configured(&self) -> bool {
        self.cipher.is_some()
    }

    /// Fresh random 256-bit key, for provisioning and tests.
    pub fn generate_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        key
    }

    /// Encrypt a field value into a token. Empty input short-circuits to
    /// itself; an unconfigured permissive cipher passes the value through.
    pub fn encrypt(&self, plaintext: &str) -> CoreResult<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let Some(cipher) = &self.cipher else {
            return Ok(plaintext.to_string());
        };

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CoreError::InternalError("field encryption failed".to_string()))?;

        let mut token = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        token.extend_from_slice(&nonce_bytes);
        token.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(token))
    }

    /// Decrypt a token back into the field value. Malformed, truncated or
    /// wrong-key tokens degrade to the sentinel instead of failing the
    /// caller's transaction.
    pub fn decrypt(&self, token: &str) -> String {
        if token.is_empty() {
            return String::new();
        }
        let Some(cipher) = &self.cipher else {
            return token.to_string();
        };

        match self.try_decrypt(cipher, token) {
            Some(plaintext) => plaintext,
            None => {
                tracing::warn!("unreadable sensitive-field token; returning sentinel");
                DECRYPT_ERROR_SENTINEL.to_string()
            }
        }
    }

    fn try_decrypt(&self, cipher: &Aes256Gcm, token: &str) -> Option<String> {
        let raw = BASE64.decode(token).ok()?;
        if raw.len() <= NONCE_SIZE {
            return None;
        }
        let nonce = Nonce::from_slice(&raw[..NONCE_SIZE]);
        let plaintext = cipher.decrypt(nonce, &raw[NONCE_SIZE..]).ok()?;
        String::from_utf8(plaintext).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> FieldCipher {
        FieldCipher::new(&FieldCipher::generate_key()).unwrap()
    }

    #[test]
    fn round_trip_law() {
        let cipher = configured();
        let token = cipher.encrypt("75000.50").unwrap();
        assert_ne!(token, "75000.50");
        assert_eq!(cipher.decrypt(&token), "75000.50");
    }

    #[test]
    fn empty_input_short_circuits_both_paths() {
        let cipher = configured();
        assert_eq!(cipher.encrypt("").unwrap(), "");
        assert_eq!(cipher.decrypt(""), "");
    }

    #[test]
    fn wrong_key_yields_sentinel_not_plaintext() {
        let token = configured().encrypt("secret").unwrap();
        let other = configured();
        let out = other.decrypt(&token);
        assert_eq!(out, DECRYPT_ERROR_SENTINEL);
        assert_ne!(out, "secret");
    }

    #[test]
    fn tampered_token_yields_sentinel() {
        let cipher = configured();
        let token = cipher.encrypt("secret").unwrap();
        let mut raw = BASE64.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        assert_eq!(cipher.decrypt(&BASE64.encode(raw)), DECRYPT_ERROR_SENTINEL);
    }

    #[test]
    fn truncated_and_garbage_tokens_yield_sentinel() {
        let cipher = configured();
        assert_eq!(cipher.decrypt("AAAA"), DECRYPT_ERROR_SENTINEL);
        assert_eq!(cipher.decrypt("not base64 at all!"), DECRYPT_ERROR_SENTINEL);
    }

    #[test]
    fn strict_constructor_rejects_bad_key_material() {
        assert!(matches!(
            FieldCipher::new(&[1, 2, 3]),
            Err(CoreError::EncryptionUnavailable(_))
        ));
        assert!(matches!(
            FieldCipher::from_base64("###"),
            Err(CoreError::EncryptionUnavailable(_))
        ));
    }

    #[test]
    fn unconfigured_permissive_passes_through() {
        let cipher = FieldCipher::permissive(None);
        assert!(!cipher.is_configured());
        assert_eq!(cipher.encrypt("95000").unwrap(), "95000");
        assert_eq!(cipher.decrypt("95000"), "95000");
    }

    #[test]
    fn permissive_with_valid_key_still_encrypts() {
        let key = FieldCipher::generate_key();
        let cipher = FieldCipher::permissive(Some(&key));
        assert!(cipher.is_configured());
        let token = cipher.encrypt("value").unwrap();
        assert_ne!(token, "value");
        assert_eq!(cipher.decrypt(&token), "value");
    }
}
