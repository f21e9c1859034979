//! Token encryption for the config file.
//!
//! The gateway bearer token is stored as `base64([nonce (12 bytes)][ciphertext])`
//! using AES-256-GCM with a fresh random nonce per encryption.

use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, AeadCore, KeyInit, Nonce, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::{Error, Result};

const NONCE_LEN: usize = 12;

/// Obfuscation key for tokens at rest. Protects against casual reading of the
/// config file, not against someone holding the binary.
const TOKEN_KEY: &[u8; 32] = b"iot-console/gateway-token/v1!!!!";

/// Encrypt a token for storage
pub fn encrypt_token(plain_text: &str) -> Result<String> {
    let cipher = Aes256Gcm::new(TOKEN_KEY.into());
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plain_text.as_bytes())
        .map_err(|e| Error::Invalid {
            message: format!("Token encryption failed: {e}"),
        })?;

    let mut combined = nonce.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(combined))
}

/// Decrypt a token produced by [`encrypt_token`]
pub fn decrypt_token(cipher_text: &str) -> Result<String> {
    let data = BASE64.decode(cipher_text.trim()).map_err(|e| Error::Invalid {
        message: format!("Token is not base64: {e}"),
    })?;

    if data.len() <= NONCE_LEN {
        return Err(Error::Invalid {
            message: "Token ciphertext too short".to_string(),
        });
    }

    let cipher = Aes256Gcm::new(TOKEN_KEY.into());
    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let nonce = Nonce::<Aes256Gcm>::from_slice(nonce_bytes);

    let plain = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| Error::Invalid {
            message: format!("Token decryption failed: {e}"),
        })?;

    String::from_utf8(plain).map_err(|e| Error::Invalid {
        message: format!("Token is not UTF-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = "eyJhbGciOiJIUzI1NiJ9.payload.sig";
        let stored = encrypt_token(token).expect("encrypts");
        assert_ne!(stored, token);
        assert_eq!(decrypt_token(&stored).expect("decrypts"), token);
    }

    #[test]
    fn test_plaintext_is_rejected() {
        assert!(decrypt_token("eyJhbGciOiJIUzI1NiJ9.payload.sig").is_err());
        assert!(decrypt_token("AQIDBA==").is_err());
    }
}
