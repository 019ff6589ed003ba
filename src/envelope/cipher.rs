//! Envelope Cipher Module
//!
//! AES-256-CBC sealing of JSON payloads under the process-wide secret key.

use std::fmt;

use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

// == Public Constants ==
/// Secret key length in bytes (AES-256)
pub const KEY_LENGTH: usize = 32;

/// Initialization vector length in bytes (one AES block)
pub const IV_LENGTH: usize = 16;

// == Encrypted Envelope ==
/// Wire form of a sealed payload: `{"iv": "...", "encryptedData": "..."}`.
///
/// Both fields are lowercase hex. The envelope carries no authentication
/// tag, so tampering in transit is not detectable by the receiver; it only
/// provides confidentiality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    pub iv: String,
    pub encrypted_data: String,
}

// == Envelope Cipher ==
/// Seals payloads with AES-256-CBC and a fresh random IV per call.
#[derive(Clone)]
pub struct EnvelopeCipher {
    key: [u8; KEY_LENGTH],
}

impl fmt::Debug for EnvelopeCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeCipher")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl EnvelopeCipher {
    // == Constructors ==
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Builds a cipher from a hex (64 chars) or standard base64 encoded key.
    ///
    /// Errors never echo the key material.
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(GatewayError::Configuration(
                "SECRET_KEY is empty".to_string(),
            ));
        }

        let bytes = if encoded.len() == KEY_LENGTH * 2 {
            hex::decode(encoded).map_err(|_| {
                GatewayError::Configuration("SECRET_KEY is not valid hex".to_string())
            })?
        } else {
            STANDARD.decode(encoded).map_err(|_| {
                GatewayError::Configuration(
                    "SECRET_KEY must be 64 hex characters or base64".to_string(),
                )
            })?
        };

        let key: [u8; KEY_LENGTH] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            GatewayError::Configuration(format!(
                "SECRET_KEY must decode to {} bytes, got {}",
                KEY_LENGTH,
                bytes.len()
            ))
        })?;

        Ok(Self::new(key))
    }

    // == Seal ==
    /// Encrypts the compact JSON form of `payload` under a new random IV.
    ///
    /// Object keys serialize in sorted order, so equal payloads always have
    /// the same plaintext.
    pub fn seal(&self, payload: &Value) -> EncryptedEnvelope {
        let plaintext = payload.to_string();

        let mut iv = [0u8; IV_LENGTH];
        rand::thread_rng().fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        EncryptedEnvelope {
            iv: hex::encode(iv),
            encrypted_data: hex::encode(ciphertext),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::BlockDecryptMut;
    use serde_json::json;

    type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

    const HEX_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn open(key: [u8; KEY_LENGTH], envelope: &EncryptedEnvelope) -> Value {
        let iv: [u8; IV_LENGTH] = hex::decode(&envelope.iv).unwrap().try_into().unwrap();
        let ciphertext = hex::decode(&envelope.encrypted_data).unwrap();
        let plaintext = Aes256CbcDec::new(&key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .unwrap();
        serde_json::from_slice(&plaintext).unwrap()
    }

    fn key_bytes() -> [u8; KEY_LENGTH] {
        hex::decode(HEX_KEY).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_from_hex_key() {
        assert!(EnvelopeCipher::from_encoded(HEX_KEY).is_ok());
    }

    #[test]
    fn test_from_base64_key() {
        let encoded = STANDARD.encode(key_bytes());
        let from_b64 = EnvelopeCipher::from_encoded(&encoded).unwrap();
        assert_eq!(from_b64.key, key_bytes());
    }

    #[test]
    fn test_malformed_keys_are_rejected() {
        let not_hex = "g".repeat(64);
        let short = STANDARD.encode([0u8; 16]);

        for bad in ["", "   ", "zz", not_hex.as_str(), short.as_str()] {
            assert!(
                matches!(
                    EnvelopeCipher::from_encoded(bad),
                    Err(GatewayError::Configuration(_))
                ),
                "key {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let cipher = EnvelopeCipher::from_encoded(HEX_KEY).unwrap();
        let debug = format!("{:?}", cipher);
        assert!(debug.contains("redacted"));
        assert!(!debug.contains("0001020304"));
    }

    #[test]
    fn test_seal_round_trips_through_client_decryption() {
        let cipher = EnvelopeCipher::new(key_bytes());
        let payload = json!({ "status": "success", "results": [{ "title": "వార్తలు" }] });

        let envelope = cipher.seal(&payload);

        assert_eq!(envelope.iv.len(), IV_LENGTH * 2);
        assert_eq!(envelope.encrypted_data.len() % 32, 0);
        assert_eq!(open(key_bytes(), &envelope), payload);
    }

    #[test]
    fn test_same_payload_seals_differently() {
        let cipher = EnvelopeCipher::new(key_bytes());
        let payload = json!({ "page": 1 });

        let first = cipher.seal(&payload);
        let second = cipher.seal(&payload);

        assert_ne!(first.iv, second.iv);
        assert_ne!(first.encrypted_data, second.encrypted_data);
        assert_eq!(open(key_bytes(), &first), open(key_bytes(), &second));
    }

    #[test]
    fn test_envelope_wire_shape() {
        let cipher = EnvelopeCipher::new(key_bytes());
        let json = serde_json::to_value(cipher.seal(&json!(null))).unwrap();

        assert!(json["iv"].is_string());
        assert!(json["encryptedData"].is_string());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
