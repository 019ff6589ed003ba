//! Envelope Module
//!
//! Confidentiality wrapping for every payload leaving the gateway.

mod cipher;

pub use cipher::{EncryptedEnvelope, EnvelopeCipher, IV_LENGTH, KEY_LENGTH};
