// src/cipher.rs
//! Whole-buffer authenticated encryption: no file I/O
//!
//! Payloads are AES Crypt v3 streams (AES-256-CBC, random IV per call,
//! HMAC-SHA256 over header and ciphertext). The password fed to the format is
//! the hex rendering of the 32-byte key, so key + blob is all decryption needs.
//! A wrong key and a flipped bit look the same from here: both surface as
//! [`CoreError::DecryptionFailed`], never as garbage plaintext.

use std::io::Cursor;

use aescrypt_rs::aliases::Password;
use aescrypt_rs::{decrypt, encrypt};
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use tracing::debug;

use crate::aliases::EncryptionKey32;
use crate::consts::{AESCRYPT_V3_HEADER, KEY_KDF_ITERATIONS, KEY_LEN};
use crate::error::{CoreError, Result};

pub type Key = EncryptionKey32;

/// Generate a new random 256-bit key
#[inline]
pub fn generate_key() -> Key {
    Key::new(rand::random::<[u8; KEY_LEN]>())
}

/// Parse a provisioned key.
///
/// Accepts 64 hex chars, or base64 (URL-safe or standard, with or without
/// padding) of exactly 32 bytes. Fernet-style keys are the URL-safe form.
pub fn parse_key(text: &str) -> Result<Key> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::InvalidKey("key is empty".into()));
    }

    let bytes = if text.len() == KEY_LEN * 2 && text.bytes().all(|b| b.is_ascii_hexdigit()) {
        hex::decode(text).map_err(|e| CoreError::InvalidKey(e.to_string()))?
    } else {
        [&URL_SAFE, &STANDARD, &URL_SAFE_NO_PAD, &STANDARD_NO_PAD]
            .iter()
            .find_map(|engine| engine.decode(text).ok())
            .ok_or_else(|| CoreError::InvalidKey("expected 64 hex chars or base64".into()))?
    };

    let raw: [u8; KEY_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
        CoreError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", b.len()))
    })?;
    Ok(Key::new(raw))
}

/// String representations of a key for provisioning
#[derive(Debug, Clone)]
pub struct KeyRepr {
    pub hex: String,
    pub base64url: String,
}

pub fn key_representations(key: &Key) -> KeyRepr {
    KeyRepr {
        hex: hex::encode(key.expose_secret()),
        base64url: URL_SAFE.encode(key.expose_secret()),
    }
}

fn password_for(key: &Key) -> Password {
    Password::new(hex::encode(key.expose_secret()))
}

/// Encrypt plaintext → AES Crypt v3 payload (in-memory)
pub fn encrypt_to_vec(plaintext: &[u8], key: Option<&Key>) -> Result<Vec<u8>> {
    let key = key.ok_or(CoreError::KeyNotConfigured)?;
    let mut out = Vec::new();
    encrypt(
        Cursor::new(plaintext),
        &mut out,
        &password_for(key),
        KEY_KDF_ITERATIONS,
    )
    .map_err(CoreError::Crypto)?;
    Ok(out)
}

/// Decrypt an AES Crypt v3 payload → plaintext (in-memory)
///
/// Returns the plaintext only if the payload authenticates under `key`.
pub fn decrypt_to_vec(ciphertext: &[u8], key: Option<&Key>) -> Result<Vec<u8>> {
    let key = key.ok_or(CoreError::KeyNotConfigured)?;
    if !is_aescrypt_payload(ciphertext) {
        debug!(len = ciphertext.len(), "payload has no AES Crypt v3 header");
        return Err(CoreError::DecryptionFailed);
    }

    let mut out = Vec::new();
    decrypt(Cursor::new(ciphertext), &mut out, &password_for(key)).map_err(|err| {
        debug!(%err, "payload rejected");
        CoreError::DecryptionFailed
    })?;
    Ok(out)
}

/// Check for the AES Crypt v3 header
pub fn is_aescrypt_payload(data: &[u8]) -> bool {
    data.starts_with(AESCRYPT_V3_HEADER)
}
