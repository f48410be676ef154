// tests/cipher_tests.rs
mod common;

use std::fs;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use common::{read_string, Dirs, SAMPLE_CSV};
use csv_sentinel::cipher::*;
use csv_sentinel::consts::AESCRYPT_V3_HEADER;
use csv_sentinel::error::CoreError;
use csv_sentinel::file_ops::{decrypt_csv_output, encrypt_csv_output};
use csv_sentinel::mask::Masker;

#[test]
fn test_encrypt_decrypt_roundtrip_in_memory() {
    common::setup();
    let key = generate_key();
    let ciphertext = encrypt_to_vec(b"Attack at dawn!", Some(&key)).unwrap();
    let decrypted = decrypt_to_vec(&ciphertext, Some(&key)).unwrap();

    assert_eq!(&ciphertext[..5], AESCRYPT_V3_HEADER);
    assert!(is_aescrypt_payload(&ciphertext));
    assert_eq!(decrypted, b"Attack at dawn!");
}

#[test]
fn test_roundtrip_empty_and_binary() {
    let key = generate_key();
    for plaintext in [Vec::new(), (0..=255u8).collect::<Vec<u8>>()] {
        let ciphertext = encrypt_to_vec(&plaintext, Some(&key)).unwrap();
        assert_eq!(decrypt_to_vec(&ciphertext, Some(&key)).unwrap(), plaintext);
    }
}

#[test]
fn test_fresh_iv_per_call() {
    let key = generate_key();
    let a = encrypt_to_vec(b"same input", Some(&key)).unwrap();
    let b = encrypt_to_vec(b"same input", Some(&key)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_decrypt_fails_with_wrong_key() {
    let key1 = generate_key();
    let key2 = generate_key();
    let ciphertext = encrypt_to_vec(b"secret", Some(&key1)).unwrap();

    let wrong = decrypt_to_vec(&ciphertext, Some(&key2));
    assert!(matches!(wrong, Err(CoreError::DecryptionFailed)));
}

#[test]
fn test_decrypt_detects_tampering() {
    let key = generate_key();
    let ciphertext = encrypt_to_vec(SAMPLE_CSV.as_bytes(), Some(&key)).unwrap();

    let mut flipped_tail = ciphertext.clone();
    let last = flipped_tail.len() - 1;
    flipped_tail[last] ^= 0x01;
    assert!(matches!(
        decrypt_to_vec(&flipped_tail, Some(&key)),
        Err(CoreError::DecryptionFailed)
    ));

    let truncated = &ciphertext[..ciphertext.len() / 2];
    assert!(matches!(
        decrypt_to_vec(truncated, Some(&key)),
        Err(CoreError::DecryptionFailed)
    ));

    assert!(matches!(
        decrypt_to_vec(b"not an aescrypt payload", Some(&key)),
        Err(CoreError::DecryptionFailed)
    ));
}

#[test]
fn test_missing_key_is_distinct_error() {
    assert!(matches!(
        encrypt_to_vec(b"data", None),
        Err(CoreError::KeyNotConfigured)
    ));
    assert!(matches!(
        decrypt_to_vec(b"AES\x03\x00", None),
        Err(CoreError::KeyNotConfigured)
    ));
    assert!(CoreError::KeyNotConfigured.is_key_missing());
    assert!(!CoreError::DecryptionFailed.is_key_missing());
}

#[test]
fn test_parse_key_accepts_hex_and_base64() {
    let raw = [7u8; 32];
    let from_hex = parse_key(&hex::encode(raw)).unwrap();
    let from_url = parse_key(&URL_SAFE.encode(raw)).unwrap();
    let from_std = parse_key(&format!("  {}\n", STANDARD.encode(raw))).unwrap();

    assert_eq!(from_hex.expose_secret(), &raw);
    assert_eq!(from_url.expose_secret(), &raw);
    assert_eq!(from_std.expose_secret(), &raw);
}

#[test]
fn test_parse_key_rejects_bad_input() {
    let half_key = hex::encode([1u8; 16]);
    for bad in ["", "   ", "tooshort", half_key.as_str(), "!!!not base64!!!"] {
        assert!(
            matches!(parse_key(bad), Err(CoreError::InvalidKey(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn test_key_representations_parse_back() {
    let key = generate_key();
    let repr = key_representations(&key);
    assert_eq!(repr.hex.len(), 64);
    assert_eq!(parse_key(&repr.hex).unwrap().expose_secret(), key.expose_secret());
    assert_eq!(
        parse_key(&repr.base64url).unwrap().expose_secret(),
        key.expose_secret()
    );
}

#[test]
fn test_encrypt_csv_output_roundtrip() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let key = generate_key();

    let enc_path = encrypt_csv_output(&csv_path, &dirs.output, Some(&key)).unwrap();
    assert_eq!(enc_path, dirs.output_file("sample_encrypted.bin"));

    let dec_path = decrypt_csv_output(&enc_path, &dirs.output, Some(&key), None).unwrap();
    assert_eq!(dec_path, dirs.output_file("sample_decrypted.csv"));
    assert_eq!(read_string(&dec_path), SAMPLE_CSV);
}

#[test]
fn test_decrypt_csv_output_masked() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let key = generate_key();
    let enc_path = encrypt_csv_output(&csv_path, &dirs.output, Some(&key)).unwrap();

    let dec_path =
        decrypt_csv_output(&enc_path, &dirs.output, Some(&key), Some(&Masker::default())).unwrap();

    assert_eq!(dec_path, dirs.output_file("sample_decrypted_masked.csv"));
    let content = read_string(&dec_path);
    assert!(content.contains("Alice"));
    assert!(!content.contains("123-45-6789"));
}

#[test]
fn test_encrypt_csv_output_without_key() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();

    let result = encrypt_csv_output(&csv_path, &dirs.output, None);
    assert!(matches!(result, Err(CoreError::KeyNotConfigured)));
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Encryption key not configured"));
    assert!(!dirs.output_file("sample_encrypted.bin").exists());
}

#[test]
fn test_decrypt_csv_output_wrong_key_writes_nothing() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let enc_path = encrypt_csv_output(&csv_path, &dirs.output, Some(&generate_key())).unwrap();

    let result = decrypt_csv_output(&enc_path, &dirs.output, Some(&generate_key()), None);
    assert!(matches!(result, Err(CoreError::DecryptionFailed)));
    assert!(result.unwrap_err().to_string().contains("Decryption failed"));
    assert!(!dirs.output_file("sample_decrypted.csv").exists());
}

#[test]
fn test_encrypted_input_missing() {
    let dirs = Dirs::new();
    let key = generate_key();
    let missing = dirs.input.join("nope_encrypted.bin");
    assert!(matches!(
        decrypt_csv_output(&missing, &dirs.output, Some(&key), None),
        Err(CoreError::NotFound(_))
    ));
    fs::write(&missing, b"").unwrap();
    assert!(matches!(
        decrypt_csv_output(&missing, &dirs.output, Some(&key), None),
        Err(CoreError::DecryptionFailed)
    ));
}
