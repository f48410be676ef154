// tests/integrity_tests.rs
mod common;

use std::fs;
use std::io::Write;

use common::{read_string, Dirs, SAMPLE_CSV};
use csv_sentinel::error::CoreError;
use csv_sentinel::fingerprint::{fingerprint, generate_checksum};
use csv_sentinel::integrity::{check_integrity, verify_file_integrity, IntegrityCheck};
use csv_sentinel::store::{FingerprintStore, FsFingerprintStore, MemoryFingerprintStore};

#[test]
fn test_first_run_bootstraps_and_passes() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let store = FsFingerprintStore::new(&dirs.output);

    assert!(verify_file_integrity(&csv_path, &store).unwrap());

    let sidecar = dirs.output_file("sample.checksum");
    assert!(sidecar.exists());
    assert_eq!(read_string(&sidecar), fingerprint(SAMPLE_CSV.as_bytes()));
    assert_eq!(fs::read_dir(&dirs.output).unwrap().count(), 1);
}

#[test]
fn test_bootstrap_reports_digest() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let store = MemoryFingerprintStore::new();

    let check = check_integrity(&csv_path, &store).unwrap();
    assert_eq!(
        check,
        IntegrityCheck::Bootstrapped {
            digest: fingerprint(SAMPLE_CSV.as_bytes())
        }
    );
    assert_eq!(check_integrity(&csv_path, &store).unwrap(), IntegrityCheck::Verified);
}

#[test]
fn test_unchanged_file_verifies() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let store = FsFingerprintStore::new(&dirs.output);
    generate_checksum(&csv_path, &store).unwrap();

    assert!(verify_file_integrity(&csv_path, &store).unwrap());
}

#[test]
fn test_tampered_file_fails_and_record_is_kept() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let store = FsFingerprintStore::new(&dirs.output);
    generate_checksum(&csv_path, &store).unwrap();
    let before = read_string(&dirs.output_file("sample.checksum"));

    fs::OpenOptions::new()
        .append(true)
        .open(&csv_path)
        .unwrap()
        .write_all(b"X")
        .unwrap();

    assert!(!verify_file_integrity(&csv_path, &store).unwrap());
    // a plain verify never rewrites the baseline
    assert_eq!(read_string(&dirs.output_file("sample.checksum")), before);
    assert!(!verify_file_integrity(&csv_path, &store).unwrap());
}

#[test]
fn test_mismatch_carries_both_digests() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let store = MemoryFingerprintStore::new();
    store.save("sample", &"0".repeat(64)).unwrap();

    match check_integrity(&csv_path, &store).unwrap() {
        IntegrityCheck::Mismatch { expected, actual } => {
            assert_eq!(expected, "0".repeat(64));
            assert_eq!(actual, fingerprint(SAMPLE_CSV.as_bytes()));
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_regenerating_checksum_rebaselines() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let store = FsFingerprintStore::new(&dirs.output);
    verify_file_integrity(&csv_path, &store).unwrap();

    fs::write(&csv_path, format!("{SAMPLE_CSV}Tampered,row,123,999\n")).unwrap();
    assert!(!verify_file_integrity(&csv_path, &store).unwrap());

    generate_checksum(&csv_path, &store).unwrap();
    assert!(verify_file_integrity(&csv_path, &store).unwrap());
}

#[test]
fn test_stored_digest_whitespace_is_trimmed() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let digest = fingerprint(SAMPLE_CSV.as_bytes());
    fs::write(dirs.output_file("sample.checksum"), format!("{digest}\n  ")).unwrap();

    let store = FsFingerprintStore::new(&dirs.output);
    assert!(verify_file_integrity(&csv_path, &store).unwrap());
}

#[test]
fn test_line_ending_conversion_still_verifies() {
    let dirs = Dirs::new();
    let csv_path = dirs.write_sample();
    let store = MemoryFingerprintStore::new();
    verify_file_integrity(&csv_path, &store).unwrap();

    fs::write(&csv_path, SAMPLE_CSV.replace('\n', "\r\n")).unwrap();
    assert!(verify_file_integrity(&csv_path, &store).unwrap());
}

#[test]
fn test_verify_file_not_found() {
    let store = MemoryFingerprintStore::new();
    let result = verify_file_integrity("/nonexistent/file.csv", &store);
    assert!(matches!(result, Err(CoreError::NotFound(_))));
    assert!(store.is_empty());
}
