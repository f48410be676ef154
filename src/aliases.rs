// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! The pipeline holds exactly one secret: the externally provisioned
//! encryption key. It zeroizes on drop.

pub use secure_gate::fixed_alias;

// 256-bit key for AES Crypt v3 payloads
fixed_alias!(EncryptionKey32, 32);
