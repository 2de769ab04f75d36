//! # Crypto Provider
//!
//! The primitives the account and transaction layers are built on:
//!
//! - **Ed25519** detached signatures (`ed25519-dalek`).
//! - **X25519-XSalsa20-Poly1305** authenticated boxes (`crypto_box`).
//! - **OS randomness** for nonces and key generation.
//!
//! Nothing in here invents cryptography. Each function is a typed wrapper
//! that fixes lengths and maps library errors onto this crate's error enums.

pub mod boxes;
pub mod keys;
pub mod signatures;

pub use boxes::{box_open, box_seal, BoxError, BoxNonce, FixedNonce, NonceSource, OsNonce};
pub use keys::{Key, KeyError, KeyPair, KeyRole, Signature};
pub use signatures::{sign_detached, verify_detached};
