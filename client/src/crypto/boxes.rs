//! # Authenticated Boxes
//!
//! Public-key authenticated encryption between two X25519 key pairs, using
//! X25519-XSalsa20-Poly1305 (`crypto_box` in NaCl terms). The sealed output
//! is `mac(16) || ciphertext`, byte-compatible with libsodium's
//! `crypto_box_easy`.
//!
//! ## Nonces
//!
//! Every box needs a 24-byte nonce that is never reused for the same key
//! pair. Reuse one and an observer gets the XOR of two plaintexts for free.
//! Nonces come from a [`NonceSource`]; the default is the OS RNG, and at 192
//! bits a random collision is not something anyone will live to see.
//! [`FixedNonce`] exists for known-answer tests. Shipping it to production
//! is how incident reports get written.
//!
//! The account layer appends the nonce to the sealed box
//! (`mac || ciphertext || nonce`); [`split_nonce`] undoes that.

use std::fmt;

use crypto_box::aead::generic_array::GenericArray;
use crypto_box::aead::Aead;
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::config::{BOX_NONCE_LENGTH, ENCRYPT_SECRET_KEY_LENGTH, PUBLIC_KEY_LENGTH};

/// A box nonce.
pub type BoxNonce = [u8; BOX_NONCE_LENGTH];

/// Errors from sealing and opening boxes.
///
/// `DecryptionFailed` covers a wrong key, a wrong nonce and tampered bytes
/// alike; callers learn nothing about which one it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoxError {
    #[error("ciphertext too short: {len} bytes, need at least {min}")]
    MalformedCiphertext { len: usize, min: usize },

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptionFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("invalid box key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Nonce sources
// ---------------------------------------------------------------------------

/// Supplier of box nonces.
///
/// Implementations must be safe to call from several threads at once and
/// must not hand out the same nonce twice (except test doubles).
pub trait NonceSource: Send + Sync + fmt::Debug {
    fn next_nonce(&self) -> BoxNonce;
}

/// Nonces from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonce;

impl NonceSource for OsNonce {
    fn next_nonce(&self) -> BoxNonce {
        let mut nonce = [0u8; BOX_NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }
}

/// Always returns the same nonce. Test use only.
#[derive(Debug, Clone, Copy)]
pub struct FixedNonce(pub BoxNonce);

impl FixedNonce {
    pub fn zeroed() -> Self {
        Self([0u8; BOX_NONCE_LENGTH])
    }
}

impl NonceSource for FixedNonce {
    fn next_nonce(&self) -> BoxNonce {
        self.0
    }
}

/// `n` bytes from the OS RNG.
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n];
    OsRng.fill_bytes(&mut out);
    out
}

// ---------------------------------------------------------------------------
// Seal / open
// ---------------------------------------------------------------------------

fn public_key(bytes: &[u8]) -> Result<PublicKey, BoxError> {
    let arr: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| BoxError::InvalidKeyLength {
        expected: PUBLIC_KEY_LENGTH,
        got: bytes.len(),
    })?;
    Ok(PublicKey::from(arr))
}

fn secret_key(bytes: &[u8]) -> Result<SecretKey, BoxError> {
    let arr: [u8; ENCRYPT_SECRET_KEY_LENGTH] =
        bytes.try_into().map_err(|_| BoxError::InvalidKeyLength {
            expected: ENCRYPT_SECRET_KEY_LENGTH,
            got: bytes.len(),
        })?;
    Ok(SecretKey::from(arr))
}

/// Seal `message` for `recipient_public`, authenticated by `sender_secret`.
///
/// Returns `mac || ciphertext`, 16 bytes longer than `message`.
pub fn box_seal(
    nonce: &BoxNonce,
    message: &[u8],
    recipient_public: &[u8],
    sender_secret: &[u8],
) -> Result<Vec<u8>, BoxError> {
    let salsa_box = SalsaBox::new(&public_key(recipient_public)?, &secret_key(sender_secret)?);
    salsa_box
        .encrypt(GenericArray::from_slice(nonce), message)
        .map_err(|_| BoxError::EncryptionFailed)
}

/// Open a box sealed by `sender_public` for the holder of `recipient_secret`.
pub fn box_open(
    nonce: &BoxNonce,
    sealed: &[u8],
    sender_public: &[u8],
    recipient_secret: &[u8],
) -> Result<Vec<u8>, BoxError> {
    let salsa_box = SalsaBox::new(&public_key(sender_public)?, &secret_key(recipient_secret)?);
    salsa_box
        .decrypt(GenericArray::from_slice(nonce), sealed)
        .map_err(|_| BoxError::DecryptionFailed)
}

/// Split `sealed || nonce` into its parts.
///
/// Inputs shorter than the nonce are [`BoxError::MalformedCiphertext`].
pub fn split_nonce(ciphertext: &[u8]) -> Result<(&[u8], BoxNonce), BoxError> {
    if ciphertext.len() < BOX_NONCE_LENGTH {
        return Err(BoxError::MalformedCiphertext {
            len: ciphertext.len(),
            min: BOX_NONCE_LENGTH,
        });
    }
    let (sealed, nonce_bytes) = ciphertext.split_at(ciphertext.len() - BOX_NONCE_LENGTH);
    let mut nonce = [0u8; BOX_NONCE_LENGTH];
    nonce.copy_from_slice(nonce_bytes);
    Ok((sealed, nonce))
}
