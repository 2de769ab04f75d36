//! # Keys, Key Pairs and Signatures
//!
//! Value types wrapping raw key and signature bytes. A [`Key`] is a tagged
//! byte buffer that knows whether it is public or secret; a [`KeyPair`]
//! holds either half, or both. Nothing here is mutable after construction.
//!
//! Two algorithms share these types:
//!
//! - **Ed25519** for signing keys. A secret signing key is either the 32-byte
//!   seed or the 64-byte libsodium layout `seed || public_key`.
//! - **X25519** for encryption keys. Secret and public halves are 32 bytes.
//!
//! Key bytes are never logged and never printed by `Debug` for secret keys.

use std::fmt;
use std::hash::{Hash, Hasher};

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use thiserror::Error;

use super::signatures;
use crate::config::{ENCRYPT_SECRET_KEY_LENGTH, PUBLIC_KEY_LENGTH};
use crate::encoding::{Encoding, EncodingError};

/// Errors from key handling and signature verification.
///
/// Messages carry lengths, never key bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid {role} key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        role: KeyRole,
        expected: usize,
        got: usize,
    },

    #[error("invalid secret sign key: expected a 32-byte seed or 64-byte keypair, got {got} bytes")]
    InvalidSignSecret { got: usize },

    #[error("keypair validation failed: public half does not match the seed")]
    KeypairMismatch,

    #[error("expected a {expected} key, got a {got} key")]
    WrongRole { expected: KeyRole, got: KeyRole },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Which half of a key pair a [`Key`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Public,
    Secret,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Secret => f.write_str("secret"),
        }
    }
}

/// Raw key bytes tagged with their role.
///
/// Equality and hashing are byte-wise; the role is provenance, not identity.
#[derive(Clone)]
pub struct Key {
    bytes: Vec<u8>,
    role: KeyRole,
}

impl Key {
    pub fn new(bytes: impl Into<Vec<u8>>, role: KeyRole) -> Self {
        Self {
            bytes: bytes.into(),
            role,
        }
    }

    pub fn public(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, KeyRole::Public)
    }

    pub fn secret(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, KeyRole::Secret)
    }

    /// Decode a key from text in the given encoding.
    pub fn from_encoded(text: &str, encoding: Encoding, role: KeyRole) -> Result<Self, KeyError> {
        Ok(Self::new(encoding.decode(text)?, role))
    }

    /// Decode a base58 key.
    pub fn from_base58(text: &str, role: KeyRole) -> Result<Self, KeyError> {
        Self::from_encoded(text, Encoding::Base58, role)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn role(&self) -> KeyRole {
        self.role
    }

    pub fn is_public(&self) -> bool {
        self.role == KeyRole::Public
    }

    pub fn is_secret(&self) -> bool {
        self.role == KeyRole::Secret
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode the key bytes.
    pub fn to_encoded(&self, encoding: Encoding) -> String {
        encoding.encode(&self.bytes)
    }

    /// Encode with a string tag (`"base58"` or `"base64"`).
    ///
    /// Any other tag is an [`EncodingError::Unsupported`]; there is no
    /// fallback encoding.
    pub fn to_string_with(&self, tag: &str) -> Result<String, EncodingError> {
        Ok(self.to_encoded(tag.parse::<Encoding>()?))
    }

    pub fn to_base58(&self) -> String {
        self.to_encoded(Encoding::Base58)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            KeyRole::Public => write!(f, "Key(public, {})", self.to_base58()),
            KeyRole::Secret => write!(f, "Key(secret, {} bytes)", self.bytes.len()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            KeyRole::Public => f.write_str(&self.to_base58()),
            KeyRole::Secret => f.write_str("[secret key]"),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A public and/or secret key.
///
/// Either half may be absent. A watch-only account holds key pairs with only
/// the public half; operations that need the secret half report it missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeyPair {
    public: Option<Key>,
    secret: Option<Key>,
}

impl KeyPair {
    pub fn new(public: Option<Key>, secret: Option<Key>) -> Self {
        Self { public, secret }
    }

    pub fn public_only(public: Key) -> Self {
        Self {
            public: Some(public),
            secret: None,
        }
    }

    /// Ed25519 key pair from a 32-byte seed or 64-byte `seed || public` secret.
    ///
    /// The public half is re-derived from the seed. A 64-byte secret whose
    /// embedded public key disagrees is rejected.
    pub fn sign_from_secret(secret: &[u8]) -> Result<Self, KeyError> {
        let signing_key = signatures::signing_key(secret)?;
        Ok(Self {
            public: Some(Key::public(signing_key.verifying_key().to_bytes())),
            secret: Some(Key::secret(secret)),
        })
    }

    /// X25519 key pair from a 32-byte secret scalar.
    pub fn encrypt_from_secret(secret: &[u8]) -> Result<Self, KeyError> {
        let scalar: [u8; ENCRYPT_SECRET_KEY_LENGTH] =
            secret.try_into().map_err(|_| KeyError::InvalidKeyLength {
                role: KeyRole::Secret,
                expected: ENCRYPT_SECRET_KEY_LENGTH,
                got: secret.len(),
            })?;
        let public = x25519_dalek::x25519(scalar, x25519_dalek::X25519_BASEPOINT_BYTES);
        Ok(Self {
            public: Some(Key::public(public)),
            secret: Some(Key::secret(scalar)),
        })
    }

    /// X25519 key pair converted from an Ed25519 signing secret.
    ///
    /// The X25519 secret is the first half of SHA-512(seed), the same scalar
    /// Ed25519 signs with. Clamping is left to the X25519 function.
    pub fn encrypt_from_sign_secret(sign_secret: &[u8]) -> Result<Self, KeyError> {
        let signing_key = signatures::signing_key(sign_secret)?;
        let digest = Sha512::digest(signing_key.to_bytes());
        Self::encrypt_from_secret(&digest[..ENCRYPT_SECRET_KEY_LENGTH])
    }

    /// Fresh Ed25519 key pair (64-byte secret layout) from the OS RNG.
    pub fn generate_sign() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self {
            public: Some(Key::public(signing_key.verifying_key().to_bytes())),
            secret: Some(Key::secret(signing_key.to_keypair_bytes())),
        }
    }

    /// Fresh X25519 key pair from the OS RNG.
    pub fn generate_encrypt() -> Self {
        let mut scalar = [0u8; ENCRYPT_SECRET_KEY_LENGTH];
        OsRng.fill_bytes(&mut scalar);
        let public = x25519_dalek::x25519(scalar, x25519_dalek::X25519_BASEPOINT_BYTES);
        Self {
            public: Some(Key::public(public)),
            secret: Some(Key::secret(scalar)),
        }
    }

    pub fn public_key(&self) -> Option<&Key> {
        self.public.as_ref()
    }

    pub fn secret_key(&self) -> Option<&Key> {
        self.secret.as_ref()
    }

    pub fn has_public(&self) -> bool {
        self.public.is_some()
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Copy of this pair with the secret half dropped.
    pub fn to_public_only(&self) -> Self {
        Self {
            public: self.public.clone(),
            secret: None,
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public.as_ref().map(Key::to_base58))
            .field("has_secret", &self.secret.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A detached Ed25519 signature.
///
/// Stored as `Vec<u8>` so signatures read off the wire keep whatever length
/// they arrived with; a signature that isn't 64 bytes simply fails to verify.
/// Serializes as a base58 string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Signature {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Sign `message` with a secret signing key.
    pub fn sign(message: &[u8], secret_key: &Key) -> Result<Self, KeyError> {
        if !secret_key.is_secret() {
            return Err(KeyError::WrongRole {
                expected: KeyRole::Secret,
                got: secret_key.role(),
            });
        }
        let bytes = signatures::sign_detached(message, secret_key.as_bytes())?;
        Ok(Self::from_bytes(bytes))
    }

    /// Check this signature over `message` against a public signing key.
    ///
    /// A forged or mangled signature is `Ok(false)`. Only a public key of the
    /// wrong length is an error.
    pub fn verify(&self, public_key: &Key, message: &[u8]) -> Result<bool, KeyError> {
        if public_key.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidKeyLength {
                role: public_key.role(),
                expected: PUBLIC_KEY_LENGTH,
                got: public_key.len(),
            });
        }
        signatures::verify_detached(&self.bytes, message, public_key.as_bytes())
    }

    pub fn from_encoded(text: &str, encoding: Encoding) -> Result<Self, EncodingError> {
        Ok(Self::from_bytes(encoding.decode(text)?))
    }

    pub fn from_base58(text: &str) -> Result<Self, EncodingError> {
        Self::from_encoded(text, Encoding::Base58)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_encoded(&self, encoding: Encoding) -> String {
        encoding.encode(&self.bytes)
    }

    pub fn to_base58(&self) -> String {
        self.to_encoded(Encoding::Base58)
    }
}

impl TryFrom<String> for Signature {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base58(&value)
    }
}

impl From<Signature> for String {
    fn from(sig: Signature) -> Self {
        sig.to_base58()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_base58();
        if text.len() > 16 {
            write!(f, "Signature({}...{})", &text[..8], &text[text.len() - 8..])
        } else {
            write!(f, "Signature({})", text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::base58_decode;

    const SIGN_SECRET: &str =
        "wJ4WH8dD88fSkNdFQRjaAhjFUZzZhV5yiDLDwNUnp6bYwRXrvWV8MJhQ9HL9uqMDG1n7XpTGZx7PafqaayQV8Rp";
    const SIGN_PUBLIC: &str = "FkU1XyfrCftc4pQKXCrrDyRLSnifX1SMvmx1CYiiyB3Y";
    const ENCRYPT_SECRET: &str = "BnjFJJarge15FiqcxrB7Mzt68nseBXXR4LQ54qFBsWJN";
    const ENCRYPT_PUBLIC: &str = "BVv1ZuE3gKFa6krwWJQwEmrLYUESuUabNCXgYTmCoBt6";
    const HELLO_SIGNATURE: &str =
        "2DDGtVHrX66Ae8C4shFho4AqgojCBTcE4phbCRTm3qXCKPZZ7reJBXiiwxweQAkJ3Tsz6Xd3r5qgnbA67gdL5fWE";

    #[test]
    fn key_equality_ignores_role() {
        let a = Key::public(vec![1, 2, 3]);
        let b = Key::secret(vec![1, 2, 3]);
        assert_eq!(a, b);
        assert_ne!(a, Key::public(vec![1, 2, 4]));
    }

    #[test]
    fn key_to_string_with_known_and_unknown_tags() {
        let key = Key::public(b"hello".to_vec());
        assert_eq!(key.to_string_with("base58").unwrap(), "Cn8eVZg");
        assert_eq!(key.to_string_with("base64").unwrap(), "aGVsbG8=");
        assert_eq!(
            key.to_string_with("hex"),
            Err(EncodingError::Unsupported("hex".to_string()))
        );
    }

    #[test]
    fn secret_key_debug_does_not_leak() {
        let kp = KeyPair::generate_sign();
        let secret = kp.secret_key().unwrap();
        let debug = format!("{:?}", secret);
        assert_eq!(debug, "Key(secret, 64 bytes)");
        assert!(!format!("{:?}", kp).contains(&secret.to_base58()));
        assert_eq!(secret.to_string(), "[secret key]");
    }

    #[test]
    fn sign_pair_from_64_byte_secret_derives_public() {
        let secret = base58_decode(SIGN_SECRET).unwrap();
        let kp = KeyPair::sign_from_secret(&secret).unwrap();
        assert_eq!(kp.public_key().unwrap().to_base58(), SIGN_PUBLIC);
    }

    #[test]
    fn sign_pair_from_seed_matches_full_secret() {
        let secret = base58_decode(SIGN_SECRET).unwrap();
        let from_seed = KeyPair::sign_from_secret(&secret[..32]).unwrap();
        assert_eq!(from_seed.public_key().unwrap().to_base58(), SIGN_PUBLIC);
    }

    #[test]
    fn mismatched_keypair_bytes_are_rejected() {
        let mut secret = base58_decode(SIGN_SECRET).unwrap();
        secret[40] ^= 0xFF;
        assert_eq!(
            KeyPair::sign_from_secret(&secret),
            Err(KeyError::KeypairMismatch)
        );
    }

    #[test]
    fn odd_sign_secret_length_is_rejected() {
        assert_eq!(
            KeyPair::sign_from_secret(&[7u8; 48]),
            Err(KeyError::InvalidSignSecret { got: 48 })
        );
    }

    #[test]
    fn encrypt_pair_from_secret_derives_public() {
        let secret = base58_decode(ENCRYPT_SECRET).unwrap();
        let kp = KeyPair::encrypt_from_secret(&secret).unwrap();
        assert_eq!(kp.public_key().unwrap().to_base58(), ENCRYPT_PUBLIC);
    }

    #[test]
    fn encrypt_pair_converted_from_sign_secret() {
        let secret = base58_decode(SIGN_SECRET).unwrap();
        let kp = KeyPair::encrypt_from_sign_secret(&secret).unwrap();
        assert_eq!(kp.public_key().unwrap().to_base58(), ENCRYPT_PUBLIC);

        // The stored scalar is unclamped, same as ours.
        assert_eq!(kp.secret_key().unwrap().to_base58(), ENCRYPT_SECRET);
    }

    #[test]
    fn known_signature_vector() {
        let secret = Key::from_base58(SIGN_SECRET, KeyRole::Secret).unwrap();
        let public = Key::from_base58(SIGN_PUBLIC, KeyRole::Public).unwrap();

        let sig = Signature::sign(b"hello", &secret).unwrap();
        assert_eq!(sig.to_base58(), HELLO_SIGNATURE);
        assert!(sig.verify(&public, b"hello").unwrap());
        assert!(!sig.verify(&public, b"hallo").unwrap());
    }

    #[test]
    fn signing_with_public_key_is_rejected() {
        let kp = KeyPair::generate_sign();
        let err = Signature::sign(b"hello", kp.public_key().unwrap()).unwrap_err();
        assert_eq!(
            err,
            KeyError::WrongRole {
                expected: KeyRole::Secret,
                got: KeyRole::Public
            }
        );
    }

    #[test]
    fn verify_with_short_public_key_is_an_error() {
        let sig = Signature::from_bytes(vec![0u8; 64]);
        let err = sig.verify(&Key::public(vec![1u8; 16]), b"hello").unwrap_err();
        assert_eq!(
            err,
            KeyError::InvalidKeyLength {
                role: KeyRole::Public,
                expected: 32,
                got: 16
            }
        );
    }

    #[test]
    fn truncated_signature_verifies_false() {
        let kp = KeyPair::generate_sign();
        let sig = Signature::sign(b"hello", kp.secret_key().unwrap()).unwrap();
        let truncated = Signature::from_bytes(sig.as_bytes()[..40].to_vec());
        assert!(!truncated.verify(kp.public_key().unwrap(), b"hello").unwrap());
    }

    #[test]
    fn signature_serde_as_base58_string() {
        let sig = Signature::from_base58(HELLO_SIGNATURE).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", HELLO_SIGNATURE));
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn public_only_drops_secret() {
        let kp = KeyPair::generate_encrypt();
        let watch = kp.to_public_only();
        assert!(watch.has_public());
        assert!(!watch.has_secret());
        assert_eq!(watch.public_key(), kp.public_key());
    }
}
