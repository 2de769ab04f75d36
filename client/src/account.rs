//! # Accounts
//!
//! An [`Account`] is an address plus two key pairs: Ed25519 for signing and
//! X25519 for encryption. It is a stateless facade: every operation is a
//! pure function of the keys and its arguments, except `encrypt`, which also
//! draws one nonce from the account's [`NonceSource`].
//!
//! Accounts never change after construction. Rotating keys means building a
//! new account. Peer accounts passed to [`Account::encrypt`],
//! [`Account::decrypt`] are only borrowed.
//!
//! ## Ciphertext layout
//!
//! ```text
//! mac (16) || box ciphertext (len(message)) || nonce (24)
//! ```
//!
//! The nonce goes at the end. [`Account::decrypt`] expects exactly this.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::address::Address;
use crate::crypto::boxes::{self, BoxError, BoxNonce, NonceSource, OsNonce};
use crate::crypto::keys::{Key, KeyError, KeyPair, Signature};
use crate::encoding::encode_tagged;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The operation that needed a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Sign,
    Verify,
    Encrypt,
    Decrypt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sign => f.write_str("sign"),
            Self::Verify => f.write_str("verify"),
            Self::Encrypt => f.write_str("encrypt"),
            Self::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Which key was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKey {
    SecretSign,
    PublicSign,
    SecretEncrypt,
    PublicEncrypt,
}

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecretSign => f.write_str("secret sign key"),
            Self::PublicSign => f.write_str("public sign key"),
            Self::SecretEncrypt => f.write_str("secret encryption key"),
            Self::PublicEncrypt => f.write_str("public encryption key"),
        }
    }
}

/// Whose key was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOwner {
    Own,
    Recipient,
    Sender,
}

impl fmt::Display for KeyOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Own => Ok(()),
            Self::Recipient => f.write_str(" for recipient"),
            Self::Sender => f.write_str(" for sender"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// A key half the operation needs is absent (e.g. a watch-only account).
    #[error("unable to {operation} message; no {key}{owner}")]
    MissingKey {
        operation: Operation,
        key: MissingKey,
        owner: KeyOwner,
    },

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Box(#[from] BoxError),
}

fn missing(operation: Operation, key: MissingKey, owner: KeyOwner) -> AccountError {
    AccountError::MissingKey {
        operation,
        key,
        owner,
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// An address with its signing and encryption key pairs.
///
/// Cheap to clone: the nonce source is shared.
#[derive(Clone)]
pub struct Account {
    address: Address,
    encrypt: KeyPair,
    sign: KeyPair,
    nonces: Arc<dyn NonceSource>,
}

impl Account {
    pub fn new(address: Address, encrypt: KeyPair, sign: KeyPair) -> Self {
        Self {
            address,
            encrypt,
            sign,
            nonces: Arc::new(OsNonce),
        }
    }

    /// Full account from a single Ed25519 secret.
    ///
    /// The encryption pair is converted from the signing secret, so one
    /// secret backs up both.
    pub fn from_sign_secret(address: Address, sign_secret: &[u8]) -> Result<Self, KeyError> {
        let sign = KeyPair::sign_from_secret(sign_secret)?;
        let encrypt = KeyPair::encrypt_from_sign_secret(sign_secret)?;
        Ok(Self::new(address, encrypt, sign))
    }

    /// Account with public keys only. Can verify and be encrypted to.
    pub fn watch_only(address: Address, sign_public: Key, encrypt_public: Key) -> Self {
        Self::new(
            address,
            KeyPair::public_only(encrypt_public),
            KeyPair::public_only(sign_public),
        )
    }

    /// Replace the nonce source. Meant for deterministic tests.
    pub fn with_nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn address_base58(&self) -> String {
        self.address.to_base58()
    }

    /// Address text in the tagged encoding; `None` for unknown tags.
    pub fn address_encoded(&self, tag: &str) -> Option<String> {
        encode_tagged(self.address.as_bytes(), tag)
    }

    pub fn network(&self) -> u8 {
        self.address.network()
    }

    pub fn sign_key_pair(&self) -> &KeyPair {
        &self.sign
    }

    pub fn encrypt_key_pair(&self) -> &KeyPair {
        &self.encrypt
    }

    pub fn public_sign_key(&self) -> Option<&Key> {
        self.sign.public_key()
    }

    pub fn public_encrypt_key(&self) -> Option<&Key> {
        self.encrypt.public_key()
    }

    /// Errors unless this account holds a secret signing key.
    pub fn ensure_can_sign(&self) -> Result<&Key, AccountError> {
        self.sign
            .secret_key()
            .ok_or_else(|| missing(Operation::Sign, MissingKey::SecretSign, KeyOwner::Own))
    }

    // -- signatures ---------------------------------------------------------

    /// Detached signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, AccountError> {
        let secret = self.ensure_can_sign()?;
        let signature = Signature::sign(message, secret)?;
        debug!(address = %self.address, len = message.len(), "signed message");
        Ok(signature)
    }

    /// Check a signature made by this account.
    ///
    /// A bad signature is `Ok(false)`.
    pub fn verify(&self, signature: &Signature, message: &[u8]) -> Result<bool, AccountError> {
        let public = self
            .sign
            .public_key()
            .ok_or_else(|| missing(Operation::Verify, MissingKey::PublicSign, KeyOwner::Own))?;
        Ok(signature.verify(public, message)?)
    }

    // -- encryption ---------------------------------------------------------

    /// Encrypt `message` for `recipient`.
    ///
    /// Output is `sealed_box || nonce`.
    pub fn encrypt(&self, recipient: &Account, message: &[u8]) -> Result<Vec<u8>, AccountError> {
        let secret = self.encrypt.secret_key().ok_or_else(|| {
            missing(Operation::Encrypt, MissingKey::SecretEncrypt, KeyOwner::Own)
        })?;
        let recipient_public = recipient.encrypt.public_key().ok_or_else(|| {
            missing(Operation::Encrypt, MissingKey::PublicEncrypt, KeyOwner::Recipient)
        })?;

        let nonce = self.nonce();
        let mut out = boxes::box_seal(
            &nonce,
            message,
            recipient_public.as_bytes(),
            secret.as_bytes(),
        )?;
        out.extend_from_slice(&nonce);

        debug!(
            from = %self.address,
            to = %recipient.address,
            len = out.len(),
            "encrypted message"
        );
        Ok(out)
    }

    /// Decrypt a ciphertext that `sender` produced for this account.
    pub fn decrypt(&self, sender: &Account, ciphertext: &[u8]) -> Result<Vec<u8>, AccountError> {
        let secret = self.encrypt.secret_key().ok_or_else(|| {
            missing(Operation::Decrypt, MissingKey::SecretEncrypt, KeyOwner::Own)
        })?;
        let sender_public = sender.encrypt.public_key().ok_or_else(|| {
            missing(Operation::Decrypt, MissingKey::PublicEncrypt, KeyOwner::Sender)
        })?;

        let (sealed, nonce) = boxes::split_nonce(ciphertext)?;
        let message = boxes::box_open(&nonce, sealed, sender_public.as_bytes(), secret.as_bytes())
            .map_err(|err| {
                if err == BoxError::DecryptionFailed {
                    warn!(from = %sender.address, to = %self.address, "box authentication failed");
                }
                err
            })?;

        debug!(from = %sender.address, to = %self.address, len = message.len(), "decrypted message");
        Ok(message)
    }

    /// Next box nonce from this account's nonce source.
    pub fn nonce(&self) -> BoxNonce {
        self.nonces.next_nonce()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("sign", &self.sign)
            .field("encrypt", &self.encrypt)
            .finish()
    }
}
