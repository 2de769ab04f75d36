//! # Detached Signatures
//!
//! Ed25519 sign/verify over raw byte slices. This is the only place the crate
//! talks to `ed25519-dalek`; [`Signature`](super::keys::Signature) and the
//! account layer go through these functions.
//!
//! Verification is boolean. A signature that fails to verify, has the wrong
//! length, or comes with a public key that isn't a curve point is `false`.
//! Only a public key of the wrong length is an error.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};

use super::keys::{KeyError, KeyRole};
use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, SIGN_SECRET_KEY_LENGTH, SIGN_SEED_LENGTH};

/// Parse an Ed25519 secret: 32-byte seed or 64-byte `seed || public`.
pub(crate) fn signing_key(secret: &[u8]) -> Result<SigningKey, KeyError> {
    match secret.len() {
        SIGN_SEED_LENGTH => {
            let mut seed = [0u8; SIGN_SEED_LENGTH];
            seed.copy_from_slice(secret);
            Ok(SigningKey::from_bytes(&seed))
        }
        SIGN_SECRET_KEY_LENGTH => {
            let mut keypair = [0u8; SIGN_SECRET_KEY_LENGTH];
            keypair.copy_from_slice(secret);
            SigningKey::from_keypair_bytes(&keypair).map_err(|_| KeyError::KeypairMismatch)
        }
        got => Err(KeyError::InvalidSignSecret { got }),
    }
}

/// Produce a detached signature over `message`.
pub fn sign_detached(message: &[u8], secret_key: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], KeyError> {
    let signing_key = signing_key(secret_key)?;
    Ok(signing_key.sign(message).to_bytes())
}

/// Check a detached signature.
///
/// Errors only when `public_key` is not 32 bytes.
pub fn verify_detached(signature: &[u8], message: &[u8], public_key: &[u8]) -> Result<bool, KeyError> {
    let pk_bytes: [u8; PUBLIC_KEY_LENGTH] =
        public_key.try_into().map_err(|_| KeyError::InvalidKeyLength {
            role: KeyRole::Public,
            expected: PUBLIC_KEY_LENGTH,
            got: public_key.len(),
        })?;

    let Ok(verifying_key) = VerifyingKey::from_bytes(&pk_bytes) else {
        return Ok(false);
    };
    let Ok(sig_bytes) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
        return Ok(false);
    };
    let signature = DalekSignature::from_bytes(&sig_bytes);
    Ok(verifying_key.verify(message, &signature).is_ok())
}

/// Public key for an Ed25519 secret in either layout.
pub fn public_from_secret(secret_key: &[u8]) -> Result<[u8; PUBLIC_KEY_LENGTH], KeyError> {
    Ok(signing_key(secret_key)?.verifying_key().to_bytes())
}
