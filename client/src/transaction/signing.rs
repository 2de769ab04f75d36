//! Signing transactions with an [`Account`].
//!
//! The signed payload is the concrete type's [`CanonicalEncode::to_binary`]
//! output. Each signature is appended to the proof list; a transaction may
//! carry proofs from several accounts.
//!
//! The first signature also fixes the sender. Sender, sender public key and
//! timestamp are filled from the signing account when unset and are part of
//! the canonical bytes from then on, so every later proof covers the same
//! payload.
//!
//! A signer that fails leaves no fingerprints: sender, key and timestamp are
//! rolled back and no proof is appended.

use tracing::debug;

use super::base::{SigningState, TransactionBase};
use super::TransactionError;
use crate::account::Account;
use crate::crypto::keys::{Key, Signature};

/// Canonical byte encoding of a concrete transaction type.
///
/// The layout is type specific. It must be deterministic and must include
/// the sender public key and timestamp once they are set.
pub trait CanonicalEncode {
    fn to_binary(&self) -> Vec<u8>;
}

/// Behaviour shared by every transaction type.
///
/// Implementors provide access to their [`TransactionBase`]; everything else
/// is provided.
pub trait Transaction: CanonicalEncode {
    fn base(&self) -> &TransactionBase;

    fn base_mut(&mut self) -> &mut TransactionBase;

    /// Sign with `account` and append the proof.
    ///
    /// On the first call sender, sender public key and timestamp default to
    /// the account's values and the current time. A call that fails leaves
    /// the transaction untouched.
    ///
    /// ```rust,no_run
    /// # use lto_client::account::Account;
    /// # use lto_client::transaction::{CanonicalEncode, Transaction, TransactionBase};
    /// struct Anchor {
    ///     base: TransactionBase,
    /// }
    ///
    /// impl CanonicalEncode for Anchor {
    ///     fn to_binary(&self) -> Vec<u8> {
    ///         vec![self.base.tx_type(), self.base.version()]
    ///     }
    /// }
    ///
    /// impl Transaction for Anchor {
    ///     fn base(&self) -> &TransactionBase {
    ///         &self.base
    ///     }
    ///     fn base_mut(&mut self) -> &mut TransactionBase {
    ///         &mut self.base
    ///     }
    /// }
    ///
    /// # fn run(account: &Account) -> Result<(), lto_client::transaction::TransactionError> {
    /// let mut tx = Anchor { base: TransactionBase::new(15, 1, 35_000_000) };
    /// tx.sign_with(account)?;
    /// assert!(tx.is_signed());
    /// # Ok(())
    /// # }
    /// ```
    fn sign_with(&mut self, account: &Account) -> Result<(), TransactionError> {
        account.ensure_can_sign()?;

        let snapshot = self.base().clone();
        self.base_mut().address_with(account)?;

        let proof = match account.sign(&self.to_binary()) {
            Ok(proof) => proof,
            Err(err) => {
                // Sender and timestamp must not stick to a signer that failed.
                *self.base_mut() = snapshot;
                return Err(err.into());
            }
        };
        self.base_mut().push_proof(proof);

        debug!(
            tx_type = self.base().tx_type(),
            signer = %account.address(),
            proofs = self.base().proofs().len(),
            "signed transaction"
        );
        Ok(())
    }

    /// Sign an already addressed transaction without mutating it.
    ///
    /// Lets co-signers produce proofs from a shared reference; the owner
    /// appends them with [`Transaction::add_proof`].
    fn proof_by(&self, account: &Account) -> Result<Signature, TransactionError> {
        if !self.is_signed() {
            return Err(TransactionError::NotSigned);
        }
        Ok(account.sign(&self.to_binary())?)
    }

    fn add_proof(&mut self, proof: Signature) {
        self.base_mut().push_proof(proof);
    }

    /// Check proof `index` against `public_key` over the canonical bytes.
    fn verify_proof(&self, index: usize, public_key: &Key) -> Result<bool, TransactionError> {
        let proofs = self.base().proofs();
        let proof = proofs.get(index).ok_or(TransactionError::InvalidProofIndex {
            index,
            len: proofs.len(),
        })?;
        Ok(proof.verify(public_key, &self.to_binary())?)
    }

    fn is_signed(&self) -> bool {
        self.base().is_signed()
    }

    fn state(&self) -> SigningState {
        self.base().state()
    }

    /// Network id of the sender. [`TransactionError::NotSigned`] before the
    /// first signature.
    fn network(&self) -> Result<u8, TransactionError> {
        self.base().network()
    }

    fn proofs(&self) -> &[Signature] {
        self.base().proofs()
    }

    fn to_record(&self) -> serde_json::Value {
        self.base().to_record()
    }
}
