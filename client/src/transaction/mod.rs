//! Transactions.
//!
//! The shared base lives in [`base`]; signing and proof handling are
//! provided methods on the [`Transaction`] trait in [`signing`]. Concrete
//! transaction types supply their canonical byte encoding through
//! [`CanonicalEncode`] and get the rest for free.

pub mod base;
pub mod record;
pub mod signing;

use thiserror::Error;

use crate::account::AccountError;
use crate::crypto::keys::KeyError;

pub use base::{now_micros, SigningState, TransactionBase, TransactionId};
pub use signing::{CanonicalEncode, Transaction};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("malformed transaction: field `{field}` {reason}")]
    Malformed { field: &'static str, reason: String },

    #[error("transaction has no sender; sign it first")]
    NotSigned,

    #[error("no proof at index {index}; transaction has {len}")]
    InvalidProofIndex { index: usize, len: usize },

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

impl TransactionError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            reason: reason.into(),
        }
    }
}
