// Copyright (c) 2026 LTO Network. MIT License.
// See LICENSE for details.

//! # LTO Client Core
//!
//! Account identity and transaction signing for LTO Network clients.
//!
//! - **account**: an address plus Ed25519 sign and X25519 encrypt key pairs;
//!   sign, verify, encrypt and decrypt messages.
//! - **address**: network addresses and their network byte.
//! - **crypto**: keys, detached signatures and authenticated boxes.
//! - **encoding**: base58 and base64 text encodings.
//! - **transaction**: the shared transaction base and the signing protocol.
//! - **config**: protocol constants.
//! - **logging**: subscriber setup for binaries built on this crate.
//!
//! Concrete transaction types (transfer, anchor, ...) live outside this
//! crate. They embed a [`TransactionBase`], implement [`CanonicalEncode`]
//! and [`Transaction`], and get signing, proof verification and record
//! conversion from the provided methods.

pub mod account;
pub mod address;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod logging;
pub mod transaction;

pub use account::{Account, AccountError};
pub use address::{Address, AddressError};
pub use crypto::{Key, KeyError, KeyPair, KeyRole, Signature};
pub use encoding::{Encoding, EncodingError};
pub use transaction::{
    CanonicalEncode, SigningState, Transaction, TransactionBase, TransactionError, TransactionId,
};
