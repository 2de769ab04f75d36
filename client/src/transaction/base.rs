//! Fields shared by every transaction type.
//!
//! [`TransactionBase`] carries type, version, fee, timestamp, sender and the
//! proof list. Concrete transaction types embed one and expose it through
//! [`Transaction::base`](super::Transaction::base).
//!
//! Sender and timestamp are explicit `Option`s. A transaction with no sender
//! is [`SigningState::Pending`]; the first `sign_with` fills sender, sender
//! public key and (if still unset) timestamp, moving it to
//! [`SigningState::Addressed`]. Those fields are never touched again.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::record;
use super::TransactionError;
use crate::account::Account;
use crate::address::Address;
use crate::crypto::keys::{Key, KeyRole, Signature};
use crate::crypto::signatures;
use crate::encoding::{base58_decode, base58_encode, EncodingError};

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// Server-assigned (or subtype-derived) transaction id. Base58 on the wire.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(Vec<u8>);

impl TransactionId {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_base58(text: &str) -> Result<Self, EncodingError> {
        Ok(Self(base58_decode(text)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        base58_encode(&self.0)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base58(&value)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.to_base58()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// SigningState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningState {
    /// No sender yet. Built in code and never signed.
    Pending,
    /// Sender fixed, by a first signature or by the record it was read from.
    Addressed,
}

// ---------------------------------------------------------------------------
// TransactionBase
// ---------------------------------------------------------------------------

/// Current wall-clock time in microseconds, at millisecond precision.
pub fn now_micros() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0) * 1000
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBase {
    tx_type: u8,
    version: u8,
    fee: u64,
    timestamp: Option<u64>,
    id: Option<TransactionId>,
    height: Option<u64>,
    sender: Option<Address>,
    sender_public_key: Option<Key>,
    proofs: Vec<Signature>,
}

impl TransactionBase {
    /// A pending transaction: no sender, timestamp, id or proofs.
    pub fn new(tx_type: u8, version: u8, fee: u64) -> Self {
        Self {
            tx_type,
            version,
            fee,
            timestamp: None,
            id: None,
            height: None,
            sender: None,
            sender_public_key: None,
            proofs: Vec::new(),
        }
    }

    /// Read the shared fields from a structured record.
    ///
    /// Required: `type`, `version`, `fee`, `timestamp`, `sender`,
    /// `senderPublicKey`, `proofs`. Optional: `height`, `id`, `chainId`.
    /// With `chainId` present the sender address is bound to it; otherwise
    /// the network byte is read from the address.
    pub fn from_record(record: &Value) -> Result<Self, TransactionError> {
        let height = record::read_opt_u64(record, "height")?;
        let tx_type = record::read_u8(record, "type")?;
        let version = record::read_u8(record, "version")?;
        let fee = record::read_u64(record, "fee")?;
        let timestamp = record::read_u64(record, "timestamp")?;

        let id = record::read_opt_str(record, "id")?
            .map(TransactionId::from_base58)
            .transpose()
            .map_err(|e| TransactionError::malformed("id", e.to_string()))?;

        let sender_text = record::read_str(record, "sender")?;
        let sender = match record::read_opt_u8(record, "chainId")? {
            Some(chain_id) => Address::from_base58_on(sender_text, chain_id),
            None => Address::from_base58(sender_text),
        }
        .map_err(|e| TransactionError::malformed("sender", e.to_string()))?;

        let sender_public_key =
            Key::from_base58(record::read_str(record, "senderPublicKey")?, KeyRole::Public)
                .map_err(|e| TransactionError::malformed("senderPublicKey", e.to_string()))?;

        let proofs = record::read_str_list(record, "proofs")?
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                Signature::from_base58(text).map_err(|e| {
                    TransactionError::malformed("proofs", format!("entry {}: {}", i, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tx_type,
            version,
            fee,
            timestamp: Some(timestamp),
            id,
            height,
            sender: Some(sender),
            sender_public_key: Some(sender_public_key),
            proofs,
        })
    }

    /// Shared fields as a JSON object. Unset optional fields are left out.
    pub fn to_record(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".into(), json!(id.to_base58()));
        }
        map.insert("type".into(), json!(self.tx_type));
        map.insert("version".into(), json!(self.version));
        if let Some(sender) = &self.sender {
            map.insert("sender".into(), json!(sender.to_base58()));
            map.insert("chainId".into(), json!(sender.network()));
        }
        if let Some(key) = &self.sender_public_key {
            map.insert("senderPublicKey".into(), json!(key.to_base58()));
        }
        map.insert("fee".into(), json!(self.fee));
        if let Some(timestamp) = self.timestamp {
            map.insert("timestamp".into(), json!(timestamp));
        }
        map.insert(
            "proofs".into(),
            Value::Array(self.proofs.iter().map(|p| json!(p.to_base58())).collect()),
        );
        if let Some(height) = self.height {
            map.insert("height".into(), json!(height));
        }
        Value::Object(map)
    }

    /// Fix the timestamp ahead of signing.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Record an id derived by the concrete transaction type.
    pub fn set_id(&mut self, id: TransactionId) {
        self.id = Some(id);
    }

    // -- accessors ----------------------------------------------------------

    pub fn tx_type(&self) -> u8 {
        self.tx_type
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn id(&self) -> Option<&TransactionId> {
        self.id.as_ref()
    }

    pub fn height(&self) -> Option<u64> {
        self.height
    }

    pub fn sender(&self) -> Option<&Address> {
        self.sender.as_ref()
    }

    pub fn sender_public_key(&self) -> Option<&Key> {
        self.sender_public_key.as_ref()
    }

    pub fn proofs(&self) -> &[Signature] {
        &self.proofs
    }

    pub fn state(&self) -> SigningState {
        match self.sender {
            Some(_) => SigningState::Addressed,
            None => SigningState::Pending,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.state() == SigningState::Addressed
    }

    /// Network id of the sender.
    pub fn network(&self) -> Result<u8, TransactionError> {
        self.sender
            .as_ref()
            .map(Address::network)
            .ok_or(TransactionError::NotSigned)
    }

    // -- signing lifecycle --------------------------------------------------

    /// Fill sender, sender public key and timestamp from `account` where unset.
    ///
    /// The sender public key is resolved before anything is written, so an
    /// account whose key can't be read leaves the base unchanged.
    pub(crate) fn address_with(&mut self, account: &Account) -> Result<(), TransactionError> {
        if self.sender.is_none() {
            let public = match account.public_sign_key() {
                Some(key) => key.clone(),
                None => {
                    let secret = account.ensure_can_sign()?;
                    Key::public(signatures::public_from_secret(secret.as_bytes())?)
                }
            };
            self.sender = Some(account.address().clone());
            self.sender_public_key = Some(public);
        }
        if self.timestamp.is_none() {
            self.timestamp = Some(now_micros());
        }
        Ok(())
    }

    pub(crate) fn push_proof(&mut self, proof: Signature) {
        self.proofs.push(proof);
    }
}
