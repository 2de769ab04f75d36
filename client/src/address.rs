//! Network addresses.
//!
//! An [`Address`] is opaque routing bytes plus the network byte it belongs
//! to. Checksum and version validation belong to the address format itself;
//! this type only reads the network byte out of position 1 when the caller
//! doesn't supply one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{network_name, ADDRESS_NETWORK_OFFSET};
use crate::encoding::{encode_tagged, Encoding, EncodingError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("malformed address: {len} bytes carry no network id")]
    Malformed { len: usize },
}

/// Raw address bytes tagged with a network id.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    bytes: Vec<u8>,
    network: u8,
}

impl Address {
    pub fn new(bytes: impl Into<Vec<u8>>, network: u8) -> Self {
        Self {
            bytes: bytes.into(),
            network,
        }
    }

    /// Build from raw bytes, reading the network id out of the address itself.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, AddressError> {
        let bytes = bytes.into();
        let network = *bytes
            .get(ADDRESS_NETWORK_OFFSET)
            .ok_or(AddressError::Malformed { len: bytes.len() })?;
        Ok(Self { bytes, network })
    }

    /// Decode text. With `network` unset the id comes from the decoded bytes.
    pub fn from_encoded(
        text: &str,
        encoding: Encoding,
        network: Option<u8>,
    ) -> Result<Self, AddressError> {
        let bytes = encoding.decode(text)?;
        match network {
            Some(network) => Ok(Self::new(bytes, network)),
            None => Self::from_bytes(bytes),
        }
    }

    /// Decode a base58 address whose network id is self-described.
    pub fn from_base58(text: &str) -> Result<Self, AddressError> {
        Self::from_encoded(text, Encoding::Base58, None)
    }

    /// Decode a base58 address on an explicitly named network.
    pub fn from_base58_on(text: &str, network: u8) -> Result<Self, AddressError> {
        Self::from_encoded(text, Encoding::Base58, Some(network))
    }

    pub fn network(&self) -> u8 {
        self.network
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_encoded(&self, encoding: Encoding) -> String {
        encoding.encode(&self.bytes)
    }

    /// Encode with a string tag; unknown tags yield `None`.
    pub fn to_encoded_tagged(&self, tag: &str) -> Option<String> {
        encode_tagged(&self.bytes, tag)
    }

    pub fn to_base58(&self) -> String {
        self.to_encoded(Encoding::Base58)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}, {})", self.to_base58(), network_name(self.network))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base58(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_base58()
    }
}
