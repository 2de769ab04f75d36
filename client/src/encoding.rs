//! # Text Codecs
//!
//! Base58 and base64 conversion for keys, signatures, addresses and
//! ciphertexts. Base58 (Bitcoin alphabet) is the network's canonical text
//! form; base64 (standard alphabet, padded) is accepted as an alternative.
//!
//! Two API levels exist:
//!
//! - [`Encoding`] is the typed tag. Parsing an unknown tag with
//!   [`str::parse`] fails with [`EncodingError::Unsupported`].
//! - [`encode_tagged`] / [`decode_tagged`] take a raw string tag and return
//!   `None` for anything they do not recognise. Callers use these to probe
//!   encodings; no other part of the crate is this permissive.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_ENCODING;

/// Errors from the codec layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// The requested encoding tag is not one of `base58` / `base64`.
    #[error("unsupported encoding: {0}")]
    Unsupported(String),

    /// The text is not valid in the requested encoding.
    #[error("invalid {encoding} text: {reason}")]
    Decode { encoding: Encoding, reason: String },
}

/// Supported textual encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Base58,
    Base64,
}

impl Encoding {
    /// Canonical lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base58 => "base58",
            Self::Base64 => "base64",
        }
    }

    /// Encode raw bytes to text.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base58 => bs58::encode(bytes).into_string(),
            Self::Base64 => BASE64.encode(bytes),
        }
    }

    /// Decode text to raw bytes.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            Self::Base58 => bs58::decode(text)
                .into_vec()
                .map_err(|e| EncodingError::Decode {
                    encoding: *self,
                    reason: e.to_string(),
                }),
            Self::Base64 => BASE64.decode(text).map_err(|e| EncodingError::Decode {
                encoding: *self,
                reason: e.to_string(),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Encoding {
    fn default() -> Self {
        DEFAULT_ENCODING
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base58" => Ok(Self::Base58),
            "base64" => Ok(Self::Base64),
            other => Err(EncodingError::Unsupported(other.to_string())),
        }
    }
}

/// Encode with a string tag. Unknown tags yield `None`.
pub fn encode_tagged(bytes: &[u8], tag: &str) -> Option<String> {
    tag.parse::<Encoding>().ok().map(|enc| enc.encode(bytes))
}

/// Decode with a string tag. Unknown tags and invalid text yield `None`.
pub fn decode_tagged(text: &str, tag: &str) -> Option<Vec<u8>> {
    tag.parse::<Encoding>().ok()?.decode(text).ok()
}

/// Base58 shorthand used throughout the crate.
pub fn base58_encode(bytes: &[u8]) -> String {
    Encoding::Base58.encode(bytes)
}

/// Base58 shorthand used throughout the crate.
pub fn base58_decode(text: &str) -> Result<Vec<u8>, EncodingError> {
    Encoding::Base58.decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("base58".parse::<Encoding>(), Ok(Encoding::Base58));
        assert_eq!("base64".parse::<Encoding>(), Ok(Encoding::Base64));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        assert_eq!(
            "hex".parse::<Encoding>(),
            Err(EncodingError::Unsupported("hex".to_string()))
        );
    }

    #[test]
    fn tagged_helpers_are_permissive() {
        assert_eq!(encode_tagged(b"abc", "raw"), None);
        assert_eq!(decode_tagged("abc", "raw"), None);
        assert_eq!(encode_tagged(b"hello", "base64").as_deref(), Some("aGVsbG8="));
        assert_eq!(decode_tagged("aGVsbG8=", "base64"), Some(b"hello".to_vec()));
    }

    #[test]
    fn base58_known_value() {
        // "hello" in the Bitcoin alphabet
        assert_eq!(base58_encode(b"hello"), "Cn8eVZg");
        assert_eq!(base58_decode("Cn8eVZg").unwrap(), b"hello");
    }

    #[test]
    fn base58_keeps_leading_zeros() {
        let bytes = [0u8, 0, 1, 2];
        let text = base58_encode(&bytes);
        assert!(text.starts_with("11"));
        assert_eq!(base58_decode(&text).unwrap(), bytes);
    }

    #[test]
    fn invalid_base58_is_a_decode_error() {
        // '0', 'O', 'I' and 'l' are not in the alphabet
        let err = base58_decode("0OIl").unwrap_err();
        assert!(matches!(
            err,
            EncodingError::Decode {
                encoding: Encoding::Base58,
                ..
            }
        ));
        assert_eq!(decode_tagged("0OIl", "base58"), None);
    }

    #[test]
    fn default_is_base58() {
        assert_eq!(Encoding::default(), Encoding::Base58);
    }

    #[test]
    fn display_matches_tag() {
        assert_eq!(Encoding::Base58.to_string(), "base58");
        assert_eq!(Encoding::Base64.to_string(), "base64");
    }
}
