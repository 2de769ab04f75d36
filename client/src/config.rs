//! # Protocol Constants
//!
//! Every fixed size and identifier the client core depends on lives here.
//! The crypto and codec modules read their lengths from this file. If you
//! find a bare `32` or `24` anywhere else in the crate, that's a bug with a
//! short fuse.
//!
//! None of these are tunable. They are fixed by Ed25519, NaCl boxes and the
//! address format that every other LTO client already speaks.

use crate::encoding::Encoding;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet network byte (`'L'`).
pub const NETWORK_ID_MAINNET: u8 = b'L';

/// Testnet network byte (`'T'`).
pub const NETWORK_ID_TESTNET: u8 = b'T';

// ---------------------------------------------------------------------------
// Address Layout
// ---------------------------------------------------------------------------

/// First byte of every address produced by the network's address format.
pub const ADDRESS_VERSION: u8 = 1;

/// Byte offset of the network id inside a decoded address.
pub const ADDRESS_NETWORK_OFFSET: usize = 1;

/// Length of a decoded address: version, network, 20-byte key hash, 4-byte checksum.
/// Informational only; addresses are treated as opaque bytes.
pub const ADDRESS_LENGTH: usize = 26;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 and X25519 public keys are both 32 bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 seed length. A seed alone is a complete secret signing key.
pub const SIGN_SEED_LENGTH: usize = 32;

/// libsodium-style Ed25519 secret key: `seed || public_key`.
pub const SIGN_SECRET_KEY_LENGTH: usize = 64;

/// X25519 secret scalar length.
pub const ENCRYPT_SECRET_KEY_LENGTH: usize = 32;

/// Detached Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// XSalsa20-Poly1305 box nonce length. Appended to every ciphertext.
pub const BOX_NONCE_LENGTH: usize = 24;

/// Poly1305 authenticator length prefixed to every sealed box.
pub const BOX_MAC_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Textual encoding used when the caller does not pick one.
pub const DEFAULT_ENCODING: Encoding = Encoding::Base58;

/// Friendly name for a network id, for log lines.
pub fn network_name(network_id: u8) -> String {
    match network_id {
        NETWORK_ID_MAINNET => "mainnet".to_string(),
        NETWORK_ID_TESTNET => "testnet".to_string(),
        other if other.is_ascii_graphic() => format!("custom('{}')", other as char),
        other => format!("unknown(0x{:02X})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_ids_are_distinct() {
        assert_ne!(NETWORK_ID_MAINNET, NETWORK_ID_TESTNET);
    }

    #[test]
    fn network_name_formatting() {
        assert_eq!(network_name(NETWORK_ID_MAINNET), "mainnet");
        assert_eq!(network_name(NETWORK_ID_TESTNET), "testnet");
        assert_eq!(network_name(b'W'), "custom('W')");
        assert_eq!(network_name(0x00), "unknown(0x00)");
    }

    #[test]
    fn crypto_parameter_sizes() {
        assert_eq!(SIGN_SECRET_KEY_LENGTH, SIGN_SEED_LENGTH + PUBLIC_KEY_LENGTH);
        assert_eq!(SIGNATURE_LENGTH, 64);
        assert_eq!(BOX_NONCE_LENGTH, 24);
        assert_eq!(BOX_MAC_LENGTH, 16);
    }
}
