//! Walkthrough of the client core: accounts, messages and a multi-signed
//! transaction.
//!
//! Run with:
//!   cargo run --example demo
//!   RUST_LOG=lto_client=debug cargo run --example demo

use anyhow::{ensure, Context, Result};

use lto_client::account::Account;
use lto_client::address::Address;
use lto_client::config::{network_name, ADDRESS_LENGTH, ADDRESS_VERSION, NETWORK_ID_TESTNET};
use lto_client::crypto::boxes::random_bytes;
use lto_client::crypto::KeyPair;
use lto_client::logging::{init_logging, LogFormat};
use lto_client::transaction::{CanonicalEncode, Transaction, TransactionBase};

// ---------------------------------------------------------------------------
// A concrete transaction type
// ---------------------------------------------------------------------------

struct Anchor {
    base: TransactionBase,
    hash: Vec<u8>,
}

impl CanonicalEncode for Anchor {
    fn to_binary(&self) -> Vec<u8> {
        let mut out = vec![self.base.tx_type(), self.base.version()];
        if let Some(key) = self.base.sender_public_key() {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(&(self.hash.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.hash);
        out.extend_from_slice(&self.base.timestamp().unwrap_or(0).to_be_bytes());
        out.extend_from_slice(&self.base.fee().to_be_bytes());
        out
    }
}

impl Transaction for Anchor {
    fn base(&self) -> &TransactionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TransactionBase {
        &mut self.base
    }
}

fn new_account() -> Result<Account> {
    let sign = KeyPair::generate_sign();
    let secret = sign.secret_key().context("generated pair has a secret")?;
    let mut address = vec![ADDRESS_VERSION, NETWORK_ID_TESTNET];
    address.extend(random_bytes(ADDRESS_LENGTH - 2));
    Ok(Account::from_sign_secret(
        Address::new(address, NETWORK_ID_TESTNET),
        secret.as_bytes(),
    )?)
}

fn main() -> Result<()> {
    let format = std::env::var("LOG_FORMAT")
        .map(|s| LogFormat::from_str_lossy(&s))
        .unwrap_or_default();
    init_logging("info", format);

    // -- accounts -----------------------------------------------------------

    let alice = new_account()?;
    let bob = new_account()?;
    println!("alice  {}  ({})", alice.address(), network_name(alice.network()));
    println!("bob    {}  ({})", bob.address(), network_name(bob.network()));
    if let Some(text) = alice.address_encoded("base64") {
        println!("alice (base64)  {}", text);
    }

    // -- messages -----------------------------------------------------------

    let signature = alice.sign(b"hello")?;
    println!("\nsignature of \"hello\": {}", signature);
    ensure!(alice.verify(&signature, b"hello")?, "signature must verify");
    ensure!(!alice.verify(&signature, b"hallo")?, "altered message must not verify");

    let ciphertext = alice.encrypt(&bob, b"hello")?;
    let plaintext = bob.decrypt(&alice, &ciphertext)?;
    println!(
        "encrypted {} bytes to {} bytes; bob reads {:?}",
        plaintext.len(),
        ciphertext.len(),
        String::from_utf8_lossy(&plaintext)
    );

    // -- transaction --------------------------------------------------------

    let mut tx = Anchor {
        base: TransactionBase::new(15, 1, 35_000_000),
        hash: random_bytes(32),
    };
    println!("\ntransaction state: {:?}", tx.state());

    tx.sign_with(&alice)?;
    tx.sign_with(&bob)?;
    println!("transaction state: {:?}, {} proofs", tx.state(), tx.proofs().len());

    for (i, account) in [&alice, &bob].iter().enumerate() {
        let key = account.public_sign_key().context("account has a public key")?;
        ensure!(tx.verify_proof(i, key)?, "proof {} must verify", i);
    }

    let record = tx.to_record();
    println!("\n{}", serde_json::to_string_pretty(&record)?);

    let restored = TransactionBase::from_record(&record)?;
    ensure!(&restored == tx.base(), "record must read back unchanged");
    println!("\nrecord reads back; network {}", network_name(restored.network()?));

    Ok(())
}
