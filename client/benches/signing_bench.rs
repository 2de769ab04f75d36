// Signing, verification and box benchmarks for the LTO client core.
//
// Covers single-message signing and verification, box encryption at a few
// payload sizes, and transaction signing with proof accumulation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lto_client::account::Account;
use lto_client::address::Address;
use lto_client::config::{ADDRESS_LENGTH, ADDRESS_VERSION, NETWORK_ID_TESTNET};
use lto_client::crypto::boxes::random_bytes;
use lto_client::crypto::KeyPair;
use lto_client::transaction::{CanonicalEncode, Transaction, TransactionBase};

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
        out.extend_from_slice(&self.base.timestamp().unwrap_or(0).to_be_bytes());
        out.extend_from_slice(&self.base.fee().to_be_bytes());
        out.extend_from_slice(&self.hash);
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

fn account() -> Account {
    let sign = KeyPair::generate_sign();
    let mut address = vec![ADDRESS_VERSION, NETWORK_ID_TESTNET];
    address.extend(random_bytes(ADDRESS_LENGTH - 2));
    Account::from_sign_secret(
        Address::new(address, NETWORK_ID_TESTNET),
        sign.secret_key().unwrap().as_bytes(),
    )
    .unwrap()
}

fn bench_sign_message(c: &mut Criterion) {
    let alice = account();
    let message = b"anchor 3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b";

    c.bench_function("ed25519/sign_message", |b| {
        b.iter(|| alice.sign(message).unwrap());
    });
}

fn bench_verify_message(c: &mut Criterion) {
    let alice = account();
    let message = b"anchor 3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b";
    let signature = alice.sign(message).unwrap();

    c.bench_function("ed25519/verify_message", |b| {
        b.iter(|| alice.verify(&signature, message).unwrap());
    });
}

fn bench_encrypt(c: &mut Criterion) {
    let alice = account();
    let bob = account();
    let mut group = c.benchmark_group("box/encrypt");

    for size in [32usize, 1024, 16 * 1024] {
        let message = random_bytes(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &message, |b, message| {
            b.iter(|| alice.encrypt(&bob, message).unwrap());
        });
    }

    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let alice = account();
    let bob = account();
    let ciphertext = alice.encrypt(&bob, &random_bytes(1024)).unwrap();

    c.bench_function("box/decrypt_1k", |b| {
        b.iter(|| bob.decrypt(&alice, &ciphertext).unwrap());
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let signers: Vec<Account> = (0..3).map(|_| account()).collect();

    c.bench_function("transaction/sign_with_3_proofs", |b| {
        b.iter(|| {
            let mut tx = Anchor {
                base: TransactionBase::new(15, 1, 35_000_000),
                hash: vec![0xab; 32],
            };
            for signer in &signers {
                tx.sign_with(signer).unwrap();
            }
            tx
        });
    });
}

criterion_group!(
    benches,
    bench_sign_message,
    bench_verify_message,
    bench_encrypt,
    bench_decrypt,
    bench_sign_transaction,
);
criterion_main!(benches);
