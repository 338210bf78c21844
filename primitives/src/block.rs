//! Blocks, the fruit commitment, and block weight.
//!
//! A [Block] is a [Header] followed by its transactions and its fruits:
//!
//! ```text
//! Header | CompactSize + transactions | CompactSize + fruits (headers)
//! ```
//!
//! # Fruit Commitment
//!
//! `fruits_hash` is a strict left-to-right hash chain over fruit identities, starting from the
//! null digest:
//!
//! ```text
//! acc_0 = 0x00..00
//! acc_i = Hash(acc_{i-1} || id(fruit_i))
//! ```
//!
//! Every fruit count (including zero) has exactly one result, and the result changes if fruits
//! are reordered, added, removed or duplicated. The commitment is not kept in sync
//! automatically: the author sets it with [Block::update_fruits_hash] and verifiers compare it
//! with [Block::has_valid_fruits_hash].

use crate::{
    constants::{MAX_BLOCK_SERIALIZED_SIZE, MIN_TRANSACTION_SIZE, WITNESS_SCALE_FACTOR},
    hash::{hash, null, Digest},
    wire::{compact_size, read_seq, seq_size, write_seq},
    Header, HeaderCfg,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, Write};
use std::fmt::{self, Debug, Display, Formatter};
use tracing::debug;

/// A transaction as seen by this crate: something with a canonical encoding and an identity.
pub trait Transaction:
    Write + EncodeSize + Read + Clone + Debug + Eq + Send + Sync + 'static
{
    /// Returns the identity of the transaction.
    fn id(&self) -> Digest;

    /// Returns the size of the part of the encoding that is never discounted.
    ///
    /// Defaults to the full encoded size.
    fn base_size(&self) -> usize {
        self.encode_size()
    }
}

/// Configuration used when decoding a [Block].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockCfg<C> {
    /// Configuration for the block header and for every fruit.
    pub header: HeaderCfg,
    /// Maximum number of transactions.
    pub max_transactions: usize,
    /// Maximum number of fruits.
    pub max_fruits: usize,
    /// Per-transaction codec configuration.
    pub transaction: C,
}

impl<C: Default> Default for BlockCfg<C> {
    fn default() -> Self {
        Self {
            header: HeaderCfg::default(),
            max_transactions: MAX_BLOCK_SERIALIZED_SIZE / MIN_TRANSACTION_SIZE,
            max_fruits: MAX_BLOCK_SERIALIZED_SIZE / Header::MIN_ENCODED_SIZE,
            transaction: C::default(),
        }
    }
}

/// Computes the commitment over `fruits`.
pub fn compute_fruits_hash(fruits: &[Header]) -> Digest {
    fruits
        .iter()
        .map(Header::id)
        .fold(null(), |acc, id| hash(&[acc.as_ref(), id.as_ref()]))
}

/// Returns the resource-accounting weight of `block`.
///
/// `weight = base_size * (WITNESS_SCALE_FACTOR - 1) + total_size`, where `base_size` counts only
/// bytes every node must download and `total_size` counts everything. Only transactions may
/// discount part of their encoding (see [Transaction::base_size]); the header and fruits always
/// count in full, so with the default `base_size` the weight is four times the encoded size.
pub fn weight<T: Transaction>(block: &Block<T>) -> u64 {
    let total_size = block.encode_size() as u64;
    let base_size = (block.header.encode_size()
        + compact_size(block.transactions.len())
        + block.transactions.iter().map(T::base_size).sum::<usize>()
        + seq_size(&block.fruits)) as u64;
    base_size * (WITNESS_SCALE_FACTOR - 1) + total_size
}

/// A header plus the transactions and fruits it commits to.
#[derive(Clone, Debug)]
pub struct Block<T: Transaction> {
    pub header: Header,
    /// Ordered transactions (the first creates the block reward).
    pub transactions: Vec<T>,
    /// Ordered fruits.
    pub fruits: Vec<Header>,

    /// Set once the body passed contextual validation in this process. Never serialized.
    checked: bool,
}

impl<T: Transaction> Block<T> {
    /// Creates an unchecked block.
    pub fn new(header: Header, transactions: Vec<T>, fruits: Vec<Header>) -> Self {
        Self {
            header,
            transactions,
            fruits,
            checked: false,
        }
    }

    /// Returns the identity of the block (the identity of its header).
    pub fn id(&self) -> Digest {
        self.header.id()
    }

    /// Returns a standalone copy of the block's header.
    pub fn to_header(&self) -> Header {
        self.header.clone()
    }

    /// Computes the commitment over this block's fruits.
    pub fn fruits_hash(&self) -> Digest {
        compute_fruits_hash(&self.fruits)
    }

    /// Sets `header.fruits_hash` from the current fruits.
    ///
    /// Must be called again after any change to `fruits`.
    pub fn update_fruits_hash(&mut self) {
        self.header.fruits_hash = self.fruits_hash();
    }

    /// Returns true if `header.fruits_hash` commits to the current fruits.
    pub fn has_valid_fruits_hash(&self) -> bool {
        let computed = self.fruits_hash();
        if computed != self.header.fruits_hash {
            debug!(
                block = %self.id(),
                fruits = self.fruits.len(),
                expected = %self.header.fruits_hash,
                %computed,
                "fruits hash mismatch"
            );
            return false;
        }
        true
    }

    /// Returns the weight of the block (see [weight]).
    pub fn weight(&self) -> u64 {
        weight(self)
    }

    /// Returns true if the body passed contextual validation.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Records whether the body passed contextual validation.
    ///
    /// The flag is process-local: it is not encoded and not part of equality.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Resets the header and empties the body.
    pub fn set_null(&mut self) {
        self.header.set_null();
        self.transactions.clear();
        self.fruits.clear();
        self.checked = false;
    }

    /// Returns true if the header is null.
    pub fn is_null(&self) -> bool {
        self.header.is_null()
    }
}

impl<T: Transaction> Default for Block<T> {
    fn default() -> Self {
        Self::new(Header::default(), Vec::new(), Vec::new())
    }
}

impl<T: Transaction> From<Header> for Block<T> {
    fn from(header: Header) -> Self {
        Self::new(header, Vec::new(), Vec::new())
    }
}

impl<T: Transaction> PartialEq for Block<T> {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.transactions == other.transactions
            && self.fruits == other.fruits
    }
}

impl<T: Transaction> Eq for Block<T> {}

impl<T: Transaction> Write for Block<T> {
    fn write(&self, buf: &mut impl BufMut) {
        self.header.write(buf);
        write_seq(&self.transactions, buf);
        write_seq(&self.fruits, buf);
    }
}

impl<T: Transaction> EncodeSize for Block<T> {
    fn encode_size(&self) -> usize {
        self.header.encode_size() + seq_size(&self.transactions) + seq_size(&self.fruits)
    }
}

impl<T: Transaction> Read for Block<T> {
    type Cfg = BlockCfg<T::Cfg>;

    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let header = Header::read_cfg(buf, &cfg.header)?;
        let transactions = read_seq(buf, cfg.max_transactions, |buf| {
            T::read_cfg(buf, &cfg.transaction)
        })?;
        let fruits = read_seq(buf, cfg.max_fruits, |buf| {
            Header::read_cfg(buf, &cfg.header)
        })?;
        Ok(Self::new(header, transactions, fruits))
    }
}

impl<T: Transaction> Display for Block<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Block(hash={}, ver=0x{:08x}, prev_block={}, prev_episode={}, merkle_root={}, fruits_hash={}, time={}, bits={:08x}, nonce={}, tax={}, transactions={}, fruits={})",
            self.id(),
            self.header.version,
            self.header.prev_block,
            self.header.prev_episode,
            self.header.merkle_root,
            self.header.fruits_hash,
            self.header.time,
            self.header.bits,
            self.header.nonce,
            self.header.tax,
            self.transactions.len(),
            self.fruits.len(),
        )?;
        for transaction in &self.transactions {
            writeln!(f, "  tx={}", transaction.id())?;
        }
        for fruit in &self.fruits {
            writeln!(f, "  fruit={}", fruit.id())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, hash::is_null, mocks, wire::write_compact, Error as DecodeError, Script};
    use bytes::Bytes;
    use commonware_codec::Encode;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    type TestBlock = Block<mocks::Transaction>;

    fn cfg() -> BlockCfg<()> {
        BlockCfg::default()
    }

    fn fruit(seed: u64) -> Header {
        Header {
            version: 1,
            prev_block: hash(&[&seed.to_le_bytes()]),
            time: seed as u32,
            bits: 0x207f_ffff,
            nonce: seed.wrapping_mul(7) as u32,
            creator: Script::from(seed.to_be_bytes().to_vec()),
            ..Header::default()
        }
    }

    fn block(rng: &mut StdRng, transactions: usize, fruits: usize) -> TestBlock {
        let transactions = (0..transactions)
            .map(|_| {
                let len = rng.gen_range(0..64);
                mocks::Transaction::new((0..len).map(|_| rng.gen()).collect::<Vec<u8>>())
            })
            .collect();
        let fruits = (0..fruits).map(|_| fruit(rng.gen())).collect();
        let header = Header {
            version: 3,
            prev_block: hash(&[b"parent"]),
            prev_episode: hash(&[b"episode"]),
            merkle_root: hash(&[b"transactions"]),
            time: 1_600_000_000,
            bits: 0x1d00_ffff,
            nonce: rng.gen(),
            creator: Script::from(vec![0x51]),
            tax: 5,
            ..Header::default()
        };
        let mut block = Block::new(header, transactions, fruits);
        block.update_fruits_hash();
        block
    }

    #[test]
    fn test_codec() {
        let mut rng = StdRng::seed_from_u64(0);
        for (transactions, fruits) in [(0, 0), (1, 0), (0, 1), (5, 3), (300, 2)] {
            let block = block(&mut rng, transactions, fruits);
            let encoded = block.encode();
            assert_eq!(encoded.len(), block.encode_size());
            let decoded: TestBlock = decode(encoded, &cfg()).unwrap();
            assert_eq!(decoded, block);
            assert_eq!(decoded.id(), block.id());
            assert!(!decoded.is_checked());
        }
    }

    #[test]
    fn test_null_block_codec() {
        let block = TestBlock::default();
        assert!(block.is_null());
        let encoded = block.encode();
        assert_eq!(encoded.len(), Header::MIN_ENCODED_SIZE + 2);
        let decoded: TestBlock = decode(encoded, &cfg()).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_checked_not_encoded() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut block = block(&mut rng, 2, 2);
        let before = block.encode();
        block.set_checked(true);
        assert!(block.is_checked());
        assert_eq!(block.encode(), before);

        let decoded: TestBlock = decode(before, &cfg()).unwrap();
        assert!(!decoded.is_checked());
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_fruits_hash_empty() {
        assert!(is_null(&compute_fruits_hash(&[])));
        let mut rng = StdRng::seed_from_u64(2);
        assert!(is_null(&block(&mut rng, 3, 0).fruits_hash()));
    }

    #[test]
    fn test_fruits_hash_chain() {
        let a = fruit(1);
        let b = fruit(2);
        let first = hash(&[null().as_ref(), a.id().as_ref()]);
        assert_eq!(compute_fruits_hash(&[a.clone()]), first);
        let second = hash(&[first.as_ref(), b.id().as_ref()]);
        assert_eq!(compute_fruits_hash(&[a, b]), second);
    }

    #[test]
    fn test_fruits_hash_order() {
        let a = fruit(1);
        let b = fruit(2);
        assert_ne!(a.id(), b.id());
        assert_ne!(
            compute_fruits_hash(&[a.clone(), b.clone()]),
            compute_fruits_hash(&[b, a])
        );
    }

    #[test]
    fn test_fruits_hash_membership() {
        let fruits: Vec<Header> = (0..4).map(fruit).collect();
        let base = compute_fruits_hash(&fruits);

        // Append
        let mut appended = fruits.clone();
        appended.push(fruit(9));
        assert_ne!(compute_fruits_hash(&appended), base);

        // Duplicate
        let mut duplicated = fruits.clone();
        duplicated.push(fruits[3].clone());
        assert_ne!(compute_fruits_hash(&duplicated), base);

        // Remove
        assert_ne!(compute_fruits_hash(&fruits[..3]), base);
        assert_ne!(compute_fruits_hash(&fruits[1..]), base);
    }

    #[test]
    fn test_fruits_hash_validation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut block = block(&mut rng, 1, 3);
        assert!(block.has_valid_fruits_hash());

        block.fruits.swap(0, 2);
        assert!(!block.has_valid_fruits_hash());
        block.update_fruits_hash();
        assert!(block.has_valid_fruits_hash());

        block.fruits.pop();
        assert!(!block.has_valid_fruits_hash());
    }

    #[test]
    fn test_to_header() {
        let mut rng = StdRng::seed_from_u64(4);
        let full = block(&mut rng, 4, 2);
        let empty = TestBlock::from(full.to_header());

        assert_eq!(full.to_header(), full.header);
        assert_eq!(empty.to_header(), full.to_header());
        assert_eq!(empty.id(), full.id());
        assert!(empty.transactions.is_empty());
        assert!(empty.fruits.is_empty());

        // Mutating the projection leaves the block untouched
        let mut header = full.to_header();
        header.set_null();
        assert!(!full.is_null());
        assert_eq!(full.transactions.len(), 4);
        assert_eq!(full.fruits.len(), 2);
    }

    #[test]
    fn test_set_null() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut block = block(&mut rng, 2, 2);
        block.set_checked(true);
        block.set_null();
        assert!(block.is_null());
        assert!(!block.is_checked());
        assert_eq!(block, TestBlock::default());
    }

    #[test]
    fn test_weight() {
        let mut rng = StdRng::seed_from_u64(6);
        for (transactions, fruits) in [(0, 0), (10, 0), (3, 7)] {
            let block = block(&mut rng, transactions, fruits);
            let size = block.encode().len() as u64;
            assert_eq!(weight(&block), 4 * size);
            assert_eq!(block.weight(), 4 * size);
        }
        let empty = TestBlock::default();
        assert_eq!(empty.weight(), 4 * (Header::MIN_ENCODED_SIZE as u64 + 2));
    }

    /// Transaction whose payload is discounted, leaving only its length prefix in the base size.
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Discounted(mocks::Transaction);

    impl Write for Discounted {
        fn write(&self, buf: &mut impl BufMut) {
            self.0.write(buf);
        }
    }

    impl EncodeSize for Discounted {
        fn encode_size(&self) -> usize {
            self.0.encode_size()
        }
    }

    impl Read for Discounted {
        type Cfg = ();

        fn read_cfg(buf: &mut impl Buf, cfg: &()) -> Result<Self, Error> {
            mocks::Transaction::read_cfg(buf, cfg).map(Self)
        }
    }

    impl Transaction for Discounted {
        fn id(&self) -> Digest {
            self.0.id()
        }

        fn base_size(&self) -> usize {
            self.encode_size() - self.0.payload().len()
        }
    }

    #[test]
    fn test_weight_discounted() {
        let header = Header {
            bits: 1,
            ..Header::default()
        };
        let payloads = [vec![0xaa; 10], vec![0xbb; 300]];
        let block = Block::new(
            header,
            payloads
                .iter()
                .map(|payload| Discounted(mocks::Transaction::new(payload.clone())))
                .collect(),
            vec![fruit(1)],
        );
        let total = block.encode_size() as u64;
        let discounted = (10 + 300) as u64;
        let base = total - discounted;
        assert_eq!(block.weight(), base * 3 + total);
        assert_eq!(block.weight(), 4 * total - 3 * discounted);
    }

    #[test]
    fn test_long_script_fruit() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut block = block(&mut rng, 1, 0);
        block.fruits.push(Header {
            creator: Script::from(vec![0x6a; 10_001]),
            ..fruit(3)
        });
        block.update_fruits_hash();
        let decoded: TestBlock = decode(block.encode(), &cfg()).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_weight_pure() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut block = block(&mut rng, 2, 1);
        block.set_checked(true);
        let snapshot = block.clone();
        block.weight();
        assert!(block.is_checked());
        assert_eq!(block, snapshot);
    }

    #[test]
    fn test_truncated_transactions() {
        // Declare five transactions, carry three
        let header = Header::default();
        let mut encoded = header.encode().to_vec();
        write_compact(5, &mut encoded);
        for payload in [&b"a"[..], b"bb", b"ccc"] {
            mocks::Transaction::new(payload.to_vec()).write(&mut encoded);
        }
        let result: Result<TestBlock, _> = decode(Bytes::from(encoded), &cfg());
        assert!(matches!(result, Err(DecodeError::TruncatedInput)));
    }

    #[test]
    fn test_too_many_transactions() {
        let mut rng = StdRng::seed_from_u64(8);
        let block = block(&mut rng, 3, 0);
        let cfg = BlockCfg {
            max_transactions: 2,
            ..cfg()
        };
        let result: Result<TestBlock, _> = decode(block.encode(), &cfg);
        assert!(matches!(result, Err(DecodeError::LengthSanityExceeded(3))));
    }

    #[test]
    fn test_too_many_fruits() {
        let mut rng = StdRng::seed_from_u64(9);
        let block = block(&mut rng, 0, 3);
        let cfg = BlockCfg {
            max_fruits: 1,
            ..cfg()
        };
        let result: Result<TestBlock, _> = decode(block.encode(), &cfg);
        assert!(matches!(result, Err(DecodeError::LengthSanityExceeded(3))));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut encoded = block(&mut rng, 1, 1).encode().to_vec();
        encoded.extend_from_slice(&[0, 0, 0]);
        let result: Result<TestBlock, _> = decode(Bytes::from(encoded), &cfg());
        assert!(matches!(result, Err(DecodeError::TrailingBytes(3))));
    }

    #[test]
    fn test_display() {
        let mut rng = StdRng::seed_from_u64(11);
        let block = block(&mut rng, 2, 1);
        let rendered = block.to_string();
        assert!(rendered.starts_with(&format!("Block(hash={}", block.id())));
        assert!(rendered.contains("transactions=2, fruits=1"));
        assert!(rendered.contains(&format!("  tx={}", block.transactions[1].id())));
        assert!(rendered.contains(&format!("  fruit={}", block.fruits[0].id())));
        assert_eq!(rendered.lines().count(), 4);
    }
}
