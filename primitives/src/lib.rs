//! Encode, decode, and commit to fruitchain blocks, headers, and locators.
//!
//! # Overview
//!
//! Every node must produce byte-identical encodings and identical hashes for the same logical
//! block, so the formats here are consensus rules rather than conveniences:
//!
//! - [Header]: the unit of identity. A header's id is the hash of its full encoding. Fruits are
//!   headers too.
//! - [Block]: a header, its transactions, and its fruits. The header's `fruits_hash` commits to
//!   the fruits through [compute_fruits_hash].
//! - [Locator]: a sparse list of hashes whose encoding depends on a [Context].
//! - [weight]: the resource-accounting size of a block.
//!
//! Decoding untrusted input is bounded by configuration (`HeaderCfg`, `BlockCfg`, `LocatorCfg`):
//! every declared length is checked before anything is allocated for it. [decode] classifies
//! failures as [Error::TruncatedInput], [Error::LengthSanityExceeded], [Error::TrailingBytes] or
//! [Error::Malformed].
//!
//! # Example
//!
//! ```
//! use commonware_codec::Encode;
//! use fruitchain_primitives::{decode, mocks, Block, BlockCfg, Header, Script};
//!
//! let fruit = Header { bits: 0x207fffff, ..Header::default() };
//! let header = Header {
//!     version: 1,
//!     bits: 0x1d00ffff,
//!     creator: Script::from(vec![0x51]),
//!     ..Header::default()
//! };
//! let mut block = Block::new(header, vec![mocks::Transaction::new(vec![1, 2, 3])], vec![fruit]);
//! block.update_fruits_hash();
//!
//! let decoded: Block<mocks::Transaction> = decode(block.encode(), &BlockCfg::default()).unwrap();
//! assert_eq!(decoded, block);
//! assert!(decoded.has_valid_fruits_hash());
//! assert_eq!(decoded.weight(), 4 * block.encode().len() as u64);
//! ```

pub mod block;
pub use block::{compute_fruits_hash, weight, Block, BlockCfg, Transaction};
pub mod constants;
mod error;
pub use error::{decode, Error};
pub mod hash;
pub use hash::{Digest, DIGEST_LENGTH};
pub mod header;
pub use header::{Header, HeaderCfg};
pub mod locator;
pub use locator::{Context, Locator, LocatorCfg};
pub mod mocks;
pub mod script;
pub use script::Script;
pub mod wire;
