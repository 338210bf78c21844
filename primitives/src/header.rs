//! Block header: the unit of consensus identity.
//!
//! A header links a block to its parent and to its episode, and commits to the block's
//! transactions (`merkle_root`) and fruits (`fruits_hash`). Fruits are themselves headers, so
//! this type is used both for blocks and for the fruits they carry.
//!
//! # Wire Format
//!
//! ```text
//! i32 version | 32B prev_block | 32B prev_episode | 32B merkle_root | 32B fruits_hash |
//! u32 time | u32 bits | u32 nonce | CompactSize + creator script | u8 tax
//! ```
//!
//! All integers are little-endian.

use crate::{
    constants::MAX_SCRIPT_SIZE,
    hash::{hash, null, Digest, DIGEST_LENGTH},
    wire::{read_digest, read_i32, read_u32, read_u8, write_digest},
    Script,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, Write};
use std::fmt::{self, Display, Formatter};

/// Size of every field preceding the creator script.
const FIXED_PREFIX: usize = 4 + 4 * DIGEST_LENGTH + 4 + 4 + 4;

/// Configuration used when decoding a [Header].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderCfg {
    /// Maximum length of the creator script.
    pub max_script_size: usize,
}

impl Default for HeaderCfg {
    fn default() -> Self {
        Self {
            max_script_size: MAX_SCRIPT_SIZE,
        }
    }
}

/// A block header (or fruit).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    pub version: i32,
    pub prev_block: Digest,
    /// Link to the enclosing episode, independent of direct parentage.
    pub prev_episode: Digest,
    pub merkle_root: Digest,
    pub fruits_hash: Digest,
    pub time: u32,
    /// Compact difficulty target. Zero marks the header as null.
    pub bits: u32,
    pub nonce: u32,
    /// Script paid by the block reward.
    pub creator: Script,
    /// Reward redistribution rate.
    pub tax: u8,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: 0,
            prev_block: null(),
            prev_episode: null(),
            merkle_root: null(),
            fruits_hash: null(),
            time: 0,
            bits: 0,
            nonce: 0,
            creator: Script::default(),
            tax: 0,
        }
    }
}

impl Header {
    /// Smallest possible encoding (empty creator script).
    pub const MIN_ENCODED_SIZE: usize = FIXED_PREFIX + 1 + 1;

    /// Returns the identity of this header: the hash of its full encoding.
    pub fn id(&self) -> Digest {
        let mut encoded = Vec::with_capacity(self.encode_size());
        self.write(&mut encoded);
        hash(&[encoded.as_slice()])
    }

    /// Returns true if the header carries no difficulty target.
    ///
    /// Only `bits` is considered: a header with `bits == 0` is null whatever its other fields.
    pub fn is_null(&self) -> bool {
        self.bits == 0
    }

    /// Resets every field to its null value.
    pub fn set_null(&mut self) {
        self.version = 0;
        self.prev_block = null();
        self.prev_episode = null();
        self.merkle_root = null();
        self.fruits_hash = null();
        self.time = 0;
        self.bits = 0;
        self.nonce = 0;
        self.creator.clear();
        self.tax = 0;
    }

    /// Returns the header timestamp in seconds.
    pub fn block_time(&self) -> i64 {
        self.time as i64
    }
}

impl Write for Header {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_i32_le(self.version);
        write_digest(&self.prev_block, buf);
        write_digest(&self.prev_episode, buf);
        write_digest(&self.merkle_root, buf);
        write_digest(&self.fruits_hash, buf);
        buf.put_u32_le(self.time);
        buf.put_u32_le(self.bits);
        buf.put_u32_le(self.nonce);
        self.creator.write(buf);
        buf.put_u8(self.tax);
    }
}

impl EncodeSize for Header {
    fn encode_size(&self) -> usize {
        FIXED_PREFIX + self.creator.encode_size() + 1
    }
}

impl Read for Header {
    type Cfg = HeaderCfg;

    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let version = read_i32(buf)?;
        let prev_block = read_digest(buf)?;
        let prev_episode = read_digest(buf)?;
        let merkle_root = read_digest(buf)?;
        let fruits_hash = read_digest(buf)?;
        let time = read_u32(buf)?;
        let bits = read_u32(buf)?;
        let nonce = read_u32(buf)?;
        let creator = Script::read_cfg(buf, &cfg.max_script_size)?;
        let tax = read_u8(buf)?;
        Ok(Self {
            version,
            prev_block,
            prev_episode,
            merkle_root,
            fruits_hash,
            time,
            bits,
            nonce,
            creator,
            tax,
        })
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Header(hash={}, ver=0x{:08x}, prev_block={}, prev_episode={}, merkle_root={}, fruits_hash={}, time={}, bits={:08x}, nonce={}, tax={})",
            self.id(),
            self.version,
            self.prev_block,
            self.prev_episode,
            self.merkle_root,
            self.fruits_hash,
            self.time,
            self.bits,
            self.nonce,
            self.tax,
        )
    }
}
