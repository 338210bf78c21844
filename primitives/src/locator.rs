//! Chain locators exchanged by peers to find a common ancestor.
//!
//! The encoding depends on the [Context] it is produced for:
//!
//! ```text
//! Network, Disk: i32 version | CompactSize + 32B hashes
//! Hash:                        CompactSize + 32B hashes
//! ```

use crate::{
    constants::MAX_LOCATOR_HASHES,
    hash::{hash, Digest, DIGEST_LENGTH},
    wire::{compact_size, read_digest, read_i32, read_seq, write_compact, write_digest},
};
use bytes::{Buf, BufMut, BytesMut};
use commonware_codec::{EncodeSize, Error, Read, Write};

/// Purpose an encoding is produced for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Context {
    /// Sent to a peer.
    #[default]
    Network,
    /// Written to storage.
    Disk,
    /// Fed to a hash function. Omits the version.
    Hash,
}

impl Context {
    /// Returns true if the encoding carries the locator version.
    pub fn includes_version(self) -> bool {
        !matches!(self, Context::Hash)
    }
}

/// Configuration used when decoding a [Locator].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocatorCfg {
    /// Maximum number of hashes.
    pub max_hashes: usize,
    /// Context the encoding was produced for.
    pub context: Context,
}

impl Default for LocatorCfg {
    fn default() -> Self {
        Self {
            max_hashes: MAX_LOCATOR_HASHES,
            context: Context::Network,
        }
    }
}

/// Sparse list of block hashes describing a position in the chain, most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Locator {
    pub version: i32,
    pub have: Vec<Digest>,
}

impl Locator {
    /// Creates a locator from its version and hashes.
    pub fn new(version: i32, have: Vec<Digest>) -> Self {
        Self { version, have }
    }

    /// Returns true if the locator carries no hashes.
    pub fn is_null(&self) -> bool {
        self.have.is_empty()
    }

    /// Removes every hash.
    pub fn set_null(&mut self) {
        self.have.clear();
    }

    /// Writes the encoding for `context`.
    pub fn write_ctx(&self, context: Context, buf: &mut impl BufMut) {
        if context.includes_version() {
            buf.put_i32_le(self.version);
        }
        write_compact(self.have.len(), buf);
        for digest in &self.have {
            write_digest(digest, buf);
        }
    }

    /// Returns the length of the encoding for `context`.
    pub fn encode_size_ctx(&self, context: Context) -> usize {
        let version = if context.includes_version() { 4 } else { 0 };
        version + compact_size(self.have.len()) + self.have.len() * DIGEST_LENGTH
    }

    /// Encodes for `context` into a new buffer.
    pub fn encode_ctx(&self, context: Context) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.encode_size_ctx(context));
        self.write_ctx(context, &mut buf);
        buf
    }

    /// Returns the hash of the [Context::Hash] encoding.
    ///
    /// The version does not contribute.
    pub fn id(&self) -> Digest {
        hash(&[&self.encode_ctx(Context::Hash)[..]])
    }
}

impl Write for Locator {
    fn write(&self, buf: &mut impl BufMut) {
        self.write_ctx(Context::Network, buf);
    }
}

impl EncodeSize for Locator {
    fn encode_size(&self) -> usize {
        self.encode_size_ctx(Context::Network)
    }
}

impl Read for Locator {
    type Cfg = LocatorCfg;

    /// Decodes a locator produced for `cfg.context`.
    ///
    /// A [Context::Hash] encoding has no version; it decodes as `0`.
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let version = if cfg.context.includes_version() {
            read_i32(buf)?
        } else {
            0
        };
        let have = read_seq(buf, cfg.max_hashes, |buf| read_digest(buf))?;
        Ok(Self { version, have })
    }
}
