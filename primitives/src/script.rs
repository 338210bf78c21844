//! Creator script carried by every header.

use crate::wire::{compact_size, read_compact, write_compact};
use bytes::{Buf, BufMut, Bytes};
use commonware_codec::{EncodeSize, Error, Read, Write};
use commonware_utils::hex;
use std::fmt::{self, Display, Formatter};

/// Opaque script identifying a block's reward recipient.
///
/// Encoded in its stripped form: a CompactSize length followed by the raw bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Script(Bytes);

impl Script {
    /// Wraps raw script bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the script is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Empties the script.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Script {
    fn from(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }
}

impl Display for Script {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

impl Write for Script {
    fn write(&self, buf: &mut impl BufMut) {
        write_compact(self.0.len(), buf);
        buf.put_slice(&self.0);
    }
}

impl EncodeSize for Script {
    fn encode_size(&self) -> usize {
        compact_size(self.0.len()) + self.0.len()
    }
}

impl Read for Script {
    /// Maximum script length.
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max: &Self::Cfg) -> Result<Self, Error> {
        let len = read_compact(buf, *max)?;
        if buf.remaining() < len {
            return Err(Error::EndOfBuffer);
        }
        Ok(Self(buf.copy_to_bytes(len)))
    }
}
