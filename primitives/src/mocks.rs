//! Mock implementations of external collaborators, for tests, benchmarks and fuzzing.

use crate::{
    hash::{hash, Digest},
    wire::{compact_size, read_compact, write_compact},
};
use bytes::{Buf, BufMut, Bytes};
use commonware_codec::{EncodeSize, Error, Read, Write};

/// Largest payload a mock [Transaction] may carry.
pub const MAX_PAYLOAD_SIZE: usize = 1 << 16;

/// An opaque transaction: a length-prefixed payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transaction {
    payload: Bytes,
}

impl Transaction {
    /// Wraps an opaque payload.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Returns the payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl crate::Transaction for Transaction {
    fn id(&self) -> Digest {
        let mut encoded = Vec::with_capacity(self.encode_size());
        self.write(&mut encoded);
        hash(&[encoded.as_slice()])
    }
}

impl Write for Transaction {
    fn write(&self, buf: &mut impl BufMut) {
        write_compact(self.payload.len(), buf);
        buf.put_slice(&self.payload);
    }
}

impl EncodeSize for Transaction {
    fn encode_size(&self) -> usize {
        compact_size(self.payload.len()) + self.payload.len()
    }
}

impl Read for Transaction {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let len = read_compact(buf, MAX_PAYLOAD_SIZE)?;
        if buf.remaining() < len {
            return Err(Error::EndOfBuffer);
        }
        Ok(Self {
            payload: buf.copy_to_bytes(len),
        })
    }
}
