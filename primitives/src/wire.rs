//! Low-level wire helpers shared by every encoded type.
//!
//! Fixed-width integers are little-endian. Every length (scripts and sequences) is written as a
//! CompactSize:
//!
//! | Value                      | Encoding                |
//! |----------------------------|-------------------------|
//! | `0..=0xfc`                 | 1 byte                  |
//! | `0xfd..=0xffff`            | `0xfd` + `u16` (LE)     |
//! | `0x1_0000..=0xffff_ffff`   | `0xfe` + `u32` (LE)     |
//! | larger                     | `0xff` + `u64` (LE)     |
//!
//! Decoding rejects over-long encodings, so every length has exactly one representation.

use crate::{constants::MAX_SIZE, Digest, DIGEST_LENGTH};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Write};

const U16_MARKER: u8 = 0xfd;
const U32_MARKER: u8 = 0xfe;
const U64_MARKER: u8 = 0xff;

/// Reads exactly `N` bytes.
pub fn read_array<const N: usize>(buf: &mut impl Buf) -> Result<[u8; N], Error> {
    if buf.remaining() < N {
        return Err(Error::EndOfBuffer);
    }
    let mut out = [0u8; N];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

/// Reads a single byte.
pub fn read_u8(buf: &mut impl Buf) -> Result<u8, Error> {
    let [byte] = read_array::<1>(buf)?;
    Ok(byte)
}

/// Reads a little-endian `u32`.
pub fn read_u32(buf: &mut impl Buf) -> Result<u32, Error> {
    Ok(u32::from_le_bytes(read_array(buf)?))
}

/// Reads a little-endian `i32`.
pub fn read_i32(buf: &mut impl Buf) -> Result<i32, Error> {
    Ok(i32::from_le_bytes(read_array(buf)?))
}

/// Reads a digest as its raw 32 bytes.
pub fn read_digest(buf: &mut impl Buf) -> Result<Digest, Error> {
    Ok(Digest::from(read_array::<DIGEST_LENGTH>(buf)?))
}

/// Writes a digest as its raw 32 bytes.
pub fn write_digest(digest: &Digest, buf: &mut impl BufMut) {
    buf.put_slice(digest.as_ref());
}

/// Writes `len` as a CompactSize.
pub fn write_compact(len: usize, buf: &mut impl BufMut) {
    let value = len as u64;
    match value {
        0..=0xfc => buf.put_u8(value as u8),
        0xfd..=0xffff => {
            buf.put_u8(U16_MARKER);
            buf.put_u16_le(value as u16);
        }
        0x1_0000..=0xffff_ffff => {
            buf.put_u8(U32_MARKER);
            buf.put_u32_le(value as u32);
        }
        _ => {
            buf.put_u8(U64_MARKER);
            buf.put_u64_le(value);
        }
    }
}

/// Returns the number of bytes [write_compact] emits for `len`.
pub fn compact_size(len: usize) -> usize {
    match len as u64 {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Reads a CompactSize and checks it against `max` (and [MAX_SIZE]).
///
/// The bound is checked before the caller allocates anything for the declared length.
pub fn read_compact(buf: &mut impl Buf, max: usize) -> Result<usize, Error> {
    let value = match read_u8(buf)? {
        U16_MARKER => canonical(u16::from_le_bytes(read_array(buf)?) as u64, 0xfd)?,
        U32_MARKER => canonical(u32::from_le_bytes(read_array(buf)?) as u64, 0x1_0000)?,
        U64_MARKER => canonical(u64::from_le_bytes(read_array(buf)?), 0x1_0000_0000)?,
        small => small as u64,
    };
    let limit = max.min(MAX_SIZE);
    match usize::try_from(value) {
        Ok(len) if len <= limit => Ok(len),
        Ok(len) => Err(Error::InvalidLength(len)),
        Err(_) => Err(Error::InvalidLength(usize::MAX)),
    }
}

fn canonical(value: u64, min: u64) -> Result<u64, Error> {
    if value < min {
        return Err(Error::Invalid("CompactSize", "non-canonical encoding"));
    }
    Ok(value)
}

/// Writes a CompactSize count followed by each item.
pub fn write_seq<T: Write>(items: &[T], buf: &mut impl BufMut) {
    write_compact(items.len(), buf);
    for item in items {
        item.write(buf);
    }
}

/// Returns the number of bytes [write_seq] emits for `items`.
pub fn seq_size<T: EncodeSize>(items: &[T]) -> usize {
    compact_size(items.len()) + items.iter().map(EncodeSize::encode_size).sum::<usize>()
}

/// Reads a CompactSize count (at most `max`) followed by that many items.
pub fn read_seq<T, B: Buf>(
    buf: &mut B,
    max: usize,
    mut read: impl FnMut(&mut B) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let len = read_compact(buf, max)?;

    // Every item occupies at least one byte, so never reserve more than what remains.
    let mut items = Vec::with_capacity(len.min(buf.remaining()));
    for _ in 0..len {
        items.push(read(buf)?);
    }
    Ok(items)
}
