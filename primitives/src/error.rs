//! Decoding failures surfaced to callers.

use bytes::Buf;
use commonware_codec::{Decode, Error as CodecError, Read};
use thiserror::Error;
use tracing::debug;

/// Classification of a rejected encoding.
///
/// Decoding is all-or-nothing: on any of these errors no value is returned.
#[derive(Error, Debug)]
pub enum Error {
    #[error("truncated input")]
    TruncatedInput,
    #[error("declared length exceeds sanity bound: {0}")]
    LengthSanityExceeded(usize),
    #[error("trailing bytes: {0}")]
    TrailingBytes(usize),
    #[error("malformed encoding: {0}")]
    Malformed(CodecError),
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::EndOfBuffer => Self::TruncatedInput,
            CodecError::InvalidLength(len) => Self::LengthSanityExceeded(len),
            CodecError::ExtraData(remaining) => Self::TrailingBytes(remaining),
            err => Self::Malformed(err),
        }
    }
}

/// Decodes a value that must occupy all of `buf`.
pub fn decode<T: Read>(buf: impl Buf, cfg: &T::Cfg) -> Result<T, Error> {
    T::decode_cfg(buf, cfg).map_err(|err| {
        let err = Error::from(err);
        debug!(kind = std::any::type_name::<T>(), ?err, "rejected encoding");
        err
    })
}
