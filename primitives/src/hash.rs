//! The chain's hash primitive.
//!
//! `hash` is double SHA-256 over the concatenation of its inputs, computed with
//! [commonware_cryptography::Sha256].

use commonware_cryptography::{Hasher as _, Sha256};

pub use commonware_cryptography::sha256::Digest;

/// Length of a [Digest] in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// Hashes the concatenation of `parts`.
pub fn hash(parts: &[&[u8]]) -> Digest {
    let mut inner = Sha256::default();
    for part in parts {
        inner.update(part);
    }
    let first = inner.finalize();

    let mut outer = Sha256::default();
    outer.update(first.as_ref());
    outer.finalize()
}

/// Returns the all-zero digest.
pub fn null() -> Digest {
    Digest::from([0u8; DIGEST_LENGTH])
}

/// Returns true if every byte of `digest` is zero.
pub fn is_null(digest: &Digest) -> bool {
    digest.as_ref().iter().all(|byte| *byte == 0)
}
