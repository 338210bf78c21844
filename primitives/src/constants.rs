//! Consensus constants that bound decoded values.

/// Largest length any CompactSize prefix may declare, regardless of context.
pub const MAX_SIZE: usize = 0x0200_0000;

/// Maximum size of a creator script accepted when decoding a header.
///
/// Scripts are only bounded by the CompactSize limit on the wire. Execution limits apply when a
/// script is interpreted, never when a header is decoded.
pub const MAX_SCRIPT_SIZE: usize = MAX_SIZE;

/// Maximum size of a serialized block.
pub const MAX_BLOCK_SERIALIZED_SIZE: usize = 4_000_000;

/// Smallest size a serialized transaction can have.
pub const MIN_TRANSACTION_SIZE: usize = 60;

/// Ratio between the cost of always-downloaded bytes and discounted bytes.
pub const WITNESS_SCALE_FACTOR: u64 = 4;

/// Maximum number of hashes accepted in a locator.
pub const MAX_LOCATOR_HASHES: usize = 101;
