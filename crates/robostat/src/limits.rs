//! Limits enforced by the score codec.

/// Maximum number of elements in a list field (the count is one byte).
pub const MAX_LIST_LEN: usize = 0xff;

/// Maximum width of an integer field, in bytes.
///
/// Values are carried as `i128`, so every signed and unsigned range up
/// to 64 bits is representable without loss.
pub const MAX_INT_LENGTH: usize = 8;
