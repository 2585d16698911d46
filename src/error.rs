//! Error types for encoding and decoding.
//!
//! The two directions fail differently, and the split is deliberate:
//!
//! - **Encoding** consumes values built by local, trusted code. An
//!   unsupported value or a circular container indicates a programming
//!   defect, so [`EncodeError`] surfaces immediately from [`crate::to_bytes`]
//!   and the partial output is discarded.
//! - **Decoding** consumes bytes from an untrusted or possibly corrupted
//!   source. Every malformed input, however mangled, yields a
//!   [`DecodeError`] naming the failure kind and the byte offset where it
//!   was detected; decoding never panics.
//!
//! # Examples
//!
//! ```rust
//! use textpack::{from_bytes, DecodeError};
//!
//! let result = from_bytes(b"");
//! assert!(matches!(result, Err(DecodeError::InputTooShort { .. })));
//! ```

use thiserror::Error;

pub use crate::escape::MalformedEscape;

/// Errors raised while encoding values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The value cannot be represented on the wire.
    #[error("unsupported value: {0}")]
    UnsupportedType(String),

    /// A container is its own direct or indirect ancestor.
    #[error("circular reference: container contains itself")]
    CircularReference,
}

/// Errors returned while decoding a payload.
///
/// Offsets are byte positions into the input slice, counted from the start
/// of the header.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Input shorter than the fixed header.
    #[error("input too short: expected at least {expected} header bytes, got {len}")]
    InputTooShort { len: usize, expected: usize },

    /// The first byte is not the marker that opens a header.
    #[error("missing or invalid header (leading byte {found:#04x})")]
    InvalidHeader { found: u8 },

    /// The header names a version this crate does not read.
    #[error("unsupported format version {found:?} (expected {expected:?})")]
    UnsupportedVersion { found: char, expected: char },

    /// A byte that is not a recognized tag where a tag was required.
    #[error("invalid tag byte {tag:#04x} at offset {offset}")]
    InvalidTag { tag: u8, offset: usize },

    /// A numeric payload that does not parse as its production requires.
    #[error("invalid number {repr:?} at offset {offset}")]
    InvalidNumber { repr: String, offset: usize },

    /// A production in container-key position that cannot key a container.
    #[error("invalid container key at offset {offset}")]
    InvalidKey { offset: usize },

    /// Input ended before a float terminator tag was found.
    #[error("unterminated float starting at offset {offset}")]
    UnterminatedFloat { offset: usize },

    /// Input ended inside an open container.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEndOfInput { offset: usize },

    /// An escape pair inside a text payload could not be reversed.
    #[error("malformed escape sequence at offset {offset}")]
    MalformedEscape { offset: usize },

    /// Container nesting beyond what the decoder will follow.
    #[error("container nesting exceeds {limit} levels at offset {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },
}

/// Umbrella error for the I/O convenience functions.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
