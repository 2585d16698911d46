//! Escaping of reserved bytes inside text payloads.
//!
//! Text payloads may carry arbitrary bytes, including the marker byte that
//! delimits every tag on the wire. Before a text payload is written, each of
//! the five reserved bytes (see [`crate::wire::RESERVED`]) is replaced with a
//! two-byte pair: the escape marker followed by an ASCII digit identifying
//! the original byte. [`unescape`] is the exact inverse over anything
//! [`escape`] produced.
//!
//! Both directions are single-pass and O(n); neither allocates anything
//! beyond the output buffer.
//!
//! # Examples
//!
//! ```rust
//! use textpack::escape::{escape, unescape};
//!
//! let raw = b"a\x05b\x01c";
//! let escaped = escape(raw);
//! assert!(!escaped.contains(&0x05));
//! assert_eq!(unescape(&escaped).unwrap(), raw);
//! ```

use crate::wire::{ESCAPE, MARKER};
use thiserror::Error;

/// Failure to reverse an escape pair.
///
/// Produced when an escape marker is followed by a byte outside the five
/// recognized distinguishing digits, or by nothing at all. `offset` is the
/// position of the offending escape marker within the input slice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed escape sequence at offset {offset}")]
pub struct MalformedEscape {
    pub offset: usize,
    /// The byte that followed the escape marker, if any.
    pub found: Option<u8>,
}

/// Replaces every reserved byte with its two-byte escape pair.
///
/// Reserved bytes are `0x01..=0x04` and the tag marker `0x05`; byte `0x0k`
/// becomes the pair `ESCAPE` + ASCII digit `k`. All other bytes are copied
/// through unchanged.
#[must_use]
pub fn escape(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    for &byte in input {
        match byte {
            0x01..=0x04 => {
                output.push(ESCAPE);
                output.push(b'0' + byte);
            }
            MARKER => {
                output.push(ESCAPE);
                output.push(b'5');
            }
            other => output.push(other),
        }
    }
    output
}

/// Reverses [`escape`].
///
/// Each escape marker must be followed by an ASCII digit in `'1'..='5'`;
/// anything else fails with [`MalformedEscape`]. Bytes outside escape pairs
/// are copied through unchanged.
///
/// # Errors
///
/// Returns [`MalformedEscape`] for an escape marker followed by an
/// unrecognized byte or sitting at the end of the input.
pub fn unescape(input: &[u8]) -> Result<Vec<u8>, MalformedEscape> {
    let mut output = Vec::with_capacity(input.len());
    let mut position = 0;
    while position < input.len() {
        let byte = input[position];
        if byte == ESCAPE {
            match input.get(position + 1) {
                Some(digit @ b'1'..=b'5') => {
                    output.push(digit - b'0');
                    position += 2;
                }
                found => {
                    return Err(MalformedEscape {
                        offset: position,
                        found: found.copied(),
                    });
                }
            }
        } else {
            output.push(byte);
            position += 1;
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::RESERVED;

    #[test]
    fn escapes_every_reserved_byte() {
        for &byte in &RESERVED {
            let escaped = escape(&[byte]);
            assert_eq!(escaped.len(), 2);
            assert_eq!(escaped[0], ESCAPE);
            assert_eq!(unescape(&escaped).unwrap(), vec![byte]);
        }
    }

    #[test]
    fn passes_ordinary_bytes_through() {
        let input = b"hello, world! 0123456789";
        assert_eq!(escape(input), input.to_vec());
        assert_eq!(unescape(input).unwrap(), input.to_vec());
    }

    #[test]
    fn escaped_output_contains_no_marker() {
        let input: Vec<u8> = (0u8..=255).collect();
        let escaped = escape(&input);
        assert!(!escaped.contains(&MARKER));
        assert_eq!(unescape(&escaped).unwrap(), input);
    }

    #[test]
    fn rejects_unknown_distinguishing_byte() {
        let err = unescape(&[b'a', ESCAPE, b'9']).unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.found, Some(b'9'));
    }

    #[test]
    fn rejects_trailing_escape_marker() {
        let err = unescape(&[b'a', ESCAPE]).unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.found, None);
    }

    #[test]
    fn mixed_content_round_trips() {
        let input = b"\x01start\x05middle\x02\x03\x04end\x01";
        assert_eq!(unescape(&escape(input)).unwrap(), input.to_vec());
    }
}
