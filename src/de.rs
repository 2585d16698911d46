//! Decoding payloads back into values.
//!
//! The [`Decoder`] is a single-pass tokenizer and builder: it validates the
//! two-byte header, then repeatedly reads one tag and dispatches to the
//! matching production until the input is exhausted at depth zero. Because
//! every production is self-delimiting, no lookahead beyond the next tag is
//! ever needed and there is no backtracking.
//!
//! Input is presumed to come from an untrusted or corrupted source: every
//! malformed byte sequence turns into a [`DecodeError`] carrying the byte
//! offset where it was detected, and decoding never panics. Nesting is
//! bounded by [`crate::wire::MAX_DEPTH`] so a hostile run of container-start
//! tags cannot exhaust the stack.
//!
//! ## Usage
//!
//! Most users should use [`crate::from_bytes`]:
//!
//! ```rust
//! use textpack::{from_bytes, to_bytes, Value};
//!
//! let payload = to_bytes(&[Value::from("hi"), Value::Nil]).unwrap();
//! let values = from_bytes(&payload).unwrap();
//! assert_eq!(values, vec![Value::from("hi"), Value::Nil]);
//! ```

use crate::escape::unescape;
use crate::wire::{
    HEADER_LEN, MARKER, MAX_DEPTH, TAG_CLOSE, TAG_FALSE, TAG_FLOAT, TAG_FLOAT_END, TAG_INT,
    TAG_NEG_INF, TAG_NIL, TAG_OPEN, TAG_POS_INF, TAG_TEXT, TAG_TRUE, VERSION,
};
use crate::{Container, DecodeError, Key, Number, Value};

/// The decoder.
///
/// Holds the input slice and a cursor; all state is local to one `decode`
/// call, so concurrent or reentrant decoding never interferes.
pub struct Decoder<'de> {
    input: &'de [u8],
    position: usize,
}

impl<'de> Decoder<'de> {
    /// Creates a decoder over a payload.
    #[must_use]
    pub fn from_bytes(input: &'de [u8]) -> Self {
        Decoder { input, position: 0 }
    }

    /// Decodes the whole payload into its ordered sequence of values.
    ///
    /// The result preserves the positional order and count of the original
    /// encode call, interior nil slots included.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`]; see the module docs. The header is checked
    /// first, strictly in order: length, marker byte, version byte.
    pub fn decode(mut self) -> Result<Vec<Value>, DecodeError> {
        self.check_header()?;
        let mut values = Vec::new();
        while !self.at_end() {
            values.push(self.read_value(0)?);
        }
        Ok(values)
    }

    fn check_header(&mut self) -> Result<(), DecodeError> {
        if self.input.len() < HEADER_LEN {
            return Err(DecodeError::InputTooShort {
                len: self.input.len(),
                expected: HEADER_LEN,
            });
        }
        if self.input[0] != MARKER {
            return Err(DecodeError::InvalidHeader {
                found: self.input[0],
            });
        }
        if self.input[1] != VERSION {
            return Err(DecodeError::UnsupportedVersion {
                found: self.input[1] as char,
                expected: VERSION as char,
            });
        }
        self.position = HEADER_LEN;
        Ok(())
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Reads the two-byte tag at the cursor: a marker byte, then the
    /// distinguishing character.
    fn read_tag(&mut self) -> Result<u8, DecodeError> {
        let offset = self.position;
        let lead = self
            .peek()
            .ok_or(DecodeError::UnexpectedEndOfInput { offset })?;
        if lead != MARKER {
            return Err(DecodeError::InvalidTag { tag: lead, offset });
        }
        self.position += 1;
        let tag = self.peek().ok_or(DecodeError::UnexpectedEndOfInput {
            offset: self.position,
        })?;
        self.position += 1;
        Ok(tag)
    }

    /// Reads one production. `depth` is the current container nesting.
    fn read_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let tag_offset = self.position;
        let tag = self.read_tag()?;
        match tag {
            TAG_NIL => Ok(Value::Nil),
            TAG_TRUE => Ok(Value::Bool(true)),
            TAG_FALSE => Ok(Value::Bool(false)),
            TAG_POS_INF => Ok(Value::Number(Number::Infinity)),
            TAG_NEG_INF => Ok(Value::Number(Number::NegativeInfinity)),
            TAG_INT => self.read_integer(),
            TAG_FLOAT => self.read_float(tag_offset),
            TAG_TEXT => self.read_text(),
            TAG_OPEN => self.read_container(depth, tag_offset),
            other => Err(DecodeError::InvalidTag {
                tag: other,
                offset: tag_offset,
            }),
        }
    }

    /// Consumes a maximal run of decimal digits (with optional sign) and
    /// parses it as an exact integer.
    fn read_integer(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        if self.peek() == Some(b'-') {
            self.position += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        let digits = &self.input[start..self.position];
        let parsed = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse::<i64>().ok());
        match parsed {
            Some(i) => Ok(Value::Number(Number::Integer(i))),
            None => Err(DecodeError::InvalidNumber {
                repr: String::from_utf8_lossy(digits).into_owned(),
                offset: start,
            }),
        }
    }

    /// Consumes a float payload up to its terminator tag.
    fn read_float(&mut self, tag_offset: usize) -> Result<Value, DecodeError> {
        let start = self.position;
        let rel = self.input[start..]
            .iter()
            .position(|&b| b == MARKER)
            .ok_or(DecodeError::UnterminatedFloat { offset: tag_offset })?;
        let end = start + rel;
        if self.input.get(end + 1) != Some(&TAG_FLOAT_END) {
            return Err(DecodeError::UnterminatedFloat { offset: tag_offset });
        }
        let repr = &self.input[start..end];
        self.position = end + 2;
        let parsed = std::str::from_utf8(repr)
            .ok()
            .and_then(|s| s.parse::<f64>().ok());
        match parsed {
            Some(f) => Ok(Value::Number(Number::from(f))),
            None => Err(DecodeError::InvalidNumber {
                repr: String::from_utf8_lossy(repr).into_owned(),
                offset: start,
            }),
        }
    }

    /// Consumes text up to the next structural tag, unescaping as it goes.
    ///
    /// The next marker byte unambiguously ends the text: raw markers inside
    /// the original content were escaped. Text running to the end of the
    /// input is legal at any depth; an enclosing container will notice the
    /// missing close tag itself.
    fn read_text(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        let rel = self.input[start..]
            .iter()
            .position(|&b| b == MARKER)
            .unwrap_or(self.input.len() - start);
        let end = start + rel;
        self.position = end;
        let bytes = unescape(&self.input[start..end]).map_err(|e| DecodeError::MalformedEscape {
            offset: start + e.offset,
        })?;
        Ok(Value::Text(bytes))
    }

    /// Reads key/value production pairs until the matching close tag.
    fn read_container(&mut self, depth: usize, tag_offset: usize) -> Result<Value, DecodeError> {
        if depth >= MAX_DEPTH {
            return Err(DecodeError::DepthLimitExceeded {
                limit: MAX_DEPTH,
                offset: tag_offset,
            });
        }
        let container = Container::new();
        loop {
            if self.at_end() {
                return Err(DecodeError::UnexpectedEndOfInput {
                    offset: self.position,
                });
            }
            if self.peek_tag() == Some(TAG_CLOSE) {
                self.position += 2;
                break;
            }

            let key_offset = self.position;
            let key_value = self.read_value(depth + 1)?;
            let key = Key::from_value(&key_value)
                .ok_or(DecodeError::InvalidKey { offset: key_offset })?;

            if self.at_end() {
                return Err(DecodeError::UnexpectedEndOfInput {
                    offset: self.position,
                });
            }
            let value = self.read_value(depth + 1)?;
            container.insert(key, value);
        }
        Ok(Value::Container(container))
    }

    fn peek_tag(&self) -> Option<u8> {
        if self.peek() == Some(MARKER) {
            self.input.get(self.position + 1).copied()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::HEADER;
    use crate::{to_bytes, Value};

    fn payload(body: &[u8]) -> Vec<u8> {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    fn empty_payload_decodes_to_no_values() {
        assert_eq!(Decoder::from_bytes(&HEADER).decode().unwrap(), vec![]);
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(
            Decoder::from_bytes(b"").decode().unwrap_err(),
            DecodeError::InputTooShort {
                len: 0,
                expected: 2
            }
        );
        assert_eq!(
            Decoder::from_bytes(&[MARKER]).decode().unwrap_err(),
            DecodeError::InputTooShort {
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn rejects_bad_header_and_version() {
        assert_eq!(
            Decoder::from_bytes(b"xx").decode().unwrap_err(),
            DecodeError::InvalidHeader { found: b'x' }
        );
        assert_eq!(
            Decoder::from_bytes(&[MARKER, b'2']).decode().unwrap_err(),
            DecodeError::UnsupportedVersion {
                found: '2',
                expected: '1'
            }
        );
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = Decoder::from_bytes(&payload(&[MARKER, b'q']))
            .decode()
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidTag {
                tag: b'q',
                offset: 2
            }
        );
    }

    #[test]
    fn rejects_non_marker_where_tag_expected() {
        let err = Decoder::from_bytes(&payload(b"junk")).decode().unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidTag {
                tag: b'j',
                offset: 2
            }
        );
    }

    #[test]
    fn integer_parses_maximal_digit_run() {
        let bytes = payload(&[MARKER, TAG_INT, b'4', b'2', MARKER, TAG_NIL]);
        let values = Decoder::from_bytes(&bytes).decode().unwrap();
        assert_eq!(values, vec![Value::from(42), Value::Nil]);
    }

    #[test]
    fn empty_digit_run_is_invalid() {
        let bytes = payload(&[MARKER, TAG_INT]);
        let err = Decoder::from_bytes(&bytes).decode().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { offset: 4, .. }));
    }

    #[test]
    fn integer_overflow_is_invalid() {
        let mut body = vec![MARKER, TAG_INT];
        body.extend_from_slice(b"99999999999999999999999999");
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn float_without_terminator_fails() {
        let mut body = vec![MARKER, TAG_FLOAT];
        body.extend_from_slice(b"1.5");
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert_eq!(err, DecodeError::UnterminatedFloat { offset: 2 });
    }

    #[test]
    fn float_interrupted_by_other_tag_fails() {
        let body = [MARKER, TAG_FLOAT, b'1', MARKER, TAG_NIL];
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert_eq!(err, DecodeError::UnterminatedFloat { offset: 2 });
    }

    #[test]
    fn text_runs_to_end_of_input_at_depth_zero() {
        let mut body = vec![MARKER, TAG_TEXT];
        body.extend_from_slice(b"trailing");
        let values = Decoder::from_bytes(&payload(&body)).decode().unwrap();
        assert_eq!(values, vec![Value::from("trailing")]);
    }

    #[test]
    fn malformed_escape_reports_absolute_offset() {
        // Text payload: 'a', then an escape marker with a bad digit.
        let body = [MARKER, TAG_TEXT, b'a', 0x01, b'9'];
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert_eq!(err, DecodeError::MalformedEscape { offset: 5 });
    }

    #[test]
    fn unclosed_container_reports_end_of_input() {
        let body = [MARKER, TAG_OPEN];
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn container_missing_entry_value_fails() {
        // Open, one text key, then nothing.
        let body = [MARKER, TAG_OPEN, MARKER, TAG_TEXT, b'k'];
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn non_key_production_in_key_position_fails() {
        // Nil cannot key a container.
        let body = [MARKER, TAG_OPEN, MARKER, TAG_NIL, MARKER, TAG_NIL, MARKER, TAG_CLOSE];
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert_eq!(err, DecodeError::InvalidKey { offset: 4 });
    }

    #[test]
    fn close_tag_at_depth_zero_is_invalid() {
        let body = [MARKER, TAG_CLOSE];
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidTag {
                tag: TAG_CLOSE,
                offset: 2
            }
        );
    }

    #[test]
    fn hostile_nesting_hits_the_depth_limit() {
        let mut body = Vec::new();
        for _ in 0..(MAX_DEPTH * 4) {
            body.push(MARKER);
            body.push(TAG_OPEN);
        }
        let err = Decoder::from_bytes(&payload(&body)).decode().unwrap_err();
        assert!(matches!(err, DecodeError::DepthLimitExceeded { .. }));
    }

    #[test]
    fn decodes_what_the_encoder_wrote() {
        let container = Container::new();
        container.insert("a", 1);
        container.insert("b", true);

        let bytes = to_bytes(&[Value::Container(container.clone())]).unwrap();
        let values = Decoder::from_bytes(&bytes).decode().unwrap();
        assert_eq!(values, vec![Value::Container(container)]);
    }
}
