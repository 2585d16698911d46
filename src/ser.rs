//! Encoding values into the tagged wire format.
//!
//! The [`Encoder`] walks a value recursively and appends one self-delimiting
//! production per value: a fixed header first, then tag bytes with payloads
//! as laid out in [`crate::wire`]. Text payloads pass through the escaper;
//! containers are guarded against cycles.
//!
//! ## Usage
//!
//! Most users should use [`crate::to_bytes`]:
//!
//! ```rust
//! use textpack::{to_bytes, Value};
//!
//! let payload = to_bytes(&[Value::from(42), Value::Nil]).unwrap();
//! assert_eq!(&payload[..2], &[0x05, b'1']);
//! ```
//!
//! For streaming several values into one buffer, drive the encoder directly:
//!
//! ```rust
//! use textpack::{Encoder, Value};
//!
//! let mut encoder = Encoder::new();
//! encoder.encode(&Value::from(true)).unwrap();
//! encoder.encode(&Value::from("payload")).unwrap();
//! let bytes = encoder.into_bytes();
//! ```
//!
//! Encode failures ([`EncodeError::UnsupportedType`],
//! [`EncodeError::CircularReference`]) indicate defects in the calling code;
//! `to_bytes` discards the partial buffer and returns the error.

use crate::escape::escape;
use crate::wire::{
    HEADER, TAG_CLOSE, TAG_FALSE, TAG_FLOAT, TAG_FLOAT_END, TAG_INT, TAG_NEG_INF, TAG_NIL,
    TAG_OPEN, TAG_POS_INF, TAG_TEXT, TAG_TRUE,
};
use crate::{Container, EncodeError, Key, Number, Value};

/// Tracks the containers currently being written, to detect cycles.
///
/// The set lives for one top-level encode call and is keyed on container
/// identity. `enter`/`leave` calls are strictly nested, so a plain stack
/// suffices; depth equals container nesting depth, so the linear scan in
/// `enter` stays cheap.
#[derive(Debug, Default)]
struct CycleGuard {
    active: Vec<usize>,
}

impl CycleGuard {
    /// Marks a container as being written. Fails if it already is, which
    /// means the container is its own ancestor.
    fn enter(&mut self, identity: usize) -> Result<(), EncodeError> {
        if self.active.contains(&identity) {
            return Err(EncodeError::CircularReference);
        }
        self.active.push(identity);
        Ok(())
    }

    /// Unmarks a container once all its entries are written. The same
    /// container may then reappear later as a non-ancestor occurrence.
    fn leave(&mut self, identity: usize) {
        debug_assert_eq!(self.active.last(), Some(&identity));
        self.active.pop();
    }

    fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// The encoder.
///
/// Writes the header on construction and one tagged production per
/// [`encode`](Encoder::encode) call. All state is local to the instance;
/// separate encoders never interfere, so encoding is safely reentrant.
pub struct Encoder {
    output: Vec<u8>,
    guard: CycleGuard,
}

impl Encoder {
    /// Creates an encoder with the format header already written.
    #[must_use]
    pub fn new() -> Self {
        let mut output = Vec::with_capacity(256);
        output.extend_from_slice(&HEADER);
        Encoder {
            output,
            guard: CycleGuard::default(),
        }
    }

    /// Appends one value to the payload.
    ///
    /// # Errors
    ///
    /// [`EncodeError::UnsupportedType`] for NaN numerics,
    /// [`EncodeError::CircularReference`] when a container turns out to be
    /// its own direct or indirect ancestor. Either way the guard's ancestor
    /// set unwinds to empty and the output rolls back to its pre-call
    /// length, so no bytes of the failed production survive and the buffer
    /// still holds a well-formed payload.
    pub fn encode(&mut self, value: &Value) -> Result<(), EncodeError> {
        let rollback = self.output.len();
        let result = self.encode_value(value);
        debug_assert!(self.guard.is_empty());
        if result.is_err() {
            self.output.truncate(rollback);
        }
        result
    }

    /// Consumes the encoder, returning the encoded payload.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    fn put_tag(&mut self, tag: u8) {
        self.output.push(HEADER[0]);
        self.output.push(tag);
    }

    fn encode_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => {
                self.put_tag(TAG_NIL);
                Ok(())
            }
            Value::Bool(true) => {
                self.put_tag(TAG_TRUE);
                Ok(())
            }
            Value::Bool(false) => {
                self.put_tag(TAG_FALSE);
                Ok(())
            }
            Value::Number(number) => self.encode_number(*number),
            Value::Text(bytes) => {
                self.encode_text(bytes);
                Ok(())
            }
            Value::Container(container) => self.encode_container(container),
        }
    }

    fn encode_number(&mut self, number: Number) -> Result<(), EncodeError> {
        match number {
            Number::Integer(i) => {
                self.put_tag(TAG_INT);
                self.output.extend_from_slice(i.to_string().as_bytes());
                Ok(())
            }
            Number::Float(f) if f.is_nan() => {
                Err(EncodeError::UnsupportedType("NaN number".to_string()))
            }
            // Float holding an infinity folds into the fixed infinity tags.
            Number::Float(f) if f == f64::INFINITY => {
                self.put_tag(TAG_POS_INF);
                Ok(())
            }
            Number::Float(f) if f == f64::NEG_INFINITY => {
                self.put_tag(TAG_NEG_INF);
                Ok(())
            }
            Number::Float(f) => {
                self.put_tag(TAG_FLOAT);
                self.output.extend_from_slice(f.to_string().as_bytes());
                self.put_tag(TAG_FLOAT_END);
                Ok(())
            }
            Number::Infinity => {
                self.put_tag(TAG_POS_INF);
                Ok(())
            }
            Number::NegativeInfinity => {
                self.put_tag(TAG_NEG_INF);
                Ok(())
            }
        }
    }

    fn encode_text(&mut self, bytes: &[u8]) {
        self.put_tag(TAG_TEXT);
        self.output.extend_from_slice(&escape(bytes));
    }

    fn encode_key(&mut self, key: &Key) -> Result<(), EncodeError> {
        match key {
            Key::Text(bytes) => {
                self.encode_text(bytes);
                Ok(())
            }
            Key::Integer(i) => self.encode_number(Number::Integer(*i)),
            Key::Float(f) => self.encode_number(Number::from(f.get())),
        }
    }

    fn encode_container(&mut self, container: &Container) -> Result<(), EncodeError> {
        let identity = container.identity();
        self.guard.enter(identity)?;
        let result = self.encode_entries(container);
        // Leave on either path so the ancestor set is empty again when the
        // top-level call returns, success or failure.
        self.guard.leave(identity);
        result
    }

    fn encode_entries(&mut self, container: &Container) -> Result<(), EncodeError> {
        self.put_tag(TAG_OPEN);
        let entries = container.borrow();
        for (key, value) in entries.iter() {
            self.encode_key(key)?;
            self.encode_value(value)?;
        }
        drop(entries);
        self.put_tag(TAG_CLOSE);
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
