//! # textpack
//!
//! A tagged text serialization codec: an ordered sequence of structured
//! values (nested key/value containers, text, numbers, booleans, absence
//! markers) becomes one flat byte string and comes back exactly, so
//! structured data can cross a narrow text-only channel (a size-limited
//! message transport, a persisted text blob) and be reconstructed on the
//! other side.
//!
//! ## Key Properties
//!
//! - **Self-delimiting grammar**: every production ends at a fixed tag, an
//!   explicit terminator, or the next tag byte, so decoding is a true
//!   single pass with no lookahead and no backtracking
//! - **Transport-safe**: arbitrary byte content inside text values is
//!   escaped, so the output never contains a stray structural byte
//! - **Cycle-checked**: a container that contains itself is rejected at
//!   encode time instead of recursing forever
//! - **Unfussy on the way in**: decoding never panics, whatever the input;
//!   every failure names its kind and byte offset
//! - **No unsafe code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use textpack::{from_bytes, pack, to_bytes, Value};
//!
//! let profile = pack!({
//!     "name": "Alice",
//!     "admin": true,
//!     "level": 9
//! });
//!
//! let payload = to_bytes(&[profile.clone(), Value::Nil]).unwrap();
//! let values = from_bytes(&payload).unwrap();
//!
//! assert_eq!(values.len(), 2);
//! assert_eq!(values[0], profile);
//! assert_eq!(values[1], Value::Nil);
//! ```
//!
//! The unit of serialization is a **slice of values**, not a single value:
//! `Nil` occupies a positional slot, so multi-value round-trips preserve
//! position and count even when some slots are empty.
//!
//! ## Collaborating layers
//!
//! The codec neither performs I/O nor compresses. A compression stage may
//! treat the output as opaque bytes (any lossless scheme round-trips it
//! untouched), and a transport only has to deliver the string unmodified.
//! Timers, scheduling, and delivery are someone else's concern.
//!
//! ## Concurrency
//!
//! Both directions are synchronous and single-pass, with all state local to
//! one call. Code running inside a decode callback may itself encode or
//! decode without interference.

pub mod container;
pub mod de;
pub mod error;
pub mod escape;
pub mod macros;
pub mod ser;
pub mod value;
pub mod wire;

pub use container::{Container, FloatKey, Key};
pub use de::Decoder;
pub use error::{DecodeError, EncodeError, Error, MalformedEscape, Result};
pub use ser::Encoder;
pub use value::{Number, Value};

use std::io;

/// Encodes an ordered sequence of values into one payload.
///
/// # Examples
///
/// ```rust
/// use textpack::{to_bytes, Value};
///
/// let payload = to_bytes(&[Value::from("a"), Value::Nil, Value::from(3)]).unwrap();
/// assert_eq!(&payload[..2], &[0x05, b'1']);
/// ```
///
/// # Errors
///
/// [`EncodeError::UnsupportedType`] or [`EncodeError::CircularReference`];
/// both indicate a defect in the values handed in, and no partial output is
/// returned.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes(values: &[Value]) -> std::result::Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::new();
    for value in values {
        encoder.encode(value)?;
    }
    Ok(encoder.into_bytes())
}

/// Decodes a payload back into its ordered sequence of values.
///
/// Never panics: the input is presumed to come from an untrusted or
/// corrupted source, and every malformed input yields an `Err` whose
/// message identifies the failure kind and byte offset.
///
/// # Examples
///
/// ```rust
/// use textpack::{from_bytes, to_bytes, Value};
///
/// let payload = to_bytes(&[Value::from(true)]).unwrap();
/// assert_eq!(from_bytes(&payload).unwrap(), vec![Value::from(true)]);
///
/// assert!(from_bytes(b"not a payload").is_err());
/// ```
///
/// # Errors
///
/// Any [`DecodeError`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_bytes(input: &[u8]) -> std::result::Result<Vec<Value>, DecodeError> {
    Decoder::from_bytes(input).decode()
}

/// Encodes values and writes the payload to a writer.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, values: &[Value]) -> Result<()>
where
    W: io::Write,
{
    let payload = to_bytes(values)?;
    writer.write_all(&payload)?;
    Ok(())
}

/// Reads a payload from a reader and decodes it.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use textpack::{from_reader, to_bytes, Value};
///
/// let payload = to_bytes(&[Value::from(1)]).unwrap();
/// let values = from_reader(Cursor::new(payload)).unwrap();
/// assert_eq!(values, vec![Value::from(1)]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the payload is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Vec<Value>>
where
    R: io::Read,
{
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(from_bytes(&buffer)?)
}
