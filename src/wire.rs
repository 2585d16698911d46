//! Wire format constants and grammar reference.
//!
//! This module pins down the byte-level format produced by [`crate::Encoder`]
//! and accepted by [`crate::Decoder`]. Everything here is fixed: changing a
//! constant changes the wire format and breaks round-trips with previously
//! persisted payloads.
//!
//! # Layout
//!
//! An encoded payload is a two-byte header followed by zero or more tagged
//! productions, one per top-level value:
//!
//! ```text
//! <MARKER> '1'            header: marker byte + format version
//! <MARKER> <tag char> ... one production per value, back to back
//! ```
//!
//! Every tag is the marker byte followed by a single distinguishing character.
//! The marker never appears unescaped inside a payload, which is what makes
//! each production self-delimiting: the decoder only ever needs to look at the
//! next tag to decide how to continue.
//!
//! # Productions
//!
//! | production       | encoding                                             |
//! |------------------|------------------------------------------------------|
//! | nil              | `<MARKER>'n'`                                        |
//! | true / false     | `<MARKER>'t'` / `<MARKER>'f'`                        |
//! | integer          | `<MARKER>'i'` + optional `-` + decimal digits        |
//! | float            | `<MARKER>'d'` + decimal text + `<MARKER>';'`         |
//! | +inf / -inf      | `<MARKER>'+'` / `<MARKER>'-'`                        |
//! | text             | `<MARKER>'s'` + escaped bytes                        |
//! | container        | `<MARKER>'{'` + (key production, value production)* + `<MARKER>'}'` |
//!
//! Integer digits need no escaping since ASCII digits never collide with the
//! reserved bytes. The float payload is not self-delimiting on its own, hence
//! the explicit terminator tag. Text is ended by the next production's marker
//! byte because raw marker bytes inside the text were escaped.
//!
//! # Escaping
//!
//! Five raw bytes are reserved and must never appear literally inside a text
//! payload: the four low control bytes `0x01..=0x04` and the marker `0x05`.
//! Each reserved byte `0x0k` is written as the two-byte pair `ESCAPE` + the
//! ASCII digit `k`. The escape marker is itself one of the reserved control
//! bytes, so a raw `0x01` in the original text is also escaped and the
//! transform stays bijective. See [`crate::escape`].

/// Lead byte of the header and of every tag.
pub const MARKER: u8 = 0x05;

/// Format version byte. The only version this crate reads or writes.
pub const VERSION: u8 = b'1';

/// The fixed two-byte header.
pub const HEADER: [u8; 2] = [MARKER, VERSION];

/// Header length in bytes.
pub const HEADER_LEN: usize = HEADER.len();

/// Escape marker used inside text payloads.
pub const ESCAPE: u8 = 0x01;

/// Raw bytes that must be escaped inside text payloads.
pub const RESERVED: [u8; 5] = [0x01, 0x02, 0x03, 0x04, MARKER];

// Tag characters. Each one follows a MARKER byte on the wire.
pub const TAG_NIL: u8 = b'n';
pub const TAG_TRUE: u8 = b't';
pub const TAG_FALSE: u8 = b'f';
pub const TAG_INT: u8 = b'i';
pub const TAG_FLOAT: u8 = b'd';
pub const TAG_FLOAT_END: u8 = b';';
pub const TAG_POS_INF: u8 = b'+';
pub const TAG_NEG_INF: u8 = b'-';
pub const TAG_TEXT: u8 = b's';
pub const TAG_OPEN: u8 = b'{';
pub const TAG_CLOSE: u8 = b'}';

/// Maximum container nesting depth accepted by the decoder.
///
/// Input is assumed untrusted; without a cap, a long run of container-start
/// tags would exhaust the decoder's call stack before the matching end tags
/// are ever seen.
pub const MAX_DEPTH: usize = 128;
