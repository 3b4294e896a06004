//! Base-128 integer and OBJECT IDENTIFIER decoding.
//!
//! Custom extension keys are plain UTF-8 strings. Their bytes are read as if
//! they were the body of a BER-encoded OBJECT IDENTIFIER, which maps every key
//! to a deterministic arc sequence. The result is an internal naming
//! convention, not a registered OID: `"abc"` becomes `2.17.98.99`. Issuance and
//! lookup must both go through [`Oid::from_key`] so the same key resolves to
//! the same arcs, so do not replace this with a dotted-string parser.
//!
//! Each integer is limited to [`MAX_ARC_BYTES`] bytes, so arcs stay below
//! 2^28. That is plenty for key hashing but rejects some long standards-track
//! arcs if the decoder is ever pointed at external OIDs.

use std::fmt;

use const_oid::ObjectIdentifier;
use der::{DecodeValue, EncodeValue, FixedTag, Header, Length, Reader, Tag, Writer};
use thiserror::Error;

/// Maximum number of bytes a single base-128 integer may span.
pub const MAX_ARC_BYTES: usize = 4;

/// Errors produced while decoding base-128 integers and OIDs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OidError {
    /// Input ran out before a byte with the high bit clear.
    #[error("asn1: syntax error: truncated base 128 integer")]
    Truncated,

    /// More than [`MAX_ARC_BYTES`] bytes were needed for one integer.
    #[error("asn1: structure error: base 128 integer too large")]
    Oversized,

    /// No bytes to decode.
    #[error("asn1: syntax error: zero length OBJECT IDENTIFIER")]
    Empty,
}

/// Decodes one base-128, big-endian integer starting at `offset`.
///
/// Returns the value and the offset just past its last byte.
pub fn parse_base128(bytes: &[u8], offset: usize) -> Result<(u32, usize), OidError> {
    let mut value: u32 = 0;
    let rest = bytes.get(offset..).unwrap_or_default();

    for (shifted, &byte) in rest.iter().enumerate() {
        if shifted == MAX_ARC_BYTES {
            return Err(OidError::Oversized);
        }
        value = (value << 7) | u32::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok((value, offset + shifted + 1));
        }
    }

    Err(OidError::Truncated)
}

/// Appends the base-128 encoding of `value` to `out`.
pub fn encode_base128(value: u32, out: &mut Vec<u8>) {
    let mut groups = [0u8; 5];
    let mut start = groups.len();
    let mut rest = value;
    loop {
        start -= 1;
        groups[start] = (rest & 0x7f) as u8;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    let last = groups.len() - 1;
    for (i, group) in groups.iter().enumerate().skip(start) {
        out.push(if i == last { *group } else { group | 0x80 });
    }
}

/// A decoded OBJECT IDENTIFIER: two or more arcs, the first one at most 2.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    /// Decodes an OID body (the bytes after tag and length).
    pub fn from_ber(bytes: &[u8]) -> Result<Self, OidError> {
        if bytes.is_empty() {
            return Err(OidError::Empty);
        }

        // Worst case: two arcs from the first byte, then one per byte.
        let mut arcs = Vec::with_capacity(bytes.len() + 1);

        // The first integer packs 40 * arc0 + arc1, with arc0 in 0..=2.
        let (packed, mut offset) = parse_base128(bytes, 0)?;
        if packed < 80 {
            arcs.push(packed / 40);
            arcs.push(packed % 40);
        } else {
            arcs.push(2);
            arcs.push(packed - 80);
        }

        while offset < bytes.len() {
            let (arc, next) = parse_base128(bytes, offset)?;
            arcs.push(arc);
            offset = next;
        }

        Ok(Self(arcs))
    }

    /// Maps a custom extension key to its arcs by decoding the key's UTF-8 bytes.
    pub fn from_key(key: &str) -> Result<Self, OidError> {
        Self::from_ber(key.as_bytes())
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// Re-encodes the arcs as an OID body.
    ///
    /// Gives back the decoded bytes whenever they were minimally encoded.
    pub fn to_ber(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len());
        encode_base128(40 * self.0[0] + self.0[1], &mut out);
        for arc in &self.0[2..] {
            encode_base128(*arc, &mut out);
        }
        out
    }

    /// The `const-oid` form of these arcs, when that type can hold them.
    ///
    /// `ObjectIdentifier` wants at least three encoded bytes and a second arc
    /// of at most 39, so many custom keys have no such form.
    pub fn as_object_identifier(&self) -> Option<ObjectIdentifier> {
        ObjectIdentifier::from_bytes(&self.to_ber()).ok()
    }
}

impl From<ObjectIdentifier> for Oid {
    fn from(oid: ObjectIdentifier) -> Self {
        Self(oid.arcs().collect())
    }
}

impl FixedTag for Oid {
    const TAG: Tag = Tag::ObjectIdentifier;
}

impl<'a> DecodeValue<'a> for Oid {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let body = reader.read_vec(header.length)?;
        Self::from_ber(&body).map_err(|_| Tag::ObjectIdentifier.value_error())
    }
}

impl EncodeValue for Oid {
    fn value_len(&self) -> der::Result<Length> {
        self.to_ber().len().try_into()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        writer.write(&self.to_ber())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
        }
        Ok(())
    }
}
