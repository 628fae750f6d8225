use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};

use crate::error::IdError;

/// HSDS entity kind, stored as the first byte of an [`EntityId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// An HDF5 group.
    Group,
    /// An HDF5 dataset.
    Dataset,
    /// A committed (named) datatype.
    CommittedType,
}

impl EntityType {
    /// All valid entity types, in type-byte order.
    pub const ALL: [EntityType; 3] = [
        EntityType::Group,
        EntityType::Dataset,
        EntityType::CommittedType,
    ];

    /// Decode a type byte. Any byte outside the recognized set fails with
    /// [`IdError::UnknownEntityType`] carrying the offending byte.
    pub fn from_byte(b: u8) -> Result<Self, IdError> {
        match b {
            b'g' => Ok(EntityType::Group),
            b'd' => Ok(EntityType::Dataset),
            b't' => Ok(EntityType::CommittedType),
            other => Err(IdError::UnknownEntityType(other)),
        }
    }

    /// The byte used for this type in the binary and text forms.
    pub const fn as_byte(self) -> u8 {
        match self {
            EntityType::Group => b'g',
            EntityType::Dataset => b'd',
            EntityType::CommittedType => b't',
        }
    }
}

// Each text codec below is a fixed-width format with its own dash placement
// and byte interleaving. A segment is (text offset, byte offset, byte count):
// one contiguous hex run between dashes.

const ID_TEXT_LEN: usize = 38;
const ID_DASHES: [usize; 5] = [1, 10, 19, 24, 31];
const ID_SEGMENTS: [(usize, usize, usize); 5] =
    [(2, 1, 4), (11, 5, 4), (20, 9, 2), (25, 11, 3), (32, 14, 3)];

const UUID_TEXT_LEN: usize = 36;
const UUID_DASHES: [usize; 4] = [8, 17, 22, 29];
const UUID_SEGMENTS: [(usize, usize, usize); 5] =
    [(0, 0, 4), (9, 4, 4), (18, 8, 2), (23, 10, 3), (30, 13, 3)];

const PREFIX_TEXT_LEN: usize = 17;
const PREFIX_DASHES: [usize; 1] = [8];
const PREFIX_SEGMENTS: [(usize, usize, usize); 2] = [(0, 0, 4), (9, 4, 4)];

const SUFFIX_TEXT_LEN: usize = 18;
const SUFFIX_DASHES: [usize; 2] = [4, 11];
const SUFFIX_SEGMENTS: [(usize, usize, usize); 3] = [(0, 0, 2), (5, 2, 3), (12, 5, 3)];

fn encode_raw(
    bytes: &[u8],
    len: usize,
    dashes: &[usize],
    segments: &[(usize, usize, usize)],
) -> Vec<u8> {
    let mut out = vec![0u8; len];
    for &i in dashes {
        out[i] = b'-';
    }
    for &(t, b, n) in segments {
        out[t..t + 2 * n].copy_from_slice(hex::encode(&bytes[b..b + n]).as_bytes());
    }
    out
}

fn encode_text(
    bytes: &[u8],
    len: usize,
    dashes: &[usize],
    segments: &[(usize, usize, usize)],
) -> String {
    String::from_utf8(encode_raw(bytes, len, dashes, segments)).expect("hex text is ASCII")
}

fn decode_text(
    text: &str,
    len: usize,
    dashes: &[usize],
    segments: &[(usize, usize, usize)],
    out: &mut [u8],
) -> Result<(), IdError> {
    let raw = text.as_bytes();
    if raw.len() != len {
        return Err(IdError::InvalidFormat);
    }
    for &i in dashes {
        if raw[i] != b'-' {
            return Err(IdError::InvalidFormat);
        }
    }
    for &(t, b, n) in segments {
        let seg = hex::decode(&raw[t..t + 2 * n]).map_err(|_| IdError::InvalidFormat)?;
        out[b..b + n].copy_from_slice(&seg);
    }
    Ok(())
}

/// Typed HSDS identifier: one entity-type byte plus a 128-bit UUID.
///
/// The value is a plain 17-byte array, so equality, hashing, and map keying
/// are allocation-free. A raw value may transiently hold an invalid type
/// byte; validity is enforced whenever the identifier crosses its text form.
///
/// Text form is exactly 38 characters:
/// `T-XXXXXXXX-XXXXXXXX-XXXX-XXXXXX-XXXXXX`, dashes at offsets
/// {1, 10, 19, 24, 31}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId([u8; 17]);

impl EntityId {
    /// Assemble an identifier from a type and raw UUID bytes.
    pub fn new(entity_type: EntityType, uuid: [u8; 16]) -> Self {
        let mut bytes = [0u8; 17];
        bytes[0] = entity_type.as_byte();
        bytes[1..].copy_from_slice(&uuid);
        Self(bytes)
    }

    /// Wrap raw bytes without validating the type byte. [`EntityId::format`]
    /// and [`EntityId::parse`] enforce validity at the text boundary.
    pub const fn from_raw(bytes: [u8; 17]) -> Self {
        Self(bytes)
    }

    /// The identifier's entity type. Fails if the type byte is invalid.
    pub fn entity_type(&self) -> Result<EntityType, IdError> {
        EntityType::from_byte(self.0[0])
    }

    /// The raw 17-byte value.
    pub fn as_bytes(&self) -> &[u8; 17] {
        &self.0
    }

    /// Parse the 38-character text form.
    pub fn parse(text: &str) -> Result<Self, IdError> {
        let raw = text.as_bytes();
        if raw.len() != ID_TEXT_LEN {
            return Err(IdError::InvalidFormat);
        }
        for &i in &ID_DASHES {
            if raw[i] != b'-' {
                return Err(IdError::InvalidFormat);
            }
        }
        EntityType::from_byte(raw[0])?;

        let mut bytes = [0u8; 17];
        bytes[0] = raw[0];
        decode_text(text, ID_TEXT_LEN, &ID_DASHES, &ID_SEGMENTS, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Render the 38-character text form. Refuses an identifier whose type
    /// byte is invalid, surfacing the offending byte.
    pub fn format(&self) -> Result<String, IdError> {
        self.entity_type()?;
        let mut out = encode_raw(&self.0, ID_TEXT_LEN, &ID_DASHES, &ID_SEGMENTS);
        out[0] = self.0[0];
        Ok(String::from_utf8(out).expect("hex text is ASCII"))
    }

    /// First 8 bytes of the UUID portion, used to build database paths.
    pub fn prefix(&self) -> IdPrefix {
        let mut p = [0u8; 8];
        p.copy_from_slice(&self.0[1..9]);
        IdPrefix(p)
    }

    /// Last 8 bytes of the UUID portion.
    pub fn suffix(&self) -> IdSuffix {
        let mut s = [0u8; 8];
        s.copy_from_slice(&self.0[9..17]);
        IdSuffix(s)
    }

    /// The full 128-bit UUID portion.
    pub fn uuid(&self) -> EntityUuid {
        let mut u = [0u8; 16];
        u.copy_from_slice(&self.0[1..17]);
        EntityUuid(u)
    }
}

impl FromStr for EntityId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.format().map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        EntityId::parse(&text).map_err(de::Error::custom)
    }
}

/// First 8 UUID bytes of an identifier.
///
/// Text form is 17 characters: `XXXXXXXX-XXXXXXXX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdPrefix([u8; 8]);

impl IdPrefix {
    /// The raw 8-byte value.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Parse the 17-character text form.
    pub fn parse(text: &str) -> Result<Self, IdError> {
        let mut bytes = [0u8; 8];
        decode_text(
            text,
            PREFIX_TEXT_LEN,
            &PREFIX_DASHES,
            &PREFIX_SEGMENTS,
            &mut bytes,
        )?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_text(
            &self.0,
            PREFIX_TEXT_LEN,
            &PREFIX_DASHES,
            &PREFIX_SEGMENTS,
        ))
    }
}

impl FromStr for IdPrefix {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Last 8 UUID bytes of an identifier.
///
/// Text form is 18 characters: `XXXX-XXXXXX-XXXXXX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdSuffix([u8; 8]);

impl IdSuffix {
    /// The raw 8-byte value.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Parse the 18-character text form.
    pub fn parse(text: &str) -> Result<Self, IdError> {
        let mut bytes = [0u8; 8];
        decode_text(
            text,
            SUFFIX_TEXT_LEN,
            &SUFFIX_DASHES,
            &SUFFIX_SEGMENTS,
            &mut bytes,
        )?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for IdSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_text(
            &self.0,
            SUFFIX_TEXT_LEN,
            &SUFFIX_DASHES,
            &SUFFIX_SEGMENTS,
        ))
    }
}

impl FromStr for IdSuffix {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The 128-bit UUID portion of an identifier.
///
/// Text form is the standard-looking 36 characters with dashes at offsets
/// {8, 17, 22, 29}: `XXXXXXXX-XXXXXXXX-XXXX-XXXXXX-XXXXXX`. Note the
/// grouping differs from RFC 4122; this is the HSDS on-disk convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityUuid([u8; 16]);

impl EntityUuid {
    /// The raw 16-byte value.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Parse the 36-character text form. Rejects a non-dash character at
    /// any of the fixed dash offsets.
    pub fn parse(text: &str) -> Result<Self, IdError> {
        let mut bytes = [0u8; 16];
        decode_text(
            text,
            UUID_TEXT_LEN,
            &UUID_DASHES,
            &UUID_SEGMENTS,
            &mut bytes,
        )?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for EntityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_text(
            &self.0,
            UUID_TEXT_LEN,
            &UUID_DASHES,
            &UUID_SEGMENTS,
        ))
    }
}

impl FromStr for EntityUuid {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
