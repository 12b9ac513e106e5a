//! # Telegram Bytes
//!
//! [`ByteField`] is a single validated telegram byte; [`ByteSequence`] is an
//! ordered run of them. Every other telegram structure (fields, blocks,
//! records and frames) is built on top of these two types.
//!
//! A `u8` is trusted by construction, so the streaming parsers build fields
//! with `ByteField::from(u8)`. Integers coming from the outside go through
//! [`ByteField::new`] or [`ByteSequence::from_integers`], which reject anything
//! outside `0..=255`.

use std::fmt;
use std::ops::{Index, Range};

use crate::error::MBusError;
use crate::util::hex::{decode_hex, format_hex_spaced};

/// One telegram byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteField(u8);

impl ByteField {
    /// Validates an integer as a byte.
    pub fn new(value: i64) -> Result<Self, MBusError> {
        u8::try_from(value)
            .map(ByteField)
            .map_err(|_| MBusError::ByteOutOfRange(value))
    }

    pub const fn from_u8(byte: u8) -> Self {
        ByteField(byte)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns bit `n` (0 = least significant). Bits above 7 read as unset.
    pub const fn bit(self, n: u8) -> bool {
        n < 8 && (self.0 >> n) & 1 == 1
    }

    pub const fn masked(self, mask: u8) -> u8 {
        self.0 & mask
    }

    /// The top bit, used as "another byte follows" by DIF/DIFE/VIF/VIFE.
    pub const fn is_extended(self) -> bool {
        self.bit(7)
    }
}

impl From<u8> for ByteField {
    fn from(byte: u8) -> Self {
        ByteField(byte)
    }
}

impl From<ByteField> for u8 {
    fn from(field: ByteField) -> Self {
        field.0
    }
}

impl TryFrom<i64> for ByteField {
    type Error = MBusError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ByteField::new(value)
    }
}

impl PartialEq<u8> for ByteField {
    fn eq(&self, other: &u8) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ByteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// An ordered sequence of telegram bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteSequence {
    fields: Vec<ByteField>,
}

impl ByteSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytes.iter().copied().collect()
    }

    /// Builds a sequence from integers, validating each one as a byte.
    pub fn from_integers<I>(ints: I) -> Result<Self, MBusError>
    where
        I: IntoIterator<Item = i64>,
    {
        let fields = ints
            .into_iter()
            .map(ByteField::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ByteSequence { fields })
    }

    /// Builds a sequence from a hex string such as `"68 03 03 68"`.
    pub fn from_hex(hex: &str) -> Result<Self, MBusError> {
        Ok(Self::from_bytes(&decode_hex(hex)?))
    }

    /// Pulls exactly `count` bytes out of `source`, leaving the rest of it
    /// untouched.
    pub fn take<I>(source: &mut I, count: usize, structure: &'static str) -> Result<Self, MBusError>
    where
        I: Iterator<Item = u8>,
    {
        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            let byte = source.next().ok_or(MBusError::PrematureEnd(structure))?;
            fields.push(ByteField(byte));
        }
        Ok(ByteSequence { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ByteField> {
        self.fields.get(index).copied()
    }

    /// Copies a sub-range into a new sequence. Out-of-range bounds are clamped.
    pub fn slice(&self, range: Range<usize>) -> ByteSequence {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        ByteSequence {
            fields: self.fields[start..end].to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ByteField> + '_ {
        self.fields.iter().copied()
    }

    pub fn fields(&self) -> &[ByteField] {
        &self.fields
    }

    /// Raw bytes export.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.fields.iter().map(|f| f.0).collect()
    }

    pub fn to_hex(&self) -> String {
        format_hex_spaced(&self.as_bytes())
    }
}

impl Index<usize> for ByteSequence {
    type Output = ByteField;

    fn index(&self, index: usize) -> &Self::Output {
        &self.fields[index]
    }
}

impl FromIterator<u8> for ByteSequence {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        ByteSequence {
            fields: iter.into_iter().map(ByteField).collect(),
        }
    }
}

impl FromIterator<ByteField> for ByteSequence {
    fn from_iter<T: IntoIterator<Item = ByteField>>(iter: T) -> Self {
        ByteSequence {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<&[u8]> for ByteSequence {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for ByteSequence {
    fn from(bytes: Vec<u8>) -> Self {
        bytes.into_iter().collect()
    }
}

impl<const N: usize> From<[u8; N]> for ByteSequence {
    fn from(bytes: [u8; N]) -> Self {
        bytes.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ByteSequence {
    type Item = ByteField;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ByteField>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter().copied()
    }
}

impl PartialEq<[u8]> for ByteSequence {
    fn eq(&self, other: &[u8]) -> bool {
        self.len() == other.len() && self.fields.iter().zip(other).all(|(f, b)| f.0 == *b)
    }
}

impl PartialEq<&[u8]> for ByteSequence {
    fn eq(&self, other: &&[u8]) -> bool {
        self == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for ByteSequence {
    fn eq(&self, other: &[u8; N]) -> bool {
        self == &other[..]
    }
}

impl PartialEq<Vec<u8>> for ByteSequence {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self == other.as_slice()
    }
}

impl PartialEq<[ByteField]> for ByteSequence {
    fn eq(&self, other: &[ByteField]) -> bool {
        self.fields == other
    }
}

impl fmt::Display for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
