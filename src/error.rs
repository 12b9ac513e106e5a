//! # M-Bus Error Handling
//!
//! This module defines the MBusError enum, which represents the different error
//! types that can occur while decoding M-Bus telegrams.
//!
//! Every variant belongs to one of three kinds (see [`ErrorKind`]):
//! validation errors (a value outside its domain), length errors (the input
//! ran out, or a bounded repetition did not terminate) and decode errors
//! (well-formed bytes that do not describe a valid value).

use thiserror::Error;

/// Represents the different error types that can occur in the M-Bus crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MBusError {
    /// An integer does not fit into a byte.
    #[error("{0} is not a valid byte")]
    ByteOutOfRange(i64),

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string: {0}")]
    InvalidHexString(String),

    /// A frame byte does not match the value required at its position.
    #[error("{frame}: byte {position} is 0x{value:02X}, expected {expected}")]
    InvalidFrameByte {
        frame: &'static str,
        position: usize,
        value: u8,
        expected: &'static str,
    },

    /// A field byte is outside the domain of the field.
    #[error("Invalid {field}: 0x{value:02X} ({reason})")]
    InvalidField {
        field: &'static str,
        value: u8,
        reason: &'static str,
    },

    /// Indicates a checksum mismatch.
    #[error("Invalid checksum: expected {expected}, calculated {calculated}")]
    InvalidChecksum { expected: u8, calculated: u8 },

    /// A structure was handed the wrong number of bytes.
    #[error("{structure} has invalid length {actual}, expected {expected}")]
    InvalidLength {
        structure: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// The byte source was exhausted before the structure was complete.
    #[error("Premature end of data while parsing {0}")]
    PrematureEnd(&'static str),

    /// The last allowed extension byte still has its extension bit set.
    #[error("{block} exceeds {max} extension fields")]
    ExtensionOverflow { block: &'static str, max: usize },

    /// The bytes were read but do not form a valid value.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// The category an [`MBusError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Length,
    Decode,
}

impl MBusError {
    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MBusError::ByteOutOfRange(_)
            | MBusError::InvalidHexString(_)
            | MBusError::InvalidFrameByte { .. }
            | MBusError::InvalidField { .. }
            | MBusError::InvalidChecksum { .. } => ErrorKind::Validation,
            MBusError::InvalidLength { .. }
            | MBusError::PrematureEnd(_)
            | MBusError::ExtensionOverflow { .. } => ErrorKind::Length,
            MBusError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn is_validation_error(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_length_error(&self) -> bool {
        self.kind() == ErrorKind::Length
    }
}
