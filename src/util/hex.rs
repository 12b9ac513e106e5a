//! # Hex Encoding/Decoding Utilities
//!
//! Hex helpers used by the byte containers (`ByteSequence::from_hex`), the
//! frame/record `from_hex` constructors, the CLI and the tests.
//!
//! ## Usage
//!
//! ```rust
//! use mbus_codec::util::hex::{decode_hex, encode_hex_upper, format_hex_spaced};
//!
//! let data = decode_hex("68 03 03 68").unwrap();
//! assert_eq!(data, [0x68, 0x03, 0x03, 0x68]);
//! assert_eq!(encode_hex_upper(&data), "68030368");
//! assert_eq!(format_hex_spaced(&data), "68 03 03 68");
//! ```

use crate::error::MBusError;
use thiserror::Error;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Invalid hex character: {0:?}")]
    InvalidCharacter(char),

    #[error("Odd number of hex characters in {0:?}")]
    OddLength(String),

    #[error("Hex decoding error: {0}")]
    DecodeError(String),
}

impl From<HexError> for MBusError {
    fn from(err: HexError) -> Self {
        MBusError::InvalidHexString(err.to_string())
    }
}

/// Encode bytes to uppercase hex string
pub fn encode_hex_upper(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode hex string to bytes
///
/// Accepts both uppercase and lowercase hex characters. Whitespace may
/// separate byte pairs but may not split a pair. The empty string decodes
/// to an empty vector.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    let mut out = Vec::with_capacity(hex_str.len() / 2);
    for group in hex_str.split_whitespace() {
        if let Some(c) = group.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(HexError::InvalidCharacter(c));
        }
        if group.len() % 2 != 0 {
            return Err(HexError::OddLength(group.to_string()));
        }
        let bytes = hex::decode(group).map_err(|e| HexError::DecodeError(e.to_string()))?;
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

/// Format hex data for display, e.g. "68 03 03 68"
pub fn format_hex_spaced(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pretty-print hex data with offsets and an ASCII column
pub fn pretty_hex(data: &[u8], bytes_per_line: usize) -> String {
    let width = bytes_per_line.max(1);
    data.chunks(width)
        .enumerate()
        .map(|(i, chunk)| {
            let hex = format_hex_spaced(chunk);
            let ascii: String = chunk
                .iter()
                .map(|&b| {
                    if b.is_ascii_graphic() || b == b' ' {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect();
            format!("{:04x}: {:<w$} |{}|", i * width, hex, ascii, w = width * 3 - 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dump bytes at debug level
pub fn log_frame_hex(prefix: &str, data: &[u8]) {
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("{prefix} ({} bytes): {}", data.len(), format_hex_spaced(data));
    }
}
