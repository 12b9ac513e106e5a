//! # Utility Modules
//!
//! Hex encoding/decoding and hex dump helpers shared by the byte containers,
//! the CLI and the tests.

pub mod hex;

pub use hex::{decode_hex, encode_hex_upper, format_hex_spaced, log_frame_hex, pretty_hex};
