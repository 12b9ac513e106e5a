//! # mbus-codec - A Rust Crate for Decoding M-Bus (Meter-Bus) Telegrams
//!
//! The mbus-codec crate turns raw M-Bus telegram bytes, as read from utility
//! meters (electricity, gas, water, heat), into validated and typed values.
//!
//! ## Features
//!
//! - Validate the four link-layer frame shapes: ACK, short, control and long frames
//! - Parse Data and Value Information Blocks with their DIFE/VIFE extension chains
//! - Slice data records (DIB + VIB + payload) out of a byte stream
//! - Decode the IEC 870-5-4 data types: BCD, integers, booleans, floats, dates and times
//! - Resolve VIF codes to a physical quantity, a unit and a decimal multiplier,
//!   including the 0xFB and 0xFD extension tables
//! - Logging through the `log` facade and typed errors through `MBusError`
//!
//! ## Usage
//!
//! ```rust
//! use mbus_codec::{parse_int, DataRecord, Frame, FrameType, VifKind};
//!
//! let frame = Frame::from_hex("10 5B FE 59 16").unwrap();
//! assert_eq!(frame.frame_type(), FrameType::Short);
//!
//! let record = DataRecord::from_hex("04 13 34 12 00 00").unwrap();
//! let code = record.code().unwrap();
//! assert_eq!(code.kind, VifKind::Volume);
//! assert_eq!(code.multiplier, 1e-3);
//! assert_eq!(parse_int(&record.value_bytes()).unwrap(), 0x1234);
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod mbus;
pub mod payload;
pub mod util;

pub use crate::error::{ErrorKind, MBusError};
pub use crate::logging::{init_logger, log_debug, log_error, log_info, log_warn};

// Link layer
pub use mbus::{
    AddressField, ByteField, ByteOrder, ByteSequence, ControlField, ControlFrame,
    ControlInformationField, Frame, FrameType, LongFrame, ShortFrame, SingleFrame,
};

// Application layer
pub use payload::{
    parse_bcd_uint, parse_bcd_uint_with, parse_bool, parse_date, parse_datetime, parse_float,
    parse_int, parse_int_with, parse_long_bcd_uint, parse_time, parse_uint, parse_uint_with, parse_unit_type, resolve,
    resolve_value, DataFieldCode, DataInformationBlock, DataLength, DataRecord, ExtensionTable,
    FunctionFieldCode, UnitType, ValueInformationBlock, VifCode, VifKind, VifUnit,
};
