//! # M-Bus Data Encoding and Decoding
//!
//! Decoders for the IEC 870-5-4 application layer types carried in record
//! payloads:
//!
//! | Type | Decoder            | Content                        |
//! |------|--------------------|--------------------------------|
//! | A    | [`parse_bcd_uint`] | unsigned BCD integer           |
//! | A    | [`parse_long_bcd_uint`] | BCD of variable length data |
//! | B    | [`parse_int`]      | two's complement integer       |
//! | C    | [`parse_uint`]     | unsigned integer               |
//! | D    | [`parse_bool`]     | boolean                        |
//! | E    | [`parse_unit_type`]| CP16 type and unit information |
//! | F    | [`parse_datetime`] | CP32 date and time             |
//! | G    | [`parse_date`]     | CP16 date                      |
//! | H    | [`parse_float`]    | IEEE-754 single precision      |
//!
//! Multi-byte values are least significant byte first unless a
//! [`ByteOrder`] says otherwise (CI mode 2).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use nom::number::complete::le_f32;
use serde::Serialize;

use crate::error::MBusError;
use crate::mbus::byte::ByteSequence;
use crate::mbus::fields::ByteOrder;

const YEAR_MASK_LSB: u8 = 0xE0;
const YEAR_MASK_MSB: u8 = 0xF0;
const MONTH_MASK: u8 = 0x0F;
const DAY_MASK: u8 = 0x1F;
const HOUR_MASK: u8 = 0x1F;
const MINUTE_MASK: u8 = 0x3F;
const SECOND_MASK: u8 = 0x3F;
const UNIT_MASK: u8 = 0xC0;
const MEDIA_MASK: u8 = 0x3F;

/// Largest BCD input that fits a `u64` (18 digits).
const MAX_BCD_BYTES: usize = 9;
/// Largest BCD input that fits a `u128` (38 digits), enough for LVAR 0xCF.
const MAX_LONG_BCD_BYTES: usize = 19;
const MAX_INT_BYTES: usize = 8;

fn check_length(
    bytes: &[u8],
    structure: &'static str,
    expected: &'static str,
    valid: impl Fn(usize) -> bool,
) -> Result<(), MBusError> {
    if valid(bytes.len()) {
        Ok(())
    } else {
        Err(MBusError::InvalidLength {
            structure,
            expected,
            actual: bytes.len(),
        })
    }
}

fn least_significant_first(bytes: &[u8], order: ByteOrder) -> Vec<u8> {
    match order {
        ByteOrder::LittleEndian => bytes.to_vec(),
        ByteOrder::BigEndian => bytes.iter().rev().copied().collect(),
    }
}

/// Type A: unsigned BCD integer, byte 0 holding the two least significant
/// digits (low nibble first). Nibbles above 9 are not rejected.
pub fn parse_bcd_uint(bytes: &[u8]) -> Result<u64, MBusError> {
    check_length(bytes, "BCD integer", "1 to 9 bytes", |n| {
        (1..=MAX_BCD_BYTES).contains(&n)
    })?;

    u64::try_from(bcd_digits(bytes))
        .map_err(|_| MBusError::Decode(format!("BCD value {bytes:02X?} exceeds u64")))
}

/// Type A for the BCD payloads of variable length records (LVAR 0xC0 to
/// 0xDF carry up to 15 bytes), which do not fit [`parse_bcd_uint`].
pub fn parse_long_bcd_uint(bytes: &[u8]) -> Result<u128, MBusError> {
    check_length(bytes, "BCD integer", "1 to 19 bytes", |n| {
        (1..=MAX_LONG_BCD_BYTES).contains(&n)
    })?;
    Ok(bcd_digits(bytes))
}

fn bcd_digits(bytes: &[u8]) -> u128 {
    let (value, _) = bytes
        .iter()
        .flat_map(|b| [b & 0x0F, b >> 4])
        .fold((0u128, 1u128), |(acc, power), digit| {
            (acc + u128::from(digit) * power, power.saturating_mul(10))
        });
    value
}

pub fn parse_bcd_uint_with(bytes: &[u8], order: ByteOrder) -> Result<u64, MBusError> {
    parse_bcd_uint(&least_significant_first(bytes, order))
}

/// Type C: unsigned integer of 1 to 8 bytes.
pub fn parse_uint(bytes: &[u8]) -> Result<u64, MBusError> {
    check_length(bytes, "unsigned integer", "1 to 8 bytes", |n| {
        (1..=MAX_INT_BYTES).contains(&n)
    })?;

    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(buf))
}

pub fn parse_uint_with(bytes: &[u8], order: ByteOrder) -> Result<u64, MBusError> {
    parse_uint(&least_significant_first(bytes, order))
}

/// Type B: two's complement integer of 1 to 8 bytes, signed by the top bit
/// of the last byte.
pub fn parse_int(bytes: &[u8]) -> Result<i64, MBusError> {
    let magnitude = parse_uint(bytes).map_err(|_| MBusError::InvalidLength {
        structure: "signed integer",
        expected: "1 to 8 bytes",
        actual: bytes.len(),
    })?;
    let shift = 64 - 8 * bytes.len() as u32;
    Ok(((magnitude << shift) as i64) >> shift)
}

pub fn parse_int_with(bytes: &[u8], order: ByteOrder) -> Result<i64, MBusError> {
    parse_int(&least_significant_first(bytes, order))
}

/// Type D: true when any bit of the unsigned value is set.
pub fn parse_bool(bytes: &[u8]) -> Result<bool, MBusError> {
    Ok(parse_uint(bytes)? != 0)
}

/// Type H: IEEE-754 single precision from the first 4 bytes.
pub fn parse_float(bytes: &[u8]) -> Result<f32, MBusError> {
    check_length(bytes, "float", "at least 4 bytes", |n| n >= 4)?;
    let (_, value) = le_f32::<_, nom::error::Error<&[u8]>>(bytes)
        .map_err(|e| MBusError::Decode(format!("float: {e}")))?;
    Ok(value)
}

/// Calendar year from the split year bits of a CP16 date.
fn year(lsb_byte: u8, msb_byte: u8) -> i32 {
    let value = ((msb_byte & YEAR_MASK_MSB) | ((lsb_byte & YEAR_MASK_LSB) >> 4)) >> 1;
    if value < 81 {
        2000 + i32::from(value)
    } else {
        1900 + i32::from(value)
    }
}

fn date_from(b0: u8, b1: u8) -> Result<NaiveDate, MBusError> {
    let (y, m, d) = (year(b0, b1), b1 & MONTH_MASK, b0 & DAY_MASK);
    NaiveDate::from_ymd_opt(y, u32::from(m), u32::from(d))
        .ok_or_else(|| MBusError::Decode(format!("invalid date {y:04}-{m:02}-{d:02}")))
}

fn time_from(hour: u8, minute: u8, second: u8) -> Result<NaiveTime, MBusError> {
    NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), u32::from(second)).ok_or_else(
        || MBusError::Decode(format!("invalid time {hour:02}:{minute:02}:{second:02}")),
    )
}

/// Type G: CP16 date from the first 2 bytes.
///
/// ```text
/// byte 0: | year bits 2-0 (3) | day (5)   |
/// byte 1: | year bits 6-3 (4) | month (4) |
/// ```
///
/// Year values below 81 are in the 2000s, the rest in the 1900s.
pub fn parse_date(bytes: &[u8]) -> Result<NaiveDate, MBusError> {
    check_length(bytes, "date", "at least 2 bytes", |n| n >= 2)?;
    date_from(bytes[0], bytes[1])
}

/// Time of day from 2, 3 or 5 bytes; the last byte carries the seconds when
/// there are 3 or 5 of them.
pub fn parse_time(bytes: &[u8]) -> Result<NaiveTime, MBusError> {
    check_length(bytes, "time", "2, 3 or 5 bytes", |n| matches!(n, 2 | 3 | 5))?;
    let second = match bytes.len() {
        3 | 5 => bytes[bytes.len() - 1] & SECOND_MASK,
        _ => 0,
    };
    time_from(bytes[1] & HOUR_MASK, bytes[0] & MINUTE_MASK, second)
}

/// Type F: CP32 date and time in UTC.
///
/// Bytes 0-1 carry minute and hour, bytes 2-3 a CP16 date and an optional
/// byte 4 the seconds.
pub fn parse_datetime(bytes: &[u8]) -> Result<DateTime<Utc>, MBusError> {
    check_length(bytes, "date and time", "at least 4 bytes", |n| n >= 4)?;
    let second = bytes.get(4).map_or(0, |b| b & SECOND_MASK);
    let time = time_from(bytes[1] & HOUR_MASK, bytes[0] & MINUTE_MASK, second)?;
    let date = date_from(bytes[2], bytes[3])?;
    Ok(NaiveDateTime::new(date, time).and_utc())
}

/// Type E: CP16 types and units information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UnitType {
    /// Top 2 bits of byte 1, unshifted.
    pub unit1: u8,
    /// Top 2 bits of byte 0, unshifted.
    pub unit2: u8,
    pub media: [u8; 2],
}

impl UnitType {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MBusError> {
        check_length(bytes, "unit type", "at least 2 bytes", |n| n >= 2)?;
        Ok(UnitType {
            unit1: bytes[1] & UNIT_MASK,
            unit2: bytes[0] & UNIT_MASK,
            media: [bytes[0] & MEDIA_MASK, bytes[1] & MEDIA_MASK],
        })
    }

    pub fn from_hex(hex: &str) -> Result<Self, MBusError> {
        Self::from_bytes(&ByteSequence::from_hex(hex)?.as_bytes())
    }
}

pub fn parse_unit_type(bytes: &[u8]) -> Result<UnitType, MBusError> {
    UnitType::from_bytes(bytes)
}
