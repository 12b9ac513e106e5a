use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use mbus_codec::{
    parse_bcd_uint, parse_bcd_uint_with, parse_bool, parse_date, parse_datetime, parse_float,
    parse_int, parse_int_with, parse_time, parse_uint, parse_uint_with, parse_unit_type, ByteOrder,
    ErrorKind, UnitType,
};
use proptest::prelude::*;

#[test]
fn test_bcd_digit_order() {
    assert_eq!(parse_bcd_uint(&[0x12, 0x34]).unwrap(), 3412);
    assert_eq!(parse_bcd_uint(&[0x78, 0x56, 0x34, 0x12]).unwrap(), 12345678);
    assert_eq!(parse_bcd_uint(&[0x00]).unwrap(), 0);
    assert_eq!(parse_bcd_uint(&[0x99; 9]).unwrap(), 999_999_999_999_999_999);
}

#[test]
fn test_bcd_big_endian() {
    assert_eq!(parse_bcd_uint_with(&[0x34, 0x12], ByteOrder::BigEndian).unwrap(), 3412);
    assert_eq!(parse_bcd_uint_with(&[0x12, 0x34], ByteOrder::LittleEndian).unwrap(), 3412);
}

#[test]
fn test_bcd_length() {
    assert_eq!(parse_bcd_uint(&[]).unwrap_err().kind(), ErrorKind::Length);
    assert_eq!(parse_bcd_uint(&[0x11; 10]).unwrap_err().kind(), ErrorKind::Length);
}

#[test]
fn test_signed_and_unsigned() {
    assert_eq!(parse_uint(&[0x80]).unwrap(), 128);
    assert_eq!(parse_int(&[0x80]).unwrap(), -128);
    assert_eq!(parse_uint(&[0xFF, 0x01]).unwrap(), 511);
    assert_eq!(parse_int(&[0xFF, 0x01]).unwrap(), 511);
    assert_eq!(parse_int(&[0xFF, 0xFF]).unwrap(), -1);
    assert_eq!(parse_int(&[0x00, 0x00, 0x80]).unwrap(), -0x80_0000);
    assert_eq!(parse_uint(&[0xFF; 8]).unwrap(), u64::MAX);
    assert_eq!(parse_int(&[0xFF; 8]).unwrap(), -1);
}

#[test]
fn test_integer_byte_order() {
    assert_eq!(parse_uint_with(&[0x01, 0xFF], ByteOrder::BigEndian).unwrap(), 511);
    assert_eq!(parse_int_with(&[0xFF, 0x7F], ByteOrder::BigEndian).unwrap(), -129);
    assert_eq!(ByteOrder::default(), ByteOrder::LittleEndian);
}

#[test]
fn test_integer_length() {
    assert!(parse_uint(&[]).unwrap_err().is_length_error());
    assert!(parse_uint(&[0; 9]).unwrap_err().is_length_error());
    assert!(parse_int(&[]).unwrap_err().is_length_error());
}

#[test]
fn test_bool() {
    assert!(!parse_bool(&[0x00, 0x00]).unwrap());
    assert!(parse_bool(&[0x00, 0x01]).unwrap());
    assert!(parse_bool(&[]).is_err());
}

#[test]
fn test_float() {
    assert_eq!(parse_float(&1.5f32.to_le_bytes()).unwrap(), 1.5);
    assert_eq!(parse_float(&[0x00, 0x00, 0xC0, 0xBF, 0xAA]).unwrap(), -1.5);
    assert!(parse_float(&[0x00, 0x00, 0xC0]).unwrap_err().is_length_error());
}

#[test]
fn test_date() {
    assert_eq!(
        parse_date(&[0x0A, 0x25]).unwrap(),
        NaiveDate::from_ymd_opt(2016, 5, 10).unwrap()
    );
    // year value 98 is at or above the century boundary
    let date = parse_date(&[0x41, 0xC1]).unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (1998, 1, 1));

    assert_eq!(parse_date(&[0x0A]).unwrap_err().kind(), ErrorKind::Length);
    assert_eq!(parse_date(&[0x00, 0x00]).unwrap_err().kind(), ErrorKind::Decode);
}

#[test]
fn test_time() {
    assert_eq!(
        parse_time(&[0x1E, 0x0C]).unwrap(),
        NaiveTime::from_hms_opt(12, 30, 0).unwrap()
    );
    assert_eq!(
        parse_time(&[0x1E, 0x0C, 0x2D]).unwrap(),
        NaiveTime::from_hms_opt(12, 30, 45).unwrap()
    );
    assert!(parse_time(&[0x1E, 0x0C, 0x0A, 0x25]).unwrap_err().is_length_error());
    assert_eq!(parse_time(&[0x3C, 0x0C]).unwrap_err().kind(), ErrorKind::Decode);
}

#[test]
fn test_datetime() {
    let dt = parse_datetime(&[0x1E, 0x0C, 0x0A, 0x25]).unwrap();
    assert_eq!((dt.year(), dt.month(), dt.day()), (2016, 5, 10));
    assert_eq!((dt.hour(), dt.minute(), dt.second()), (12, 30, 0));

    let dt = parse_datetime(&[0x1E, 0x0C, 0x0A, 0x25, 0x05]).unwrap();
    assert_eq!(dt.second(), 5);

    assert!(parse_datetime(&[0x1E, 0x0C, 0x0A]).unwrap_err().is_length_error());
}

#[test]
fn test_unit_type() {
    let unit = parse_unit_type(&[0xC5, 0x81]).unwrap();
    assert_eq!(
        unit,
        UnitType {
            unit1: 0x80,
            unit2: 0xC0,
            media: [0x05, 0x01],
        }
    );
    assert_eq!(UnitType::from_hex("C5 81").unwrap(), unit);
    assert!(parse_unit_type(&[0xC5]).is_err());
}

proptest! {
    #[test]
    fn prop_uint_matches_le_bytes(bytes in proptest::collection::vec(any::<u8>(), 1..=8)) {
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(&bytes);
        prop_assert_eq!(parse_uint(&bytes).unwrap(), u64::from_le_bytes(buf));
    }

    #[test]
    fn prop_int_matches_std(value in any::<i64>()) {
        let bytes = value.to_le_bytes();
        prop_assert_eq!(parse_int(&bytes).unwrap(), value);
        prop_assert_eq!(parse_int(&bytes[..4]).unwrap(), i64::from(value as i32));
        prop_assert_eq!(parse_int(&bytes[..2]).unwrap(), i64::from(value as i16));
        prop_assert_eq!(parse_int(&bytes[..1]).unwrap(), i64::from(value as i8));
    }

    #[test]
    fn prop_big_endian_is_reversed(bytes in proptest::collection::vec(any::<u8>(), 1..=8)) {
        let reversed: Vec<u8> = bytes.iter().rev().copied().collect();
        prop_assert_eq!(
            parse_uint_with(&bytes, ByteOrder::BigEndian).unwrap(),
            parse_uint(&reversed).unwrap()
        );
    }
}
