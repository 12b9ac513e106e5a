#![no_main]

use libfuzzer_sys::fuzz_target;
use mbus_codec::{
    parse_bcd_uint, parse_bcd_uint_with, parse_bool, parse_date, parse_datetime, parse_float,
    parse_int, parse_int_with, parse_time, parse_uint, parse_unit_type, ByteOrder,
};

fuzz_target!(|data: &[u8]| {
    // BCD accepts nibbles above 9 without overflowing
    for len in 1..=data.len().min(9) {
        let _ = parse_bcd_uint(&data[..len]);
        let _ = parse_bcd_uint_with(&data[..len], ByteOrder::BigEndian);
    }

    for len in 1..=data.len().min(8) {
        let bytes = &data[..len];
        let unsigned = parse_uint(bytes).unwrap_or_default();
        let signed = parse_int(bytes).unwrap_or_default();
        // both views share the low bits
        let mask = if len == 8 { u64::MAX } else { (1u64 << (8 * len)) - 1 };
        assert_eq!(signed as u64 & mask, unsigned);
        let _ = parse_int_with(bytes, ByteOrder::BigEndian);
        let _ = parse_bool(bytes);
    }

    // Dates and times reject impossible values with an error
    let _ = parse_float(data);
    let _ = parse_date(data);
    let _ = parse_time(data);
    let _ = parse_datetime(data);
    let _ = parse_unit_type(data);
});
