//! Telegrams captured from real meters. The link-layer checksum is checked over
//! the whole telegram and the data records after the 12 byte fixed header are
//! decoded one by one.

use chrono::{Datelike, Timelike};
use mbus_codec::mbus::frame::calculate_checksum;
use mbus_codec::{
    parse_bcd_uint, parse_date, parse_datetime, parse_float, parse_int, DataRecord,
    FunctionFieldCode, Frame, FrameType, VifKind, VifUnit,
};

const EXAMPLE_DATA_01_HEX: &str = "6831316808017245585703B40534049E0027B60306F934150315C6004D052E00000000053D00000000055B22F32642055FC7DA0D42FA16";

const ELS_ELSTER_HEX: &str = "686868680800725139494493152F04A17000000C06000000008C1006000000008C2013000000000C13000000003C2BBDEBDDDD3B3BBDEBDD0A5A27020A5E26020A6201000A273007046D090DCD134C06000000004C1300000000CC100600000000CC201300000000426CBF154016";

const APPLICATION_BUSY_HEX: &str = "68040468080170088116";

/// Offset of the first data record: `68 L L 68 C A CI` plus the fixed header.
const RECORDS_START: usize = 19;

fn telegram(hex: &str) -> Vec<u8> {
    hex::decode(hex).unwrap()
}

/// Checks L and the checksum and returns the data record bytes.
fn records_of(bytes: &[u8]) -> &[u8] {
    let len = bytes.len();
    assert_eq!(usize::from(bytes[1]) + 6, len);
    assert_eq!(bytes[len - 1], 0x16);
    assert_eq!(calculate_checksum(&bytes[4..len - 2]), bytes[len - 2]);
    &bytes[RECORDS_START..len - 2]
}

#[test]
fn test_example_data_01() {
    let bytes = telegram(EXAMPLE_DATA_01_HEX);
    let records = DataRecord::parse_all(records_of(&bytes)).unwrap();
    assert_eq!(records.len(), 6);

    let energy = &records[0];
    assert_eq!(energy.code().unwrap().unit, VifUnit::WattHour);
    assert_eq!(energy.code().unwrap().multiplier, 1e3);
    assert_eq!(parse_int(&energy.value_bytes()).unwrap(), 0x1534F9);

    let volume = &records[1];
    assert_eq!(volume.code().unwrap().kind, VifKind::Volume);
    assert_eq!(volume.code().unwrap().multiplier, 1e-1);

    let flow = parse_float(&records[4].value_bytes()).unwrap();
    let ret = parse_float(&records[5].value_bytes()).unwrap();
    assert!((flow - 41.74).abs() < 0.01, "{flow}");
    assert!((ret - 35.47).abs() < 0.01, "{ret}");
    assert_eq!(records[4].code().unwrap().kind, VifKind::FlowTemperature);
    assert_eq!(records[5].code().unwrap().kind, VifKind::ReturnTemperature);
}

#[test]
fn test_els_elster() {
    let bytes = telegram(ELS_ELSTER_HEX);
    let records = DataRecord::parse_all(records_of(&bytes)).unwrap();
    assert_eq!(records.len(), 16);

    assert_eq!(records[1].dib().tariff(), 1);
    assert_eq!(records[2].dib().tariff(), 2);
    assert_eq!(records[4].dib().function(), FunctionFieldCode::ValueDuringError);

    let flow_temperature = &records[6];
    assert_eq!(flow_temperature.code().unwrap().kind, VifKind::FlowTemperature);
    assert_eq!(parse_bcd_uint(&flow_temperature.value_bytes()).unwrap(), 227);

    let operating_time = &records[9];
    assert_eq!(operating_time.code().unwrap().unit, VifUnit::Day);
    assert_eq!(parse_bcd_uint(&operating_time.value_bytes()).unwrap(), 730);

    let now = parse_datetime(&records[10].value_bytes()).unwrap();
    assert_eq!((now.year(), now.month(), now.day()), (2014, 3, 13));
    assert_eq!((now.hour(), now.minute()), (13, 9));

    let due_date = &records[15];
    assert_eq!(due_date.dib().storage_number(), 1);
    let date = parse_date(&due_date.value_bytes()).unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2013, 5, 31));

    for record in &records[11..15] {
        assert_eq!(record.dib().storage_number(), 1);
    }
}

#[test]
fn test_application_busy() {
    let bytes = telegram(APPLICATION_BUSY_HEX);
    let frame = Frame::from_bytes(&bytes).unwrap();
    assert_eq!(frame.frame_type(), FrameType::Long);
    let Frame::Long(frame) = frame else {
        unreachable!()
    };
    assert_eq!(frame.control_information().value(), 0x70);
    assert_eq!(frame.user_data(), 0x08);
    assert!(frame.checksum_valid());
}
