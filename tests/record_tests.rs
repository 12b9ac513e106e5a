use mbus_codec::{
    parse_bcd_uint, parse_int, parse_long_bcd_uint, DataFieldCode, DataRecord, ErrorKind,
    FunctionFieldCode, MBusError, VifKind, VifUnit,
};
use proptest::prelude::*;

#[test]
fn test_int32_volume() {
    let record = DataRecord::from_hex("04 13 34 12 00 00").unwrap();
    assert_eq!(record.data_field_code(), DataFieldCode::Int32);
    assert_eq!(parse_int(&record.value_bytes()).unwrap(), 0x1234);
    let code = record.code().unwrap();
    assert_eq!(code.kind, VifKind::Volume);
    assert_eq!(code.unit, VifUnit::CubicMeter);
    assert_eq!(code.multiplier, 1e-3);
    assert_eq!(record.to_bytes(), vec![0x04, 0x13, 0x34, 0x12, 0x00, 0x00]);
}

#[test]
fn test_bcd_with_tariff() {
    let record = DataRecord::from_hex("8C 10 93 3B 78 56 34 12").unwrap();
    assert_eq!(record.data_field_code(), DataFieldCode::Bcd8);
    assert_eq!(record.dib().tariff(), 1);
    assert_eq!(parse_bcd_uint(&record.value_bytes()).unwrap(), 12_345_678);
}

#[test]
fn test_variable_length_payloads() {
    // text
    let record = DataRecord::from_hex("0D FD 11 03 41 42 43").unwrap();
    assert_eq!(record.data().len(), 4);
    assert_eq!(record.value_bytes(), b"ABC".to_vec());

    // binary, LVAR - 0xE0 bytes
    let record = DataRecord::from_hex("0D FD 0E E2 AA BB").unwrap();
    assert_eq!(record.value_bytes(), vec![0xAA, 0xBB]);
    assert_eq!(record.code().unwrap().kind, VifKind::FirmwareVersion);

    // BCD, low nibble of LVAR bytes
    let record = DataRecord::from_hex("0D FD 0E C3 01 02 03").unwrap();
    assert_eq!(record.value_bytes(), vec![0x01, 0x02, 0x03]);

    // long binary, 4 * (LVAR - 0xEC) bytes
    let mut bytes = vec![0x0D, 0xFD, 0x0E, 0xF0];
    bytes.extend([0x55; 16]);
    let record = DataRecord::from_bytes(&bytes).unwrap();
    assert_eq!(record.value_bytes().len(), 16);

    // empty text
    let record = DataRecord::from_hex("0D FD 11 00").unwrap();
    assert!(record.value_bytes().is_empty());
}

#[test]
fn test_reserved_lvar() {
    let err = DataRecord::from_hex("0D FD 11 FB 00").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(err, MBusError::InvalidField { field: "LVAR", value: 0xFB, .. }));
}

#[test]
fn test_payload_sizes_follow_data_field_code() {
    for (hex, size) in [
        ("00 13", 0),
        ("01 13 01", 1),
        ("02 13 01 02", 2),
        ("03 13 01 02 03", 3),
        ("05 13 00 00 C0 3F", 4),
        ("06 13 01 02 03 04 05 06", 6),
        ("07 13 01 02 03 04 05 06 07 08", 8),
        ("08 13", 0),
        ("09 13 12", 1),
        ("0E 13 01 02 03 04 05 06", 6),
        ("0F 13", 0),
    ] {
        let record = DataRecord::from_hex(hex).unwrap();
        assert_eq!(record.data().len(), size, "{hex}");
    }
}

#[test]
fn test_storage_and_function() {
    let record = DataRecord::from_hex("42 6C BF 15").unwrap();
    assert_eq!(record.dib().storage_number(), 1);
    assert_eq!(record.code().unwrap().unit, VifUnit::Date);

    let record = DataRecord::from_hex("3C 2B BD EB DD DD").unwrap();
    assert_eq!(record.dib().function(), FunctionFieldCode::ValueDuringError);
}

#[test]
fn test_truncated_record() {
    assert_eq!(
        DataRecord::from_hex("04 13 34 12"),
        Err(MBusError::PrematureEnd("DataRecord"))
    );
    assert_eq!(
        DataRecord::from_hex("84"),
        Err(MBusError::PrematureEnd("DataInformationBlock"))
    );
    assert_eq!(
        DataRecord::from_hex("04"),
        Err(MBusError::PrematureEnd("ValueInformationBlock"))
    );
    assert!(DataRecord::from_hex("0D FD 11").unwrap_err().is_length_error());
}

#[test]
fn test_trailing_bytes() {
    let err = DataRecord::from_hex("01 13 05 FF").unwrap_err();
    assert!(err.is_length_error());

    let (rest, record) = DataRecord::parse(&[0x01, 0x13, 0x05, 0xFF]).unwrap();
    assert_eq!(record.value_bytes(), vec![0x05]);
    assert_eq!(rest, &[0xFF]);
}

#[test]
fn test_parse_all() {
    let records = DataRecord::parse_all(&[
        0x01, 0xFD, 0x1B, 0x01, // digital input
        0x02, 0x5A, 0xE8, 0x03, // flow temperature, 100.0 °C
    ])
    .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].code().unwrap().kind, VifKind::DigitalInput);
    let code = records[1].code().unwrap();
    assert_eq!(code.kind, VifKind::FlowTemperature);
    assert_eq!(code.multiplier, 1e-1);
    assert_eq!(parse_int(&records[1].value_bytes()).unwrap(), 1000);

    assert!(DataRecord::parse_all(&[]).unwrap().is_empty());
    assert!(DataRecord::parse_all(&[0x01, 0xFD, 0x1B, 0x01, 0x02]).is_err());
}

#[test]
fn test_manufacturer_specific_data() {
    let records = DataRecord::parse_all(&[
        0x04, 0x13, 0x01, 0x00, 0x00, 0x00, // volume
        0x0F, 0x01, 0x02, 0x03, // manufacturer data to the end
    ])
    .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(parse_int(&records[0].value_bytes()).unwrap(), 1);
    assert!(records[1].is_manufacturer_specific());
    assert!(records[1].vib().is_none());
    assert_eq!(records[1].value_bytes(), vec![0x01, 0x02, 0x03]);

    // 0x1F: same layout, and the meter has more records
    let record = DataRecord::from_hex("1F 13 05").unwrap();
    assert!(record.more_records_follow());
    assert_eq!(record.data().len(), 2);
    assert_eq!(record.code(), None);

    let record = DataRecord::from_hex("0F").unwrap();
    assert!(record.data().is_empty());
}

#[test]
fn test_idle_filler() {
    let records =
        DataRecord::parse_all(&[0x2F, 0x04, 0x13, 0x01, 0x00, 0x00, 0x00, 0x2F, 0x2F]).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].dib().to_bytes(), vec![0x04]);
    assert_eq!(records[0].vib().unwrap().to_bytes(), vec![0x13]);

    let (rest, record) = DataRecord::parse(&[0x2F, 0x2F, 0x01, 0x13, 0x05, 0x2F]).unwrap();
    assert_eq!(record.value_bytes(), vec![0x05]);
    assert_eq!(rest, &[0x2F]);

    assert!(DataRecord::parse_all(&[0x2F, 0x2F]).unwrap().is_empty());
    assert!(DataRecord::from_hex("2F").unwrap_err().is_length_error());
}

#[test]
fn test_long_lvar_sizes() {
    // LVAR 0xF5 and 0xF6 are fixed 48 and 64 byte blocks
    for (lvar, size) in [(0xF4u8, 32usize), (0xF5, 48), (0xF6, 64)] {
        let mut bytes = vec![0x0D, 0xFD, 0x0E, lvar];
        bytes.extend(std::iter::repeat(0xAA).take(size));
        let record = DataRecord::from_bytes(&bytes).unwrap();
        assert_eq!(record.value_bytes().len(), size, "LVAR 0x{lvar:02X}");
    }
    let err = DataRecord::from_hex("0D FD 0E F7 00 00").unwrap_err();
    assert!(matches!(err, MBusError::InvalidField { field: "LVAR", value: 0xF7, .. }));
}

#[test]
fn test_long_bcd_payload() {
    let mut bytes = vec![0x0D, 0x13, 0xCF];
    bytes.extend([0x99; 15]);
    let record = DataRecord::from_bytes(&bytes).unwrap();
    assert_eq!(parse_long_bcd_uint(&record.value_bytes()).unwrap(), 10u128.pow(30) - 1);
    assert!(parse_bcd_uint(&record.value_bytes()).unwrap_err().is_length_error());
}

proptest! {
    #[test]
    fn prop_record_leaves_tail(
        value in proptest::collection::vec(any::<u8>(), 4),
        tail in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut bytes = vec![0x04, 0x13];
        bytes.extend(&value);
        bytes.extend(&tail);

        let (rest, record) = DataRecord::parse(&bytes).unwrap();
        prop_assert_eq!(record.value_bytes(), value);
        prop_assert_eq!(rest, &tail[..]);

        let mut source = bytes.clone().into_iter();
        let from_iter = DataRecord::from_iter(&mut source).unwrap();
        prop_assert_eq!(from_iter, record);
        prop_assert_eq!(source.collect::<Vec<_>>(), tail);
    }
}
