use mbus_codec::{ErrorKind, MBusError};

#[test]
fn test_error_kinds() {
    let validation = [
        MBusError::ByteOutOfRange(256),
        MBusError::InvalidHexString("x".into()),
        MBusError::InvalidFrameByte {
            frame: "ShortFrame",
            position: 4,
            value: 0,
            expected: "stop byte 0x16",
        },
        MBusError::InvalidField {
            field: "LVAR",
            value: 0xFB,
            reason: "reserved variable length",
        },
        MBusError::InvalidChecksum {
            expected: 1,
            calculated: 2,
        },
    ];
    for err in validation {
        assert_eq!(err.kind(), ErrorKind::Validation, "{err}");
        assert!(err.is_validation_error());
        assert!(!err.is_length_error());
    }

    let length = [
        MBusError::InvalidLength {
            structure: "ShortFrame",
            expected: "5 bytes",
            actual: 4,
        },
        MBusError::PrematureEnd("DataRecord"),
        MBusError::ExtensionOverflow {
            block: "DataInformationBlock",
            max: 10,
        },
    ];
    for err in length {
        assert_eq!(err.kind(), ErrorKind::Length, "{err}");
        assert!(err.is_length_error());
    }

    assert_eq!(MBusError::Decode("bad date".into()).kind(), ErrorKind::Decode);
}

#[test]
fn test_error_messages() {
    assert_eq!(MBusError::ByteOutOfRange(-1).to_string(), "-1 is not a valid byte");
    assert_eq!(
        MBusError::InvalidFrameByte {
            frame: "ShortFrame",
            position: 4,
            value: 0,
            expected: "stop byte 0x16",
        }
        .to_string(),
        "ShortFrame: byte 4 is 0x00, expected stop byte 0x16"
    );
    assert_eq!(
        MBusError::ExtensionOverflow {
            block: "ValueInformationBlock",
            max: 10,
        }
        .to_string(),
        "ValueInformationBlock exceeds 10 extension fields"
    );
    assert_eq!(
        MBusError::PrematureEnd("Frame").to_string(),
        "Premature end of data while parsing Frame"
    );
}

#[test]
fn test_errors_convert_to_anyhow() {
    fn parse() -> anyhow::Result<u8> {
        let field = mbus_codec::ByteField::new(300)?;
        Ok(field.value())
    }
    let err = parse().unwrap_err();
    assert_eq!(
        err.downcast_ref::<MBusError>(),
        Some(&MBusError::ByteOutOfRange(300))
    );
}
