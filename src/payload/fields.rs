//! # Data-Layer Fields
//!
//! DIF/DIFE describe how a data record's payload is encoded and which
//! storage, tariff and subunit it belongs to; VIF/VIFE describe its unit
//! and scale.
//!
//! ```text
//! DIF   | ext | storage LSB | function (2) | data field code (4) |
//! DIFE  | ext | subunit     | tariff (2)   | storage number (4)  |
//! VIF   | ext |          unit and multiplier (7)                 |
//! VIFE  | ext |          unit and multiplier (7)                 |
//! ```

use serde::Serialize;

use crate::constants::{
    MBUS_DATA_RECORD_DIFE_MASK_DEVICE, MBUS_DATA_RECORD_DIFE_MASK_STORAGE_NO,
    MBUS_DATA_RECORD_DIFE_MASK_TARIFF, MBUS_DATA_RECORD_DIF_MASK_DATA,
    MBUS_DATA_RECORD_DIF_MASK_FUNCTION, MBUS_DATA_RECORD_DIF_MASK_STORAGE_NO,
    MBUS_DIB_DIF_IDLE_FILLER, MBUS_DIB_DIF_MANUFACTURER_SPECIFIC, MBUS_DIB_DIF_MORE_RECORDS_FOLLOW,
    MBUS_DIB_VIF_WITHOUT_EXTENSION, MBUS_VIF_EXTENSION_FB, MBUS_VIF_EXTENSION_FD,
};
use crate::error::MBusError;
use crate::mbus::byte::ByteField;
use crate::mbus::fields::byte_backed_field;

/// Payload encoding selected by the low nibble of the DIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataFieldCode {
    NoData,
    Int8,
    Int16,
    Int24,
    Int32,
    Real32,
    Int48,
    Int64,
    SelectionForReadout,
    Bcd2,
    Bcd4,
    Bcd6,
    Bcd8,
    VariableLength,
    Bcd12,
    SpecialFunction,
}

/// Size of a record payload as declared by its data field code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataLength {
    Fixed(usize),
    /// The first payload byte (LVAR) gives the size of the rest.
    Variable,
}

impl DataFieldCode {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & MBUS_DATA_RECORD_DIF_MASK_DATA {
            0x0 => DataFieldCode::NoData,
            0x1 => DataFieldCode::Int8,
            0x2 => DataFieldCode::Int16,
            0x3 => DataFieldCode::Int24,
            0x4 => DataFieldCode::Int32,
            0x5 => DataFieldCode::Real32,
            0x6 => DataFieldCode::Int48,
            0x7 => DataFieldCode::Int64,
            0x8 => DataFieldCode::SelectionForReadout,
            0x9 => DataFieldCode::Bcd2,
            0xA => DataFieldCode::Bcd4,
            0xB => DataFieldCode::Bcd6,
            0xC => DataFieldCode::Bcd8,
            0xD => DataFieldCode::VariableLength,
            0xE => DataFieldCode::Bcd12,
            _ => DataFieldCode::SpecialFunction,
        }
    }

    pub fn data_length(self) -> DataLength {
        match self {
            DataFieldCode::NoData
            | DataFieldCode::SelectionForReadout
            | DataFieldCode::SpecialFunction => DataLength::Fixed(0),
            DataFieldCode::Int8 | DataFieldCode::Bcd2 => DataLength::Fixed(1),
            DataFieldCode::Int16 | DataFieldCode::Bcd4 => DataLength::Fixed(2),
            DataFieldCode::Int24 | DataFieldCode::Bcd6 => DataLength::Fixed(3),
            DataFieldCode::Int32 | DataFieldCode::Real32 | DataFieldCode::Bcd8 => {
                DataLength::Fixed(4)
            }
            DataFieldCode::Int48 | DataFieldCode::Bcd12 => DataLength::Fixed(6),
            DataFieldCode::Int64 => DataLength::Fixed(8),
            DataFieldCode::VariableLength => DataLength::Variable,
        }
    }

    pub fn is_bcd(self) -> bool {
        matches!(
            self,
            DataFieldCode::Bcd2
                | DataFieldCode::Bcd4
                | DataFieldCode::Bcd6
                | DataFieldCode::Bcd8
                | DataFieldCode::Bcd12
        )
    }
}

/// Number of bytes following an LVAR prefix byte.
///
/// | LVAR        | content                       |
/// |-------------|-------------------------------|
/// | 0x00..=0xBF | text, LVAR characters          |
/// | 0xC0..=0xDF | BCD, LVAR & 0x0F bytes (0xD_ negative) |
/// | 0xE0..=0xEF | binary, LVAR - 0xE0 bytes      |
/// | 0xF0..=0xF4 | binary, 4 * (LVAR - 0xEC) bytes |
/// | 0xF5        | binary, 48 bytes               |
/// | 0xF6        | binary, 64 bytes               |
/// | 0xF7..=0xFF | reserved                       |
pub fn lvar_data_length(lvar: u8) -> Result<usize, MBusError> {
    match lvar {
        0x00..=0xBF => Ok(lvar as usize),
        0xC0..=0xDF => Ok((lvar & 0x0F) as usize),
        0xE0..=0xEF => Ok((lvar - 0xE0) as usize),
        0xF0..=0xF4 => Ok(4 * (lvar - 0xEC) as usize),
        0xF5 => Ok(48),
        0xF6 => Ok(64),
        _ => Err(MBusError::InvalidField {
            field: "LVAR",
            value: lvar,
            reason: "reserved variable length",
        }),
    }
}

/// Function encoded in bits 5-4 of the DIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FunctionFieldCode {
    Instantaneous,
    Maximum,
    Minimum,
    ValueDuringError,
}

impl FunctionFieldCode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => FunctionFieldCode::Instantaneous,
            1 => FunctionFieldCode::Maximum,
            2 => FunctionFieldCode::Minimum,
            _ => FunctionFieldCode::ValueDuringError,
        }
    }
}

/// Data Information Field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataInformationField(ByteField);

byte_backed_field!(DataInformationField);

impl DataInformationField {
    pub fn data(&self) -> u8 {
        self.0.masked(MBUS_DATA_RECORD_DIF_MASK_DATA)
    }

    pub fn data_field_code(&self) -> DataFieldCode {
        DataFieldCode::from_nibble(self.data())
    }

    pub fn function(&self) -> u8 {
        self.0.masked(MBUS_DATA_RECORD_DIF_MASK_FUNCTION) >> 4
    }

    pub fn function_code(&self) -> FunctionFieldCode {
        FunctionFieldCode::from_bits(self.function())
    }

    pub fn storage_number_lsb(&self) -> u8 {
        u8::from(self.0.masked(MBUS_DATA_RECORD_DIF_MASK_STORAGE_NO) != 0)
    }

    pub fn is_extended(&self) -> bool {
        self.0.is_extended()
    }

    pub fn is_idle_filler(&self) -> bool {
        self.value() == MBUS_DIB_DIF_IDLE_FILLER
    }

    /// 0x0F or 0x1F: no VIB follows, the rest of the telegram is
    /// manufacturer specific data.
    pub fn is_manufacturer_specific(&self) -> bool {
        matches!(
            self.value(),
            MBUS_DIB_DIF_MANUFACTURER_SPECIFIC | MBUS_DIB_DIF_MORE_RECORDS_FOLLOW
        )
    }

    pub fn more_records_follow(&self) -> bool {
        self.value() == MBUS_DIB_DIF_MORE_RECORDS_FOLLOW
    }
}

/// Data Information Field Extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataInformationFieldExtension(ByteField);

byte_backed_field!(DataInformationFieldExtension);

impl DataInformationFieldExtension {
    pub fn storage_number(&self) -> u8 {
        self.0.masked(MBUS_DATA_RECORD_DIFE_MASK_STORAGE_NO)
    }

    pub fn tariff(&self) -> u8 {
        self.0.masked(MBUS_DATA_RECORD_DIFE_MASK_TARIFF) >> 4
    }

    pub fn device_unit(&self) -> u8 {
        u8::from(self.0.masked(MBUS_DATA_RECORD_DIFE_MASK_DEVICE) != 0)
    }

    pub fn is_extended(&self) -> bool {
        self.0.is_extended()
    }
}

/// Value Information Field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueInformationField(ByteField);

byte_backed_field!(ValueInformationField);

impl ValueInformationField {
    /// Unit and multiplier code (bits 6-0).
    pub fn unit(&self) -> u8 {
        self.0.masked(MBUS_DIB_VIF_WITHOUT_EXTENSION)
    }

    pub fn is_extended(&self) -> bool {
        self.0.is_extended()
    }

    /// Whether this VIF selects one of the two extension tables.
    pub fn extension_table(&self) -> Option<ExtensionTable> {
        ExtensionTable::from_selector(self.value())
    }
}

/// Value Information Field Extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueInformationFieldExtension(ByteField);

byte_backed_field!(ValueInformationFieldExtension);

impl ValueInformationFieldExtension {
    pub fn unit(&self) -> u8 {
        self.0.masked(MBUS_DIB_VIF_WITHOUT_EXTENSION)
    }

    pub fn is_extended(&self) -> bool {
        self.0.is_extended()
    }
}

/// The two VIF extension tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExtensionTable {
    /// Selected by VIF 0xFB.
    First,
    /// Selected by VIF 0xFD.
    Second,
}

impl ExtensionTable {
    pub fn from_selector(byte: u8) -> Option<Self> {
        match byte {
            MBUS_VIF_EXTENSION_FB => Some(ExtensionTable::First),
            MBUS_VIF_EXTENSION_FD => Some(ExtensionTable::Second),
            _ => None,
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            ExtensionTable::First => MBUS_VIF_EXTENSION_FB,
            ExtensionTable::Second => MBUS_VIF_EXTENSION_FD,
        }
    }
}
