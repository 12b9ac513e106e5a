//! # Data and Value Information Blocks
//!
//! A DIB is a DIF followed by up to ten DIFEs; a VIB is a VIF followed by up to
//! ten VIFEs. Both use the same chain encoding: every byte whose top bit is
//! set announces one more extension byte.
//!
//! Blocks take only the bytes they need from the source, so a record can
//! parse its DIB, its VIB and then its payload from one continuous stream.

use crate::constants::{MBUS_EXTENSION_BIT, MBUS_MAX_EXTENSIONS};
use crate::error::MBusError;
use crate::mbus::byte::ByteSequence;
use crate::payload::fields::{
    DataFieldCode, DataInformationField, DataInformationFieldExtension, ExtensionTable,
    FunctionFieldCode, ValueInformationField, ValueInformationFieldExtension,
};
use crate::payload::vif::{resolve, VifCode};

/// Reads a primary byte and its chain of extension bytes.
fn read_chain<I>(source: &mut I, block: &'static str) -> Result<(u8, Vec<u8>), MBusError>
where
    I: Iterator<Item = u8>,
{
    let primary = source.next().ok_or(MBusError::PrematureEnd(block))?;
    let mut extensions = Vec::new();
    let mut more = primary & MBUS_EXTENSION_BIT != 0;

    while more {
        if extensions.len() == MBUS_MAX_EXTENSIONS {
            return Err(MBusError::ExtensionOverflow {
                block,
                max: MBUS_MAX_EXTENSIONS,
            });
        }
        let byte = source.next().ok_or(MBusError::PrematureEnd(block))?;
        more = byte & MBUS_EXTENSION_BIT != 0;
        extensions.push(byte);
    }

    log::trace!(
        "{block}: primary 0x{primary:02X} with {} extension(s)",
        extensions.len()
    );
    Ok((primary, extensions))
}

/// Runs `parse` over a slice and returns the bytes it left untouched.
fn parse_slice<'a, T, F>(input: &'a [u8], parse: F) -> Result<(&'a [u8], T), MBusError>
where
    F: FnOnce(&mut std::iter::Copied<std::slice::Iter<'a, u8>>) -> Result<T, MBusError>,
{
    let mut iter = input.iter().copied();
    let value = parse(&mut iter)?;
    let consumed = input.len() - iter.len();
    Ok((&input[consumed..], value))
}

/// Data Information Block: DIF plus DIFE chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataInformationBlock {
    dif: DataInformationField,
    difes: Vec<DataInformationFieldExtension>,
}

impl DataInformationBlock {
    /// Parses a DIB from `source`, leaving every byte after it in place.
    pub fn from_iter<I>(source: &mut I) -> Result<Self, MBusError>
    where
        I: Iterator<Item = u8>,
    {
        let (dif, difes) = read_chain(source, "DataInformationBlock")?;
        Ok(DataInformationBlock {
            dif: dif.into(),
            difes: difes.into_iter().map(Into::into).collect(),
        })
    }

    /// Parses a DIB from the front of `input` and returns the remainder.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Self), MBusError> {
        parse_slice(input, |iter| Self::from_iter(iter))
    }

    pub fn from_hex(hex: &str) -> Result<Self, MBusError> {
        let bytes = ByteSequence::from_hex(hex)?.as_bytes();
        Self::from_iter(&mut bytes.into_iter())
    }

    pub fn dif(&self) -> DataInformationField {
        self.dif
    }

    pub fn difes(&self) -> &[DataInformationFieldExtension] {
        &self.difes
    }

    pub fn data_field_code(&self) -> DataFieldCode {
        self.dif.data_field_code()
    }

    pub fn function(&self) -> FunctionFieldCode {
        self.dif.function_code()
    }

    /// Storage number assembled from the DIF LSB and the DIFE nibbles.
    pub fn storage_number(&self) -> u64 {
        self.difes
            .iter()
            .enumerate()
            .fold(u64::from(self.dif.storage_number_lsb()), |acc, (i, dife)| {
                acc | u64::from(dife.storage_number()) << (1 + 4 * i)
            })
    }

    pub fn tariff(&self) -> u32 {
        self.difes
            .iter()
            .enumerate()
            .fold(0, |acc, (i, dife)| acc | u32::from(dife.tariff()) << (2 * i))
    }

    pub fn subunit(&self) -> u16 {
        self.difes
            .iter()
            .enumerate()
            .fold(0, |acc, (i, dife)| acc | u16::from(dife.device_unit()) << i)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        std::iter::once(self.dif.value())
            .chain(self.difes.iter().map(|d| d.value()))
            .collect()
    }
}

/// Value Information Block: VIF plus VIFE chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueInformationBlock {
    vif: ValueInformationField,
    vifes: Vec<ValueInformationFieldExtension>,
}

impl ValueInformationBlock {
    /// Parses a VIB from `source`, leaving every byte after it in place.
    pub fn from_iter<I>(source: &mut I) -> Result<Self, MBusError>
    where
        I: Iterator<Item = u8>,
    {
        let (vif, vifes) = read_chain(source, "ValueInformationBlock")?;
        Ok(ValueInformationBlock {
            vif: vif.into(),
            vifes: vifes.into_iter().map(Into::into).collect(),
        })
    }

    pub fn parse(input: &[u8]) -> Result<(&[u8], Self), MBusError> {
        parse_slice(input, |iter| Self::from_iter(iter))
    }

    pub fn from_hex(hex: &str) -> Result<Self, MBusError> {
        let bytes = ByteSequence::from_hex(hex)?.as_bytes();
        Self::from_iter(&mut bytes.into_iter())
    }

    pub fn vif(&self) -> ValueInformationField {
        self.vif
    }

    pub fn vifes(&self) -> &[ValueInformationFieldExtension] {
        &self.vifes
    }

    /// The extension table selected by the VIF, if any.
    pub fn extension_table(&self) -> Option<ExtensionTable> {
        self.vif.extension_table()
    }

    /// Resolves the unit and multiplier of the block.
    ///
    /// With a 0xFB/0xFD VIF the first VIFE is looked up in the selected
    /// extension table; otherwise the VIF is looked up in the base table.
    pub fn code(&self) -> Option<VifCode> {
        match (self.extension_table(), self.vifes.first()) {
            (Some(table), Some(vife)) => resolve(vife.value(), Some(table)),
            _ => resolve(self.vif.value(), None),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        std::iter::once(self.vif.value())
            .chain(self.vifes.iter().map(|v| v.value()))
            .collect()
    }
}
