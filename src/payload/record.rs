//! # Data Records
//!
//! A data record is a DIB, a VIB and the raw payload whose size the DIF's
//! data field code declares. For variable length data the payload starts with
//! the LVAR byte.
//!
//! Idle filler bytes (DIF 0x2F) in front of a record are skipped. A
//! manufacturer specific DIF (0x0F or 0x1F) has no VIB and takes every
//! remaining byte as its payload.
//!
//! The record only slices the payload; turning it into a number, date or
//! text is up to the caller, using [`crate::payload::data_encoding`].

use nom::bytes::complete::{take, take_while};

use crate::constants::MBUS_DIB_DIF_IDLE_FILLER;
use crate::error::MBusError;
use crate::mbus::byte::ByteSequence;
use crate::payload::block::{DataInformationBlock, ValueInformationBlock};
use crate::payload::fields::{lvar_data_length, DataFieldCode, DataLength};
use crate::payload::vif::VifCode;

/// Splits `count` bytes off the front of `input`.
fn take_payload(input: &[u8], count: usize) -> Result<(&[u8], &[u8]), MBusError> {
    take::<_, _, nom::error::Error<&[u8]>>(count)(input)
        .map_err(|_| MBusError::PrematureEnd("DataRecord"))
}

/// Drops leading idle filler bytes.
fn skip_fillers(input: &[u8]) -> &[u8] {
    let filler: nom::IResult<&[u8], &[u8]> =
        take_while(|b| b == MBUS_DIB_DIF_IDLE_FILLER)(input);
    match filler {
        Ok((rest, skipped)) => {
            if !skipped.is_empty() {
                log::trace!("Skipped {} idle filler byte(s)", skipped.len());
            }
            rest
        }
        Err(_) => input,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataRecord {
    dib: DataInformationBlock,
    vib: Option<ValueInformationBlock>,
    data: ByteSequence,
}

impl DataRecord {
    /// Parses one record from `source`, leaving the bytes of any following
    /// record in place. A manufacturer specific record drains `source`.
    pub fn from_iter<I>(source: &mut I) -> Result<Self, MBusError>
    where
        I: Iterator<Item = u8>,
    {
        let first = loop {
            match source.next() {
                Some(MBUS_DIB_DIF_IDLE_FILLER) => continue,
                Some(byte) => break byte,
                None => return Err(MBusError::PrematureEnd("DataInformationBlock")),
            }
        };
        let dib = DataInformationBlock::from_iter(&mut std::iter::once(first).chain(&mut *source))?;
        if dib.dif().is_manufacturer_specific() {
            let data: ByteSequence = source.collect();
            log::debug!("Manufacturer specific data: {} byte(s)", data.len());
            return Ok(DataRecord {
                dib,
                vib: None,
                data,
            });
        }
        let vib = ValueInformationBlock::from_iter(source)?;
        let data = match dib.data_field_code().data_length() {
            DataLength::Fixed(n) => ByteSequence::take(source, n, "DataRecord")?,
            DataLength::Variable => {
                let lvar = source.next().ok_or(MBusError::PrematureEnd("DataRecord"))?;
                let n = lvar_data_length(lvar)?;
                std::iter::once(lvar)
                    .chain(ByteSequence::take(source, n, "DataRecord")?.as_bytes())
                    .collect()
            }
        };
        Ok(DataRecord {
            dib,
            vib: Some(vib),
            data,
        })
    }

    /// Parses one record from the front of `input` and returns the remainder.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Self), MBusError> {
        let (rest, dib) = DataInformationBlock::parse(skip_fillers(input))?;
        if dib.dif().is_manufacturer_specific() {
            log::debug!("Manufacturer specific data: {} byte(s)", rest.len());
            return Ok((
                &rest[rest.len()..],
                DataRecord {
                    dib,
                    vib: None,
                    data: rest.into(),
                },
            ));
        }
        let (rest, vib) = ValueInformationBlock::parse(rest)?;
        let length = match dib.data_field_code().data_length() {
            DataLength::Fixed(n) => n,
            DataLength::Variable => {
                let lvar = *rest.first().ok_or(MBusError::PrematureEnd("DataRecord"))?;
                1 + lvar_data_length(lvar)?
            }
        };
        let (rest, data) = take_payload(rest, length)?;
        log::trace!(
            "DataRecord: DIB {:02X?} VIB {:02X?} with {} payload byte(s)",
            dib.to_bytes(),
            vib.to_bytes(),
            data.len()
        );
        Ok((
            rest,
            DataRecord {
                dib,
                vib: Some(vib),
                data: data.into(),
            },
        ))
    }

    /// Parses exactly one record; trailing bytes are a length error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MBusError> {
        let (rest, record) = Self::parse(bytes)?;
        if !rest.is_empty() {
            return Err(MBusError::InvalidLength {
                structure: "DataRecord",
                expected: "no bytes after the payload",
                actual: bytes.len(),
            });
        }
        Ok(record)
    }

    pub fn from_hex(hex: &str) -> Result<Self, MBusError> {
        Self::from_bytes(&ByteSequence::from_hex(hex)?.as_bytes())
    }

    /// Parses consecutive records until the input is used up. Trailing idle
    /// filler bytes end the list.
    pub fn parse_all(mut input: &[u8]) -> Result<Vec<Self>, MBusError> {
        let mut records = Vec::new();
        loop {
            input = skip_fillers(input);
            if input.is_empty() {
                break;
            }
            let (rest, record) = Self::parse(input)?;
            records.push(record);
            input = rest;
        }
        log::debug!("Parsed {} data record(s)", records.len());
        Ok(records)
    }

    pub fn dib(&self) -> &DataInformationBlock {
        &self.dib
    }

    /// `None` for manufacturer specific data.
    pub fn vib(&self) -> Option<&ValueInformationBlock> {
        self.vib.as_ref()
    }

    pub fn is_manufacturer_specific(&self) -> bool {
        self.dib.dif().is_manufacturer_specific()
    }

    /// Set by DIF 0x1F: the meter has more records for the next request.
    pub fn more_records_follow(&self) -> bool {
        self.dib.dif().more_records_follow()
    }

    /// Raw payload, including the LVAR byte of variable length data.
    pub fn data(&self) -> &ByteSequence {
        &self.data
    }

    /// Payload without the LVAR byte.
    pub fn value_bytes(&self) -> Vec<u8> {
        let bytes = self.data.as_bytes();
        match self.data_field_code() {
            DataFieldCode::VariableLength => bytes.into_iter().skip(1).collect(),
            _ => bytes,
        }
    }

    pub fn data_field_code(&self) -> DataFieldCode {
        self.dib.data_field_code()
    }

    pub fn code(&self) -> Option<VifCode> {
        self.vib.as_ref().and_then(ValueInformationBlock::code)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.dib.to_bytes();
        if let Some(vib) = &self.vib {
            bytes.extend(vib.to_bytes());
        }
        bytes.extend(self.data.as_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::data_encoding::{parse_bcd_uint, parse_int};
    use crate::payload::vif::{VifKind, VifUnit};

    #[test]
    fn test_fixed_length_record() {
        // 32 bit integer volume in litres: 0x00001234
        let record = DataRecord::from_hex("04 13 34 12 00 00").unwrap();
        assert_eq!(record.data_field_code(), DataFieldCode::Int32);
        assert_eq!(record.data(), &[0x34u8, 0x12, 0x00, 0x00]);
        assert_eq!(parse_int(&record.value_bytes()).unwrap(), 0x1234);
        let code = record.code().unwrap();
        assert_eq!((code.kind, code.unit, code.multiplier), (VifKind::Volume, VifUnit::CubicMeter, 1e-3));
    }

    #[test]
    fn test_bcd_record_with_extensions() {
        let record = DataRecord::from_hex("8C 10 93 3B 78 56 34 12").unwrap();
        assert_eq!(record.dib().difes().len(), 1);
        assert_eq!(record.vib().unwrap().vifes().len(), 1);
        assert_eq!(parse_bcd_uint(&record.value_bytes()).unwrap(), 12345678);
    }

    #[test]
    fn test_no_data_record() {
        let record = DataRecord::from_hex("08 13").unwrap();
        assert!(record.data().is_empty());
    }

    #[test]
    fn test_variable_length_record() {
        let record = DataRecord::from_hex("0D FD 11 03 41 42 43").unwrap();
        assert_eq!(record.data().len(), 4);
        assert_eq!(record.value_bytes(), b"ABC".to_vec());
        assert_eq!(record.code().unwrap().kind, VifKind::Customer);

        assert!(DataRecord::from_hex("0D FD 11 FC").unwrap_err().is_validation_error());
    }

    #[test]
    fn test_parse_leaves_next_record() {
        let bytes = [0x01, 0xFD, 0x1B, 0x01, 0x02, 0x5A, 0xE8, 0x03];
        let (rest, first) = DataRecord::parse(&bytes).unwrap();
        assert_eq!(first.to_bytes(), vec![0x01, 0xFD, 0x1B, 0x01]);
        assert_eq!(rest, &[0x02, 0x5A, 0xE8, 0x03]);

        let mut iter = bytes.into_iter();
        let first_iter = DataRecord::from_iter(&mut iter).unwrap();
        assert_eq!(first_iter, first);
        assert_eq!(iter.collect::<Vec<_>>(), vec![0x02, 0x5A, 0xE8, 0x03]);

        let all = DataRecord::parse_all(&bytes).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].code().unwrap().kind, VifKind::FlowTemperature);
    }

    #[test]
    fn test_manufacturer_specific_takes_rest() {
        let bytes = [0x04, 0x13, 0x01, 0x00, 0x00, 0x00, 0x0F, 0x01, 0x02, 0x03];
        let records = DataRecord::parse_all(&bytes).unwrap();
        assert_eq!(records.len(), 2);
        let tail = &records[1];
        assert!(tail.is_manufacturer_specific());
        assert!(!tail.more_records_follow());
        assert!(tail.vib().is_none());
        assert_eq!(tail.code(), None);
        assert_eq!(tail.data(), &[0x01u8, 0x02, 0x03]);

        let mut iter = bytes[6..].iter().copied();
        assert_eq!(&DataRecord::from_iter(&mut iter).unwrap(), tail);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_idle_fillers_skipped() {
        let bytes = [0x2F, 0x04, 0x13, 0x01, 0x00, 0x00, 0x00, 0x2F, 0x2F];
        let records = DataRecord::parse_all(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to_bytes(), vec![0x04, 0x13, 0x01, 0x00, 0x00, 0x00]);

        let mut iter = bytes.into_iter();
        assert_eq!(DataRecord::from_iter(&mut iter).unwrap(), records[0]);
        assert_eq!(iter.collect::<Vec<_>>(), vec![0x2F, 0x2F]);
    }

    #[test]
    fn test_truncated_and_trailing() {
        assert_eq!(
            DataRecord::from_hex("04 13 34 12"),
            Err(MBusError::PrematureEnd("DataRecord"))
        );
        assert!(DataRecord::from_hex("01 13 05 FF").unwrap_err().is_length_error());
    }
}
