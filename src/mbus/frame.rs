//! # M-Bus Frames
//!
//! The four link-layer frame shapes:
//!
//! ```text
//! Single   E5
//! Short    10 C A CS 16
//! Control  68 L L 68 C A CI CS 16        (L = 3)
//! Long     68 L L 68 C A CI UD CS 16     (UD in 0..=252)
//! ```
//!
//! Each frame keeps its bytes in a [`ByteSequence`] and reads C, A, CI, UD and
//! the checksum from it on demand. Construction validates the byte count and
//! the fixed start/stop markers, failing on the first mismatch. The checksum
//! is checked separately with `verify_checksum`.
//!
//! ## Usage
//!
//! ```rust
//! use mbus_codec::mbus::frame::{Frame, FrameType, ShortFrame};
//!
//! let frame = ShortFrame::from_hex("10 5B FE 59 16").unwrap();
//! assert_eq!(frame.address().value(), 0xFE);
//! assert!(frame.checksum_valid());
//!
//! let (rest, frame) = Frame::parse(&[0xE5, 0x10]).unwrap();
//! assert_eq!(frame.frame_type(), FrameType::Ack);
//! assert_eq!(rest, &[0x10]);
//! ```

use nom::bytes::complete::take;
use serde::Serialize;

use crate::constants::{
    MBUS_FRAME_ACK, MBUS_FRAME_CONTROL_LENGTH, MBUS_FRAME_CONTROL_SIZE, MBUS_FRAME_LONG_SIZE,
    MBUS_FRAME_LONG_START, MBUS_FRAME_SHORT_SIZE, MBUS_FRAME_SHORT_START, MBUS_FRAME_STOP,
    MBUS_FRAME_USER_DATA_MAX,
};
use crate::error::MBusError;
use crate::mbus::byte::ByteSequence;
use crate::mbus::fields::{AddressField, ControlField, ControlInformationField};
use crate::util::hex::log_frame_hex;

/// Represents the different types of M-Bus frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FrameType {
    Ack,
    Short,
    Control,
    Long,
}

fn expect_len(frame: &'static str, bytes: &[u8], size: usize, expected: &'static str) -> Result<(), MBusError> {
    if bytes.len() == size {
        Ok(())
    } else {
        Err(MBusError::InvalidLength {
            structure: frame,
            expected,
            actual: bytes.len(),
        })
    }
}

fn expect_byte(
    frame: &'static str,
    bytes: &[u8],
    position: usize,
    value: u8,
    expected: &'static str,
) -> Result<(), MBusError> {
    if bytes[position] == value {
        Ok(())
    } else {
        Err(MBusError::InvalidFrameByte {
            frame,
            position,
            value: bytes[position],
            expected,
        })
    }
}

/// Validates the `68 L L 68` header shared by control and long frames.
fn expect_long_header(frame: &'static str, bytes: &[u8]) -> Result<(), MBusError> {
    expect_byte(frame, bytes, 0, MBUS_FRAME_LONG_START, "start byte 0x68")?;
    expect_byte(frame, bytes, 3, MBUS_FRAME_LONG_START, "start byte 0x68")
}

/// Arithmetic sum modulo 256.
pub fn calculate_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

fn verify(expected: u8, calculated: u8) -> Result<(), MBusError> {
    if expected == calculated {
        Ok(())
    } else {
        Err(MBusError::InvalidChecksum {
            expected,
            calculated,
        })
    }
}

/// Generates the constructors shared by all frame types.
macro_rules! frame_constructors {
    ($name:ident) => {
        impl $name {
            pub fn from_hex(hex: &str) -> Result<Self, MBusError> {
                Self::from_bytes(&ByteSequence::from_hex(hex)?.as_bytes())
            }

            pub fn from_integers<I>(ints: I) -> Result<Self, MBusError>
            where
                I: IntoIterator<Item = i64>,
            {
                Self::from_bytes(&ByteSequence::from_integers(ints)?.as_bytes())
            }

            pub fn bytes(&self) -> &ByteSequence {
                &self.bytes
            }

            pub fn as_bytes(&self) -> Vec<u8> {
                self.bytes.as_bytes()
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = MBusError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                Self::from_bytes(bytes)
            }
        }
    };
}

/// The single character acknowledgement frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SingleFrame {
    bytes: ByteSequence,
}

impl Default for SingleFrame {
    fn default() -> Self {
        SingleFrame {
            bytes: ByteSequence::from([MBUS_FRAME_ACK]),
        }
    }
}

impl SingleFrame {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MBusError> {
        expect_len("SingleFrame", bytes, 1, "1 byte")?;
        Self::from_byte(bytes[0])
    }

    pub fn from_byte(byte: u8) -> Result<Self, MBusError> {
        expect_byte("SingleFrame", &[byte], 0, MBUS_FRAME_ACK, "ACK byte 0xE5")?;
        Ok(Self::default())
    }
}

frame_constructors!(SingleFrame);

/// `10 C A CS 16`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortFrame {
    bytes: ByteSequence,
}

impl ShortFrame {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MBusError> {
        const NAME: &str = "ShortFrame";
        expect_len(NAME, bytes, MBUS_FRAME_SHORT_SIZE, "5 bytes")?;
        expect_byte(NAME, bytes, 0, MBUS_FRAME_SHORT_START, "start byte 0x10")?;
        expect_byte(NAME, bytes, 4, MBUS_FRAME_STOP, "stop byte 0x16")?;
        Ok(ShortFrame {
            bytes: bytes.into(),
        })
    }

    pub fn control(&self) -> ControlField {
        self.bytes[1].into()
    }

    pub fn address(&self) -> AddressField {
        self.bytes[2].into()
    }

    pub fn checksum(&self) -> u8 {
        self.bytes[3].value()
    }

    /// Sum of C and A.
    pub fn calculated_checksum(&self) -> u8 {
        calculate_checksum(&self.bytes.slice(1..3).as_bytes())
    }

    pub fn checksum_valid(&self) -> bool {
        self.checksum() == self.calculated_checksum()
    }

    pub fn verify_checksum(&self) -> Result<(), MBusError> {
        verify(self.checksum(), self.calculated_checksum())
    }
}

frame_constructors!(ShortFrame);

/// `68 L L 68 C A CI CS 16`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlFrame {
    bytes: ByteSequence,
}

impl ControlFrame {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MBusError> {
        const NAME: &str = "ControlFrame";
        expect_len(NAME, bytes, MBUS_FRAME_CONTROL_SIZE, "9 bytes")?;
        expect_long_header(NAME, bytes)?;
        expect_byte(NAME, bytes, 8, MBUS_FRAME_STOP, "stop byte 0x16")?;
        Ok(ControlFrame {
            bytes: bytes.into(),
        })
    }

    /// The first L field.
    pub fn length(&self) -> u8 {
        self.bytes[1].value()
    }

    pub fn control(&self) -> ControlField {
        self.bytes[4].into()
    }

    pub fn address(&self) -> AddressField {
        self.bytes[5].into()
    }

    pub fn control_information(&self) -> ControlInformationField {
        self.bytes[6].into()
    }

    pub fn checksum(&self) -> u8 {
        self.bytes[7].value()
    }

    /// Sum of C, A and CI.
    pub fn calculated_checksum(&self) -> u8 {
        calculate_checksum(&self.bytes.slice(4..7).as_bytes())
    }

    pub fn checksum_valid(&self) -> bool {
        self.checksum() == self.calculated_checksum()
    }

    pub fn verify_checksum(&self) -> Result<(), MBusError> {
        verify(self.checksum(), self.calculated_checksum())
    }
}

frame_constructors!(ControlFrame);

/// `68 L L 68 C A CI UD CS 16`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LongFrame {
    bytes: ByteSequence,
}

impl LongFrame {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MBusError> {
        const NAME: &str = "LongFrame";
        expect_len(NAME, bytes, MBUS_FRAME_LONG_SIZE, "10 bytes")?;
        expect_long_header(NAME, bytes)?;
        if bytes[7] > MBUS_FRAME_USER_DATA_MAX {
            return Err(MBusError::InvalidFrameByte {
                frame: NAME,
                position: 7,
                value: bytes[7],
                expected: "user data in 0..=252",
            });
        }
        expect_byte(NAME, bytes, 9, MBUS_FRAME_STOP, "stop byte 0x16")?;
        Ok(LongFrame {
            bytes: bytes.into(),
        })
    }

    pub fn length(&self) -> u8 {
        self.bytes[1].value()
    }

    pub fn control(&self) -> ControlField {
        self.bytes[4].into()
    }

    pub fn address(&self) -> AddressField {
        self.bytes[5].into()
    }

    pub fn control_information(&self) -> ControlInformationField {
        self.bytes[6].into()
    }

    pub fn user_data(&self) -> u8 {
        self.bytes[7].value()
    }

    pub fn checksum(&self) -> u8 {
        self.bytes[8].value()
    }

    /// Sum of C, A, CI and UD.
    pub fn calculated_checksum(&self) -> u8 {
        calculate_checksum(&self.bytes.slice(4..8).as_bytes())
    }

    pub fn checksum_valid(&self) -> bool {
        self.checksum() == self.calculated_checksum()
    }

    pub fn verify_checksum(&self) -> Result<(), MBusError> {
        verify(self.checksum(), self.calculated_checksum())
    }
}

frame_constructors!(LongFrame);

/// Any of the four frame shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    Single(SingleFrame),
    Short(ShortFrame),
    Control(ControlFrame),
    Long(LongFrame),
}

impl Frame {
    /// Detects the frame shape from the start byte (and the L field of
    /// `68` frames), parses it and returns the bytes after it.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Frame), MBusError> {
        let start = *input.first().ok_or(MBusError::PrematureEnd("Frame"))?;
        let (frame_type, size) = match start {
            MBUS_FRAME_ACK => (FrameType::Ack, 1),
            MBUS_FRAME_SHORT_START => (FrameType::Short, MBUS_FRAME_SHORT_SIZE),
            MBUS_FRAME_LONG_START => match input.get(1) {
                Some(&MBUS_FRAME_CONTROL_LENGTH) => (FrameType::Control, MBUS_FRAME_CONTROL_SIZE),
                Some(_) => (FrameType::Long, MBUS_FRAME_LONG_SIZE),
                None => return Err(MBusError::PrematureEnd("Frame")),
            },
            value => {
                return Err(MBusError::InvalidFrameByte {
                    frame: "Frame",
                    position: 0,
                    value,
                    expected: "start byte 0xE5, 0x10 or 0x68",
                })
            }
        };
        log::debug!("Detected {frame_type:?} frame");

        let (rest, bytes) = take::<_, _, nom::error::Error<&[u8]>>(size)(input)
            .map_err(|_| MBusError::PrematureEnd("Frame"))?;
        log_frame_hex("Frame", bytes);

        let frame = match frame_type {
            FrameType::Ack => Frame::Single(SingleFrame::from_bytes(bytes)?),
            FrameType::Short => Frame::Short(ShortFrame::from_bytes(bytes)?),
            FrameType::Control => Frame::Control(ControlFrame::from_bytes(bytes)?),
            FrameType::Long => Frame::Long(LongFrame::from_bytes(bytes)?),
        };
        Ok((rest, frame))
    }

    /// Parses exactly one frame; trailing bytes are a length error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Frame, MBusError> {
        let (rest, frame) = Self::parse(bytes)?;
        if !rest.is_empty() {
            return Err(MBusError::InvalidLength {
                structure: "Frame",
                expected: "no bytes after the stop byte",
                actual: bytes.len(),
            });
        }
        Ok(frame)
    }

    pub fn from_hex(hex: &str) -> Result<Frame, MBusError> {
        Self::from_bytes(&ByteSequence::from_hex(hex)?.as_bytes())
    }

    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::Single(_) => FrameType::Ack,
            Frame::Short(_) => FrameType::Short,
            Frame::Control(_) => FrameType::Control,
            Frame::Long(_) => FrameType::Long,
        }
    }

    pub fn bytes(&self) -> &ByteSequence {
        match self {
            Frame::Single(f) => f.bytes(),
            Frame::Short(f) => f.bytes(),
            Frame::Control(f) => f.bytes(),
            Frame::Long(f) => f.bytes(),
        }
    }

    /// Checksum check; an ACK has no checksum and always passes.
    pub fn verify_checksum(&self) -> Result<(), MBusError> {
        match self {
            Frame::Single(_) => Ok(()),
            Frame::Short(f) => f.verify_checksum(),
            Frame::Control(f) => f.verify_checksum(),
            Frame::Long(f) => f.verify_checksum(),
        }
    }
}
