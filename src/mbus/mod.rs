//! The mbus module contains the link layer: telegram bytes, the A, C and CI
//! fields and the four frame shapes.

pub mod byte;
pub mod fields;
pub mod frame;

pub use byte::{ByteField, ByteSequence};
pub use fields::{AddressField, ByteOrder, ControlField, ControlFlags, ControlInformationField};
pub use frame::{ControlFrame, Frame, FrameType, LongFrame, ShortFrame, SingleFrame};
