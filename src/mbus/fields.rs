//! # Link-Layer Fields
//!
//! The A (address), C (control) and CI (control information) fields carried
//! by short, control and long frames. Each one wraps a single [`ByteField`]
//! and exposes its bit groups through named accessors.

use bitflags::bitflags;
use serde::Serialize;

use crate::constants::{
    MBUS_ADDRESS_BROADCAST_NOREPLY, MBUS_ADDRESS_BROADCAST_REPLY, MBUS_ADDRESS_NETWORK_LAYER,
    MBUS_ADDRESS_SLAVE_MAX, MBUS_ADDRESS_SLAVE_MIN, MBUS_ADDRESS_UNCONFIGURED,
    MBUS_CONTROL_INFO_MODE_BIT, MBUS_CONTROL_MASK_DIR_M2S, MBUS_CONTROL_MASK_FCB,
    MBUS_CONTROL_MASK_FCV, MBUS_CONTROL_MASK_FUNCTION,
};
use crate::mbus::byte::ByteField;

/// Generates the byte-backed constructors shared by every field type.
macro_rules! byte_backed_field {
    ($name:ident) => {
        impl $name {
            /// Validates an integer as a field byte.
            pub fn new(value: i64) -> Result<Self, $crate::error::MBusError> {
                $crate::mbus::byte::ByteField::new(value).map($name)
            }

            pub const fn from_byte(byte: $crate::mbus::byte::ByteField) -> Self {
                $name(byte)
            }

            pub const fn byte(&self) -> $crate::mbus::byte::ByteField {
                self.0
            }

            pub const fn value(&self) -> u8 {
                self.0.value()
            }
        }

        impl From<u8> for $name {
            fn from(byte: u8) -> Self {
                $name($crate::mbus::byte::ByteField::from(byte))
            }
        }

        impl From<$crate::mbus::byte::ByteField> for $name {
            fn from(byte: $crate::mbus::byte::ByteField) -> Self {
                $name(byte)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use byte_backed_field;

/// The A field: primary address of the slave (or a broadcast address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressField(ByteField);

byte_backed_field!(AddressField);

impl AddressField {
    pub fn is_unconfigured_slave(&self) -> bool {
        self.value() == MBUS_ADDRESS_UNCONFIGURED
    }

    pub fn is_configured_slave(&self) -> bool {
        (MBUS_ADDRESS_SLAVE_MIN..=MBUS_ADDRESS_SLAVE_MAX).contains(&self.value())
    }

    pub fn is_slave(&self) -> bool {
        self.is_unconfigured_slave() || self.is_configured_slave()
    }

    /// Address used to reach a slave selected by its secondary address.
    pub fn is_network_layer(&self) -> bool {
        self.value() == MBUS_ADDRESS_NETWORK_LAYER
    }

    pub fn is_broadcast_all_reply(&self) -> bool {
        self.value() == MBUS_ADDRESS_BROADCAST_REPLY
    }

    pub fn is_broadcast_no_replies(&self) -> bool {
        self.value() == MBUS_ADDRESS_BROADCAST_NOREPLY
    }

    pub fn is_broadcast(&self) -> bool {
        self.is_broadcast_all_reply() || self.is_broadcast_no_replies()
    }
}

bitflags! {
    /// Flag bits of the C field. Bits 5 and 4 are FCB/FCV when the master
    /// calls and ACD/DFC when the slave replies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        const DIRECTION = MBUS_CONTROL_MASK_DIR_M2S;
        const FCB_ACD = MBUS_CONTROL_MASK_FCB;
        const FCV_DFC = MBUS_CONTROL_MASK_FCV;
    }
}

/// The C field: function code plus direction and flow-control bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlField(ByteField);

byte_backed_field!(ControlField);

impl ControlField {
    /// The function code in bits 3-0.
    pub fn function(&self) -> u8 {
        self.0.masked(MBUS_CONTROL_MASK_FUNCTION)
    }

    pub fn flags(&self) -> ControlFlags {
        ControlFlags::from_bits_truncate(self.value())
    }

    /// True when the frame travels from master to slave.
    pub fn is_calling_direction(&self) -> bool {
        self.flags().contains(ControlFlags::DIRECTION)
    }

    pub fn is_reply_direction(&self) -> bool {
        !self.is_calling_direction()
    }

    /// Frame count bit, only meaningful in calling direction.
    pub fn fcb(&self) -> Option<bool> {
        self.calling_bit(ControlFlags::FCB_ACD)
    }

    /// Frame count bit valid, only meaningful in calling direction.
    pub fn fcv(&self) -> Option<bool> {
        self.calling_bit(ControlFlags::FCV_DFC)
    }

    /// Access demand, only meaningful in reply direction.
    pub fn acd(&self) -> Option<bool> {
        self.reply_bit(ControlFlags::FCB_ACD)
    }

    /// Data flow control, only meaningful in reply direction.
    pub fn dfc(&self) -> Option<bool> {
        self.reply_bit(ControlFlags::FCV_DFC)
    }

    fn calling_bit(&self, flag: ControlFlags) -> Option<bool> {
        self.is_calling_direction()
            .then(|| self.flags().contains(flag))
    }

    fn reply_bit(&self, flag: ControlFlags) -> Option<bool> {
        self.is_reply_direction()
            .then(|| self.flags().contains(flag))
    }
}

/// Order of the bytes in a multi-byte value, selected by the CI mode bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ByteOrder {
    /// Mode 1: least significant byte first.
    #[default]
    LittleEndian,
    /// Mode 2: most significant byte first.
    BigEndian,
}

/// The CI field: application layer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlInformationField(ByteField);

byte_backed_field!(ControlInformationField);

impl ControlInformationField {
    pub fn mode_bit(&self) -> bool {
        self.0.masked(MBUS_CONTROL_INFO_MODE_BIT) != 0
    }

    pub fn byte_order(&self) -> ByteOrder {
        if self.mode_bit() {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }
}
