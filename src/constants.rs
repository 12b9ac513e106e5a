//! M-Bus Protocol Constants
//!
//! This module defines constants used in the M-Bus protocol implementation,
//! based on the EN 13757 standard.

// ----------------------------------------------------------------------------
// Frame markers
// ----------------------------------------------------------------------------

/// Single character (ACK) frame
pub const MBUS_FRAME_ACK: u8 = 0xE5;

/// Short frame start character
pub const MBUS_FRAME_SHORT_START: u8 = 0x10;

/// Control and long frame start character
pub const MBUS_FRAME_LONG_START: u8 = 0x68;

/// Stop character of every frame except the ACK
pub const MBUS_FRAME_STOP: u8 = 0x16;

/// L field value of a control frame (C, A and CI)
pub const MBUS_FRAME_CONTROL_LENGTH: u8 = 3;

pub const MBUS_FRAME_SHORT_SIZE: usize = 5;
pub const MBUS_FRAME_CONTROL_SIZE: usize = 9;
pub const MBUS_FRAME_LONG_SIZE: usize = 10;

/// Largest value allowed in the user data byte of a long frame
pub const MBUS_FRAME_USER_DATA_MAX: u8 = 252;

// ----------------------------------------------------------------------------
// Address field
// ----------------------------------------------------------------------------

pub const MBUS_ADDRESS_UNCONFIGURED: u8 = 0x00;
pub const MBUS_ADDRESS_SLAVE_MIN: u8 = 0x01;
pub const MBUS_ADDRESS_SLAVE_MAX: u8 = 0xFA;

/// Network layer (secondary addressing) address
pub const MBUS_ADDRESS_NETWORK_LAYER: u8 = 0xFD;

/// Broadcast, all slaves reply
pub const MBUS_ADDRESS_BROADCAST_REPLY: u8 = 0xFE;

/// Broadcast, no slave replies
pub const MBUS_ADDRESS_BROADCAST_NOREPLY: u8 = 0xFF;

// ----------------------------------------------------------------------------
// Control and control information fields
// ----------------------------------------------------------------------------

pub const MBUS_CONTROL_MASK_FUNCTION: u8 = 0x0F;
pub const MBUS_CONTROL_MASK_FCV: u8 = 0x10;
pub const MBUS_CONTROL_MASK_FCB: u8 = 0x20;
pub const MBUS_CONTROL_MASK_DIR_M2S: u8 = 0x40;

/// CI mode bit: set means multi-byte values are sent MSB first (mode 2)
pub const MBUS_CONTROL_INFO_MODE_BIT: u8 = 0x04;

// ----------------------------------------------------------------------------
// Data and value information
// ----------------------------------------------------------------------------

/// DIF (Data Information Field) mask for data length
pub const MBUS_DATA_RECORD_DIF_MASK_DATA: u8 = 0x0F;

/// DIF mask for function
pub const MBUS_DATA_RECORD_DIF_MASK_FUNCTION: u8 = 0x30;

/// DIF mask for storage number
pub const MBUS_DATA_RECORD_DIF_MASK_STORAGE_NO: u8 = 0x40;

/// DIFE (Data Information Field Extension) mask for storage number
pub const MBUS_DATA_RECORD_DIFE_MASK_STORAGE_NO: u8 = 0x0F;

/// DIFE mask for tariff
pub const MBUS_DATA_RECORD_DIFE_MASK_TARIFF: u8 = 0x30;

/// DIFE mask for device
pub const MBUS_DATA_RECORD_DIFE_MASK_DEVICE: u8 = 0x40;

/// DIF of a filler byte between data records
pub const MBUS_DIB_DIF_IDLE_FILLER: u8 = 0x2F;

/// DIF starting manufacturer specific data that runs to the end of the telegram
pub const MBUS_DIB_DIF_MANUFACTURER_SPECIFIC: u8 = 0x0F;

/// As [`MBUS_DIB_DIF_MANUFACTURER_SPECIFIC`], and more records follow in the next telegram
pub const MBUS_DIB_DIF_MORE_RECORDS_FOLLOW: u8 = 0x1F;

/// Extension bit shared by DIF, DIFE, VIF and VIFE
pub const MBUS_EXTENSION_BIT: u8 = 0x80;

/// VIF without extension
pub const MBUS_DIB_VIF_WITHOUT_EXTENSION: u8 = 0x7F;

/// Maximum number of DIFE or VIFE following a DIF or VIF
pub const MBUS_MAX_EXTENSIONS: usize = 10;

/// VIF selecting the first extension table (EN 13757-3 table 14)
pub const MBUS_VIF_EXTENSION_FB: u8 = 0xFB;

/// VIF selecting the second extension table (EN 13757-3 table 12)
pub const MBUS_VIF_EXTENSION_FD: u8 = 0xFD;
