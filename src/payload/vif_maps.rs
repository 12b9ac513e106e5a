//! VIF/VIFE Mapping Tables and Lookup Functions
//!
//! The base table and the two extension tables (0xFB, 0xFD) of EN 13757-3,
//! written as families of codes. A family fixes the high bits of the code;
//! its low "range" bits select a power of ten, a time scale or nothing.
//!
//! Lookup takes the first family whose fixed bits match, so an exact entry
//! placed before a ranged one overrides part of its range.

use crate::payload::vif::{VifCode, VifKind, VifUnit};

/// Exact powers of ten from 1e-12 to 1e7.
const POW10: [f64; 20] = [
    1e-12, 1e-11, 1e-10, 1e-9, 1e-8, 1e-7, 1e-6, 1e-5, 1e-4, 1e-3, 1e-2, 1e-1, 1e0, 1e1, 1e2,
    1e3, 1e4, 1e5, 1e6, 1e7,
];
const POW10_MIN: i32 = -12;

fn pow10(exponent: i32) -> f64 {
    usize::try_from(exponent - POW10_MIN)
        .ok()
        .and_then(|i| POW10.get(i).copied())
        .unwrap_or_else(|| 10f64.powi(exponent))
}

/// How the range bits of a family turn into multiplier and unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// `10^(range + offset)`.
    Power { unit: VifUnit, offset: i8 },
    /// Range 0..=3 is seconds, minutes, hours, days.
    Duration,
    /// Range 0..=3 is hours, days, months, years.
    LongDuration,
    Fixed { unit: VifUnit, multiplier: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VifFamily {
    pub code: u8,
    pub range: u8,
    pub kind: VifKind,
    pub scale: Scale,
}

impl VifFamily {
    pub const fn matches(&self, code: u8) -> bool {
        code & !self.range == self.code
    }

    pub fn resolve(&self, code: u8) -> VifCode {
        if self.kind == VifKind::Reserved {
            return VifCode::RESERVED;
        }
        let n = code & self.range;
        match self.scale {
            Scale::Power { unit, offset } => {
                VifCode::new(pow10(i32::from(n) + i32::from(offset)), self.kind, unit)
            }
            Scale::Duration => {
                let (multiplier, unit) = match n & 0x03 {
                    0 => (1.0, VifUnit::Second),
                    1 => (60.0, VifUnit::Minute),
                    2 => (3600.0, VifUnit::Hour),
                    _ => (86400.0, VifUnit::Day),
                };
                VifCode::new(multiplier, self.kind, unit)
            }
            Scale::LongDuration => {
                let (multiplier, unit) = match n & 0x03 {
                    0 => (3600.0, VifUnit::Hour),
                    1 => (86400.0, VifUnit::Day),
                    2 => (1.0, VifUnit::Month),
                    _ => (1.0, VifUnit::Year),
                };
                VifCode::new(multiplier, self.kind, unit)
            }
            Scale::Fixed { unit, multiplier } => VifCode::new(multiplier, self.kind, unit),
        }
    }
}

const fn power(code: u8, range: u8, kind: VifKind, unit: VifUnit, offset: i8) -> VifFamily {
    VifFamily {
        code,
        range,
        kind,
        scale: Scale::Power { unit, offset },
    }
}

const fn duration(code: u8, kind: VifKind) -> VifFamily {
    VifFamily {
        code,
        range: 0x03,
        kind,
        scale: Scale::Duration,
    }
}

const fn long_duration(code: u8, kind: VifKind) -> VifFamily {
    VifFamily {
        code,
        range: 0x03,
        kind,
        scale: Scale::LongDuration,
    }
}

const fn fixed(code: u8, kind: VifKind, unit: VifUnit, multiplier: f64) -> VifFamily {
    VifFamily {
        code,
        range: 0x00,
        kind,
        scale: Scale::Fixed { unit, multiplier },
    }
}

/// A single code without unit.
const fn plain(code: u8, kind: VifKind) -> VifFamily {
    fixed(code, kind, VifUnit::None, 1.0)
}

/// Every code not matched by an earlier family.
const RESERVED_REST: VifFamily = VifFamily {
    code: 0x00,
    range: 0x7F,
    kind: VifKind::Reserved,
    scale: Scale::Fixed {
        unit: VifUnit::None,
        multiplier: 1.0,
    },
};

/// Primary VIF table. 0x7B and 0x7D are table selectors and have no entry.
pub const BASE_TABLE: &[VifFamily] = &[
    power(0x00, 0x07, VifKind::Energy, VifUnit::WattHour, -3),
    power(0x08, 0x07, VifKind::Energy, VifUnit::Joule, 0),
    power(0x10, 0x07, VifKind::Volume, VifUnit::CubicMeter, -6),
    power(0x18, 0x07, VifKind::Mass, VifUnit::Kilogram, -3),
    duration(0x20, VifKind::OnTime),
    duration(0x24, VifKind::OperatingTime),
    power(0x28, 0x07, VifKind::Power, VifUnit::Watt, -3),
    power(0x30, 0x07, VifKind::Power, VifUnit::JoulePerHour, 0),
    power(0x38, 0x07, VifKind::VolumeFlow, VifUnit::CubicMeterPerHour, -6),
    power(0x40, 0x07, VifKind::VolumeFlow, VifUnit::CubicMeterPerMinute, -7),
    power(0x48, 0x07, VifKind::VolumeFlow, VifUnit::CubicMeterPerSecond, -9),
    power(0x50, 0x07, VifKind::MassFlow, VifUnit::KilogramPerHour, -3),
    power(0x58, 0x03, VifKind::FlowTemperature, VifUnit::Celsius, -3),
    power(0x5C, 0x03, VifKind::ReturnTemperature, VifUnit::Celsius, -3),
    power(0x60, 0x03, VifKind::TemperatureDifference, VifUnit::Kelvin, -3),
    power(0x64, 0x03, VifKind::ExternalTemperature, VifUnit::Celsius, -3),
    power(0x68, 0x03, VifKind::Pressure, VifUnit::Bar, -3),
    fixed(0x6C, VifKind::TimePoint, VifUnit::Date, 1.0),
    fixed(0x6D, VifKind::TimePoint, VifUnit::DateTime, 1.0),
    fixed(0x6E, VifKind::HeatCostAllocator, VifUnit::HcaUnits, 1.0),
    plain(0x6F, VifKind::Reserved),
    duration(0x70, VifKind::AveragingDuration),
    duration(0x74, VifKind::ActualityDuration),
    plain(0x78, VifKind::FabricationNumber),
    plain(0x79, VifKind::EnhancedIdentification),
    plain(0x7A, VifKind::BusAddress),
    plain(0x7C, VifKind::UserDefinable),
    plain(0x7E, VifKind::Any),
    plain(0x7F, VifKind::ManufacturerSpecific),
];

/// Extension table selected by VIF 0xFB.
pub const FB_TABLE: &[VifFamily] = &[
    power(0x00, 0x01, VifKind::Energy, VifUnit::MegaWattHour, -1),
    power(0x08, 0x01, VifKind::Energy, VifUnit::GigaJoule, -1),
    power(0x10, 0x01, VifKind::Volume, VifUnit::CubicMeter, 2),
    power(0x18, 0x01, VifKind::Mass, VifUnit::Tonne, 2),
    fixed(0x21, VifKind::Volume, VifUnit::CubicFeet, 1e-1),
    fixed(0x22, VifKind::Volume, VifUnit::UsGallon, 1e-1),
    fixed(0x23, VifKind::Volume, VifUnit::UsGallon, 1.0),
    fixed(0x24, VifKind::VolumeFlow, VifUnit::UsGallonPerMinute, 1e-3),
    fixed(0x25, VifKind::VolumeFlow, VifUnit::UsGallonPerMinute, 1.0),
    fixed(0x26, VifKind::VolumeFlow, VifUnit::UsGallonPerHour, 1.0),
    power(0x28, 0x01, VifKind::Power, VifUnit::MegaWatt, -1),
    power(0x30, 0x01, VifKind::Power, VifUnit::GigaJoulePerHour, -1),
    power(0x58, 0x03, VifKind::FlowTemperature, VifUnit::Fahrenheit, -3),
    power(0x5C, 0x03, VifKind::ReturnTemperature, VifUnit::Fahrenheit, -3),
    power(0x60, 0x03, VifKind::TemperatureDifference, VifUnit::Fahrenheit, -3),
    power(0x64, 0x03, VifKind::ExternalTemperature, VifUnit::Fahrenheit, -3),
    power(0x70, 0x03, VifKind::TemperatureLimit, VifUnit::Fahrenheit, -3),
    power(0x74, 0x03, VifKind::TemperatureLimit, VifUnit::Celsius, -3),
    power(0x78, 0x07, VifKind::CumulativeMaxPower, VifUnit::Watt, -3),
    RESERVED_REST,
];

/// Extension table selected by VIF 0xFD.
pub const FD_TABLE: &[VifFamily] = &[
    power(0x00, 0x03, VifKind::Credit, VifUnit::Currency, -3),
    power(0x04, 0x03, VifKind::Debit, VifUnit::Currency, -3),
    plain(0x08, VifKind::AccessNumber),
    plain(0x09, VifKind::Medium),
    plain(0x0A, VifKind::Manufacturer),
    plain(0x0B, VifKind::ParameterSetIdentification),
    plain(0x0C, VifKind::ModelVersion),
    plain(0x0D, VifKind::HardwareVersion),
    plain(0x0E, VifKind::FirmwareVersion),
    plain(0x0F, VifKind::SoftwareVersion),
    plain(0x10, VifKind::CustomerLocation),
    plain(0x11, VifKind::Customer),
    plain(0x12, VifKind::AccessCodeUser),
    plain(0x13, VifKind::AccessCodeOperator),
    plain(0x14, VifKind::AccessCodeSystemOperator),
    plain(0x15, VifKind::AccessCodeDeveloper),
    plain(0x16, VifKind::Password),
    plain(0x17, VifKind::ErrorFlags),
    plain(0x18, VifKind::ErrorMask),
    plain(0x1A, VifKind::DigitalOutput),
    plain(0x1B, VifKind::DigitalInput),
    fixed(0x1C, VifKind::BaudRate, VifUnit::Baud, 1.0),
    fixed(0x1D, VifKind::ResponseDelayTime, VifUnit::BitTimes, 1.0),
    plain(0x1E, VifKind::Retry),
    plain(0x20, VifKind::FirstStorageNumber),
    plain(0x21, VifKind::LastStorageNumber),
    plain(0x22, VifKind::StorageBlockSize),
    duration(0x24, VifKind::StorageInterval),
    fixed(0x28, VifKind::StorageInterval, VifUnit::Month, 1.0),
    fixed(0x29, VifKind::StorageInterval, VifUnit::Year, 1.0),
    duration(0x2C, VifKind::DurationSinceLastReadout),
    fixed(0x30, VifKind::TariffStart, VifUnit::DateTime, 1.0),
    duration(0x30, VifKind::TariffDuration),
    duration(0x34, VifKind::TariffPeriod),
    fixed(0x38, VifKind::TariffPeriod, VifUnit::Month, 1.0),
    fixed(0x39, VifKind::TariffPeriod, VifUnit::Year, 1.0),
    plain(0x3A, VifKind::Dimensionless),
    power(0x40, 0x0F, VifKind::Voltage, VifUnit::Volt, -9),
    power(0x50, 0x0F, VifKind::Current, VifUnit::Ampere, -12),
    plain(0x60, VifKind::ResetCounter),
    plain(0x61, VifKind::CumulationCounter),
    plain(0x62, VifKind::ControlSignal),
    plain(0x63, VifKind::DayOfWeek),
    plain(0x64, VifKind::WeekNumber),
    plain(0x65, VifKind::TimePointOfDayChange),
    plain(0x66, VifKind::ParameterActivationState),
    plain(0x67, VifKind::SpecialSupplierInformation),
    long_duration(0x68, VifKind::DurationSinceLastCumulation),
    long_duration(0x6C, VifKind::BatteryOperatingTime),
    fixed(0x70, VifKind::BatteryChangeDate, VifUnit::DateTime, 1.0),
    RESERVED_REST,
];

/// Looks a 7-bit code up in `table`.
pub fn lookup(table: &[VifFamily], code: u8) -> Option<VifCode> {
    table
        .iter()
        .find(|family| family.matches(code))
        .map(|family| family.resolve(code))
}
