//! # Value Information Codes
//!
//! Resolves a VIF (or a VIFE following an 0xFB/0xFD selector) to the physical
//! quantity it describes, its unit and the decimal multiplier to apply to the
//! raw value. The tables themselves live in [`crate::payload::vif_maps`].
//!
//! Lookup never fails: codes without an entry resolve to `None`.

use std::fmt;

use serde::Serialize;

use crate::constants::MBUS_DIB_VIF_WITHOUT_EXTENSION;
use crate::error::MBusError;
use crate::mbus::byte::ByteField;
use crate::payload::fields::ExtensionTable;
use crate::payload::vif_maps::{lookup, BASE_TABLE, FB_TABLE, FD_TABLE};

/// Physical quantity (or other meaning) of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VifKind {
    Energy,
    Volume,
    Mass,
    OnTime,
    OperatingTime,
    Power,
    VolumeFlow,
    MassFlow,
    FlowTemperature,
    ReturnTemperature,
    TemperatureDifference,
    ExternalTemperature,
    Pressure,
    TimePoint,
    HeatCostAllocator,
    Reserved,
    AveragingDuration,
    ActualityDuration,
    FabricationNumber,
    EnhancedIdentification,
    BusAddress,
    UserDefinable,
    Any,
    ManufacturerSpecific,
    /// The real code follows in a VIFE, looked up in an extension table.
    Extension,
    TemperatureLimit,
    CumulativeMaxPower,
    Credit,
    Debit,
    AccessNumber,
    Medium,
    Manufacturer,
    ParameterSetIdentification,
    ModelVersion,
    HardwareVersion,
    FirmwareVersion,
    SoftwareVersion,
    CustomerLocation,
    Customer,
    AccessCodeUser,
    AccessCodeOperator,
    AccessCodeSystemOperator,
    AccessCodeDeveloper,
    Password,
    ErrorFlags,
    ErrorMask,
    DigitalOutput,
    DigitalInput,
    BaudRate,
    ResponseDelayTime,
    Retry,
    FirstStorageNumber,
    LastStorageNumber,
    StorageBlockSize,
    StorageInterval,
    DurationSinceLastReadout,
    TariffStart,
    TariffDuration,
    TariffPeriod,
    Dimensionless,
    Voltage,
    Current,
    ResetCounter,
    CumulationCounter,
    ControlSignal,
    DayOfWeek,
    WeekNumber,
    TimePointOfDayChange,
    ParameterActivationState,
    SpecialSupplierInformation,
    DurationSinceLastCumulation,
    BatteryOperatingTime,
    BatteryChangeDate,
}

/// Unit of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VifUnit {
    None,
    WattHour,
    Joule,
    CubicMeter,
    Kilogram,
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
    Watt,
    JoulePerHour,
    CubicMeterPerHour,
    CubicMeterPerMinute,
    CubicMeterPerSecond,
    KilogramPerHour,
    Celsius,
    Kelvin,
    Bar,
    HcaUnits,
    Date,
    DateTime,
    MegaWattHour,
    GigaJoule,
    Tonne,
    CubicFeet,
    UsGallon,
    UsGallonPerMinute,
    UsGallonPerHour,
    MegaWatt,
    GigaJoulePerHour,
    Fahrenheit,
    Currency,
    Baud,
    BitTimes,
    Volt,
    Ampere,
}

impl VifUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            VifUnit::None => "",
            VifUnit::WattHour => "Wh",
            VifUnit::Joule => "J",
            VifUnit::CubicMeter => "m^3",
            VifUnit::Kilogram => "kg",
            VifUnit::Second => "s",
            VifUnit::Minute => "min",
            VifUnit::Hour => "h",
            VifUnit::Day => "d",
            VifUnit::Month => "month",
            VifUnit::Year => "year",
            VifUnit::Watt => "W",
            VifUnit::JoulePerHour => "J/h",
            VifUnit::CubicMeterPerHour => "m^3/h",
            VifUnit::CubicMeterPerMinute => "m^3/min",
            VifUnit::CubicMeterPerSecond => "m^3/s",
            VifUnit::KilogramPerHour => "kg/h",
            VifUnit::Celsius => "°C",
            VifUnit::Kelvin => "K",
            VifUnit::Bar => "bar",
            VifUnit::HcaUnits => "HCA",
            VifUnit::Date => "date",
            VifUnit::DateTime => "datetime",
            VifUnit::MegaWattHour => "MWh",
            VifUnit::GigaJoule => "GJ",
            VifUnit::Tonne => "t",
            VifUnit::CubicFeet => "ft^3",
            VifUnit::UsGallon => "US gal",
            VifUnit::UsGallonPerMinute => "US gal/min",
            VifUnit::UsGallonPerHour => "US gal/h",
            VifUnit::MegaWatt => "MW",
            VifUnit::GigaJoulePerHour => "GJ/h",
            VifUnit::Fahrenheit => "°F",
            VifUnit::Currency => "currency units",
            VifUnit::Baud => "Bd",
            VifUnit::BitTimes => "bit times",
            VifUnit::Volt => "V",
            VifUnit::Ampere => "A",
        }
    }
}

impl fmt::Display for VifUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Resolved meaning of a VIF: `value * multiplier` is in `unit`.
///
/// For durations the multiplier converts to seconds and `unit` records the
/// scale the meter transmitted; months and years have no fixed length and
/// keep a multiplier of 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VifCode {
    pub multiplier: f64,
    pub kind: VifKind,
    pub unit: VifUnit,
}

impl VifCode {
    /// Shared entry for reserved codes.
    pub const RESERVED: VifCode = VifCode::new(1.0, VifKind::Reserved, VifUnit::None);

    /// Marker for 0xFB/0xFD: the real code is in the next byte.
    pub const EXTENSION: VifCode = VifCode::new(1.0, VifKind::Extension, VifUnit::None);

    pub const fn new(multiplier: f64, kind: VifKind, unit: VifUnit) -> Self {
        VifCode {
            multiplier,
            kind,
            unit,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.kind == VifKind::Reserved
    }

    pub fn is_extension(&self) -> bool {
        self.kind == VifKind::Extension
    }
}

impl fmt::Display for VifCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} x{} {}", self.kind, self.multiplier, self.unit)
    }
}

/// Resolves a VIF/VIFE byte.
///
/// Without a table the code is looked up in the base table, where 0xFB and
/// 0xFD resolve to [`VifCode::EXTENSION`]. With a table the byte is a VIFE
/// looked up in that extension table. The extension bit is ignored.
pub fn resolve(byte: u8, table: Option<ExtensionTable>) -> Option<VifCode> {
    let code = byte & MBUS_DIB_VIF_WITHOUT_EXTENSION;
    let found = match table {
        None => lookup(BASE_TABLE, code)
            .or_else(|| ExtensionTable::from_selector(byte).map(|_| VifCode::EXTENSION)),
        Some(ExtensionTable::First) => lookup(FB_TABLE, code),
        Some(ExtensionTable::Second) => lookup(FD_TABLE, code),
    };

    match &found {
        Some(vif) => log::trace!("VIF 0x{byte:02X} ({table:?}) -> {vif}"),
        None => log::debug!("VIF 0x{byte:02X} ({table:?}) has no table entry"),
    }
    found
}

/// Same as [`resolve`] for an integer that still has to be validated as a byte.
pub fn resolve_value(value: i64, table: Option<ExtensionTable>) -> Result<Option<VifCode>, MBusError> {
    let byte = ByteField::new(value)?;
    Ok(resolve(byte.value(), table))
}
