//! The payload module contains the components responsible for decoding the
//! application layer of M-Bus telegrams: data/value information fields and
//! blocks, data records, the IEC 870-5-4 data types and the VIF tables.

pub mod block;
pub mod data_encoding;
pub mod fields;
pub mod record;
pub mod vif;
pub mod vif_maps;

pub use block::{DataInformationBlock, ValueInformationBlock};
pub use data_encoding::*;
pub use fields::{
    lvar_data_length, DataFieldCode, DataInformationField, DataInformationFieldExtension, DataLength,
    ExtensionTable, FunctionFieldCode, ValueInformationField, ValueInformationFieldExtension,
};
pub use record::DataRecord;
pub use vif::{resolve, resolve_value, VifCode, VifKind, VifUnit};
