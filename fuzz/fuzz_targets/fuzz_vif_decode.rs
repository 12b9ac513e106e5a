#![no_main]

use libfuzzer_sys::fuzz_target;
use mbus_codec::{resolve, DataInformationBlock, DataRecord, ExtensionTable, ValueInformationBlock};

fuzz_target!(|data: &[u8]| {
    // Single VIF/VIFE bytes in every table
    if let Some(&byte) = data.first() {
        let _ = resolve(byte, None);
        assert!(resolve(byte, Some(ExtensionTable::First)).is_some());
        assert!(resolve(byte, Some(ExtensionTable::Second)).is_some());
    }

    // Extension chains, at most 10 extensions per block
    if let Ok((rest, vib)) = ValueInformationBlock::parse(data) {
        assert!(vib.vifes().len() <= 10);
        assert!(rest.len() < data.len());
        let _ = vib.code();
    }
    if let Ok((_, dib)) = DataInformationBlock::parse(data) {
        let _ = (dib.storage_number(), dib.tariff(), dib.subunit());
    }

    // Whole record streams; only idle fillers are dropped
    if let Ok(records) = DataRecord::parse_all(data) {
        let total: usize = records.iter().map(|r| r.to_bytes().len()).sum();
        let fillers = data.len() - total;
        assert!(data.iter().filter(|&&b| b == 0x2F).count() >= fillers);
        assert!(records.iter().rev().skip(1).all(|r| !r.is_manufacturer_specific()));
    }
});
