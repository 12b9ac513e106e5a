use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mbus_codec::{resolve, DataRecord, ExtensionTable, Frame};

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

/// Data records of a heat meter telegram, without link header and checksum.
const ELS_ELSTER_RECORDS_HEX: &str = "0C06000000008C1006000000008C2013000000000C13000000003C2BBDEBDDDD3B3BBDEBDD0A5A27020A5E26020A6201000A273007046D090DCD134C06000000004C1300000000CC100600000000CC201300000000426CBF15";

fn benchmark_parse_frame(c: &mut Criterion) {
    let stream = hex_to_bytes("E5105BFE59166803036853FE51A216");

    c.bench_function("parse_frame", |b| {
        b.iter(|| {
            let mut rest = black_box(stream.as_slice());
            while let Ok((next, frame)) = Frame::parse(rest) {
                black_box(frame);
                rest = next;
            }
        })
    });
}

fn benchmark_parse_records(c: &mut Criterion) {
    let data = hex_to_bytes(ELS_ELSTER_RECORDS_HEX);

    c.bench_function("parse_records", |b| {
        b.iter(|| {
            let records = DataRecord::parse_all(black_box(&data));
            let _ = black_box(records);
        })
    });
}

fn benchmark_vif_resolve(c: &mut Criterion) {
    c.bench_function("vif_resolve", |b| {
        b.iter(|| {
            for byte in 0u8..=0xFF {
                black_box(resolve(black_box(byte), None));
                black_box(resolve(black_box(byte), Some(ExtensionTable::Second)));
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse_frame,
    benchmark_parse_records,
    benchmark_vif_resolve
);
criterion_main!(benches);
