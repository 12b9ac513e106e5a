use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

use mbus_codec::util::hex::{decode_hex, encode_hex_upper, pretty_hex};
use mbus_codec::{
    init_logger, log_debug, log_error, log_info, log_warn, parse_bcd_uint_with, parse_bool,
    parse_date, parse_datetime, parse_float, parse_int_with, parse_long_bcd_uint, parse_time,
    parse_uint_with, parse_unit_type, resolve, ByteOrder,
    DataFieldCode, DataRecord, ExtensionTable, Frame, VifKind, VifUnit,
};

#[derive(Parser)]
#[command(name = "mbus-codec")]
#[command(about = "Decode M-Bus telegrams given as hex strings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a frame (ACK, short, control or long)
    Frame { hex: String },
    /// Parse one or more data records
    Record {
        hex: String,
        /// Multi-byte values are sent MSB first (CI mode 2)
        #[arg(long)]
        big_endian: bool,
    },
    /// Resolve a VIF or VIFE byte
    Vif {
        hex: String,
        #[arg(short, long)]
        table: Option<Table>,
    },
    /// Decode a value of the given type
    Value {
        #[arg(value_enum)]
        kind: ValueType,
        hex: String,
        #[arg(long)]
        big_endian: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Fb,
    Fd,
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueType {
    Bcd,
    Int,
    Uint,
    Bool,
    Float,
    Date,
    Time,
    Datetime,
    UnitType,
}

/// Hex dump of the input at debug level.
fn log_input(bytes: &[u8]) {
    log_debug(&format!("input ({} bytes):\n{}", bytes.len(), pretty_hex(bytes, 16)));
}

fn byte_order(big_endian: bool) -> ByteOrder {
    if big_endian {
        ByteOrder::BigEndian
    } else {
        ByteOrder::LittleEndian
    }
}

fn frame_json(frame: &Frame) -> Value {
    let mut out = json!({
        "type": frame.frame_type(),
        "bytes": frame.bytes().to_hex(),
        "checksum_valid": frame.verify_checksum().is_ok(),
    });
    let fields = match frame {
        Frame::Single(_) => json!({}),
        Frame::Short(f) => json!({
            "control": f.control().value(),
            "address": f.address().value(),
            "checksum": f.checksum(),
        }),
        Frame::Control(f) => json!({
            "length": f.length(),
            "control": f.control().value(),
            "address": f.address().value(),
            "control_information": f.control_information().value(),
            "byte_order": f.control_information().byte_order(),
            "checksum": f.checksum(),
        }),
        Frame::Long(f) => json!({
            "length": f.length(),
            "control": f.control().value(),
            "address": f.address().value(),
            "control_information": f.control_information().value(),
            "byte_order": f.control_information().byte_order(),
            "user_data": f.user_data(),
            "checksum": f.checksum(),
        }),
    };
    if let (Some(out), Value::Object(fields)) = (out.as_object_mut(), fields) {
        out.extend(fields);
    }
    out
}

/// Picks a decoder from the data field code and the VIF unit.
fn record_value(record: &DataRecord, order: ByteOrder) -> Result<Value> {
    if record.is_manufacturer_specific() {
        return Ok(json!(record.data().to_hex()));
    }
    let bytes = record.value_bytes();
    let unit = record.code().map(|c| c.unit);
    let value = match record.data_field_code() {
        DataFieldCode::NoData
        | DataFieldCode::SelectionForReadout
        | DataFieldCode::SpecialFunction => Value::Null,
        DataFieldCode::Int16 if unit == Some(VifUnit::Date) => json!(parse_date(&bytes)?),
        DataFieldCode::Int32 if unit == Some(VifUnit::DateTime) => json!(parse_datetime(&bytes)?),
        DataFieldCode::Real32 => json!(parse_float(&bytes)?),
        code if code.is_bcd() => json!(parse_bcd_uint_with(&bytes, order)?),
        DataFieldCode::VariableLength => match record.data().as_bytes().first() {
            _ if bytes.is_empty() => Value::Null,
            // u128 does not fit a JSON number
            Some(0xC0..=0xCF) => json!(parse_long_bcd_uint(&bytes)?.to_string()),
            Some(0xD0..=0xDF) => json!(format!("-{}", parse_long_bcd_uint(&bytes)?)),
            _ => json!(encode_hex_upper(&bytes)),
        },
        _ => json!(parse_int_with(&bytes, order)?),
    };
    Ok(value)
}

fn record_json(record: &DataRecord, order: ByteOrder) -> Result<Value> {
    let dib = record.dib();
    let code = record.code();
    Ok(json!({
        "dib": encode_hex_upper(&dib.to_bytes()),
        "vib": record.vib().map(|vib| encode_hex_upper(&vib.to_bytes())),
        "data": record.data().to_hex(),
        "data_field_code": dib.data_field_code(),
        "function": dib.function(),
        "storage_number": dib.storage_number(),
        "tariff": dib.tariff(),
        "subunit": dib.subunit(),
        "vif": code,
        "more_records_follow": record.more_records_follow(),
        "value": record_value(record, order)?,
    }))
}

fn decode_value(kind: ValueType, bytes: &[u8], order: ByteOrder) -> Result<Value> {
    let value = match kind {
        ValueType::Bcd => json!(parse_bcd_uint_with(bytes, order)?),
        ValueType::Int => json!(parse_int_with(bytes, order)?),
        ValueType::Uint => json!(parse_uint_with(bytes, order)?),
        ValueType::Bool => json!(parse_bool(bytes)?),
        ValueType::Float => json!(parse_float(bytes)?),
        ValueType::Date => json!(parse_date(bytes)?),
        ValueType::Time => json!(parse_time(bytes)?),
        ValueType::Datetime => json!(parse_datetime(bytes)?),
        ValueType::UnitType => json!(parse_unit_type(bytes)?),
    };
    Ok(value)
}

fn run(cli: Cli) -> Result<Value> {
    match cli.command {
        Commands::Frame { hex } => {
            let bytes = decode_hex(&hex).context("invalid hex input")?;
            log_input(&bytes);
            let frame = Frame::from_bytes(&bytes).context("invalid frame")?;
            if let Err(e) = frame.verify_checksum() {
                log_warn(&e.to_string());
            }
            Ok(frame_json(&frame))
        }
        Commands::Record { hex, big_endian } => {
            let bytes = decode_hex(&hex).context("invalid hex input")?;
            log_input(&bytes);
            let records = DataRecord::parse_all(&bytes).context("invalid data record")?;
            log_info(&format!("{} data record(s)", records.len()));
            if records.last().is_some_and(DataRecord::more_records_follow) {
                log_info("meter has more records, send another request");
            }
            let order = byte_order(big_endian);
            let out = records
                .iter()
                .map(|r| record_json(r, order))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(out))
        }
        Commands::Vif { hex, table } => {
            let bytes = decode_hex(&hex).context("invalid hex input")?;
            let &[byte] = bytes.as_slice() else {
                bail!("expected exactly one byte, got {}", bytes.len());
            };
            let table = table.map(|t| match t {
                Table::Fb => ExtensionTable::First,
                Table::Fd => ExtensionTable::Second,
            });
            let code = resolve(byte, table);
            if code.is_some_and(|c| c.kind == VifKind::Extension) {
                log_debug("VIF selects an extension table, pass the next byte with --table");
            }
            Ok(json!(code))
        }
        Commands::Value {
            kind,
            hex,
            big_endian,
        } => {
            let bytes = decode_hex(&hex).context("invalid hex input")?;
            decode_value(kind, &bytes, byte_order(big_endian))
        }
    }
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    match run(cli) {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            log_error(&format!("{e:#}"));
            Err(e)
        }
    }
}
