// @file: kline_downloader/src/core/normalizer.rs
// @description: Converts raw kline arrays into typed records and writes them as CSV.
// @author: LAS.

use chrono::{DateTime, TimeZone, Utc};
use csv::{Writer, WriterBuilder};
use serde_json::Value;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use crate::core::errors::{FetchError, FetchResult};
use crate::core::models::{
    KlineRecord, OutputShape, RawKline, TakerVolumes, IDX_CLOSE, IDX_HIGH, IDX_LOW, IDX_OPEN,
    IDX_OPEN_TIME, IDX_QUOTE_VOLUME, IDX_TAKER_BASE, IDX_TAKER_QUOTE, IDX_VOLUME, KLINE_FIELD_COUNT,
};


//
// CONSTANTS
//

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Used for the whole table as soon as one open time has a millisecond part
const TIMESTAMP_FORMAT_MILLIS: &str = "%Y-%m-%d %H:%M:%S%.3f";


//
// PUBLIC INTERFACE
//

pub fn normalize(rows: &[RawKline], shape: OutputShape) -> FetchResult<Vec<KlineRecord>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index, row, shape))
        .collect()
}

pub fn output_file_name(symbol: &str, interval: &str, shape: OutputShape) -> String {
    format!("{}_{}_{}.csv", symbol.to_uppercase(), interval, shape.file_suffix())
}

/// Writes the header row followed by one line per record.
///
/// The file is truncated first and is not written atomically.
pub fn write_csv(records: &[KlineRecord], shape: OutputShape, path: &Path) -> FetchResult<()> {
    let file: File = File::create(path).map_err(|e| FetchError::filesystem(path, e))?;
    write_records(file, records, shape).map_err(|e| FetchError::filesystem(path, e))
}

pub fn write_records<W: Write>(sink: W, records: &[KlineRecord], shape: OutputShape) -> io::Result<()> {
    write_with_format(sink, records, shape, timestamp_format(records))
}

/// Aligned text table of the first `limit` records, for console output.
///
/// Cells are produced by the same writer as the CSV file, so both show identical text.
pub fn render_preview(records: &[KlineRecord], shape: OutputShape, limit: usize) -> String {
    let head: &[KlineRecord] = &records[..limit.min(records.len())];
    let mut buffer: Vec<u8> = Vec::new();
    if let Err(e) = write_with_format(&mut buffer, head, shape, timestamp_format(records)) {
        return format!("(preview unavailable: {})", e);
    }

    // Timestamps and numbers never contain commas or quotes
    let text: String = String::from_utf8_lossy(&buffer).into_owned();
    let lines: Vec<Vec<&str>> = text.lines().map(|l| l.split(',').collect()).collect();

    // #1. Column Widths
    let mut widths: Vec<usize> = vec![0; shape.headers().len()];
    for cells in &lines {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    // #2. Render
    lines
        .iter()
        .map(|cells| {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:>width$}", cell, width = widths[i]))
                .collect::<Vec<String>>()
                .join("  ")
        })
        .collect::<Vec<String>>()
        .join("\n")
}


//
// INTERNAL HELPERS
//

fn timestamp_format(records: &[KlineRecord]) -> &'static str {
    if records.iter().any(|r| r.open_time.timestamp_subsec_millis() != 0) {
        TIMESTAMP_FORMAT_MILLIS
    } else {
        TIMESTAMP_FORMAT
    }
}

fn write_with_format<W: Write>(
    sink: W,
    records: &[KlineRecord],
    shape: OutputShape,
    time_format: &str,
) -> io::Result<()> {
    // Headers are written by hand so an empty table still gets them
    let mut writer: Writer<W> = WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(shape.headers())?;

    for record in records {
        let open_time: String = record.open_time.format(time_format).to_string();
        match (shape, record.extended) {
            (OutputShape::Extended, Some(t)) => writer.serialize((
                open_time, record.open, record.high, record.low, record.close, record.volume,
                t.quote_volume, t.taker_base, t.taker_quote,
            ))?,
            (OutputShape::Extended, None) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("record at {} has no taker volumes", open_time),
                ));
            }
            (OutputShape::Basic, _) => writer.serialize((
                open_time, record.open, record.high, record.low, record.close, record.volume,
            ))?,
        }
    }

    writer.flush()
}

fn normalize_row(index: usize, row: &RawKline, shape: OutputShape) -> FetchResult<KlineRecord> {
    if row.len() < KLINE_FIELD_COUNT {
        return Err(FetchError::MalformedData(format!(
            "row {} has {} fields, expected {}",
            index,
            row.len(),
            KLINE_FIELD_COUNT
        )));
    }

    let extended: Option<TakerVolumes> = match shape {
        OutputShape::Basic => None,
        OutputShape::Extended => Some(TakerVolumes {
            quote_volume: parse_f64(index, row, IDX_QUOTE_VOLUME, "QuoteVolume")?,
            taker_base: parse_f64(index, row, IDX_TAKER_BASE, "TakerBase")?,
            taker_quote: parse_f64(index, row, IDX_TAKER_QUOTE, "TakerQuote")?,
        }),
    };

    Ok(KlineRecord {
        open_time: parse_open_time(index, &row[IDX_OPEN_TIME])?,
        open: parse_f64(index, row, IDX_OPEN, "Open")?,
        high: parse_f64(index, row, IDX_HIGH, "High")?,
        low: parse_f64(index, row, IDX_LOW, "Low")?,
        close: parse_f64(index, row, IDX_CLOSE, "Close")?,
        volume: parse_f64(index, row, IDX_VOLUME, "Volume")?,
        extended,
    })
}

fn parse_open_time(index: usize, value: &Value) -> FetchResult<DateTime<Utc>> {
    value
        .as_i64()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .ok_or_else(|| {
            FetchError::MalformedData(format!("row {} column OpenTime: {} is not an epoch-ms timestamp", index, value))
        })
}

// Binance sends prices as strings, but numbers are accepted too
fn parse_f64(index: usize, row: &RawKline, field: usize, column: &str) -> FetchResult<f64> {
    let value: &Value = &row[field];
    let parsed: Option<f64> = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        FetchError::MalformedData(format!("row {} column {}: cannot parse {} as a number", index, column, value))
    })
}
