// @file: kline_downloader/src/utils/input.rs
// @description: Interactive prompts and validation of the three run inputs.
// @author: LAS.

use std::io::{self, BufRead, Write};
use crate::core::errors::{FetchError, FetchResult};
use crate::core::models::RunRequest;


//
// PROMPTS
//

pub fn prompt<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, message: &str) -> io::Result<String> {
    write!(writer, "{}", message)?;
    writer.flush()?;

    let mut line: String = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Asks for symbol, interval and lookback, then validates them.
pub fn read_run_request<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> FetchResult<RunRequest> {
    let stdin_err = |e: io::Error| FetchError::Input(format!("cannot read input: {}", e));

    let symbol: String = prompt(reader, writer, "Enter the cryptocurrency pair (e.g., BTCUSDT): ").map_err(stdin_err)?;
    let interval: String = prompt(reader, writer, "Enter the time interval (e.g., 1h, 4h, 1d): ").map_err(stdin_err)?;
    let days_back: String = prompt(reader, writer, "Enter the number of days back to fetch data: ").map_err(stdin_err)?;

    parse_run_request(&symbol, &interval, &days_back)
}


//
// VALIDATION
//

pub fn parse_run_request(symbol: &str, interval: &str, days_back: &str) -> FetchResult<RunRequest> {
    let symbol: &str = symbol.trim();
    if symbol.is_empty() {
        return Err(FetchError::Input("symbol must not be empty".to_string()));
    }

    // Interval codes are left for the exchange to reject
    let interval: &str = interval.trim();
    if interval.is_empty() {
        return Err(FetchError::Input("interval must not be empty".to_string()));
    }

    let days: u32 = days_back
        .trim()
        .parse::<u32>()
        .map_err(|_| FetchError::Input(format!("days back must be a positive integer, got '{}'", days_back.trim())))?;
    if days == 0 {
        return Err(FetchError::Input("days back must be at least 1".to_string()));
    }

    Ok(RunRequest {
        symbol: symbol.to_uppercase(),
        interval: interval.to_string(),
        days_back: days,
    })
}
