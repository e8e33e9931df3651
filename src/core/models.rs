// @file: kline_downloader/src/core/models.rs
// @description: Data structures shared by the paginator, normalizer and connectors.
// @author: LAS.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use crate::core::errors::{FetchError, FetchResult};


//
// CONSTANTS
//

pub const MS_PER_DAY: i64 = 86_400_000;

// Binance rejects anything above this
pub const MAX_PAGE_LIMIT: u16 = 1000;

pub const KLINE_FIELD_COUNT: usize = 12;

// Positions inside a raw kline array
pub const IDX_OPEN_TIME: usize = 0;
pub const IDX_OPEN: usize = 1;
pub const IDX_HIGH: usize = 2;
pub const IDX_LOW: usize = 3;
pub const IDX_CLOSE: usize = 4;
pub const IDX_VOLUME: usize = 5;
pub const IDX_CLOSE_TIME: usize = 6;
pub const IDX_QUOTE_VOLUME: usize = 7;
pub const IDX_TAKER_BASE: usize = 9;
pub const IDX_TAKER_QUOTE: usize = 10;


//
// EXCHANGE & MARKET TYPES
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketType {
    #[default]
    Spot,
    LinearFuture, // USDT-M
    InverseFuture, // COIN-M
}

impl MarketType {
    pub fn klines_path(&self) -> &'static str {
        match self {
            MarketType::Spot => "/api/v3/klines",
            MarketType::LinearFuture => "/fapi/v1/klines",
            MarketType::InverseFuture => "/dapi/v1/klines",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which columns survive normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// OpenTime plus OHLCV.
    #[default]
    Basic,
    /// Basic plus quote volume and both taker volumes.
    Extended,
}

impl OutputShape {
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            OutputShape::Basic => &["OpenTime", "Open", "High", "Low", "Close", "Volume"],
            OutputShape::Extended => &[
                "OpenTime", "Open", "High", "Low", "Close", "Volume",
                "QuoteVolume", "TakerBase", "TakerQuote",
            ],
        }
    }

    pub fn file_suffix(&self) -> &'static str {
        match self {
            OutputShape::Basic => "data",
            OutputShape::Extended => "data_no_closetime_ignore",
        }
    }
}


//
// REQUEST STRUCTURES
//

/// Validated user input for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub symbol: String,
    pub interval: String,
    pub days_back: u32,
}

/// The full time range one run covers, in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestWindow {
    pub symbol: String,
    pub interval: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl RequestWindow {
    pub fn from_lookback(request: &RunRequest, now_ms: i64) -> FetchResult<Self> {
        let span: i64 = i64::from(request.days_back)
            .checked_mul(MS_PER_DAY)
            .ok_or_else(|| FetchError::Input(format!("lookback of {} days is too large", request.days_back)))?;

        let start_time: i64 = now_ms
            .checked_sub(span)
            .ok_or_else(|| FetchError::Input(format!("lookback of {} days is too large", request.days_back)))?;

        Ok(RequestWindow {
            symbol: request.symbol.to_uppercase(),
            interval: request.interval.clone(),
            start_time,
            end_time: now_ms,
        })
    }
}

/// One page request handed to a `KlineSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineQuery {
    pub symbol: String,
    pub interval: String,
    pub limit: u16,
    pub start_time: i64,
    pub end_time: i64,
}


//
// KLINE STRUCTURES
//

// [ Open Time, Open, High, Low, Close, Volume, Close Time, Quote Volume,
//   Trades, Taker Base, Taker Quote, Ignore ]
pub type RawKline = Vec<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakerVolumes {
    pub quote_volume: f64,
    pub taker_base: f64,
    pub taker_quote: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineRecord {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    // Only populated for OutputShape::Extended
    pub extended: Option<TakerVolumes>,
}


#[cfg(test)]
mod tests {
    use super::*;

    fn request(days_back: u32) -> RunRequest {
        RunRequest {
            symbol: "btcusdt".to_string(),
            interval: "1h".to_string(),
            days_back,
        }
    }

    #[test]
    fn window_spans_lookback_ending_now() {
        let now: i64 = 1_700_000_000_000;
        let window: RequestWindow = RequestWindow::from_lookback(&request(3), now).unwrap();

        assert_eq!(window.symbol, "BTCUSDT");
        assert_eq!(window.end_time, now);
        assert_eq!(window.start_time, now - 3 * MS_PER_DAY);
        assert!(window.start_time <= window.end_time);
    }

    #[test]
    fn window_rejects_lookback_before_epoch_range() {
        let result = RequestWindow::from_lookback(&request(u32::MAX), i64::MIN + 1);
        assert!(matches!(result, Err(FetchError::Input(_))));
    }

    #[test]
    fn market_type_selects_klines_path() {
        assert_eq!(MarketType::Spot.klines_path(), "/api/v3/klines");
        assert_eq!(MarketType::LinearFuture.klines_path(), "/fapi/v1/klines");
        assert_eq!(MarketType::InverseFuture.klines_path(), "/dapi/v1/klines");
    }

    #[test]
    fn extended_headers_extend_basic() {
        let basic = OutputShape::Basic.headers();
        let extended = OutputShape::Extended.headers();
        assert_eq!(&extended[..basic.len()], basic);
        assert_eq!(extended.len(), 9);
    }
}
