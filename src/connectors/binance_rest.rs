// @file: kline_downloader/src/connectors/binance_rest.rs
// @description: Blocking HTTP client for one page of historical klines from Binance.
// @author: LAS.

use config::ConfigError;
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;
use crate::core::errors::{FetchError, FetchResult};
use crate::core::interfaces::KlineSource;
use crate::core::models::{KlineQuery, MarketType, RawKline};
use crate::utils::config::AppConfig;


//
// CLIENT
//

pub struct BinanceRestClient {
    client: Client,
    base_url: String,
    market: MarketType,
}

impl BinanceRestClient {
    pub fn new(config: &AppConfig) -> FetchResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.rest_base_url().trim_end_matches('/').to_string(),
            market: config.market_type,
        })
    }

    /// For tests / custom endpoints.
    pub fn with_base_url(base_url: impl Into<String>, market: MarketType) -> FetchResult<Self> {
        Ok(Self::with_client(Client::builder().build()?, base_url, market))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, market: MarketType) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            market,
        }
    }

    // Format: /api/v3/klines?symbol=BTCUSDT&interval=1h&limit=1000&startTime=..&endTime=..
    pub fn build_url(&self, query: &KlineQuery) -> FetchResult<Url> {
        let endpoint: String = format!("{}{}", self.base_url, self.market.klines_path());
        let limit: String = query.limit.to_string();
        let start_time: String = query.start_time.to_string();
        let end_time: String = query.end_time.to_string();

        Url::parse_with_params(
            &endpoint,
            &[
                ("symbol", query.symbol.to_uppercase().as_str()),
                ("interval", query.interval.as_str()),
                ("limit", limit.as_str()),
                ("startTime", start_time.as_str()),
                ("endTime", end_time.as_str()),
            ],
        )
        .map_err(|e| FetchError::Config(ConfigError::Message(format!("invalid REST endpoint {}: {}", endpoint, e))))
    }
}

impl KlineSource for BinanceRestClient {
    fn fetch_klines(&self, query: &KlineQuery) -> FetchResult<Vec<RawKline>> {
        // #1. Execute Request
        let url: Url = self.build_url(query)?;
        debug!("GET {}", url);
        let response: Response = self.client.get(url).send()?;

        let status: StatusCode = response.status();
        if !status.is_success() {
            let body: String = response.text().unwrap_or_default();
            return Err(FetchError::ExternalService { status: status.as_u16(), body });
        }

        // #2. Parse Response
        // Read the body first so a non-JSON page is reported as bad data, not a transport failure
        let body: String = response.text()?;
        let json: Value = serde_json::from_str(&body).map_err(|e| {
            FetchError::MalformedData(format!("response is not JSON ({}): {}", e, preview_body(&body)))
        })?;
        parse_kline_array(json)
    }
}


//
// INTERNAL HELPERS
//

fn preview_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let mut shown: String = body.chars().take(MAX_CHARS).collect();
    if body.chars().count() > MAX_CHARS {
        shown.push_str("...");
    }
    shown
}

fn parse_kline_array(json: Value) -> FetchResult<Vec<RawKline>> {
    let raw_list: Vec<Value> = match json {
        Value::Array(list) => list,
        other => {
            return Err(FetchError::MalformedData(format!(
                "expected an array of klines, got {}",
                other
            )))
        }
    };

    raw_list
        .into_iter()
        .map(|item| match item {
            Value::Array(fields) => Ok(fields),
            other => Err(FetchError::MalformedData(format!("expected a kline array, got {}", other))),
        })
        .collect()
}
