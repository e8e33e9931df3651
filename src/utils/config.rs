// @file: kline_downloader/src/utils/config.rs
// @description: Runtime configuration with defaults, optional config file and APP_* overrides.
// @author: LAS.

use serde::Deserialize;
use config::{Config, ConfigError, File, Environment};
use std::path::PathBuf;
use std::time::Duration;
use crate::core::models::{MarketType, OutputShape, MAX_PAGE_LIMIT};

//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // Binance REST Endpoints
    pub market_type: MarketType,
    pub binance_spot_rest_url: String,
    pub binance_linear_future_rest_url: String,
    pub binance_inverse_future_rest_url: String,

    // Pagination Limits
    pub page_limit: u16,
    pub request_timeout_secs: u64, // 0 = transport default
    pub max_pages: usize,

    // Output
    pub output_shape: OutputShape,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: "info".to_string(),
            market_type: MarketType::Spot,
            binance_spot_rest_url: "https://api.binance.com".to_string(),
            binance_linear_future_rest_url: "https://fapi.binance.com".to_string(),
            binance_inverse_future_rest_url: "https://dapi.binance.com".to_string(),
            page_limit: MAX_PAGE_LIMIT,
            request_timeout_secs: 0,
            max_pages: 10_000,
            output_shape: OutputShape::Basic,
            output_dir: PathBuf::from("."),
            preview_rows: 5,
        }
    }
}

impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::with_defaults()?
            // File & Env Overrides
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn rest_base_url(&self) -> &str {
        match self.market_type {
            MarketType::Spot => &self.binance_spot_rest_url,
            MarketType::LinearFuture => &self.binance_linear_future_rest_url,
            MarketType::InverseFuture => &self.binance_inverse_future_rest_url,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    //
    // INTERNAL HELPERS
    //

    fn with_defaults() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let d: AppConfig = AppConfig::default();

        Config::builder()
            .set_default("log_level", d.log_level)?

            // Binance Endpoints
            .set_default("market_type", "SPOT")?
            .set_default("binance_spot_rest_url", d.binance_spot_rest_url)?
            .set_default("binance_linear_future_rest_url", d.binance_linear_future_rest_url)?
            .set_default("binance_inverse_future_rest_url", d.binance_inverse_future_rest_url)?

            // Pagination
            .set_default("page_limit", i64::from(d.page_limit))?
            .set_default("request_timeout_secs", d.request_timeout_secs)?
            .set_default("max_pages", d.max_pages as u64)?

            // Output
            .set_default("output_shape", "basic")?
            .set_default("output_dir", ".")?
            .set_default("preview_rows", d.preview_rows as u64)
    }
}
