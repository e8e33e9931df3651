// @file: kline_downloader/src/connectors/mod.rs
// @description: Exchange connectors implementing KlineSource.
// @author: LAS.

pub mod binance_rest;

pub use binance_rest::BinanceRestClient;
