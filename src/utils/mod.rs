// @file: kline_downloader/src/utils/mod.rs
// @description: Configuration and console input helpers.
// @author: LAS.

pub mod config;
pub mod input;
