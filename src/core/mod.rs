// @file: kline_downloader/src/core/mod.rs
// @description: Exports domain logic and data structures.
// @author: LAS.

pub mod models;
pub mod errors;
pub mod interfaces;
pub mod paginator;
pub mod normalizer;
pub mod engine;
