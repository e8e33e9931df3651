// @file: kline_downloader/src/tests/mod.rs
// @description: Scenario tests driving the pipeline through scripted and stubbed sources.
// @author: LAS.

mod scripted_source;
