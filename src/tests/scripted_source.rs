// @file: kline_downloader/src/tests/scripted_source.rs
// @description: In-memory KlineSource that replays canned pages and records every query.
// @author: LAS.

use std::cell::RefCell;
use std::collections::VecDeque;
use serde_json::json;
use crate::core::errors::FetchResult;
use crate::core::interfaces::KlineSource;
use crate::core::models::{KlineQuery, RawKline};


//
// MOCK SOURCE
//

pub struct ScriptedSource {
    pages: RefCell<VecDeque<FetchResult<Vec<RawKline>>>>,
    queries: RefCell<Vec<KlineQuery>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<FetchResult<Vec<RawKline>>>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<KlineQuery> {
        self.queries.borrow().clone()
    }
}

impl KlineSource for ScriptedSource {
    fn fetch_klines(&self, query: &KlineQuery) -> FetchResult<Vec<RawKline>> {
        self.queries.borrow_mut().push(query.clone());
        // Running out of script behaves like the end of history
        self.pages.borrow_mut().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}


//
// ROW BUILDERS
//

pub const ONE_MINUTE_MS: i64 = 60_000;

pub fn kline_row(open_time: i64, close_time: i64) -> RawKline {
    vec![
        json!(open_time), json!("100.5"), json!("101.0"), json!("99.5"), json!("100.8"),
        json!("10.2"), json!(close_time), json!("1020.1"), json!(50), json!("5.1"),
        json!("510.0"), json!("0"),
    ]
}

/// `count` consecutive one-minute klines, the first opening at `first_open`.
pub fn minute_page(first_open: i64, count: usize) -> Vec<RawKline> {
    (0..count as i64)
        .map(|i| {
            let open: i64 = first_open + i * ONE_MINUTE_MS;
            kline_row(open, open + ONE_MINUTE_MS - 1)
        })
        .collect()
}
