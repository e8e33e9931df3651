// @file: kline_downloader/src/core/interfaces.rs
// @description: Capability trait the paginator pulls pages through.
// @author: LAS.

use crate::core::errors::FetchResult;
use crate::core::models::{KlineQuery, RawKline};


//
// TRAIT DEFINITIONS
//

pub trait KlineSource {
    /// Fetch at most `query.limit` raw klines inside `[start_time, end_time]`.
    ///
    /// Implementations must not retry: a failed page ends the whole run.
    fn fetch_klines(&self, query: &KlineQuery) -> FetchResult<Vec<RawKline>>;
}

impl<S: KlineSource + ?Sized> KlineSource for &S {
    fn fetch_klines(&self, query: &KlineQuery) -> FetchResult<Vec<RawKline>> {
        (**self).fetch_klines(query)
    }
}
