// @file: kline_downloader/src/core/paginator.rs
// @description: Walks a request window page by page through a KlineSource.
// @author: LAS.

use log::{debug, info, warn};
use serde_json::Value;
use crate::core::errors::{FetchError, FetchResult};
use crate::core::interfaces::KlineSource;
use crate::core::models::{KlineQuery, RawKline, RequestWindow, IDX_CLOSE_TIME, MAX_PAGE_LIMIT};


//
// PAGINATOR
//

pub struct Paginator<S: KlineSource> {
    source: S,
    page_limit: u16,
    max_pages: usize,
}

impl<S: KlineSource> Paginator<S> {
    pub fn new(source: S, page_limit: u16, max_pages: usize) -> Self {
        Self {
            source,
            page_limit: page_limit.clamp(1, MAX_PAGE_LIMIT),
            max_pages: max_pages.max(1),
        }
    }

    pub fn page_limit(&self) -> u16 {
        self.page_limit
    }

    /// Collects every raw kline in the window, in the order the source returned them.
    ///
    /// Stops on an empty page or a short page. Any source error aborts the walk and
    /// discards what was accumulated so far.
    pub fn fetch_all(&self, window: &RequestWindow) -> FetchResult<Vec<RawKline>> {
        let mut all_rows: Vec<RawKline> = Vec::new();
        let mut start_time: i64 = window.start_time;
        let mut pages: usize = 0;

        loop {
            if pages >= self.max_pages {
                warn!("Giving up on {} {} after {} pages", window.symbol, window.interval, pages);
                return Err(FetchError::StalledPagination(format!(
                    "window not exhausted after {} pages (next startTime {})",
                    pages, start_time
                )));
            }

            // #1. Request Next Page
            let query: KlineQuery = KlineQuery {
                symbol: window.symbol.clone(),
                interval: window.interval.clone(),
                limit: self.page_limit,
                start_time,
                end_time: window.end_time,
            };
            debug!("Requesting {} {} [{} .. {}]", query.symbol, query.interval, query.start_time, query.end_time);

            let batch: Vec<RawKline> = self.source.fetch_klines(&query)?;
            pages += 1;
            info!("Fetched {} entries in this batch.", batch.len());

            if batch.is_empty() {
                break;
            }

            // #2. Advance Window
            // The next page starts at the close time of the last row we received
            let next_start: i64 = match batch.last() {
                Some(row) => close_time_of(row)?,
                None => break,
            };
            let batch_len: usize = batch.len();
            all_rows.extend(batch);

            // #3. Short Page Means We Reached The End
            if batch_len < usize::from(self.page_limit) {
                break;
            }

            if next_start <= start_time {
                warn!("Close time {} did not move past startTime {}", next_start, start_time);
                return Err(FetchError::StalledPagination(format!(
                    "close time {} does not advance past startTime {}",
                    next_start, start_time
                )));
            }
            start_time = next_start;
        }

        Ok(all_rows)
    }
}

fn close_time_of(row: &RawKline) -> FetchResult<i64> {
    match row.get(IDX_CLOSE_TIME) {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            FetchError::MalformedData(format!("close time {} is not an integer", n))
        }),
        Some(other) => Err(FetchError::MalformedData(format!(
            "close time {} is not an integer",
            other
        ))),
        None => Err(FetchError::MalformedData(format!(
            "kline row has {} fields, close time missing",
            row.len()
        ))),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn close_time_reads_index_six() {
        let row: RawKline = vec![
            json!(1), json!("1"), json!("1"), json!("1"), json!("1"), json!("1"),
            json!(1690000060000_i64), json!("1"), json!(1), json!("1"), json!("1"), json!("0"),
        ];
        assert_eq!(close_time_of(&row).unwrap(), 1690000060000);
    }

    #[test]
    fn close_time_rejects_text_and_missing_fields() {
        let text_row: RawKline = vec![json!(0); 6].into_iter().chain([json!("soon")]).collect();
        assert!(matches!(close_time_of(&text_row), Err(FetchError::MalformedData(_))));

        let short_row: RawKline = vec![json!(0); 3];
        assert!(matches!(close_time_of(&short_row), Err(FetchError::MalformedData(_))));
    }

    #[test]
    fn page_limit_is_clamped_to_exchange_cap() {
        struct Never;
        impl KlineSource for Never {
            fn fetch_klines(&self, _: &KlineQuery) -> FetchResult<Vec<RawKline>> {
                Ok(Vec::new())
            }
        }

        assert_eq!(Paginator::new(Never, 5000, 10).page_limit(), MAX_PAGE_LIMIT);
        assert_eq!(Paginator::new(Never, 0, 10).page_limit(), 1);
    }
}
