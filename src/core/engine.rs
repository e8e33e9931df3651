// @file: kline_downloader/src/core/engine.rs
// @description: Runs one download: window -> paginator -> normalizer -> CSV file.
// @author: LAS.

use log::info;
use std::path::PathBuf;
use crate::core::errors::FetchResult;
use crate::core::interfaces::KlineSource;
use crate::core::models::{KlineRecord, OutputShape, RawKline, RequestWindow, RunRequest};
use crate::core::normalizer::{normalize, output_file_name, write_csv};
use crate::core::paginator::Paginator;
use crate::utils::config::AppConfig;


//
// TYPE DEFINITIONS
//

#[derive(Debug)]
pub struct RunReport {
    pub path: PathBuf,
    pub shape: OutputShape,
    pub records: Vec<KlineRecord>,
}


//
// PIPELINE ENTRY POINT
//

/// Fetches, normalizes and exports one symbol/interval.
///
/// The output file is only touched after every page has been fetched and parsed.
pub fn run_pipeline<S: KlineSource>(
    source: S,
    request: &RunRequest,
    config: &AppConfig,
    now_ms: i64,
) -> FetchResult<RunReport> {
    // #1. Resolve Window
    let window: RequestWindow = RequestWindow::from_lookback(request, now_ms)?;
    info!(
        "Fetching {} {} from {} to {} ({} days)",
        window.symbol, window.interval, window.start_time, window.end_time, request.days_back
    );

    // #2. Paginate
    let paginator: Paginator<S> = Paginator::new(source, config.page_limit, config.max_pages);
    let raw: Vec<RawKline> = paginator.fetch_all(&window)?;

    // #3. Normalize
    let shape: OutputShape = config.output_shape;
    let records: Vec<KlineRecord> = normalize(&raw, shape)?;
    drop(raw);

    // #4. Export
    let path: PathBuf = config
        .output_dir
        .join(output_file_name(&window.symbol, &window.interval, shape));
    write_csv(&records, shape, &path)?;
    info!("Wrote {} rows to {}", records.len(), path.display());

    Ok(RunReport { path, shape, records })
}
