// @file: kline_downloader/src/main.rs
// @description: Interactive entry point: prompt, download, export, report.
// @author: LAS.

use chrono::Utc;
use kline_downloader::connectors::BinanceRestClient;
use kline_downloader::core::engine::{run_pipeline, RunReport};
use kline_downloader::core::errors::FetchResult;
use kline_downloader::core::models::RunRequest;
use kline_downloader::core::normalizer::render_preview;
use kline_downloader::utils::config::AppConfig;
use kline_downloader::utils::input::read_run_request;
use log::{error, info};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    // 1. Environment & Config
    dotenv::dotenv().ok();
    let config: AppConfig = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
            error!("Failed to load configuration: {}", e);
            println!("Error: configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 2. Initialize Logger, RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    // 3. Run
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run aborted: {}", e);
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> FetchResult<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut stdout = io::stdout();
    let request: RunRequest = read_run_request(&mut reader, &mut stdout)?;

    info!(">>> Downloading {} {} ({} market) <<<", request.symbol, request.interval, config.market_type);

    let client: BinanceRestClient = BinanceRestClient::new(config)?;
    let report: RunReport = run_pipeline(client, &request, config, Utc::now().timestamp_millis())?;

    println!(
        "Fetched {} rows of data for {} ({}).",
        report.records.len(),
        request.symbol,
        request.interval
    );
    println!("{}", render_preview(&report.records, report.shape, config.preview_rows));
    println!("Data successfully exported to {}.", report.path.display());

    Ok(())
}
