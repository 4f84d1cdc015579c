//! sniper: run the signal engine over the configured ticker lists and print a report.
//!
//! Ticker lists come from the environment (a `.env` file is honored):
//!   SNIPER_ETFS        default "VOO, QQQ, 0050.TW, 2563.T, 2558.T"
//!   SNIPER_FAMILY      default "ZETA, NBIS"
//!   SNIPER_WATCHLIST   default "NVDA, TSLA, AAPL, MSFT, PLTR, TSM, JPM"
//!
//! Usage:
//!   cargo run -p sniper-cli
//!   cargo run -p sniper-cli -- --json
//!   cargo run -p sniper-cli -- --config engine.json --concurrency 8

mod report;

use analysis_core::{AssetCategory, EngineConfig};
use analysis_orchestrator::{AnalysisOrchestrator, BatchConfig, BatchRunner, TickerList};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use yahoo_client::YahooClient;

const DEFAULT_ETFS: &str = "VOO, QQQ, 0050.TW, 2563.T, 2558.T";
const DEFAULT_FAMILY: &str = "ZETA, NBIS";
const DEFAULT_WATCHLIST: &str = "NVDA, TSLA, AAPL, MSFT, PLTR, TSM, JPM";
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sniper_cli=info,analysis_orchestrator=info,yahoo_client=warn".into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let as_json = args.iter().any(|a| a == "--json");

    let concurrency: usize = arg_value(&args, "--concurrency")
        .or_else(|| std::env::var("SNIPER_CONCURRENCY").ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CONCURRENCY);

    let fetch_timeout: u64 = std::env::var("SNIPER_FETCH_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

    let engine_config = match arg_value(&args, "--config") {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str::<EngineConfig>(&raw)?
        }
        None => EngineConfig::default(),
    };

    let batch = BatchConfig {
        lists: vec![
            env_list("etf", AssetCategory::FundTracking, "SNIPER_ETFS", DEFAULT_ETFS),
            env_list("family", AssetCategory::Equity, "SNIPER_FAMILY", DEFAULT_FAMILY),
            env_list("watchlist", AssetCategory::Equity, "SNIPER_WATCHLIST", DEFAULT_WATCHLIST),
        ],
        concurrency,
    };

    let orchestrator = AnalysisOrchestrator::new(Arc::new(YahooClient::new()), engine_config)
        .with_fetch_timeout(Duration::from_secs(fetch_timeout));
    let runner = BatchRunner::new(Arc::new(orchestrator));

    let completed = Arc::new(AtomicUsize::new(0));
    let report = runner.run(&batch, Some(Arc::clone(&completed))).await;
    tracing::info!("{} tickers processed", completed.load(Ordering::Relaxed));

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report::to_json(&report))?);
    } else {
        print!("{}", report::render(&report));
    }

    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn env_list(name: &str, category: AssetCategory, var: &str, default: &str) -> TickerList {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    TickerList::parse(name, category, &raw)
}
