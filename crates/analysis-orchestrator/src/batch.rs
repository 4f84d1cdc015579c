use super::{AnalysisOrchestrator, TickerOutcome};
use analysis_core::{AnalysisError, AnalysisResult, AssetCategory, ErrorResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A named group of tickers sharing one asset category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerList {
    pub name: String,
    pub category: AssetCategory,
    pub tickers: Vec<String>,
}

impl TickerList {
    /// Parse a comma-separated list; entries are trimmed and upper-cased, blanks dropped.
    pub fn parse(name: &str, category: AssetCategory, raw: &str) -> Self {
        let tickers = raw
            .split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            name: name.to_string(),
            category,
            tickers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub lists: Vec<TickerList>,
    /// Maximum tickers in flight at once
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            concurrency: 4,
        }
    }
}

/// Outcomes for one list, in the list's ticker order
#[derive(Debug, Clone)]
pub struct ListReport {
    pub name: String,
    pub category: AssetCategory,
    pub outcomes: Vec<TickerOutcome>,
}

impl ListReport {
    pub fn successes(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ErrorResult> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// Successful results, hottest RSI first
    pub fn sorted_by_rsi(&self) -> Vec<&AnalysisResult> {
        let mut results: Vec<&AnalysisResult> = self.successes().collect();
        results.sort_by(|a, b| {
            b.rsi
                .partial_cmp(&a.rsi)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub lists: Vec<ListReport>,
    pub total: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn list(&self, name: &str) -> Option<&ListReport> {
        self.lists.iter().find(|l| l.name == name)
    }
}

/// Fans a batch of tickers out over a bounded set of tasks.
///
/// Tickers share nothing; one ticker's failure becomes its own `ErrorResult`
/// and never affects its siblings.
pub struct BatchRunner {
    orchestrator: Arc<AnalysisOrchestrator>,
}

impl BatchRunner {
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// `progress`, when given, is incremented once per finished ticker.
    pub async fn run(&self, config: &BatchConfig, progress: Option<Arc<AtomicUsize>>) -> BatchReport {
        let total: usize = config.lists.iter().map(|l| l.tickers.len()).sum();
        tracing::info!(
            "Starting batch of {} tickers across {} lists (concurrency {})",
            total,
            config.lists.len(),
            config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (li, list) in config.lists.iter().enumerate() {
            for (ti, ticker) in list.tickers.iter().enumerate() {
                let orchestrator = Arc::clone(&self.orchestrator);
                let semaphore = Arc::clone(&semaphore);
                let progress = progress.clone();
                let ticker = ticker.clone();
                let category = list.category;

                tasks.spawn(async move {
                    let outcome = match semaphore.acquire_owned().await {
                        Ok(_permit) => orchestrator.analyze(&ticker, category).await,
                        Err(e) => Err(ErrorResult::from_error(
                            &ticker,
                            AnalysisError::DataUnavailable(e.to_string()),
                        )),
                    };
                    if let Some(counter) = &progress {
                        counter.fetch_add(1, Ordering::Relaxed);
                    }
                    (li, ti, outcome)
                });
            }
        }

        let mut slots: Vec<Vec<Option<TickerOutcome>>> = config
            .lists
            .iter()
            .map(|l| vec![None; l.tickers.len()])
            .collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((li, ti, outcome)) => slots[li][ti] = Some(outcome),
                Err(e) => tracing::error!("Task error: {}", e),
            }
        }

        let lists: Vec<ListReport> = config
            .lists
            .iter()
            .zip(slots)
            .map(|(list, slots)| ListReport {
                name: list.name.clone(),
                category: list.category,
                outcomes: list
                    .tickers
                    .iter()
                    .zip(slots)
                    .map(|(ticker, slot)| {
                        slot.unwrap_or_else(|| {
                            Err(ErrorResult::from_error(
                                ticker,
                                AnalysisError::DataUnavailable("analysis task aborted".to_string()),
                            ))
                        })
                    })
                    .collect(),
            })
            .collect();

        let failed = lists.iter().map(|l| l.failures().count()).sum();

        tracing::info!(
            "Batch complete: {}/{} tickers analyzed, {} failed",
            total - failed,
            total,
            failed
        );

        BatchReport {
            lists,
            total,
            failed,
        }
    }
}
