use analysis_core::{
    AnalysisError, AnalysisResult, AssetCategory, EngineConfig, ErrorResult, FetchError,
    Fundamentals, FundamentalsSummary, MarketDataProvider, PriceSeries,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use technical_analysis::{
    resolve_currency, AveragePair, IndicatorEngine, InstrumentClassifier, SignalEngine,
    SignalInputs, NEUTRAL_RSI,
};

pub mod batch;
pub use batch::{BatchConfig, BatchReport, BatchRunner, ListReport, TickerList};

/// Outcome of analysing one ticker
pub type TickerOutcome = Result<AnalysisResult, ErrorResult>;

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

const DEFAULT_CACHE_TTL_SECS: i64 = 300; // 5 minutes
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

pub struct AnalysisOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
    config: EngineConfig,
    classifier: InstrumentClassifier,
    indicator_engine: IndicatorEngine,
    signal_engine: SignalEngine,
    fetch_timeout: Duration,
    /// Price history per ticker, so a ticker listed twice is fetched once
    history_cache: DashMap<String, CacheEntry<PriceSeries>>,
    cache_ttl_secs: i64,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: EngineConfig) -> Self {
        Self {
            provider,
            classifier: InstrumentClassifier::new(config.classifier.clone()),
            indicator_engine: IndicatorEngine::new(config.indicators.clone()),
            signal_engine: SignalEngine::new(config.thresholds.clone()),
            config,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            history_cache: DashMap::new(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }

    /// Upper bound on each provider call
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Zero disables the history cache
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs() as i64;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch and analyse one ticker. Never fails outright: every path ends in
    /// a result or a typed error outcome.
    pub async fn analyze(&self, ticker: &str, category: AssetCategory) -> TickerOutcome {
        tracing::debug!("Analyzing {} as {:?}", ticker, category);

        let outcome = self.fetch_and_analyze(ticker, category).await;
        if let Err(e) = &outcome {
            tracing::warn!("{} skipped ({:?}): {}", ticker, e.kind, e.message);
        }
        outcome
    }

    async fn fetch_and_analyze(&self, ticker: &str, category: AssetCategory) -> TickerOutcome {
        let fail = |e: AnalysisError| ErrorResult::from_error(ticker, e);

        self.check_listed(ticker).map_err(fail)?;

        let (history, fundamentals) =
            tokio::join!(self.get_history(ticker), self.get_fundamentals(ticker));
        let series = history.map_err(|e| fail(e.into()))?;

        self.analyze_snapshot(ticker, category, &series, &fundamentals)
            .map_err(fail)
    }

    /// Pure analysis of already-fetched inputs.
    pub fn analyze_snapshot(
        &self,
        ticker: &str,
        category: AssetCategory,
        series: &PriceSeries,
        fundamentals: &Fundamentals,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.check_listed(ticker)?;

        let min_history = self.config.min_history.max(2);
        if series.len() < min_history {
            return Err(AnalysisError::InsufficientHistory(format!(
                "{} bars, need at least {}",
                series.len(),
                min_history
            )));
        }

        let is_fund_like = self.classifier.is_fund_like(ticker, series);
        let indicators = self.indicator_engine.compute(series);

        let panic_price = indicators.latest_bollinger_lower().ok_or_else(|| {
            AnalysisError::InsufficientHistory(format!(
                "{} bars, Bollinger band needs {}",
                series.len(),
                self.indicator_engine.config().band_period
            ))
        })?;

        let bars = series.bars();
        let last = &bars[bars.len() - 1];
        let prev = &bars[bars.len() - 2];

        let golden_price = indicators.latest_sma200();
        let rsi = indicators.latest_rsi().unwrap_or(NEUTRAL_RSI);

        let signal = self.signal_engine.derive(&SignalInputs {
            last_close: last.close,
            prev_close: prev.close,
            sma20: AveragePair::from_series(&indicators.sma20),
            sma50: AveragePair::from_series(&indicators.sma50),
            rsi,
            panic_price,
            golden_price: golden_price.unwrap_or(0.0),
            category,
        });

        let change_pct = if prev.close != 0.0 {
            (last.close - prev.close) / prev.close * 100.0
        } else {
            0.0
        };

        Ok(AnalysisResult {
            ticker: ticker.to_string(),
            resolved_name: self.resolve_name(ticker, fundamentals),
            category,
            currency: resolve_currency(ticker),
            as_of: last.date,
            last_close: round_to(last.close, 2),
            prev_close: round_to(prev.close, 2),
            change_pct: round_to(change_pct, 2),
            action: signal.action,
            confidence: signal.confidence,
            severity: signal.severity,
            golden_price: golden_price.filter(|g| *g > 0.0).map(|g| round_to(g, 2)),
            panic_price: round_to(panic_price, 2),
            rsi: round_to(rsi, 2),
            rsi_zone: self.signal_engine.rsi_zone(rsi),
            fundamentals: summarize_fundamentals(fundamentals, category),
            is_fund_like,
            indicators,
        })
    }

    fn check_listed(&self, ticker: &str) -> Result<(), AnalysisError> {
        match self.config.known_unlisted.get(ticker) {
            Some(reason) => Err(AnalysisError::KnownUnlisted(reason.clone())),
            None => Ok(()),
        }
    }

    /// Configured display name, then the provider's name, then the ticker.
    fn resolve_name(&self, ticker: &str, fundamentals: &Fundamentals) -> String {
        self.config
            .display_names
            .get(ticker)
            .or(fundamentals.resolved_name.as_ref())
            .cloned()
            .unwrap_or_else(|| ticker.to_string())
    }

    /// Get price history for a ticker (cached, TTL from `with_cache_ttl`)
    async fn get_history(&self, ticker: &str) -> Result<PriceSeries, FetchError> {
        if let Some(entry) = self.history_cache.get(ticker) {
            if self.is_fresh(&entry) {
                return Ok(entry.data.clone());
            }
        }

        let series = tokio::time::timeout(self.fetch_timeout, self.provider.fetch_history(ticker))
            .await
            .map_err(|_| {
                FetchError::Timeout(format!("history fetch exceeded {:?}", self.fetch_timeout))
            })??;

        if self.cache_ttl_secs > 0 {
            // drop expired entries before adding
            self.history_cache.retain(|_, entry| self.is_fresh(entry));
            self.history_cache.insert(ticker.to_string(), CacheEntry {
                data: series.clone(),
                cached_at: Utc::now(),
            });
        }

        Ok(series)
    }

    fn is_fresh(&self, entry: &CacheEntry<PriceSeries>) -> bool {
        (Utc::now() - entry.cached_at).num_seconds() < self.cache_ttl_secs
    }

    /// Fundamentals are optional: any failure degrades to empty fields.
    async fn get_fundamentals(&self, ticker: &str) -> Fundamentals {
        let fetched =
            tokio::time::timeout(self.fetch_timeout, self.provider.fetch_fundamentals(ticker)).await;

        match fetched {
            Ok(Ok(f)) => f,
            Ok(Err(e)) => {
                tracing::warn!("Fundamentals unavailable for {}: {}", ticker, e);
                Fundamentals::default()
            }
            Err(_) => {
                tracing::warn!("Fundamentals fetch for {} timed out", ticker);
                Fundamentals::default()
            }
        }
    }
}

/// Equity metrics are only meaningful for `Equity`; the headline is kept for both.
fn summarize_fundamentals(f: &Fundamentals, category: AssetCategory) -> FundamentalsSummary {
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    let news_headline = f.news_headline.clone();

    match category {
        AssetCategory::Equity => FundamentalsSummary {
            forward_pe: finite(f.forward_pe).map(|pe| round_to(pe, 1)),
            revenue_growth_pct: finite(f.revenue_growth).map(|g| round_to(g * 100.0, 1)),
            institutional_holding_pct: finite(f.institutional_holding)
                .map(|h| round_to(h * 100.0, 1)),
            news_headline,
        },
        AssetCategory::FundTracking => FundamentalsSummary {
            news_headline,
            ..FundamentalsSummary::default()
        },
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
