use analysis_core::{ClassifierConfig, PriceSeries};

/// Flags instruments whose recent bars carry no intraday range, which is how
/// NAV-priced funds show up in daily data.
#[derive(Debug, Clone, Default)]
pub struct InstrumentClassifier {
    config: ClassifierConfig,
}

impl InstrumentClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn is_whitelisted(&self, ticker: &str) -> bool {
        self.config
            .traded_whitelist
            .iter()
            .any(|token| ticker.contains(token.as_str()))
    }

    /// Uses the last `lookback` bars, or every bar when fewer exist.
    pub fn is_fund_like(&self, ticker: &str, series: &PriceSeries) -> bool {
        if self.is_whitelisted(ticker) {
            return false;
        }
        series
            .tail(self.config.lookback)
            .iter()
            .all(|b| b.high == b.low)
    }
}
