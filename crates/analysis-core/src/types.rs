use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Chronological bar history for one ticker.
///
/// Dates are strictly increasing; construction rejects anything else so the
/// indicator code can index by position without re-checking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, AnalysisError> {
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalysisError::InvalidData(format!(
                "bar dated {} does not follow {}",
                w[1].date, w[0].date
            )));
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// The most recent `n` bars, or all of them when fewer exist.
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

/// Company metrics as reported by the data provider. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub resolved_name: Option<String>,
    pub forward_pe: Option<f64>,
    /// Fraction, e.g. 0.12 for 12%
    pub revenue_growth: Option<f64>,
    /// Fraction, e.g. 0.65 for 65%
    pub institutional_holding: Option<f64>,
    pub news_headline: Option<String>,
}

/// Caller-assigned instrument category, chosen per ticker list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    Equity,
    FundTracking,
}

/// Display currency derived from the ticker's exchange suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencySymbol {
    Yen,
    NewTaiwanDollar,
    UsDollar,
}

impl CurrencySymbol {
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencySymbol::Yen => "¥",
            CurrencySymbol::NewTaiwanDollar => "NT$",
            CurrencySymbol::UsDollar => "$",
        }
    }
}

/// Indicator values aligned with the bars they were computed from.
///
/// `None` entries mark warm-up positions where a window is not yet full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    /// Absent entirely when history is too short for the long average
    pub sma200: Option<Vec<Option<f64>>>,
    pub rsi14: Vec<Option<f64>>,
    /// Absent entirely when history is too short for the band
    pub bollinger_lower: Option<Vec<Option<f64>>>,
}

impl IndicatorSet {
    pub fn latest_sma20(&self) -> Option<f64> {
        latest(&self.sma20)
    }

    pub fn latest_sma50(&self) -> Option<f64> {
        latest(&self.sma50)
    }

    pub fn latest_sma200(&self) -> Option<f64> {
        self.sma200.as_deref().and_then(latest)
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        latest(&self.rsi14)
    }

    pub fn latest_bollinger_lower(&self) -> Option<f64> {
        self.bollinger_lower.as_deref().and_then(latest)
    }
}

fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Severity attached to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Neutral,
    Info,
    Warning,
    Critical,
    Positive,
}

impl Severity {
    /// Dashboard color name
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Neutral => "gray",
            Severity::Info => "blue",
            Severity::Warning => "orange",
            Severity::Critical => "red",
            Severity::Positive => "green",
        }
    }
}

/// Which moving average a trend break was measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendReference {
    Sma20,
    Sma50,
}

impl TrendReference {
    pub fn for_category(category: AssetCategory) -> Self {
        match category {
            AssetCategory::Equity => TrendReference::Sma20,
            AssetCategory::FundTracking => TrendReference::Sma50,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            TrendReference::Sma20 => "20-day average",
            TrendReference::Sma50 => "50-day average",
        }
    }
}

/// Discrete recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalAction {
    WatchHold,
    PanicBottom,
    ValueBuy,
    BullishHold,
    Overheated,
    Liquidate,
    TrendBreak(TrendReference),
}

impl SignalAction {
    pub fn to_label(&self) -> &'static str {
        match self {
            SignalAction::WatchHold => "Watch/Hold",
            SignalAction::PanicBottom => "Panic-bottom: strong buy",
            SignalAction::ValueBuy => "Value buy at long-term reference",
            SignalAction::BullishHold => "Bullish strength: hold",
            SignalAction::Overheated => "Overheated: take-profit warning",
            SignalAction::Liquidate => "Extreme danger: liquidate",
            SignalAction::TrendBreak(_) => "Broke below trend reference: caution",
        }
    }
}

/// Final output of the signal rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub action: SignalAction,
    pub severity: Severity,
    /// 0 to 100
    pub confidence: u8,
}

/// Coarse RSI reading used alongside the action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Extreme,
    Overheated,
    Neutral,
    Oversold,
}

/// Rounded fundamentals as presented next to a signal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSummary {
    /// One decimal
    pub forward_pe: Option<f64>,
    /// Percent, one decimal
    pub revenue_growth_pct: Option<f64>,
    /// Percent, one decimal
    pub institutional_holding_pct: Option<f64>,
    pub news_headline: Option<String>,
}

/// Full analysis of one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ticker: String,
    pub resolved_name: String,
    pub category: AssetCategory,
    pub currency: CurrencySymbol,
    pub as_of: NaiveDate,
    pub last_close: f64,
    pub prev_close: f64,
    pub change_pct: f64,
    pub action: SignalAction,
    pub confidence: u8,
    pub severity: Severity,
    /// 200-day average; `None` when history is too short
    pub golden_price: Option<f64>,
    /// Lower Bollinger band
    pub panic_price: f64,
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub fundamentals: FundamentalsSummary,
    pub is_fund_like: bool,
    pub indicators: IndicatorSet,
}

impl AnalysisResult {
    /// Rows a reader should look at first: any buy, warning or danger call,
    /// or a high-confidence read.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self.severity,
            Severity::Positive | Severity::Warning | Severity::Critical
        ) || self.confidence >= 80
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let result = PriceSeries::new(vec![bar(1, 1.0), bar(1, 2.0)]);
        assert!(matches!(result, Err(AnalysisError::InvalidData(_))));
    }

    #[test]
    fn test_series_rejects_decreasing_dates() {
        let result = PriceSeries::new(vec![bar(3, 1.0), bar(2, 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_tail_shorter_than_requested() {
        let series = PriceSeries::new(vec![bar(1, 1.0), bar(2, 2.0), bar(3, 3.0)]).unwrap();
        assert_eq!(series.tail(10).len(), 3);
        assert_eq!(series.tail(2)[0].close, 2.0);
    }

    #[test]
    fn test_latest_skips_nothing_when_last_is_none() {
        let set = IndicatorSet {
            sma20: vec![Some(1.0), None],
            sma50: vec![],
            sma200: None,
            rsi14: vec![Some(40.0)],
            bollinger_lower: Some(vec![None, Some(9.5)]),
        };
        assert_eq!(set.latest_sma20(), None);
        assert_eq!(set.latest_sma50(), None);
        assert_eq!(set.latest_sma200(), None);
        assert_eq!(set.latest_rsi(), Some(40.0));
        assert_eq!(set.latest_bollinger_lower(), Some(9.5));
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Positive.color(), "green");
        assert_eq!(Severity::Critical.color(), "red");
        assert_eq!(Severity::Neutral.color(), "gray");
    }
}
