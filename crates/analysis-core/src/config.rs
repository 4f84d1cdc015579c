use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Window lengths for the indicator engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_short: usize,
    pub sma_medium: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub band_period: usize,
    /// Standard deviations below the band mean
    pub band_width: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_medium: 50,
            sma_long: 200,
            rsi_period: 14,
            band_period: 20,
            band_width: 2.0,
        }
    }
}

/// RSI cut-offs and the confidence attached to each rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub rsi_overheated: f64,
    pub rsi_extreme: f64,
    pub rsi_bullish_floor: f64,
    pub rsi_oversold: f64,
    pub default_confidence: u8,
    pub panic_confidence: u8,
    pub value_confidence: u8,
    pub bullish_confidence: u8,
    pub overheated_confidence: u8,
    pub liquidate_confidence: u8,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_overheated: 75.0,
            rsi_extreme: 85.0,
            rsi_bullish_floor: 50.0,
            rsi_oversold: 30.0,
            default_confidence: 50,
            panic_confidence: 95,
            value_confidence: 90,
            bullish_confidence: 80,
            overheated_confidence: 85,
            liquidate_confidence: 95,
        }
    }
}

/// Fund-likeness detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub lookback: usize,
    /// Ticker substrings that always count as actively traded
    pub traded_whitelist: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lookback: 10,
            traded_whitelist: ["0050", "2563", "2558", "VOO", "QQQ", "SPY", "IVV", "SOXL", "TQQQ"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Every tunable the analysis pipeline reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub thresholds: SignalThresholds,
    pub classifier: ClassifierConfig,
    /// Shorter histories are rejected before any indicator runs
    pub min_history: usize,
    /// Ticker -> reason, answered without fetching
    pub known_unlisted: BTreeMap<String, String>,
    /// Ticker -> preferred display name
    pub display_names: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let known_unlisted = [("FIG", "Figma is not listed yet")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let display_names = [
            ("0P0000XS79.F", "eMAXIS Slim S&P500"),
            ("2563.T", "iShares S&P500 (JPY hedged)"),
            ("2558.T", "MAXIS S&P500 (unhedged)"),
            ("0050.TW", "Yuanta Taiwan 50 (0050)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            indicators: IndicatorConfig::default(),
            thresholds: SignalThresholds::default(),
            classifier: ClassifierConfig::default(),
            min_history: 5,
            known_unlisted,
            display_names,
        }
    }
}
