use analysis_core::{
    AssetCategory, RsiZone, Severity, Signal, SignalAction, SignalThresholds, TrendReference,
};

/// Latest and previous value of a moving average
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AveragePair {
    pub latest: Option<f64>,
    pub previous: Option<f64>,
}

impl AveragePair {
    pub fn from_series(series: &[Option<f64>]) -> Self {
        let n = series.len();
        Self {
            latest: n.checked_sub(1).and_then(|i| series[i]),
            previous: n.checked_sub(2).and_then(|i| series[i]),
        }
    }
}

/// Everything the signal rules read for one ticker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInputs {
    pub last_close: f64,
    pub prev_close: f64,
    pub sma20: AveragePair,
    pub sma50: AveragePair,
    pub rsi: f64,
    pub panic_price: f64,
    /// Long-term reference; 0 when unavailable
    pub golden_price: f64,
    pub category: AssetCategory,
}

/// Replacement produced by one rule block.
///
/// `confidence: None` keeps whatever confidence an earlier block set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalOverride {
    pub action: SignalAction,
    pub severity: Severity,
    pub confidence: Option<u8>,
}

impl SignalOverride {
    fn apply(self, current: Signal) -> Signal {
        Signal {
            action: self.action,
            severity: self.severity,
            confidence: self.confidence.unwrap_or(current.confidence),
        }
    }
}

/// Ordered rule evaluation producing one action per ticker.
///
/// Three independent blocks each propose an optional override; they are
/// folded in order so a later block wins. A trend break never replaces a
/// liquidate call.
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    thresholds: SignalThresholds,
}

impl SignalEngine {
    pub fn new(thresholds: SignalThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &SignalThresholds {
        &self.thresholds
    }

    pub fn derive(&self, inputs: &SignalInputs) -> Signal {
        let initial = Signal {
            action: SignalAction::WatchHold,
            severity: Severity::Neutral,
            confidence: self.thresholds.default_confidence,
        };

        let signal = [self.entry_block(inputs), self.overheat_block(inputs)]
            .into_iter()
            .flatten()
            .fold(initial, |current, o| o.apply(current));

        match self.trend_break_block(inputs) {
            Some(o) if signal.action != SignalAction::Liquidate => o.apply(signal),
            _ => signal,
        }
    }

    /// Block 1: panic floor, then value floor, then bullish continuation.
    pub fn entry_block(&self, i: &SignalInputs) -> Option<SignalOverride> {
        let t = &self.thresholds;

        if i.last_close <= i.panic_price {
            return Some(SignalOverride {
                action: SignalAction::PanicBottom,
                severity: Severity::Positive,
                confidence: Some(t.panic_confidence),
            });
        }

        if i.golden_price > 0.0 && i.last_close <= i.golden_price {
            return Some(SignalOverride {
                action: SignalAction::ValueBuy,
                severity: Severity::Positive,
                confidence: Some(t.value_confidence),
            });
        }

        let sma50 = i.sma50.latest?;
        let floor = i.golden_price.max(0.0);
        if i.last_close > sma50
            && sma50 > floor
            && i.rsi > t.rsi_bullish_floor
            && i.rsi < t.rsi_overheated
        {
            return Some(SignalOverride {
                action: SignalAction::BullishHold,
                severity: Severity::Info,
                confidence: Some(t.bullish_confidence),
            });
        }

        None
    }

    /// Block 2: RSI overheating. The extreme rule is checked last so it wins.
    pub fn overheat_block(&self, i: &SignalInputs) -> Option<SignalOverride> {
        let t = &self.thresholds;
        let overheated = (i.rsi > t.rsi_overheated).then_some(SignalOverride {
            action: SignalAction::Overheated,
            severity: Severity::Warning,
            confidence: Some(t.overheated_confidence),
        });
        let extreme = (i.rsi > t.rsi_extreme).then_some(SignalOverride {
            action: SignalAction::Liquidate,
            severity: Severity::Critical,
            confidence: Some(t.liquidate_confidence),
        });
        extreme.or(overheated)
    }

    /// Block 3: fresh close below the category's trend average.
    pub fn trend_break_block(&self, i: &SignalInputs) -> Option<SignalOverride> {
        let reference = TrendReference::for_category(i.category);
        let pair = match reference {
            TrendReference::Sma20 => i.sma20,
            TrendReference::Sma50 => i.sma50,
        };
        let (latest, previous) = (pair.latest?, pair.previous?);

        (i.last_close < latest && i.prev_close > previous).then_some(SignalOverride {
            action: SignalAction::TrendBreak(reference),
            severity: Severity::Warning,
            confidence: None,
        })
    }

    pub fn rsi_zone(&self, rsi: f64) -> RsiZone {
        let t = &self.thresholds;
        if rsi > t.rsi_extreme {
            RsiZone::Extreme
        } else if rsi > t.rsi_overheated {
            RsiZone::Overheated
        } else if rsi < t.rsi_oversold {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}
