use analysis_core::{IndicatorConfig, IndicatorSet, PriceSeries};

/// Neutral RSI reported when history is too short to measure momentum
pub const NEUTRAL_RSI: f64 = 50.0;

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Relative Strength Index over exponentially smoothed gains and losses.
///
/// Both averages use `alpha = 1 / period` with no bias adjustment and start
/// from zero at the first bar, which has no change. The first value sits at
/// `data[period - 1]`, so the output is `data.len() - period + 1` long. A
/// window with no losses reads 100, including one with no movement at all.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut rsi_values = Vec::with_capacity(data.len() - period + 1);

    for i in 0..data.len() {
        let change = if i == 0 { 0.0 } else { data[i] - data[i - 1] };
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
        avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;

        if i + 1 >= period {
            rsi_values.push(rsi_from_averages(avg_gain, avg_loss));
        }
    }

    rsi_values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Bollinger Bands
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Bands at `std_dev` population standard deviations around an SMA.
pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    if period == 0 || data.len() < period {
        return BollingerBands { upper: vec![], middle: vec![], lower: vec![] };
    }

    let middle = sma(data, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for i in period - 1..data.len() {
        let slice = &data[i + 1 - period..=i];
        let mean = middle[i + 1 - period];
        let variance: f64 = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();

        upper.push(mean + std_dev * std);
        lower.push(mean - std_dev * std);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Right-align a warm-up-trimmed indicator with its `len` source bars.
pub fn align(values: Vec<f64>, len: usize) -> Vec<Option<f64>> {
    let pad = len.saturating_sub(values.len());
    std::iter::repeat(None)
        .take(pad)
        .chain(values.into_iter().map(Some))
        .collect()
}

/// Computes the indicator set the signal rules read.
///
/// Short histories degrade instead of failing: the short and medium averages
/// fall back to the raw close, RSI to a constant neutral reading, and the long
/// average and the band are left out.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn compute(&self, series: &PriceSeries) -> IndicatorSet {
        let closes = series.closes();
        let n = closes.len();
        let cfg = &self.config;

        let sma_or_close = |period: usize| {
            if n > period {
                align(sma(&closes, period), n)
            } else {
                closes.iter().copied().map(Some).collect()
            }
        };

        let sma20 = sma_or_close(cfg.sma_short);
        let sma50 = sma_or_close(cfg.sma_medium);

        let sma200 = (n > cfg.sma_long).then(|| align(sma(&closes, cfg.sma_long), n));

        let rsi14 = if n > cfg.rsi_period {
            align(rsi(&closes, cfg.rsi_period), n)
        } else {
            vec![Some(NEUTRAL_RSI); n]
        };

        let bollinger_lower = (cfg.band_period > 0 && n >= cfg.band_period).then(|| {
            align(bollinger_bands(&closes, cfg.band_period, cfg.band_width).lower, n)
        });

        IndicatorSet {
            sma20,
            sma50,
            sma200,
            rsi14,
            bollinger_lower,
        }
    }
}
