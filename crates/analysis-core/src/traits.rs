use async_trait::async_trait;
use crate::{FetchError, Fundamentals, PriceSeries};

/// Source of price history and company metrics.
///
/// The two calls are separate so a fundamentals failure can be absorbed
/// without losing the price history.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Roughly two years of daily, unadjusted bars, oldest first.
    async fn fetch_history(&self, ticker: &str) -> Result<PriceSeries, FetchError>;

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, FetchError>;
}
