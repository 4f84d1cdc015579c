use analysis_core::{FetchError, Fundamentals, MarketDataProvider, PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::header::REFERER;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const REFERER_URL: &str = "https://finance.yahoo.com/";
const SUMMARY_MODULES: &str = "price,financialData,defaultKeyStatistics";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";
const DEFAULT_RATE_LIMIT: usize = 60;

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let sleep_dur = match ts.front() {
                Some(&oldest) => self.window.saturating_sub(now.duration_since(oldest)),
                None => Duration::ZERO,
            } + Duration::from_millis(50);
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for Yahoo slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Market data from the public Yahoo Finance endpoints.
///
/// quoteSummary needs a session cookie plus a matching crumb. Both are fetched
/// on first use and kept until Yahoo rejects them with a 401.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: Arc<Mutex<Option<String>>>,
    rate_limiter: RateLimiter,
}

impl YahooClient {
    /// Requests per minute come from `YAHOO_RATE_LIMIT` (default 60).
    pub fn new() -> Self {
        let rate_limit: usize = std::env::var("YAHOO_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT);
        Self::with_rate_limit(rate_limit)
    }

    pub fn with_rate_limit(requests_per_minute: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: BASE_URL.to_string(),
            cookie_url: COOKIE_URL.to_string(),
            crumb: Arc::new(Mutex::new(None)),
            rate_limiter: RateLimiter::new(requests_per_minute, Duration::from_secs(60)),
        }
    }

    /// Point the client at other hosts (API base and session-cookie page).
    pub fn with_endpoints(mut self, base_url: impl Into<String>, cookie_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.cookie_url = cookie_url.into();
        self
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(
        &self,
        ticker: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, FetchError> {
        let request = builder.build().map_err(|e| FetchError::Http(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| FetchError::Http("Cannot clone request".to_string()))?;
            let response = self.client.execute(req_clone).await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(format!("{}: {}", ticker, e))
                } else {
                    FetchError::Http(e.to_string())
                }
            })?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    let wait_secs = 5u64 * (attempt as u64 + 1);
                    tracing::warn!("Yahoo 429 rate limited, waiting {}s before retry {}/3", wait_secs, attempt + 1);
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                }
                StatusCode::NOT_FOUND => return Err(FetchError::NotFound(ticker.to_string())),
                StatusCode::UNAUTHORIZED => {
                    return Err(FetchError::Unauthorized(format!(
                        "{}: {}",
                        ticker,
                        response.text().await.unwrap_or_default()
                    )));
                }
                s if !s.is_success() => {
                    return Err(FetchError::Http(format!(
                        "HTTP {}: {}",
                        s,
                        response.text().await.unwrap_or_default()
                    )));
                }
                _ => return Ok(response),
            }
        }

        Err(FetchError::RateLimited(format!("{} after 3 retries", ticker)))
    }

    /// Two years of daily, unadjusted bars
    pub async fn get_chart(&self, ticker: &str) -> Result<PriceSeries, FetchError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self
            .send_request(
                ticker,
                self.client
                    .get(&url)
                    .query(&[("range", "2y"), ("interval", "1d"), ("includeAdjustedClose", "false")]),
            )
            .await?;

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        parse_chart(ticker, chart)
    }

    /// Crumb paired with the session cookie, fetched once and then reused.
    async fn crumb(&self) -> Result<String, FetchError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie host answers 404 but still sets the session cookie
        self.rate_limiter.acquire().await;
        self.client
            .get(&self.cookie_url)
            .header(REFERER, REFERER_URL)
            .send()
            .await
            .map_err(|e| FetchError::Http(format!("session cookie: {}", e)))?;

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let body = self
            .send_request("crumb", self.client.get(&url).header(REFERER, REFERER_URL))
            .await?
            .text()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let crumb = parse_crumb(&body).ok_or_else(|| {
            FetchError::Unauthorized(format!(
                "unusable crumb: {}",
                body.chars().take(60).collect::<String>()
            ))
        })?;
        tracing::debug!("Obtained Yahoo crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    async fn summary_request(&self, ticker: &str) -> Result<reqwest::Response, FetchError> {
        let crumb = self.crumb().await?;
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, ticker);

        self.send_request(
            ticker,
            self.client
                .get(&url)
                .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())]),
        )
        .await
    }

    /// Name, forward P/E, revenue growth and institutional holding.
    ///
    /// A rejected crumb is refreshed once before giving up.
    pub async fn get_quote_summary(&self, ticker: &str) -> Result<Fundamentals, FetchError> {
        let response = match self.summary_request(ticker).await {
            Err(FetchError::Unauthorized(msg)) => {
                tracing::debug!("Yahoo rejected crumb for {} ({}), refreshing", ticker, msg);
                self.invalidate_crumb().await;
                self.summary_request(ticker).await?
            }
            other => other?,
        };

        let summary: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        parse_quote_summary(ticker, summary)
    }

    /// Most recent news headline, if any
    pub async fn get_headline(&self, ticker: &str) -> Result<Option<String>, FetchError> {
        let url = format!("{}/v1/finance/search", self.base_url);

        let response = self
            .send_request(
                ticker,
                self.client
                    .get(&url)
                    .query(&[("q", ticker), ("quotesCount", "0"), ("newsCount", "1")]),
            )
            .await?;

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(search.news.into_iter().next().map(|n| n.title))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_history(&self, ticker: &str) -> Result<PriceSeries, FetchError> {
        self.get_chart(ticker).await
    }

    /// The headline is kept even when the summary endpoint refuses us.
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, FetchError> {
        let (summary, headline) =
            tokio::join!(self.get_quote_summary(ticker), self.get_headline(ticker));

        match (summary, headline) {
            (Ok(mut f), headline) => {
                f.news_headline = headline.ok().flatten();
                Ok(f)
            }
            (Err(e), Ok(headline)) => {
                tracing::warn!("quoteSummary failed for {}: {}", ticker, e);
                Ok(Fundamentals {
                    news_headline: headline,
                    ..Fundamentals::default()
                })
            }
            (Err(e), Err(_)) => Err(e),
        }
    }
}

/// Turn a chart payload into a clean series.
///
/// Rows missing any OHLC value are dropped; when two rows share a date the
/// later one wins.
fn parse_chart(ticker: &str, chart: ChartResponse) -> Result<PriceSeries, FetchError> {
    if let Some(err) = chart.chart.error {
        return Err(FetchError::NotFound(format!("{}: {}", ticker, err.description)));
    }

    let result = chart
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::NotFound(ticker.to_string()))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset.unwrap_or(0);

    let mut bars: Vec<PriceBar> = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let at = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) =
            (at(&quote.open), at(&quote.high), at(&quote.low), at(&quote.close))
        else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
            continue;
        };

        let bar = PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume: at(&quote.volume).unwrap_or(0.0),
        };

        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            Some(last) if last.date > date => continue,
            _ => bars.push(bar),
        }
    }

    PriceSeries::new(bars).map_err(|e| FetchError::Parse(e.to_string()))
}

/// A crumb is a short opaque token; error pages and rate-limit notices are not.
fn parse_crumb(body: &str) -> Option<String> {
    let crumb = body.trim();
    let usable = !crumb.is_empty()
        && crumb.len() < 100
        && !crumb.contains(char::is_whitespace)
        && !crumb.contains('<');
    usable.then(|| crumb.to_string())
}

fn parse_quote_summary(ticker: &str, summary: QuoteSummaryResponse) -> Result<Fundamentals, FetchError> {
    if let Some(err) = summary.quote_summary.error {
        return Err(FetchError::NotFound(format!("{}: {}", ticker, err.description)));
    }

    let result = summary
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::NotFound(ticker.to_string()))?;

    let stats = result.default_key_statistics.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();
    let price = result.price.unwrap_or_default();

    Ok(Fundamentals {
        resolved_name: price.long_name.or(price.short_name),
        forward_pe: stats.forward_pe.and_then(|v| v.raw),
        revenue_growth: financial.revenue_growth.and_then(|v| v.raw),
        institutional_holding: stats.held_percent_institutions.and_then(|v| v.raw),
        news_headline: None,
    })
}

// Response structures
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(default)]
    default_key_statistics: Option<KeyStatisticsModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialDataModule {
    #[serde(default)]
    revenue_growth: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatisticsModule {
    #[serde(default, rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    #[serde(default)]
    held_percent_institutions: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`; `raw` is missing for "Infinity"
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query, State};
    use axum::http::{header, HeaderMap};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chart(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_chart_drops_null_rows_and_applies_offset() {
        // 2024-01-02 14:30 UTC and two later sessions; New York offset
        let body = chart(
            r#"{"chart":{"result":[{
                "meta":{"currency":"USD","symbol":"AAPL","gmtoffset":-18000},
                "timestamp":[1704205800,1704292200,1704378600],
                "indicators":{"quote":[{
                    "open":[187.15,184.22,null],
                    "high":[188.44,185.88,null],
                    "low":[183.89,183.43,null],
                    "close":[185.64,184.25,null],
                    "volume":[82488700,58414500,null]
                }]}
            }],"error":null}}"#,
        );

        let series = parse_chart("AAPL", body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.bars()[1].close, 184.25);
        assert_eq!(series.bars()[0].volume, 82488700.0);
    }

    #[test]
    fn test_parse_chart_same_day_keeps_last() {
        let body = chart(
            r#"{"chart":{"result":[{
                "meta":{"gmtoffset":0},
                "timestamp":[1704205800,1704207600],
                "indicators":{"quote":[{
                    "open":[1.0,1.0],"high":[2.0,2.0],"low":[0.5,0.5],
                    "close":[1.5,1.7],"volume":[null,null]
                }]}
            }],"error":null}}"#,
        );

        let series = parse_chart("X", body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 1.7);
        assert_eq!(series.bars()[0].volume, 0.0);
    }

    #[test]
    fn test_parse_chart_error_is_not_found() {
        let body = chart(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        assert!(matches!(parse_chart("ZZZZ", body), Err(FetchError::NotFound(_))));
    }

    #[test]
    fn test_parse_quote_summary() {
        let body: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary":{"result":[{
                "price":{"longName":"NVIDIA Corporation","shortName":"NVIDIA"},
                "financialData":{"revenueGrowth":{"raw":1.224,"fmt":"122.40%"}},
                "defaultKeyStatistics":{
                    "forwardPE":{"raw":31.5,"fmt":"31.50"},
                    "heldPercentInstitutions":{"raw":0.6712,"fmt":"67.12%"}
                }
            }],"error":null}}"#,
        )
        .unwrap();

        let f = parse_quote_summary("NVDA", body).unwrap();
        assert_eq!(f.resolved_name.as_deref(), Some("NVIDIA Corporation"));
        assert_eq!(f.forward_pe, Some(31.5));
        assert_eq!(f.revenue_growth, Some(1.224));
        assert_eq!(f.institutional_holding, Some(0.6712));
    }

    #[test]
    fn test_parse_quote_summary_fund_has_gaps() {
        let body: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary":{"result":[{
                "price":{"shortName":"VANGUARD S&P 500"},
                "defaultKeyStatistics":{"forwardPE":{}}
            }],"error":null}}"#,
        )
        .unwrap();

        let f = parse_quote_summary("VOO", body).unwrap();
        assert_eq!(f.resolved_name.as_deref(), Some("VANGUARD S&P 500"));
        assert_eq!(f.forward_pe, None);
        assert_eq!(f.revenue_growth, None);
        assert_eq!(f.institutional_holding, None);
    }

    #[test]
    fn test_search_headline() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"count":1,"quotes":[],"news":[{"uuid":"a","title":"Nvidia beats estimates","publisher":"Reuters"}]}"#,
        )
        .unwrap();
        assert_eq!(body.news[0].title, "Nvidia beats estimates");

        let empty: SearchResponse = serde_json::from_str(r#"{"count":0}"#).unwrap();
        assert!(empty.news.is_empty());
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("  aB3.xY/9q\n").as_deref(), Some("aB3.xY/9q"));
        assert_eq!(parse_crumb(""), None);
        assert_eq!(parse_crumb("Too Many Requests"), None);
        assert_eq!(parse_crumb("<!DOCTYPE html><html></html>"), None);
    }

    #[derive(Default)]
    struct FakeYahoo {
        crumbs_issued: AtomicUsize,
        summary_calls: AtomicUsize,
    }

    async fn consent() -> impl IntoResponse {
        (StatusCode::NOT_FOUND, [(header::SET_COOKIE, "A3=session; Path=/")], "")
    }

    async fn issue_crumb(State(yahoo): State<Arc<FakeYahoo>>) -> String {
        let n = yahoo.crumbs_issued.fetch_add(1, Ordering::SeqCst) + 1;
        format!("crumb{n}")
    }

    /// Only the second crumb is accepted, so the first summary call is refused.
    async fn quote_summary(
        State(yahoo): State<Arc<FakeYahoo>>,
        Path(ticker): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Response {
        yahoo.summary_calls.fetch_add(1, Ordering::SeqCst);
        let has_session = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|c| c.contains("A3=session"));
        if !has_session || params.get("crumb").map(String::as_str) != Some("crumb2") {
            return (
                StatusCode::UNAUTHORIZED,
                r#"{"finance":{"result":null,"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#,
            )
                .into_response();
        }
        Json(json!({"quoteSummary": {"result": [{
            "price": {"longName": format!("{ticker} Holdings")},
            "defaultKeyStatistics": {"forwardPE": {"raw": 18.2, "fmt": "18.20"}}
        }], "error": null}}))
        .into_response()
    }

    async fn search() -> Json<serde_json::Value> {
        Json(json!({"count": 1, "news": [{"title": "Quarterly results beat"}]}))
    }

    async fn spawn_fake_yahoo(yahoo: Arc<FakeYahoo>) -> String {
        let app = Router::new()
            .route("/consent", get(consent))
            .route("/v1/test/getcrumb", get(issue_crumb))
            .route("/v10/finance/quoteSummary/:ticker", get(quote_summary))
            .route("/v1/finance/search", get(search))
            .with_state(yahoo);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fundamentals_refresh_rejected_crumb() {
        let yahoo = Arc::new(FakeYahoo::default());
        let base = spawn_fake_yahoo(yahoo.clone()).await;
        let client = YahooClient::with_rate_limit(100).with_endpoints(&base, format!("{base}/consent"));

        let f = client.fetch_fundamentals("ZETA").await.unwrap();
        assert_eq!(f.resolved_name.as_deref(), Some("ZETA Holdings"));
        assert_eq!(f.forward_pe, Some(18.2));
        assert_eq!(f.news_headline.as_deref(), Some("Quarterly results beat"));
        assert_eq!(yahoo.crumbs_issued.load(Ordering::SeqCst), 2);
        assert_eq!(yahoo.summary_calls.load(Ordering::SeqCst), 2);

        // the accepted crumb is reused
        client.get_quote_summary("NBIS").await.unwrap();
        assert_eq!(yahoo.crumbs_issued.load(Ordering::SeqCst), 2);
        assert_eq!(yahoo.summary_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_waits_for_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(60));
    }
}
