use analysis_core::{AnalysisResult, ErrorResult, RsiZone};
use analysis_orchestrator::{BatchReport, ListReport};
use serde_json::json;
use std::fmt::Write;

/// Lists shown hottest-RSI first, with failures left out
const RANKED_LISTS: &[&str] = &["watchlist"];

pub fn render(report: &BatchReport) -> String {
    let mut out = String::new();

    for list in &report.lists {
        let _ = writeln!(out, "== {} ({:?}) ==", list.name, list.category);

        if RANKED_LISTS.contains(&list.name.as_str()) {
            for result in list.sorted_by_rsi() {
                out.push_str(&render_result(result));
            }
        } else {
            for outcome in &list.outcomes {
                match outcome {
                    Ok(result) => out.push_str(&render_result(result)),
                    Err(error) => out.push_str(&render_error(error)),
                }
            }
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{} analyzed, {} failed",
        report.total - report.failed,
        report.failed
    );
    out
}

fn render_result(r: &AnalysisResult) -> String {
    let sym = r.currency.symbol();
    let marker = if r.needs_attention() { "*" } else { " " };
    let golden = match r.golden_price {
        Some(g) => format!("{}{:.2} ({:+.2})", sym, g, r.last_close - g),
        None => "N/A".to_string(),
    };
    let mut line = format!(
        "{} [{}] {} | {} | {}{:.2} ({:+.2}%) conf {}\n",
        marker,
        r.severity.color(),
        r.action.to_label(),
        r.resolved_name,
        sym,
        r.last_close,
        r.change_pct,
        r.confidence,
    );
    let _ = writeln!(
        line,
        "    golden {} | panic {}{:.2} ({:+.2}) | RSI {:.2} {}{}",
        golden,
        sym,
        r.panic_price,
        r.last_close - r.panic_price,
        r.rsi,
        zone_label(r.rsi_zone),
        if r.is_fund_like { " | NAV-priced fund" } else { "" },
    );

    let f = &r.fundamentals;
    if let Some(inst) = f.institutional_holding_pct {
        let _ = writeln!(line, "    institutions {:.1}%", inst);
    }
    if let Some(news) = &f.news_headline {
        let _ = writeln!(line, "    news: {}", news);
    }
    line
}

fn render_error(e: &ErrorResult) -> String {
    format!("x {}: {:?} - {}\n", e.ticker, e.kind, e.message)
}

fn zone_label(zone: RsiZone) -> &'static str {
    match zone {
        RsiZone::Extreme => "(extreme)",
        RsiZone::Overheated => "(overheated)",
        RsiZone::Neutral => "",
        RsiZone::Oversold => "(oversold)",
    }
}

/// Machine-readable report; indicator series are omitted.
pub fn to_json(report: &BatchReport) -> serde_json::Value {
    let lists: Vec<serde_json::Value> = report.lists.iter().map(list_json).collect();
    json!({
        "total": report.total,
        "failed": report.failed,
        "lists": lists,
    })
}

fn list_json(list: &ListReport) -> serde_json::Value {
    let results: Vec<serde_json::Value> = list
        .successes()
        .map(|r| {
            json!({
                "ticker": r.ticker,
                "name": r.resolved_name,
                "currency": r.currency.symbol(),
                "as_of": r.as_of,
                "price": r.last_close,
                "change_pct": r.change_pct,
                "action": r.action.to_label(),
                "color": r.severity.color(),
                "confidence": r.confidence,
                "golden": r.golden_price,
                "panic": r.panic_price,
                "rsi": r.rsi,
                "fundamentals": r.fundamentals,
                "is_fund_like": r.is_fund_like,
            })
        })
        .collect();
    let errors: Vec<&ErrorResult> = list.failures().collect();

    json!({
        "name": list.name,
        "category": list.category,
        "results": results,
        "errors": errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{
        AnalysisError, AssetCategory, CurrencySymbol, FundamentalsSummary, IndicatorSet,
        Severity, SignalAction,
    };
    use chrono::NaiveDate;

    fn result(ticker: &str, rsi: f64) -> AnalysisResult {
        AnalysisResult {
            ticker: ticker.to_string(),
            resolved_name: ticker.to_string(),
            category: AssetCategory::Equity,
            currency: CurrencySymbol::UsDollar,
            as_of: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            last_close: 120.5,
            prev_close: 118.0,
            change_pct: 2.12,
            action: SignalAction::Overheated,
            confidence: 85,
            severity: Severity::Warning,
            golden_price: None,
            panic_price: 101.25,
            rsi,
            rsi_zone: RsiZone::Overheated,
            fundamentals: FundamentalsSummary::default(),
            is_fund_like: false,
            indicators: IndicatorSet {
                sma20: vec![],
                sma50: vec![],
                sma200: None,
                rsi14: vec![],
                bollinger_lower: None,
            },
        }
    }

    fn report() -> BatchReport {
        BatchReport {
            lists: vec![
                ListReport {
                    name: "family".to_string(),
                    category: AssetCategory::Equity,
                    outcomes: vec![
                        Ok(result("ZETA", 78.0)),
                        Err(ErrorResult::from_error(
                            "NBIS",
                            AnalysisError::DataUnavailable("timed out".to_string()),
                        )),
                    ],
                },
                ListReport {
                    name: "watchlist".to_string(),
                    category: AssetCategory::Equity,
                    outcomes: vec![Ok(result("AAPL", 60.0)), Ok(result("NVDA", 80.0))],
                },
            ],
            total: 4,
            failed: 1,
        }
    }

    #[test]
    fn test_render_lists_errors_and_ranks_watchlist() {
        let text = render(&report());
        assert!(text.contains("x NBIS: DataUnavailable - timed out"));
        assert!(text.contains("* [orange] Overheated: take-profit warning | ZETA | $120.50 (+2.12%) conf 85"));
        assert!(text.contains("golden N/A"));

        let nvda = text.find("| NVDA |").unwrap();
        let aapl = text.find("| AAPL |").unwrap();
        assert!(nvda < aapl);
        assert!(text.ends_with("3 analyzed, 1 failed\n"));
    }

    #[test]
    fn test_json_report_shape() {
        let value = to_json(&report());
        assert_eq!(value["total"], 4);
        assert_eq!(value["lists"][0]["errors"][0]["kind"], "DataUnavailable");
        assert_eq!(value["lists"][1]["results"][1]["action"], "Overheated: take-profit warning");
        assert!(value["lists"][1]["results"][0]["golden"].is_null());
    }
}
