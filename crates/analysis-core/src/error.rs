use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Known unlisted: {0}")]
    KnownUnlisted(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Failure reported by a market-data provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("ticker not found: {0}")]
    NotFound(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("timed out: {0}")]
    Timeout(String),

    /// The provider rejected our session (expired cookie or crumb)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<FetchError> for AnalysisError {
    fn from(e: FetchError) -> Self {
        AnalysisError::DataUnavailable(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InsufficientHistory,
    DataUnavailable,
    KnownUnlisted,
}

/// Per-ticker failure outcome, the alternative to an `AnalysisResult`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub ticker: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorResult {
    pub fn from_error(ticker: &str, error: AnalysisError) -> Self {
        let (kind, message) = match error {
            AnalysisError::InsufficientHistory(m) => (ErrorKind::InsufficientHistory, m),
            AnalysisError::DataUnavailable(m) => (ErrorKind::DataUnavailable, m),
            AnalysisError::KnownUnlisted(m) => (ErrorKind::KnownUnlisted, m),
            // A malformed series is as unusable as a missing one
            AnalysisError::InvalidData(m) => (ErrorKind::DataUnavailable, m),
        };
        Self {
            ticker: ticker.to_string(),
            kind,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_become_data_unavailable() {
        for e in [
            FetchError::NotFound("ZZZZ".into()),
            FetchError::RateLimited("429".into()),
            FetchError::Timeout("20s".into()),
            FetchError::Unauthorized("Invalid Crumb".into()),
        ] {
            let err: AnalysisError = e.into();
            assert!(matches!(err, AnalysisError::DataUnavailable(_)));
        }
    }

    #[test]
    fn test_error_result_kind_mapping() {
        let r = ErrorResult::from_error("FIG", AnalysisError::KnownUnlisted("not listed".into()));
        assert_eq!(r.kind, ErrorKind::KnownUnlisted);
        assert_eq!(r.ticker, "FIG");
        assert_eq!(r.message, "not listed");

        let r = ErrorResult::from_error("X", AnalysisError::InvalidData("dup".into()));
        assert_eq!(r.kind, ErrorKind::DataUnavailable);
    }
}
