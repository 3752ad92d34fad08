use thiserror::Error;

use crate::engine::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};

/// Every way a single feed request can fail.
///
/// The engine treats all variants the same (the tick is skipped); the
/// variants only exist so the cause can be logged and shown as health.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("binance API error (code {code}): {msg}")]
    BinanceApi { code: i64, msg: String },

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error(
        "refresh interval {0}s is outside the allowed range [{min}, {max}]",
        min = MIN_INTERVAL_SECS,
        max = MAX_INTERVAL_SECS
    )]
    InvalidInterval(u64),

    #[error("engine already started")]
    AlreadyStarted,

    #[error("engine not started")]
    NotStarted,

    #[error("refresh loop already active")]
    LoopActive,
}
