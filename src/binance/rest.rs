use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::FeedError;
use crate::feed::PriceFeed;
use crate::model::Ticker24hStats;

use super::types::{BinanceApiErrorResponse, Ticker24hrResponse, TickerPriceResponse};

/// Spot request-weight budget per minute.
const WEIGHT_LIMIT_PER_MINUTE: u64 = 6000;
const WEIGHT_WARN_PER_MINUTE: u64 = WEIGHT_LIMIT_PER_MINUTE * 8 / 10;

// Single-symbol weights.
const TICKER_PRICE_WEIGHT: u64 = 2;
const TICKER_24HR_WEIGHT: u64 = 2;
const PING_WEIGHT: u64 = 1;

pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: String,
    // Request weight spent in the current minute window
    weight_used: AtomicU64,
    window_start: Mutex<Instant>,
}

impl BinanceRestClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            weight_used: AtomicU64::new(0),
            window_start: Mutex::new(Instant::now()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Weight spent in the current minute window.
    pub fn weight_used(&self) -> u64 {
        self.weight_used.load(Ordering::Relaxed)
    }

    fn track_weight(&self, weight: u64) {
        let mut start = match self.window_start.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if start.elapsed().as_secs() >= 60 {
            *start = Instant::now();
            self.weight_used.store(0, Ordering::Relaxed);
        }
        let used = self.weight_used.fetch_add(weight, Ordering::Relaxed) + weight;
        if used > WEIGHT_WARN_PER_MINUTE {
            tracing::warn!(
                used,
                limit = WEIGHT_LIMIT_PER_MINUTE,
                "Approaching request weight limit (80% of budget)"
            );
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        symbol: &str,
        weight: u64,
    ) -> Result<T, FeedError> {
        self.track_weight(weight);
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<BinanceApiErrorResponse>(&body) {
                return Err(FeedError::BinanceApi {
                    code: err.code,
                    msg: err.msg,
                });
            }
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn ping(&self) -> Result<(), FeedError> {
        self.track_weight(PING_WEIGHT);
        let url = format!("{}/api/v3/ping", self.base_url);
        self.http.get(&url).send().await?.error_for_status()?;
        Ok(())
    }

    pub async fn ticker_price(&self, symbol: &str) -> Result<f64, FeedError> {
        let resp: TickerPriceResponse = self
            .get_json("/api/v3/ticker/price", symbol, TICKER_PRICE_WEIGHT)
            .await?;
        if !resp.price.is_finite() || resp.price <= 0.0 {
            return Err(FeedError::InvalidField {
                field: "price",
                reason: format!("expected a positive price, got {}", resp.price),
            });
        }
        tracing::trace!(symbol = %resp.symbol, price = resp.price, "Ticker price received");
        Ok(resp.price)
    }

    pub async fn ticker_24hr(&self, symbol: &str) -> Result<Ticker24hStats, FeedError> {
        let resp: Ticker24hrResponse = self
            .get_json("/api/v3/ticker/24hr", symbol, TICKER_24HR_WEIGHT)
            .await?;
        let fields = [
            ("priceChangePercent", resp.price_change_percent),
            ("highPrice", resp.high_price),
            ("lowPrice", resp.low_price),
            ("volume", resp.volume),
            ("quoteVolume", resp.quote_volume),
            ("priceChange", resp.price_change),
        ];
        if let Some((field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(FeedError::InvalidField {
                field: *field,
                reason: format!("expected a finite number, got {}", value),
            });
        }
        tracing::trace!(symbol = %resp.symbol, "24h ticker received");
        Ok(Ticker24hStats {
            change_percent: resp.price_change_percent,
            high: resp.high_price,
            low: resp.low_price,
            volume: resp.volume,
            quote_volume: resp.quote_volume,
            absolute_change: resp.price_change,
        })
    }
}

#[async_trait]
impl PriceFeed for BinanceRestClient {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FeedError> {
        self.ticker_price(symbol).await
    }

    async fn fetch_stats(&self, symbol: &str) -> Result<Ticker24hStats, FeedError> {
        self.ticker_24hr(symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client =
            BinanceRestClient::new("https://api.binance.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://api.binance.com");
    }

    #[test]
    fn weight_accumulates_within_window() {
        let client =
            BinanceRestClient::new("https://api.binance.com", Duration::from_secs(5)).unwrap();
        client.track_weight(TICKER_PRICE_WEIGHT);
        client.track_weight(TICKER_24HR_WEIGHT);
        assert_eq!(client.weight_used(), 4);
    }
}
