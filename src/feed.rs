use async_trait::async_trait;

use crate::error::FeedError;
use crate::model::Ticker24hStats;

/// Point-in-time market data source for one instrument.
///
/// Implementations issue exactly one request per call and never retry;
/// every failure comes back as a [`FeedError`].
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FeedError>;
    async fn fetch_stats(&self, symbol: &str) -> Result<Ticker24hStats, FeedError>;
}

/// Both halves of a tick's fetch, present only when both calls succeeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedSample {
    pub price: f64,
    pub stats: Ticker24hStats,
}

/// Issues the price and stats requests concurrently and waits for both.
///
/// Fails if either request fails; when both fail the price error wins.
pub async fn fetch_sample<F>(feed: &F, symbol: &str) -> Result<FeedSample, FeedError>
where
    F: PriceFeed + ?Sized,
{
    let (price, stats) = tokio::join!(feed.fetch_price(symbol), feed.fetch_stats(symbol));
    Ok(FeedSample {
        price: price?,
        stats: stats?,
    })
}
