use chrono::{DateTime, Utc};

/// Rolling 24h figures as returned by the feed, before they are stamped
/// with the price and observation time of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticker24hStats {
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub quote_volume: f64,
    pub absolute_change: f64,
}

/// The latest price plus 24h statistics of one successful tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub price: f64,
    /// Signed, in percent (`-1.5` means -1.5%).
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    /// Base asset volume.
    pub volume: f64,
    /// Quote asset volume.
    pub quote_volume: f64,
    pub absolute_change: f64,
    pub observed_at: DateTime<Utc>,
}

impl StatsSnapshot {
    pub fn new(price: f64, stats: Ticker24hStats, observed_at: DateTime<Utc>) -> Self {
        Self {
            price,
            change_percent: stats.change_percent,
            high: stats.high,
            low: stats.low,
            volume: stats.volume,
            quote_volume: stats.quote_volume,
            absolute_change: stats.absolute_change,
            observed_at,
        }
    }

    pub fn is_up(&self) -> bool {
        self.change_percent >= 0.0
    }
}
