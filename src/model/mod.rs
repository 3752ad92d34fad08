pub mod price_point;
pub mod stats;

pub use price_point::PricePoint;
pub use stats::{StatsSnapshot, Ticker24hStats};
