use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::model::PricePoint;

/// Number of price points retained for charting.
pub const HISTORY_CAPACITY: usize = 50;

/// Fixed-capacity, time-ordered price history.
///
/// Points are appended at the back and evicted from the front once the
/// capacity is exceeded, so `len()` never exceeds the capacity and the
/// oldest retained point is always first.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    points: VecDeque<PricePoint>,
    capacity: usize,
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl PriceHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a price observed at `now`, returning the stored point and the
    /// evicted one if the buffer was full.
    ///
    /// The stored timestamp never precedes the previous point's, even if the
    /// wall clock stepped backwards.
    pub fn record(&mut self, now: DateTime<Utc>, price: f64) -> (PricePoint, Option<PricePoint>) {
        let timestamp = match self.points.back() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        let point = PricePoint::new(timestamp, price);
        self.points.push_back(point);
        let evicted = if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        };
        (point, evicted)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    fn latest(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    /// Owned copy, earliest first.
    pub fn to_vec(&self) -> Vec<PricePoint> {
        self.points.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fills_up_to_capacity() {
        let mut h = PriceHistory::new(3);
        let t0 = Utc::now();
        for i in 0..3 {
            let (_, evicted) = h.record(t0 + Duration::seconds(i), 100.0 + i as f64);
            assert!(evicted.is_none());
        }
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut h = PriceHistory::new(3);
        let t0 = Utc::now();
        for i in 0..5 {
            h.record(t0 + Duration::seconds(i), i as f64 + 1.0);
        }
        let prices: Vec<f64> = h.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![3.0, 4.0, 5.0]);
        assert_eq!(h.latest().map(|p| p.price), Some(5.0));
    }

    #[test]
    fn clock_step_back_keeps_timestamps_ordered() {
        let mut h = PriceHistory::new(4);
        let t0 = Utc::now();
        h.record(t0, 1.0);
        let (p, _) = h.record(t0 - Duration::seconds(30), 2.0);
        assert_eq!(p.timestamp, t0);
        assert_eq!(p.price, 2.0);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let mut h = PriceHistory::new(0);
        h.record(Utc::now(), 1.0);
        h.record(Utc::now(), 2.0);
        assert_eq!(h.capacity(), 1);
        assert_eq!(h.to_vec().len(), 1);
    }
}
