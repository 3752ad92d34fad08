//! Polling loop and bounded price history for a single symbol.
//!
//! The engine is the only writer of its state. Consumers read owned
//! [`EngineSnapshot`] copies, either on demand via [`TickerEngine::snapshot`]
//! or by awaiting changes on [`TickerEngine::subscribe`].
//!
//! Lifecycle: `Idle --start--> Ticking --(running == false observed)--> Stopped`.
//! A `Stopped` engine can be started again; history is kept across
//! stop/start.
//!
//! Loop order per cycle: fetch, update or skip, then check `running`. If
//! still running, wait for the interval or a stop signal (whichever comes
//! first) and check again. The first cycle therefore always fetches, even
//! when auto-refresh is off.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::error::{AppError, FeedError};
use crate::feed::{fetch_sample, PriceFeed};
use crate::history::{PriceHistory, HISTORY_CAPACITY};
use crate::model::{PricePoint, StatsSnapshot};

pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_INTERVAL_SECS: u64 = 3;

/// The two user-facing refresh controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub auto_refresh: bool,
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

/// Rejects intervals outside `[MIN_INTERVAL_SECS, MAX_INTERVAL_SECS]`.
pub fn validate_interval_secs(secs: u64) -> Result<Duration, AppError> {
    if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
        return Err(AppError::InvalidInterval(secs));
    }
    Ok(Duration::from_secs(secs))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Ticking,
    Stopped,
}

impl EnginePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Ticking => "TICKING",
            Self::Stopped => "STOPPED",
        }
    }
}

/// Feed outcome counters. Never affects history or the latest stats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedHealth {
    pub successes: u64,
    pub failures: u64,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
}

impl FeedHealth {
    pub fn is_degraded(&self) -> bool {
        self.consecutive_failures > 0
    }

    fn record_success(&mut self, at: DateTime<Utc>) {
        self.successes += 1;
        self.consecutive_failures = 0;
        self.last_success_at = Some(at);
    }

    fn record_failure(&mut self, err: &FeedError) {
        self.failures += 1;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(err.to_string());
    }
}

/// Owned, point-in-time copy of the engine state.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub symbol: String,
    pub phase: EnginePhase,
    /// Earliest first.
    pub history: Vec<PricePoint>,
    pub latest: Option<StatsSnapshot>,
    pub running: bool,
    pub interval: Duration,
    pub health: FeedHealth,
}

impl EngineSnapshot {
    pub fn prices(&self) -> Vec<f64> {
        self.history.iter().map(|p| p.price).collect()
    }
}

/// Result of one fetch cycle.
#[derive(Debug)]
pub enum TickOutcome {
    Updated(StatsSnapshot),
    /// State was left untouched.
    Skipped(FeedError),
}

impl TickOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

struct EngineState {
    history: PriceHistory,
    latest: Option<StatsSnapshot>,
    running: bool,
    interval: Duration,
    phase: EnginePhase,
    health: FeedHealth,
    loop_active: bool,
}

fn lock_state(state: &Mutex<EngineState>) -> MutexGuard<'_, EngineState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Clears `loop_active` if a `run` future is dropped before the loop
/// reaches `Stopped` on its own.
struct LoopGuard<'a> {
    state: &'a Mutex<EngineState>,
    finished: bool,
}

impl Drop for LoopGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            lock_state(self.state).loop_active = false;
        }
    }
}

pub struct TickerEngine<F> {
    feed: F,
    symbol: String,
    state: Mutex<EngineState>,
    // Held for the whole fetch-and-update cycle so ticks never interleave.
    tick_gate: tokio::sync::Mutex<()>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
    running_tx: watch::Sender<bool>,
}

impl<F: PriceFeed> TickerEngine<F> {
    pub fn new(feed: F, symbol: &str) -> Self {
        let state = EngineState {
            history: PriceHistory::new(HISTORY_CAPACITY),
            latest: None,
            running: false,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            phase: EnginePhase::Idle,
            health: FeedHealth::default(),
            loop_active: false,
        };
        let initial = Self::build_snapshot(symbol, &state);
        let (snapshot_tx, _) = watch::channel(initial);
        let (running_tx, _) = watch::channel(false);
        Self {
            feed,
            symbol: symbol.to_string(),
            state: Mutex::new(state),
            tick_gate: tokio::sync::Mutex::new(()),
            snapshot_tx,
            running_tx,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    fn build_snapshot(symbol: &str, st: &EngineState) -> EngineSnapshot {
        EngineSnapshot {
            symbol: symbol.to_string(),
            phase: st.phase,
            history: st.history.to_vec(),
            latest: st.latest,
            running: st.running,
            interval: st.interval,
            health: st.health.clone(),
        }
    }

    fn publish(&self, st: &EngineState) {
        self.snapshot_tx
            .send_replace(Self::build_snapshot(&self.symbol, st));
    }

    fn set_running(&self, st: &mut EngineState, running: bool) {
        st.running = running;
        self.running_tx.send_replace(running);
    }

    /// Applies `config` and enters `Ticking`. Does not fetch; call
    /// [`run`](Self::run) to drive the loop.
    pub fn start(&self, config: RefreshConfig) -> Result<(), AppError> {
        let interval = validate_interval_secs(config.interval_secs)?;
        let mut st = lock_state(&self.state);
        if st.phase == EnginePhase::Ticking && st.running {
            return Err(AppError::AlreadyStarted);
        }
        self.set_running(&mut st, config.auto_refresh);
        st.interval = interval;
        st.phase = EnginePhase::Ticking;
        tracing::info!(
            symbol = %self.symbol,
            auto_refresh = config.auto_refresh,
            interval_secs = config.interval_secs,
            retained = st.history.len(),
            "Ticker engine started"
        );
        self.publish(&st);
        Ok(())
    }

    /// Clears `running`. An active loop wakes from its wait immediately and
    /// becomes `Stopped`; a fetch already in flight still completes.
    pub fn stop(&self) {
        let mut st = lock_state(&self.state);
        if !st.running {
            return;
        }
        self.set_running(&mut st, false);
        tracing::info!(symbol = %self.symbol, "Ticker engine stop requested");
        self.publish(&st);
    }

    /// Changes the wait used from the next cycle on.
    pub fn set_interval(&self, secs: u64) -> Result<(), AppError> {
        let interval = validate_interval_secs(secs)?;
        let mut st = lock_state(&self.state);
        st.interval = interval;
        tracing::info!(symbol = %self.symbol, interval_secs = secs, "Refresh interval changed");
        self.publish(&st);
        Ok(())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn phase(&self) -> EnginePhase {
        lock_state(&self.state).phase
    }

    pub fn is_running(&self) -> bool {
        lock_state(&self.state).running
    }

    /// One fetch cycle. On success the new point and stats are applied
    /// together; on failure history and latest stats are left untouched.
    pub async fn tick(&self) -> TickOutcome {
        let _gate = self.tick_gate.lock().await;

        match fetch_sample(&self.feed, &self.symbol).await {
            Ok(sample) => {
                let mut st = lock_state(&self.state);
                let (point, evicted) = st.history.record(Utc::now(), sample.price);
                let latest = StatsSnapshot::new(sample.price, sample.stats, point.timestamp);
                st.latest = Some(latest);
                st.health.record_success(point.timestamp);
                tracing::debug!(
                    symbol = %self.symbol,
                    price = point.price,
                    change_percent = latest.change_percent,
                    retained = st.history.len(),
                    evicted = evicted.is_some(),
                    "Tick applied"
                );
                self.publish(&st);
                TickOutcome::Updated(latest)
            }
            Err(e) => {
                let mut st = lock_state(&self.state);
                st.health.record_failure(&e);
                tracing::warn!(
                    symbol = %self.symbol,
                    error = %e,
                    consecutive_failures = st.health.consecutive_failures,
                    "Tick skipped"
                );
                self.publish(&st);
                TickOutcome::Skipped(e)
            }
        }
    }

    /// Marks the engine `Stopped` if `running` was cleared. Decided under the
    /// state lock so a concurrent `start` either resumes this loop or sees
    /// `Stopped` and may launch a new one.
    fn finish_if_stopped(&self, guard: &mut LoopGuard<'_>) -> bool {
        let mut st = lock_state(&self.state);
        if st.running {
            return false;
        }
        st.phase = EnginePhase::Stopped;
        st.loop_active = false;
        guard.finished = true;
        tracing::info!(symbol = %self.symbol, retained = st.history.len(), "Ticker engine stopped");
        self.publish(&st);
        true
    }

    /// Drives the refresh loop until the engine becomes `Stopped`.
    ///
    /// Requires a prior [`start`](Self::start); at most one loop runs per
    /// engine.
    pub async fn run(&self) -> Result<(), AppError> {
        {
            let mut st = lock_state(&self.state);
            if st.phase != EnginePhase::Ticking {
                return Err(AppError::NotStarted);
            }
            if st.loop_active {
                return Err(AppError::LoopActive);
            }
            st.loop_active = true;
        }
        let mut guard = LoopGuard {
            state: &self.state,
            finished: false,
        };
        let mut running_rx = self.running_tx.subscribe();
        tracing::info!(symbol = %self.symbol, "Refresh loop entered");

        loop {
            self.tick().await;
            if self.finish_if_stopped(&mut guard) {
                break;
            }

            let interval = lock_state(&self.state).interval;
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = running_rx.wait_for(|running| !*running) => {}
            }

            if self.finish_if_stopped(&mut guard) {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_bounds_are_inclusive() {
        assert!(validate_interval_secs(0).is_err());
        assert_eq!(validate_interval_secs(1).unwrap(), Duration::from_secs(1));
        assert_eq!(validate_interval_secs(10).unwrap(), Duration::from_secs(10));
        assert!(matches!(
            validate_interval_secs(11),
            Err(AppError::InvalidInterval(11))
        ));
    }

    #[test]
    fn health_resets_consecutive_failures_on_success() {
        let mut h = FeedHealth::default();
        h.record_failure(&FeedError::Timeout);
        h.record_failure(&FeedError::Timeout);
        assert!(h.is_degraded());
        assert_eq!(h.consecutive_failures, 2);
        h.record_success(Utc::now());
        assert!(!h.is_degraded());
        assert_eq!(h.failures, 2);
        assert_eq!(h.successes, 1);
        assert_eq!(h.last_error.as_deref(), Some("request timed out"));
    }
}
