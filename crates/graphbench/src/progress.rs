//! Throttled progress reporting.
//!
//! A [`ProgressTracker`] turns loop positions into progress lines. A line is
//! produced only when the completed percentage has grown since the last line
//! and at least [`REPORT_INTERVAL_MS`] have passed. The first line only needs
//! the percentage to move. Rates are computed over the interval since the last
//! emitted line.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::dir_util::human_readable_bytes;

/// Minimum time between two progress lines.
pub const REPORT_INTERVAL_MS: u64 = 1000;

/// A millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// A clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Set the absolute time.
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Items per second over `elapsed_ms`, with the interval floored at 1 ms.
fn rate_per_sec(items: u64, elapsed_ms: u64) -> u64 {
    let rate = u128::from(items) * 1000 / u128::from(elapsed_ms.max(1));
    u64::try_from(rate).unwrap_or(u64::MAX)
}

/// Tracks progress of one counted activity.
#[derive(Debug)]
pub struct ProgressTracker<C = SystemClock> {
    total: u64,
    unit: String,
    clock: C,
    start: u64,
    last_percentage: Option<u64>,
    last_time: Option<u64>,
    last_position: u64,
}

impl ProgressTracker<SystemClock> {
    /// Track `total` items of `unit`, starting now.
    pub fn new(total: u64, unit: impl Into<String>) -> Self {
        Self::with_clock(total, unit, SystemClock::new())
    }
}

impl<C: Clock> ProgressTracker<C> {
    /// Track `total` items of `unit` against `clock`, starting now.
    pub fn with_clock(total: u64, unit: impl Into<String>, clock: C) -> Self {
        let start = clock.now_millis();
        Self {
            total,
            unit: unit.into(),
            clock,
            start,
            last_percentage: None,
            last_time: None,
            last_position: 0,
        }
    }

    /// The number of items expected.
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whole percent of `total` reached at `position`. An empty total is
    /// always complete.
    pub fn percentage(&self, position: u64) -> u64 {
        if self.total == 0 {
            return 100;
        }
        let pct = u128::from(position) * 100 / u128::from(self.total);
        u64::try_from(pct).unwrap_or(u64::MAX)
    }

    /// Time since the tracker started.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms())
    }

    fn elapsed_ms(&self) -> u64 {
        self.clock.now_millis().saturating_sub(self.start)
    }

    /// Offer the current position. Returns a line when both the percentage
    /// and the time gate pass.
    pub fn report(&mut self, position: u64) -> Option<ProgressUpdate> {
        let percentage = self.percentage(position);
        if self.last_percentage.is_some_and(|last| percentage <= last) {
            return None;
        }

        let now = self.clock.now_millis();
        let since = match self.last_time {
            Some(last) if now.saturating_sub(last) < REPORT_INTERVAL_MS => return None,
            Some(last) => last,
            None => self.start,
        };

        let rate = rate_per_sec(
            position.saturating_sub(self.last_position),
            now.saturating_sub(since),
        );
        self.last_percentage = Some(percentage);
        self.last_time = Some(now);
        self.last_position = position;

        Some(ProgressUpdate { percentage, rate, unit: self.unit.clone() })
    }

    /// Summary for the whole activity.
    pub fn done(&self, action: &str) -> ProgressSummary {
        self.summary(action, self.total, None)
    }

    /// Summary for the whole activity including the on-disk size.
    pub fn done_with_size(&self, action: &str, disk_size: u64) -> ProgressSummary {
        self.summary(action, self.total, Some(disk_size))
    }

    /// Summary for an activity that completed `count` of its items, including
    /// the on-disk size.
    pub fn done_count_with_size(
        &self,
        action: &str,
        count: u64,
        disk_size: u64,
    ) -> ProgressSummary {
        self.summary(action, count, Some(disk_size))
    }

    fn summary(&self, action: &str, count: u64, disk_size: Option<u64>) -> ProgressSummary {
        let elapsed_ms = self.elapsed_ms();
        ProgressSummary {
            action: action.to_owned(),
            total: count,
            elapsed_ms,
            rate: rate_per_sec(count, elapsed_ms),
            unit: self.unit.clone(),
            disk_size,
        }
    }
}

/// An intermediate progress line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Whole percent complete.
    pub percentage: u64,
    /// Items per second since the previous line.
    pub rate: u64,
    /// Item unit, e.g. `vertices`.
    pub unit: String,
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Progress {}% done ({} {}/sec)", self.percentage, self.rate, self.unit)
    }
}

/// The final line for an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    /// What was done, e.g. `Inserted vertices`.
    pub action: String,
    /// Items processed.
    pub total: u64,
    /// Wall time in milliseconds.
    pub elapsed_ms: u64,
    /// Items per second over the whole activity.
    pub rate: u64,
    /// Item unit.
    pub unit: String,
    /// Bytes on disk after the activity, if measured.
    pub disk_size: Option<u64>,
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {}ms ({} {}/sec",
            self.action, self.total, self.elapsed_ms, self.rate, self.unit
        )?;
        if let Some(size) = self.disk_size {
            write!(f, ", disk size: {}", human_readable_bytes(size, false))?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(total: u64) -> (ProgressTracker<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (ProgressTracker::with_clock(total, "vertices", clock.clone()), clock)
    }

    #[test]
    fn first_report_needs_only_percentage() {
        let (mut progress, clock) = tracker(1000);
        clock.advance(250);

        let update = progress.report(100).expect("first report");
        assert_eq!(update.percentage, 10);
        assert_eq!(update.rate, 400);
        assert_eq!(update.to_string(), "Progress 10% done (400 vertices/sec)");
    }

    #[test]
    fn same_position_twice_emits_once() {
        let (mut progress, _clock) = tracker(100);
        assert!(progress.report(10).is_some());
        assert!(progress.report(10).is_none());
    }

    #[test]
    fn time_gate_holds_back_fast_progress() {
        let (mut progress, clock) = tracker(100);
        assert!(progress.report(10).is_some());

        clock.advance(999);
        assert!(progress.report(20).is_none());

        clock.advance(1);
        let update = progress.report(30).expect("gate open");
        assert_eq!(update.percentage, 30);
        assert_eq!(update.rate, 20);
    }

    #[test]
    fn suppressed_report_does_not_move_the_baseline() {
        let (mut progress, clock) = tracker(100);
        assert!(progress.report(10).is_some());
        clock.advance(500);
        assert!(progress.report(50).is_none());

        // A later line still measures from the last emitted line.
        clock.advance(1500);
        let update = progress.report(50).expect("emitted");
        assert_eq!(update.rate, 20);
    }

    #[test]
    fn percentage_must_grow() {
        let (mut progress, clock) = tracker(1000);
        assert!(progress.report(50).is_some());
        clock.advance(5000);
        assert!(progress.report(55).is_none());
        assert!(progress.report(60).is_some());
    }

    #[test]
    fn empty_total_is_complete() {
        let (mut progress, _clock) = tracker(0);
        assert_eq!(progress.percentage(0), 100);
        let update = progress.report(0).expect("report");
        assert_eq!(update.percentage, 100);
        assert!(progress.report(0).is_none());
    }

    #[test]
    fn summary_formats() {
        let (progress, clock) = tracker(1000);
        clock.advance(500);

        assert_eq!(
            progress.done("Inserted vertices").to_string(),
            "Inserted vertices 1000 in 500ms (2000 vertices/sec)"
        );
        assert_eq!(
            progress.done_with_size("Inserted vertices", 1536).to_string(),
            "Inserted vertices 1000 in 500ms (2000 vertices/sec, disk size: 1.5 KiB)"
        );
    }

    #[test]
    fn summary_for_partial_count() {
        let clock = ManualClock::new();
        let progress = ProgressTracker::with_clock(300, "edges", clock.clone());
        clock.advance(2000);

        let summary = progress.done_count_with_size("Inserted edges", 240, 0);
        assert_eq!(summary.total, 240);
        assert_eq!(summary.rate, 120);
        assert_eq!(summary.to_string(), "Inserted edges 240 in 2000ms (120 edges/sec, disk size: 0 B)");
    }

    #[test]
    fn zero_elapsed_is_floored() {
        let (progress, _clock) = tracker(7);
        let summary = progress.done("Inserted vertices");
        assert_eq!(summary.elapsed_ms, 0);
        assert_eq!(summary.rate, 7000);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
