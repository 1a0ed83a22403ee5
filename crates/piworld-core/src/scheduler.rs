//! Refresh scheduler with explicit start / stop / dispose.
//!
//! The scheduler does not own a thread or a timer. Hosts call
//! [`Scheduler::poll`] from whatever loop they already run (a TUI frame loop,
//! a tokio task) and execute the jobs it returns. Each job keeps its own
//! deadline, so the sensor and system-info cycles drift independently.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// A periodic refresh the dashboard knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshJob {
    Sensors,
    SystemInfo,
}

impl fmt::Display for RefreshJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensors => write!(f, "sensors"),
            Self::SystemInfo => write!(f, "system_info"),
        }
    }
}

/// Lifecycle of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
    Disposed,
}

#[derive(Debug, Clone)]
struct Entry {
    job: RefreshJob,
    period: Duration,
    next_due: Option<Instant>,
}

/// Tracks when each [`RefreshJob`] is next due.
#[derive(Debug, Clone)]
pub struct Scheduler {
    entries: Vec<Entry>,
    state: SchedulerState,
}

impl Scheduler {
    /// Build a stopped scheduler. Jobs are reported by [`poll`](Self::poll)
    /// in the order given here.
    pub fn new(jobs: &[(RefreshJob, Duration)]) -> Result<Self, DashboardError> {
        let mut entries = Vec::with_capacity(jobs.len());
        for &(job, period) in jobs {
            if period.is_zero() {
                return Err(DashboardError::InvalidInterval(period));
            }
            entries.push(Entry {
                job,
                period,
                next_due: None,
            });
        }
        Ok(Self {
            entries,
            state: SchedulerState::Stopped,
        })
    }

    /// Arm every job one period after `now`. No-op while already running.
    pub fn start(&mut self, now: Instant) -> Result<(), DashboardError> {
        match self.state {
            SchedulerState::Disposed => return Err(DashboardError::SchedulerDisposed),
            SchedulerState::Running => return Ok(()),
            SchedulerState::Stopped => {}
        }
        for entry in &mut self.entries {
            entry.next_due = Some(now + entry.period);
        }
        self.state = SchedulerState::Running;
        log::debug!("scheduler started with {} jobs", self.entries.len());
        Ok(())
    }

    /// Disarm every job. The scheduler can be started again.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Stopped;
            log::debug!("scheduler stopped");
        }
        self.disarm();
    }

    /// Stop for good. Later [`start`](Self::start) calls fail.
    pub fn dispose(&mut self) {
        self.disarm();
        self.state = SchedulerState::Disposed;
    }

    fn disarm(&mut self) {
        for entry in &mut self.entries {
            entry.next_due = None;
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn period(&self, job: RefreshJob) -> Option<Duration> {
        self.entries.iter().find(|e| e.job == job).map(|e| e.period)
    }

    /// Return the jobs due at `now` and re-arm them.
    ///
    /// A job that missed several periods fires once and is re-armed on the
    /// next period boundary after `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<RefreshJob> {
        if !self.is_running() {
            return Vec::new();
        }
        let mut due = Vec::new();
        for entry in &mut self.entries {
            let Some(deadline) = entry.next_due else {
                continue;
            };
            if deadline > now {
                continue;
            }
            let mut next = deadline + entry.period;
            while next <= now {
                next += entry.period;
            }
            entry.next_due = Some(next);
            due.push(entry.job);
        }
        due
    }

    /// Earliest pending deadline, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().filter_map(|e| e.next_due).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn dashboard_scheduler() -> Scheduler {
        Scheduler::new(&[
            (RefreshJob::Sensors, ms(2000)),
            (RefreshJob::SystemInfo, ms(5000)),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_zero_period() {
        let err = Scheduler::new(&[(RefreshJob::Sensors, Duration::ZERO)]).unwrap_err();
        assert_eq!(err, DashboardError::InvalidInterval(Duration::ZERO));
    }

    #[test]
    fn nothing_fires_before_start() {
        let mut s = dashboard_scheduler();
        let t0 = Instant::now();
        assert_eq!(s.state(), SchedulerState::Stopped);
        assert!(s.poll(t0 + ms(60_000)).is_empty());
        assert!(s.next_deadline().is_none());
    }

    #[test]
    fn independent_cycles() {
        let mut s = dashboard_scheduler();
        let t0 = Instant::now();
        s.start(t0).unwrap();

        assert!(s.poll(t0 + ms(1999)).is_empty());
        assert_eq!(s.poll(t0 + ms(2000)), vec![RefreshJob::Sensors]);
        assert_eq!(s.poll(t0 + ms(4000)), vec![RefreshJob::Sensors]);
        assert_eq!(s.poll(t0 + ms(5000)), vec![RefreshJob::SystemInfo]);
        assert_eq!(s.poll(t0 + ms(6000)), vec![RefreshJob::Sensors]);
        assert_eq!(
            s.poll(t0 + ms(10_000)),
            vec![RefreshJob::Sensors, RefreshJob::SystemInfo]
        );
    }

    #[test]
    fn ten_seconds_of_ticks() {
        let mut s = dashboard_scheduler();
        let t0 = Instant::now();
        s.start(t0).unwrap();
        let mut sensors = 0;
        let mut system = 0;
        for step in 1..=100 {
            for job in s.poll(t0 + ms(step * 100)) {
                match job {
                    RefreshJob::Sensors => sensors += 1,
                    RefreshJob::SystemInfo => system += 1,
                }
            }
        }
        assert_eq!(sensors, 5);
        assert_eq!(system, 2);
    }

    #[test]
    fn missed_periods_fire_once() {
        let mut s = Scheduler::new(&[(RefreshJob::Sensors, ms(2000))]).unwrap();
        let t0 = Instant::now();
        s.start(t0).unwrap();
        assert_eq!(s.poll(t0 + ms(9000)), vec![RefreshJob::Sensors]);
        assert_eq!(s.next_deadline(), Some(t0 + ms(10_000)));
        assert!(s.poll(t0 + ms(9500)).is_empty());
    }

    #[test]
    fn stop_and_restart() {
        let mut s = dashboard_scheduler();
        let t0 = Instant::now();
        s.start(t0).unwrap();
        s.stop();
        assert!(!s.is_running());
        assert!(s.poll(t0 + ms(20_000)).is_empty());

        let t1 = t0 + ms(20_000);
        s.start(t1).unwrap();
        assert_eq!(s.next_deadline(), Some(t1 + ms(2000)));
        assert_eq!(s.poll(t1 + ms(2000)), vec![RefreshJob::Sensors]);
    }

    #[test]
    fn start_while_running_keeps_deadlines() {
        let mut s = dashboard_scheduler();
        let t0 = Instant::now();
        s.start(t0).unwrap();
        s.start(t0 + ms(1500)).unwrap();
        assert_eq!(s.next_deadline(), Some(t0 + ms(2000)));
    }

    #[test]
    fn dispose_is_final() {
        let mut s = dashboard_scheduler();
        let t0 = Instant::now();
        s.start(t0).unwrap();
        s.dispose();
        assert_eq!(s.state(), SchedulerState::Disposed);
        assert!(s.poll(t0 + ms(5000)).is_empty());
        assert_eq!(s.start(t0), Err(DashboardError::SchedulerDisposed));
        s.stop();
        assert_eq!(s.state(), SchedulerState::Disposed);
    }

    #[test]
    fn period_lookup() {
        let s = dashboard_scheduler();
        assert_eq!(s.period(RefreshJob::SystemInfo), Some(ms(5000)));
    }
}
