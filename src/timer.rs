use std::time::Duration;

use chrono::{DateTime, Local};

pub const MIN_TARGET_MINUTES: u32 = 1;
pub const MAX_TARGET_MINUTES: u32 = 99;
pub const DEFAULT_TARGET_MINUTES: u32 = 25;

pub fn clamp_target_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_TARGET_MINUTES, MAX_TARGET_MINUTES)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Idle,
    Running,
    Paused,
}

/// Snapshot taken when a session opens: the wall-clock start and the target
/// in effect at that moment. The target may change mid-session; the record
/// keeps the value the session was started against.
#[derive(Clone, Debug)]
struct OpenSession {
    started_wall: DateTime<Local>,
    target_minutes: u32,
}

/// A completed run segment, handed to the session log for id assignment
/// and formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct FinishedSession {
    pub started_wall: DateTime<Local>,
    pub ended_wall: DateTime<Local>,
    pub target_minutes: u32,
    pub elapsed: Duration,
}

/// The timer state machine. All mutation goes through the transition
/// methods; `run_mode == Running` exactly when `started_at` is set.
#[derive(Debug)]
pub struct TimerState {
    run_mode: RunMode,
    /// Monotonic reading at the moment the current run segment began.
    started_at: Option<Duration>,
    /// Elapsed time banked from prior run segments.
    accumulated: Duration,
    target_minutes: u32,
    open_session: Option<OpenSession>,
}

impl TimerState {
    pub fn new(target_minutes: u32) -> Self {
        Self {
            run_mode: RunMode::Idle,
            started_at: None,
            accumulated: Duration::ZERO,
            target_minutes: clamp_target_minutes(target_minutes),
            open_session: None,
        }
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn target_minutes(&self) -> u32 {
        self.target_minutes
    }

    pub fn target(&self) -> Duration {
        Duration::from_secs(u64::from(self.target_minutes) * 60)
    }

    pub fn is_running(&self) -> bool {
        self.run_mode == RunMode::Running
    }

    /// Effective elapsed time at the given monotonic reading.
    pub fn elapsed(&self, now: Duration) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + now.saturating_sub(started),
            None => self.accumulated,
        }
    }

    /// Idle/Paused -> Running. From Idle with nothing banked this opens a
    /// new session; from Paused it resumes the open one. No-op if already
    /// running.
    pub fn start(&mut self, now: Duration, wall: DateTime<Local>) {
        if self.run_mode == RunMode::Running {
            return;
        }
        if self.open_session.is_none() {
            self.open_session = Some(OpenSession {
                started_wall: wall,
                target_minutes: self.target_minutes,
            });
        }
        self.started_at = Some(now);
        self.run_mode = RunMode::Running;
    }

    /// Running -> Paused. Banks the open segment exactly once and clears
    /// `started_at` in the same update. No-op in any other state.
    pub fn pause(&mut self, now: Duration) {
        let Some(started) = self.started_at else {
            return;
        };
        if self.run_mode != RunMode::Running {
            return;
        }
        self.accumulated += now.saturating_sub(started);
        self.started_at = None;
        self.run_mode = RunMode::Paused;
    }

    /// Any state -> Idle. If a session is open with nonzero effective
    /// elapsed, returns it for the caller to finalize into the log.
    /// All timing fields are cleared unconditionally.
    pub fn reset(&mut self, now: Duration, wall: DateTime<Local>) -> Option<FinishedSession> {
        let elapsed = self.elapsed(now);
        let finished = self.open_session.take().and_then(|open| {
            if elapsed.is_zero() {
                return None;
            }
            Some(FinishedSession {
                started_wall: open.started_wall,
                ended_wall: wall,
                target_minutes: open.target_minutes,
                elapsed,
            })
        });

        self.run_mode = RunMode::Idle;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        finished
    }

    /// Clamps into [1, 99] and returns the applied value. Legal in any
    /// state; never touches banked elapsed time.
    pub fn set_target(&mut self, minutes: u32) -> u32 {
        self.target_minutes = clamp_target_minutes(minutes);
        self.target_minutes
    }
}
