//! Countdown engine implementation.
//!
//! The engine is a clock-reading state machine. It does not own a clock or a
//! thread - every command takes the current monotonic reading, and the caller
//! is responsible for calling `tick()` once per frame while running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Finished
//!   ^        |          |                    |
//!   +--------+----------+---- stop() --------+
//! ```
//!
//! Remaining time is always derived from `now - started_at`, never accumulated
//! from frame deltas, so a late or dropped frame cannot skew the countdown.
//! Resuming rewrites `started_at` as if the run had been executing without a
//! gap, which keeps the elapsed-time accounting continuous across any pause.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new();
//! engine.start(90, clock.now())?;
//! // Once per frame:
//! if let Some(tick) = engine.tick(clock.now()) {
//!     render(tick.progress);
//!     if tick.finished { /* finish path */ }
//! }
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::events::Event;

/// Remaining time at or below which a run counts as finished. Absorbs
/// scheduler jitter so the last frame does not have to land exactly on zero.
pub const DEFAULT_FINISH_EPSILON_SECS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Snapshot reported to the presentation layer on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub remaining_secs: f64,
    /// `remaining / total`, in `[0, 1]`.
    pub fraction: f64,
}

impl Progress {
    /// `mm:ss` label with floor-decomposed minutes and seconds.
    pub fn label(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// Result of a frame while running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub progress: Progress,
    /// True on exactly one tick per run: the one that crossed the finish epsilon.
    pub finished: bool,
}

/// Format fractional seconds as `mm:ss`.
pub fn format_clock(secs: f64) -> String {
    let secs = secs.max(0.0);
    let minutes = (secs / 60.0).floor() as u64;
    let seconds = (secs % 60.0).floor() as u64;
    format!("{minutes:02}:{seconds:02}")
}

/// Format whole seconds as `mm:ss`.
pub fn format_secs(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Core countdown engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    status: RunStatus,
    total_secs: u32,
    /// Clock reading (seconds) at which the current run notionally began.
    started_at: Option<f64>,
    /// Remaining time as of the last tick or command.
    remaining_secs: f64,
    /// Remaining time frozen at pause.
    paused_remaining_secs: f64,
    finish_epsilon_secs: f64,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self::with_finish_epsilon(DEFAULT_FINISH_EPSILON_SECS)
    }

    pub fn with_finish_epsilon(finish_epsilon_secs: f64) -> Self {
        Self {
            status: RunStatus::Idle,
            total_secs: 0,
            started_at: None,
            remaining_secs: 0.0,
            paused_remaining_secs: 0.0,
            finish_epsilon_secs: finish_epsilon_secs.max(0.0),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == RunStatus::Paused
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    pub fn paused_remaining_secs(&self) -> f64 {
        self.paused_remaining_secs
    }

    pub fn progress(&self) -> Progress {
        let fraction = if self.total_secs > 0 {
            (self.remaining_secs / f64::from(self.total_secs)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Progress {
            remaining_secs: self.remaining_secs,
            fraction,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new run from Idle or Finished.
    ///
    /// Returns `Ok(None)` while a run is already Running or Paused.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDuration`] for a zero duration.
    pub fn start(&mut self, duration_secs: u32, now: Duration) -> Result<Option<Event>, ValidationError> {
        if duration_secs == 0 {
            return Err(ValidationError::invalid_duration("countdown"));
        }
        match self.status {
            RunStatus::Idle | RunStatus::Finished => {
                self.status = RunStatus::Running;
                self.total_secs = duration_secs;
                self.started_at = Some(now.as_secs_f64());
                self.remaining_secs = f64::from(duration_secs);
                self.paused_remaining_secs = 0.0;
                debug!(duration_secs, "countdown started");
                Ok(Some(Event::TimerStarted {
                    duration_secs,
                    at: Utc::now(),
                }))
            }
            RunStatus::Running | RunStatus::Paused => Ok(None),
        }
    }

    /// Advance one frame. Returns `None` unless Running.
    pub fn tick(&mut self, now: Duration) -> Option<Tick> {
        if self.status != RunStatus::Running {
            return None;
        }
        self.remaining_secs = self.remaining_at(now);
        let finished = self.remaining_secs <= self.finish_epsilon_secs;
        if finished {
            self.status = RunStatus::Finished;
            self.started_at = None;
            self.remaining_secs = 0.0;
            debug!(total_secs = self.total_secs, "countdown finished");
        }
        Some(Tick {
            progress: self.progress(),
            finished,
        })
    }

    pub fn pause(&mut self, now: Duration) -> Option<Event> {
        if self.status != RunStatus::Running {
            return None;
        }
        self.remaining_secs = self.remaining_at(now);
        self.paused_remaining_secs = self.remaining_secs;
        self.status = RunStatus::Paused;
        self.started_at = None;
        debug!(remaining_secs = self.paused_remaining_secs, "countdown paused");
        Some(Event::TimerPaused {
            remaining_secs: self.paused_remaining_secs,
            at: Utc::now(),
        })
    }

    /// Continue a paused run.
    ///
    /// A pause captured with nothing left is dropped back to Idle without
    /// restarting, and `None` is returned.
    pub fn resume(&mut self, now: Duration) -> Option<Event> {
        if self.status != RunStatus::Paused {
            return None;
        }
        if self.paused_remaining_secs <= 0.0 {
            self.status = RunStatus::Idle;
            self.paused_remaining_secs = 0.0;
            self.remaining_secs = 0.0;
            return None;
        }
        let elapsed_before_pause = f64::from(self.total_secs) - self.paused_remaining_secs;
        self.started_at = Some(now.as_secs_f64() - elapsed_before_pause);
        self.remaining_secs = self.paused_remaining_secs;
        self.status = RunStatus::Running;
        debug!(remaining_secs = self.remaining_secs, "countdown resumed");
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Return to Idle from any state.
    pub fn stop(&mut self) -> Event {
        self.status = RunStatus::Idle;
        self.started_at = None;
        self.remaining_secs = 0.0;
        self.paused_remaining_secs = 0.0;
        debug!("countdown stopped");
        Event::TimerStopped { at: Utc::now() }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn remaining_at(&self, now: Duration) -> f64 {
        match self.started_at {
            Some(started) => {
                let elapsed = now.as_secs_f64() - started;
                (f64::from(self.total_secs) - elapsed).max(0.0)
            }
            None => self.remaining_secs,
        }
    }
}
