use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::PhaseKind;

/// Every state change of a session produces an Event.
/// Hosts receive them through `PresentationPort::on_event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero (within the finish epsilon).
    TimerFinished {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
    /// A gym phase began counting down.
    PhaseStarted {
        index: usize,
        kind: PhaseKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
        label: String,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// The last gym phase finished.
    SequenceFinished {
        phases: usize,
        at: DateTime<Utc>,
    },
    /// A start request was refused, e.g. for a zero duration.
    StartRejected {
        reason: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Stable snake_case name, used as the tracing message field.
    pub fn name(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::TimerFinished { .. } => "timer_finished",
            Event::TimerStopped { .. } => "timer_stopped",
            Event::PhaseStarted { .. } => "phase_started",
            Event::SequenceFinished { .. } => "sequence_finished",
            Event::StartRejected { .. } => "start_rejected",
        }
    }
}
