//! Interval ("gym") phase sequencing.
//!
//! A [`GymConfig`] is flattened once into an ordered list of [`Phase`]s when a
//! session starts. The list is frozen for the whole run: editing the config
//! afterwards only affects the next session.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;

/// Upper bound of the rounds picker.
pub const MAX_ROUNDS: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Prep,
    Work,
    Rest,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::Prep => "Prep",
            PhaseKind::Work => "Work",
            PhaseKind::Rest => "Rest",
        }
    }
}

/// Interval training configuration, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymConfig {
    #[serde(default = "default_prep_sec")]
    pub prep_sec: u32,
    #[serde(default = "default_work_sec")]
    pub work_sec: u32,
    #[serde(default = "default_rest_sec")]
    pub rest_sec: u32,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

fn default_prep_sec() -> u32 {
    10
}
fn default_work_sec() -> u32 {
    30
}
fn default_rest_sec() -> u32 {
    20
}
fn default_rounds() -> u32 {
    3
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            prep_sec: default_prep_sec(),
            work_sec: default_work_sec(),
            rest_sec: default_rest_sec(),
            rounds: default_rounds(),
        }
    }
}

impl GymConfig {
    /// Rounds clamped into `[1, MAX_ROUNDS]`.
    pub fn effective_rounds(&self) -> u32 {
        self.rounds.clamp(1, MAX_ROUNDS)
    }

    /// Total seconds of all phases the config would produce.
    pub fn total_secs(&self) -> u64 {
        build_phases(self)
            .iter()
            .map(|p| u64::from(p.duration_secs))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration_secs: u32,
    /// 1-based round number; `None` for the preparation phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
}

impl Phase {
    pub fn prep(duration_secs: u32) -> Self {
        Self {
            kind: PhaseKind::Prep,
            duration_secs,
            round: None,
        }
    }

    pub fn work(duration_secs: u32, round: u32) -> Self {
        Self {
            kind: PhaseKind::Work,
            duration_secs,
            round: Some(round),
        }
    }

    pub fn rest(duration_secs: u32, round: u32) -> Self {
        Self {
            kind: PhaseKind::Rest,
            duration_secs,
            round: Some(round),
        }
    }

    /// Display label, e.g. `"Work • Round 2/3"`.
    pub fn label(&self, total_rounds: u32) -> String {
        match self.round {
            Some(round) => format!("{} • Round {}/{}", self.kind.label(), round, total_rounds),
            None => self.kind.label().to_string(),
        }
    }
}

pub type PhaseSequence = Vec<Phase>;

/// Flatten a config into phases: an optional prep, then per round one work
/// phase followed by a rest phase when `rest_sec > 0`.
pub fn build_phases(config: &GymConfig) -> PhaseSequence {
    let mut phases = Vec::with_capacity(1 + 2 * config.rounds as usize);
    if config.prep_sec > 0 {
        phases.push(Phase::prep(config.prep_sec));
    }
    for round in 1..=config.rounds {
        phases.push(Phase::work(config.work_sec, round));
        if config.rest_sec > 0 {
            phases.push(Phase::rest(config.rest_sec, round));
        }
    }
    phases
}

/// Result of [`PhaseSequencer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The next phase to run, with its 0-based index.
    Next { index: usize, phase: Phase },
    /// Past the last phase; the sequence is no longer active.
    Complete,
}

/// Walks a frozen phase list.
#[derive(Debug, Clone, Default)]
pub struct PhaseSequencer {
    phases: PhaseSequence,
    /// Index of the running phase; `None` before the first advance.
    index: Option<usize>,
    active: bool,
    total_rounds: u32,
}

impl PhaseSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn current(&self) -> Option<&Phase> {
        self.index.and_then(|i| self.phases.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// Whether another phase follows the current one.
    pub fn has_next(&self) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        self.active && next < self.phases.len()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Build the phase list and arm the sequencer. The caller advances to the
    /// first phase after playing its transition cue.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDuration`] when `work_sec` is zero.
    pub fn start_sequence(&mut self, config: &GymConfig) -> Result<&[Phase], ValidationError> {
        if config.work_sec == 0 {
            return Err(ValidationError::invalid_duration("work phase"));
        }
        let normalized = GymConfig {
            rounds: config.effective_rounds(),
            ..*config
        };
        self.phases = build_phases(&normalized);
        self.total_rounds = normalized.rounds;
        self.index = None;
        self.active = true;
        debug!(
            phases = self.phases.len(),
            rounds = self.total_rounds,
            "phase sequence built"
        );
        Ok(&self.phases)
    }

    pub fn advance(&mut self) -> Advance {
        if !self.active {
            return Advance::Complete;
        }
        let next = self.index.map_or(0, |i| i + 1);
        self.index = Some(next);
        match self.phases.get(next) {
            Some(phase) => Advance::Next {
                index: next,
                phase: *phase,
            },
            None => {
                self.active = false;
                Advance::Complete
            }
        }
    }

    pub fn stop_sequence(&mut self) {
        self.active = false;
        self.phases.clear();
        self.index = None;
    }
}
