//! Boundary between the timer core and whatever draws it.
//!
//! Rendering, sound and the screen wake-lock are host concerns. The core only
//! tells the host *what* happened through [`PresentationPort`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::events::Event;
use crate::timer::GymConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Start,
    Finish,
    /// "Go" signal played before every gym phase, including the first.
    PhaseTransition,
}

/// What a visible "shake" rejection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectTarget {
    StandardTimer,
    Gym,
    Picker,
}

pub trait PresentationPort {
    /// Per-frame progress: `mm:ss` label and `remaining / total`.
    fn render(&mut self, label: &str, fraction: f64);

    /// Fire-and-forget cue. Returning means the cue was dispatched.
    fn play_cue(&mut self, cue: Cue);

    /// Best-effort request to keep the display awake.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::CapabilityUnavailable`] when the host cannot
    /// provide it. The countdown carries on regardless.
    fn request_active_display(&mut self) -> Result<()>;

    fn release_active_display(&mut self);

    /// Label of the gym phase now counting down.
    fn show_phase(&mut self, label: &str);

    /// Back to the standard timer's idle face, showing the selected duration.
    fn show_idle(&mut self, label: &str);

    /// Back to the gym configuration view.
    fn show_gym_config(&mut self, config: &GymConfig);

    fn reject(&mut self, _target: RejectTarget) {}

    fn on_event(&mut self, _event: &Event) {}
}

/// Tracks the single display-active lease.
///
/// Requests while held are no-ops and release happens at most once per
/// acquisition, so host calls always pair up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveDisplay {
    held: bool,
}

impl ActiveDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Returns whether the lease is held afterwards.
    pub fn acquire<P: PresentationPort + ?Sized>(&mut self, port: &mut P) -> bool {
        if self.held {
            return true;
        }
        match port.request_active_display() {
            Ok(()) => {
                debug!("display lease acquired");
                self.held = true;
            }
            Err(e) => warn!("keeping display active is unavailable: {e}"),
        }
        self.held
    }

    pub fn release<P: PresentationPort + ?Sized>(&mut self, port: &mut P) {
        if self.held {
            port.release_active_display();
            self.held = false;
            debug!("display lease released");
        }
    }

    /// The host dropped the lease on its own, e.g. while backgrounded.
    pub fn mark_lost(&mut self) {
        self.held = false;
    }
}

/// Headless port that records every call. Useful for tests and scripted hosts.
#[derive(Debug, Clone, Default)]
pub struct RecordingPort {
    pub renders: Vec<(String, f64)>,
    pub cues: Vec<Cue>,
    pub phases: Vec<String>,
    pub idle_labels: Vec<String>,
    pub gym_views: Vec<GymConfig>,
    pub rejects: Vec<RejectTarget>,
    pub events: Vec<Event>,
    pub display_requests: usize,
    pub display_releases: usize,
    /// When set, display requests fail with `CapabilityUnavailable`.
    pub display_unavailable: bool,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_render(&self) -> Option<&(String, f64)> {
        self.renders.last()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(Event::name).collect()
    }
}

impl PresentationPort for RecordingPort {
    fn render(&mut self, label: &str, fraction: f64) {
        self.renders.push((label.to_string(), fraction));
    }

    fn play_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn request_active_display(&mut self) -> Result<()> {
        self.display_requests += 1;
        if self.display_unavailable {
            return Err(crate::CoreError::CapabilityUnavailable {
                capability: "active display".into(),
                message: "not supported".into(),
            });
        }
        Ok(())
    }

    fn release_active_display(&mut self) {
        self.display_releases += 1;
    }

    fn show_phase(&mut self, label: &str) {
        self.phases.push(label.to_string());
    }

    fn show_idle(&mut self, label: &str) {
        self.idle_labels.push(label.to_string());
    }

    fn show_gym_config(&mut self, config: &GymConfig) {
        self.gym_views.push(*config);
    }

    fn reject(&mut self, target: RejectTarget) {
        self.rejects.push(target);
    }

    fn on_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
