//! Terminal rendering of the timer.

use std::io::{self, Write};

use ringtimer_core::storage::CuesConfig;
use ringtimer_core::timer::format_secs;
use ringtimer_core::{Cue, Event, GymConfig, PresentationPort, RejectTarget};
use tracing::debug;

const BAR_WIDTH: usize = 30;

/// Draws a progress bar on one line and prints cues as terminal bells.
///
/// In JSON mode nothing but one event per line is written to stdout.
pub struct TerminalPort {
    json: bool,
    cues: CuesConfig,
    display_held: bool,
}

impl TerminalPort {
    pub fn new(json: bool, cues: CuesConfig) -> Self {
        Self {
            json,
            cues,
            display_held: false,
        }
    }

    fn line(&self, text: &str) {
        if !self.json {
            println!("\r{text:<width$}", width = BAR_WIDTH + 12);
        }
    }
}

/// `[#########.....]`, filled in proportion to the remaining fraction.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

impl PresentationPort for TerminalPort {
    fn render(&mut self, label: &str, fraction: f64) {
        if self.json {
            return;
        }
        let mut out = io::stdout().lock();
        let drawn = write!(out, "\r{label} {}", progress_bar(fraction, BAR_WIDTH))
            .and_then(|()| out.flush());
        if let Err(e) = drawn {
            debug!("progress line not drawn: {e}");
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        if !self.cues.enabled || self.json {
            return;
        }
        let text = match cue {
            Cue::Start => "start",
            Cue::PhaseTransition => "go",
            Cue::Finish => "done",
        };
        if self.cues.bell {
            print!("\x07");
        }
        self.line(&format!(">> {text}"));
    }

    fn request_active_display(&mut self) -> ringtimer_core::Result<()> {
        // A terminal never dims on its own; holding the lease is bookkeeping only.
        self.display_held = true;
        debug!("terminal display lease held");
        Ok(())
    }

    fn release_active_display(&mut self) {
        self.display_held = false;
        debug!("terminal display lease released");
    }

    fn show_phase(&mut self, label: &str) {
        self.line(label);
    }

    fn show_idle(&mut self, label: &str) {
        self.line(&format!("timer {label}"));
    }

    fn show_gym_config(&mut self, config: &GymConfig) {
        self.line(&format!(
            "prep {}  work {}  rest {}  rounds {}",
            format_secs(config.prep_sec),
            format_secs(config.work_sec),
            format_secs(config.rest_sec),
            config.rounds
        ));
    }

    fn reject(&mut self, target: RejectTarget) {
        let what = match target {
            RejectTarget::StandardTimer => "timer duration must be greater than zero",
            RejectTarget::Gym => "work duration must be greater than zero",
            RejectTarget::Picker => "picked time must be greater than zero",
        };
        eprintln!("rejected: {what}");
    }

    fn on_event(&mut self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("failed to encode event: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_with_fraction() {
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(0.5, 4), "[##..]");
        assert_eq!(progress_bar(0.0, 4), "[....]");
        assert_eq!(progress_bar(2.0, 4), "[####]");
    }

    #[test]
    fn display_lease_is_tracked() {
        let mut port = TerminalPort::new(true, CuesConfig::default());
        port.request_active_display().unwrap();
        assert!(port.display_held);
        port.release_active_display();
        assert!(!port.display_held);
    }
}
