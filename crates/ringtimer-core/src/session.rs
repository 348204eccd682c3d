//! Host-facing timer session.
//!
//! A [`TimerSession`] wires the [`CountdownEngine`] and [`PhaseSequencer`] to a
//! clock, a frame scheduler and a presentation port. Every method runs to
//! completion on the caller's thread; the only re-entry point is
//! [`TimerSession::on_frame`], and only the single outstanding
//! [`TickHandle`] is honored there, so two countdown loops can never overlap.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use chrono::Utc;

use crate::clock::Clock;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::picker::{PickerContext, PickerDialog, Selection, MAX_MINUTES, MAX_SECONDS};
use crate::presentation::{ActiveDisplay, Cue, PresentationPort, RejectTarget};
use crate::scheduler::{TickHandle, TickScheduler};
use crate::timer::{
    format_secs, Advance, CountdownEngine, GymConfig, PhaseSequencer, RunStatus, MAX_ROUNDS,
};

/// Duration chosen for the standard timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardSelection {
    #[serde(default)]
    pub minutes: u32,
    #[serde(default = "default_seconds")]
    pub seconds: u32,
}

fn default_seconds() -> u32 {
    30
}

impl Default for StandardSelection {
    fn default() -> Self {
        Self {
            minutes: 0,
            seconds: default_seconds(),
        }
    }
}

impl StandardSelection {
    /// Selection with both fields clamped to the picker ranges.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// What a click on the clock face did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Paused,
    Resumed,
    /// Nothing was running; the host should open the time picker.
    OpenPicker,
}

pub struct TimerSession<C, S, P> {
    clock: C,
    scheduler: S,
    port: P,
    engine: CountdownEngine,
    sequencer: PhaseSequencer,
    display: ActiveDisplay,
    pending_tick: Option<TickHandle>,
    selection: StandardSelection,
    gym: GymConfig,
}

impl<C, S, P> TimerSession<C, S, P>
where
    C: Clock,
    S: TickScheduler,
    P: PresentationPort,
{
    pub fn new(clock: C, scheduler: S, port: P) -> Self {
        Self {
            clock,
            scheduler,
            port,
            engine: CountdownEngine::new(),
            sequencer: PhaseSequencer::new(),
            display: ActiveDisplay::new(),
            pending_tick: None,
            selection: StandardSelection::default(),
            gym: GymConfig::default(),
        }
    }

    pub fn with_engine(mut self, engine: CountdownEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Use `selection` as the standard duration, clamped to the picker ranges.
    pub fn with_selection(mut self, selection: StandardSelection) -> Self {
        self.selection = StandardSelection::new(selection.minutes, selection.seconds);
        self
    }

    pub fn with_gym_config(mut self, gym: GymConfig) -> Self {
        self.gym = gym;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> RunStatus {
        self.engine.status()
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn sequencer(&self) -> &PhaseSequencer {
        &self.sequencer
    }

    pub fn selection(&self) -> StandardSelection {
        self.selection
    }

    pub fn gym_config(&self) -> GymConfig {
        self.gym
    }

    pub fn is_gym_active(&self) -> bool {
        self.sequencer.is_active()
    }

    pub fn display_held(&self) -> bool {
        self.display.is_held()
    }

    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.pending_tick
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Value a picker opened for `context` should start from.
    pub fn picker_initial(&self, context: PickerContext) -> u32 {
        match context {
            PickerContext::StandardTime => self.selection.total_secs(),
            PickerContext::Prep => self.gym.prep_sec,
            PickerContext::Work => self.gym.work_sec,
            PickerContext::Rest => self.gym.rest_sec,
            PickerContext::Rounds => self.gym.rounds.clamp(1, MAX_ROUNDS),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the standard timer with the selected duration, or resume it if paused.
    ///
    /// # Errors
    ///
    /// A zero selection is rejected with a visible cue and
    /// [`ValidationError::InvalidDuration`].
    pub fn start_standard(&mut self) -> Result<()> {
        match self.engine.status() {
            RunStatus::Running => return Ok(()),
            RunStatus::Paused => {
                self.resume();
                return Ok(());
            }
            RunStatus::Idle | RunStatus::Finished => {}
        }
        let duration = self.selection.total_secs();
        if duration == 0 {
            self.port.reject(RejectTarget::StandardTimer);
            self.emit(Event::StartRejected {
                reason: "zero duration".into(),
                at: Utc::now(),
            });
            return Err(ValidationError::invalid_duration("standard timer").into());
        }
        self.port.play_cue(Cue::Start);
        self.begin_run(duration)
    }

    /// Build the phase list from the current gym config and run its first phase.
    ///
    /// # Errors
    ///
    /// A zero work duration is rejected with a visible cue and
    /// [`ValidationError::InvalidDuration`].
    pub fn start_gym(&mut self) -> Result<()> {
        if matches!(self.engine.status(), RunStatus::Running | RunStatus::Paused) {
            debug!("gym start ignored while a countdown is active");
            return Ok(());
        }
        if let Err(err) = self.sequencer.start_sequence(&self.gym) {
            self.port.reject(RejectTarget::Gym);
            self.emit(Event::StartRejected {
                reason: err.to_string(),
                at: Utc::now(),
            });
            return Err(err.into());
        }
        info!(
            phases = self.sequencer.phases().len(),
            rounds = self.sequencer.total_rounds(),
            "gym session started"
        );
        self.port.play_cue(Cue::PhaseTransition);
        self.next_phase()
    }

    pub fn pause(&mut self) -> bool {
        let Some(event) = self.engine.pause(self.clock.now()) else {
            return false;
        };
        self.cancel_pending_tick();
        self.display.release(&mut self.port);
        let progress = self.engine.progress();
        self.port.render(&progress.label(), progress.fraction);
        self.emit(event);
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.engine.is_paused() {
            return false;
        }
        match self.engine.resume(self.clock.now()) {
            Some(event) => {
                self.emit(event);
                self.display.acquire(&mut self.port);
                self.schedule_tick();
                true
            }
            None => {
                // Nothing was left when paused; the engine dropped back to Idle.
                let was_gym = self.sequencer.is_active();
                self.sequencer.stop_sequence();
                self.show_configuration(was_gym);
                false
            }
        }
    }

    /// Abort whatever is running and return to the configuration view.
    pub fn stop(&mut self) {
        self.cancel_pending_tick();
        let event = self.engine.stop();
        let was_gym = self.sequencer.is_active();
        self.sequencer.stop_sequence();
        self.display.release(&mut self.port);
        self.emit(event);
        self.show_configuration(was_gym);
    }

    /// Clock-face click: pause a running countdown, resume a paused one,
    /// otherwise ask the host to open the picker.
    pub fn toggle(&mut self) -> ToggleOutcome {
        match self.engine.status() {
            RunStatus::Running => {
                self.pause();
                ToggleOutcome::Paused
            }
            RunStatus::Paused => {
                if self.resume() {
                    ToggleOutcome::Resumed
                } else {
                    ToggleOutcome::OpenPicker
                }
            }
            RunStatus::Idle | RunStatus::Finished => ToggleOutcome::OpenPicker,
        }
    }

    /// Deliver a frame. Stale handles are ignored.
    ///
    /// # Errors
    ///
    /// Propagates a failure to start the next gym phase.
    pub fn on_frame(&mut self, handle: TickHandle) -> Result<()> {
        if self.pending_tick != Some(handle) {
            trace!(?handle, "stale frame ignored");
            return Ok(());
        }
        self.pending_tick = None;

        let Some(tick) = self.engine.tick(self.clock.now()) else {
            return Ok(());
        };
        self.port
            .render(&tick.progress.label(), tick.progress.fraction);
        if tick.finished {
            self.on_run_finished()
        } else {
            self.schedule_tick();
            Ok(())
        }
    }

    /// The page became visible or hidden. Backgrounding may have silently
    /// dropped the display lease, so it is re-requested for an active run.
    pub fn on_visibility_change(&mut self, visible: bool) {
        if visible && self.engine.is_running() && !self.display.is_held() {
            self.display.acquire(&mut self.port);
        }
    }

    /// The host released the display lease without being asked.
    pub fn on_display_released(&mut self) {
        self.display.mark_lost();
    }

    /// Apply a confirmed picker value. Phases of a running gym session are
    /// already built and are not affected.
    pub fn apply(&mut self, selection: Selection) {
        let idle = matches!(self.engine.status(), RunStatus::Idle | RunStatus::Finished);
        match selection {
            Selection::StandardTime { minutes, seconds } => {
                self.selection = StandardSelection::new(minutes, seconds);
                if idle && !self.sequencer.is_active() {
                    self.port.show_idle(&self.selection.label());
                }
            }
            Selection::Prep { secs } => self.gym.prep_sec = secs,
            Selection::Work { secs } => self.gym.work_sec = secs,
            Selection::Rest { secs } => self.gym.rest_sec = secs,
            Selection::Rounds { count } => self.gym.rounds = count.clamp(1, MAX_ROUNDS),
        }
        if !matches!(selection, Selection::StandardTime { .. }) && !self.sequencer.is_active() {
            self.port.show_gym_config(&self.gym);
        }
        debug!(?selection, "picker value applied");
    }

    /// Confirm an open picker dialog and apply its value.
    ///
    /// Returns `Ok(None)` when the dialog was not open.
    ///
    /// # Errors
    ///
    /// A rejected value (a zero standard time) is shown on the picker and
    /// returned; the dialog stays open.
    pub fn confirm_picker(&mut self, dialog: &mut PickerDialog) -> Result<Option<Selection>> {
        match dialog.confirm() {
            Ok(Some(selection)) => {
                self.apply(selection);
                Ok(Some(selection))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                self.port.reject(RejectTarget::Picker);
                Err(err.into())
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_run(&mut self, duration_secs: u32) -> Result<()> {
        self.cancel_pending_tick();
        if let Some(event) = self.engine.start(duration_secs, self.clock.now())? {
            self.emit(event);
        }
        self.port.render(&format_secs(duration_secs), 1.0);
        self.display.acquire(&mut self.port);
        self.schedule_tick();
        Ok(())
    }

    fn next_phase(&mut self) -> Result<()> {
        match self.sequencer.advance() {
            Advance::Next { index, phase } => {
                let label = phase.label(self.sequencer.total_rounds());
                self.port.show_phase(&label);
                self.emit(Event::PhaseStarted {
                    index,
                    kind: phase.kind,
                    round: phase.round,
                    label,
                    duration_secs: phase.duration_secs,
                    at: Utc::now(),
                });
                self.begin_run(phase.duration_secs)
            }
            Advance::Complete => {
                self.finish(true);
                Ok(())
            }
        }
    }

    fn on_run_finished(&mut self) -> Result<()> {
        self.emit(Event::TimerFinished {
            duration_secs: self.engine.total_secs(),
            at: Utc::now(),
        });
        if self.sequencer.is_active() {
            if self.sequencer.has_next() {
                self.port.play_cue(Cue::PhaseTransition);
                return self.next_phase();
            }
            self.finish(true);
        } else {
            self.finish(false);
        }
        Ok(())
    }

    fn finish(&mut self, gym: bool) {
        self.cancel_pending_tick();
        self.port.play_cue(Cue::Finish);
        if gym {
            let phases = self.sequencer.phases().len();
            self.sequencer.stop_sequence();
            self.emit(Event::SequenceFinished {
                phases,
                at: Utc::now(),
            });
        }
        self.display.release(&mut self.port);
        self.show_configuration(gym);
    }

    fn show_configuration(&mut self, gym: bool) {
        if gym {
            self.port.show_gym_config(&self.gym);
        } else {
            self.port.show_idle(&self.selection.label());
        }
    }

    fn schedule_tick(&mut self) {
        self.cancel_pending_tick();
        self.pending_tick = Some(self.scheduler.schedule_tick());
    }

    fn cancel_pending_tick(&mut self) {
        if let Some(handle) = self.pending_tick.take() {
            self.scheduler.cancel_tick(handle);
        }
    }

    fn emit(&mut self, event: Event) {
        info!(event = event.name(), "timer event");
        self.port.on_event(&event);
    }
}
