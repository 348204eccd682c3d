//! # ringtimer Core Library
//!
//! Countdown and interval ("gym") timer logic with a scroll-wheel value
//! picker. The library owns no thread, timer or window: hosts supply a
//! [`Clock`], a [`TickScheduler`] for frame callbacks and a
//! [`PresentationPort`] for rendering, cues and the display wake-lock.
//!
//! ## Architecture
//!
//! - **Picker**: wheel model with geometry-nearest selection and a debounced
//!   settle, plus the dialog that maps confirmed values onto timer settings
//! - **Composer**: minutes/seconds to durations, rounds counts
//! - **Timer**: the countdown state machine and the interval phase sequencer
//! - **Session**: wires the timer to the host boundaries
//! - **Storage**: TOML configuration of defaults
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: countdown state machine
//! - [`PhaseSequencer`]: gym phase list walker
//! - [`ValuePicker`]: wheel picker
//! - [`TimerSession`]: host-facing runtime
//! - [`Config`]: application configuration

pub mod clock;
pub mod composer;
pub mod error;
pub mod events;
pub mod picker;
pub mod presentation;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use composer::{compose_count, compose_optional_time, compose_time};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use picker::{PickerContext, PickerDialog, PickerState, Selection, ValuePicker, WheelGeometry};
pub use presentation::{ActiveDisplay, Cue, PresentationPort, RecordingPort, RejectTarget};
pub use scheduler::{FrameScheduler, TickHandle, TickScheduler};
pub use session::{StandardSelection, TimerSession, ToggleOutcome};
pub use storage::Config;
pub use timer::{
    build_phases, CountdownEngine, GymConfig, Phase, PhaseKind, PhaseSequencer, Progress,
    RunStatus,
};
