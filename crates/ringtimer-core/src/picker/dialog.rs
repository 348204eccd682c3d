//! The picker modal: which value is being edited, how its wheels are laid
//! out, and what a confirm produces.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::wheel::{ValuePicker, WheelGeometry};
use crate::composer::{compose_count, compose_optional_time, compose_time};
use crate::error::ValidationError;
use crate::timer::MAX_ROUNDS;

pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerContext {
    StandardTime,
    Prep,
    Work,
    Rest,
    Rounds,
}

impl PickerContext {
    pub fn title(self) -> &'static str {
        match self {
            PickerContext::StandardTime => "Set time",
            PickerContext::Prep => "Set preparation",
            PickerContext::Work => "Set work",
            PickerContext::Rest => "Set rest",
            PickerContext::Rounds => "Set rounds",
        }
    }

    /// Rounds use a single centered wheel; everything else is minutes + seconds.
    pub fn is_single_column(self) -> bool {
        self == PickerContext::Rounds
    }
}

/// A confirmed edit, ready to be applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "context", rename_all = "snake_case")]
pub enum Selection {
    StandardTime { minutes: u32, seconds: u32 },
    Prep { secs: u32 },
    Work { secs: u32 },
    Rest { secs: u32 },
    Rounds { count: u32 },
}

#[derive(Debug, Clone)]
pub struct PickerDialog {
    context: Option<PickerContext>,
    minutes: ValuePicker,
    seconds: ValuePicker,
}

impl Default for PickerDialog {
    fn default() -> Self {
        Self::new(WheelGeometry::default(), super::wheel::DEFAULT_SETTLE_QUIET)
    }
}

impl PickerDialog {
    pub fn new(geometry: WheelGeometry, settle_quiet: Duration) -> Self {
        Self {
            context: None,
            minutes: ValuePicker::new(geometry, settle_quiet),
            seconds: ValuePicker::new(geometry, settle_quiet),
        }
    }

    pub fn context(&self) -> Option<PickerContext> {
        self.context
    }

    pub fn is_open(&self) -> bool {
        self.context.is_some()
    }

    /// First wheel: minutes, or the rounds count in single-column mode.
    pub fn minutes(&mut self) -> &mut ValuePicker {
        &mut self.minutes
    }

    pub fn seconds(&mut self) -> &mut ValuePicker {
        &mut self.seconds
    }

    /// Open for `context`. `initial` is total seconds for time contexts and
    /// the count for rounds.
    pub fn open_for(&mut self, context: PickerContext, initial: u32) {
        if context.is_single_column() {
            self.minutes.open(initial.clamp(1, MAX_ROUNDS), MAX_ROUNDS);
            self.seconds.cancel();
        } else {
            self.minutes.open(initial / 60, MAX_MINUTES);
            self.seconds.open(initial % 60, MAX_SECONDS);
        }
        debug!(?context, initial, "picker opened");
        self.context = Some(context);
    }

    /// Settle any wheel whose quiet period elapsed.
    pub fn poll(&mut self, now: Duration) -> bool {
        let a = self.minutes.poll(now);
        let b = self.seconds.poll(now);
        a || b
    }

    /// Confirm the wheels and close.
    ///
    /// Returns `Ok(None)` when the dialog is not open.
    ///
    /// # Errors
    ///
    /// A zero standard time fails with [`ValidationError::InvalidDuration`]
    /// and the dialog stays open so the caller can show a reject cue.
    pub fn confirm(&mut self) -> Result<Option<Selection>, ValidationError> {
        let Some(context) = self.context else {
            return Ok(None);
        };

        let selection = match context {
            PickerContext::Rounds => {
                self.minutes.confirm();
                Selection::Rounds {
                    count: compose_count(self.minutes.state()),
                }
            }
            PickerContext::StandardTime => {
                let minutes = self.minutes.confirm();
                let seconds = self.seconds.confirm();
                if let Err(err) = compose_time(self.minutes.state(), self.seconds.state()) {
                    self.reopen(minutes, seconds);
                    return Err(err);
                }
                Selection::StandardTime { minutes, seconds }
            }
            PickerContext::Prep => Selection::Prep {
                secs: self.confirm_optional_time()?,
            },
            PickerContext::Work => Selection::Work {
                secs: self.confirm_optional_time()?,
            },
            PickerContext::Rest => Selection::Rest {
                secs: self.confirm_optional_time()?,
            },
        };
        self.context = None;
        Ok(Some(selection))
    }

    pub fn cancel(&mut self) {
        self.minutes.cancel();
        self.seconds.cancel();
        self.context = None;
    }

    fn confirm_optional_time(&mut self) -> Result<u32, ValidationError> {
        self.minutes.confirm();
        self.seconds.confirm();
        compose_optional_time(self.minutes.state(), self.seconds.state())
    }

    fn reopen(&mut self, minutes: u32, seconds: u32) {
        self.minutes.open(minutes, MAX_MINUTES);
        self.seconds.open(seconds, MAX_SECONDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::DEFAULT_ITEM_HEIGHT;

    #[test]
    fn standard_time_round_trip_through_wheels() {
        let mut dialog = PickerDialog::default();
        dialog.open_for(PickerContext::StandardTime, 30);
        assert_eq!(dialog.minutes().value(), 0);
        assert_eq!(dialog.seconds().value(), 30);

        dialog.minutes().step(1);
        dialog
            .seconds()
            .on_scroll(-10.0 * DEFAULT_ITEM_HEIGHT, Duration::ZERO);
        assert_eq!(
            dialog.confirm(),
            Ok(Some(Selection::StandardTime {
                minutes: 1,
                seconds: 20
            }))
        );
        assert!(!dialog.is_open());
    }

    #[test]
    fn zero_standard_time_keeps_dialog_open() {
        let mut dialog = PickerDialog::default();
        dialog.open_for(PickerContext::StandardTime, 0);
        let err = dialog.confirm().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDuration { .. }));
        assert_eq!(dialog.context(), Some(PickerContext::StandardTime));
        assert!(dialog.minutes().is_open());
    }

    #[test]
    fn rest_may_be_zero() {
        let mut dialog = PickerDialog::default();
        dialog.open_for(PickerContext::Rest, 0);
        assert_eq!(dialog.confirm(), Ok(Some(Selection::Rest { secs: 0 })));
    }

    #[test]
    fn rounds_single_column_floors_at_one() {
        let mut dialog = PickerDialog::default();
        dialog.open_for(PickerContext::Rounds, 0);
        assert_eq!(dialog.minutes().value(), 1);
        dialog.minutes().step(-1);
        assert_eq!(dialog.minutes().value(), 0);
        assert_eq!(dialog.confirm(), Ok(Some(Selection::Rounds { count: 1 })));
    }

    #[test]
    fn rounds_initial_clamped_to_max() {
        let mut dialog = PickerDialog::default();
        dialog.open_for(PickerContext::Rounds, 150);
        assert_eq!(dialog.minutes().value(), 99);
    }

    #[test]
    fn cancel_produces_nothing() {
        let mut dialog = PickerDialog::default();
        dialog.open_for(PickerContext::Work, 45);
        dialog.cancel();
        assert_eq!(dialog.confirm(), Ok(None));
    }

    #[test]
    fn titles() {
        assert_eq!(PickerContext::StandardTime.title(), "Set time");
        assert!(PickerContext::Rounds.is_single_column());
        assert!(!PickerContext::Prep.is_single_column());
    }
}
