//! Argument types shared by the timer commands.
//!
//! Command-line values go through the same picker wheels the interactive UI
//! uses, so out-of-range input is clamped the way a wheel would clamp it.

use clap::Args;
use ringtimer_core::picker::{MAX_MINUTES, MAX_SECONDS};
use ringtimer_core::{Config, GymConfig, PickerContext, PickerDialog, Selection, ValidationError};

/// A duration written as `mm:ss` or as plain seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockValue {
    pub minutes: u32,
    pub seconds: u32,
}

/// Parse `"1:30"` or `"90"`.
pub fn parse_clock(s: &str) -> Result<ClockValue, String> {
    let number = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid duration '{s}', expected mm:ss or seconds"))
    };
    match s.split_once(':') {
        Some((m, sec)) => Ok(ClockValue {
            minutes: number(m)?,
            seconds: number(sec)?,
        }),
        None => {
            let total = number(s)?;
            Ok(ClockValue {
                minutes: total / 60,
                seconds: total % 60,
            })
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct GymArgs {
    /// Preparation time (mm:ss or seconds); 0 skips it
    #[arg(long, value_parser = parse_clock)]
    pub prep: Option<ClockValue>,
    /// Work time per round (mm:ss or seconds)
    #[arg(long, value_parser = parse_clock)]
    pub work: Option<ClockValue>,
    /// Rest time per round (mm:ss or seconds); 0 skips it
    #[arg(long, value_parser = parse_clock)]
    pub rest: Option<ClockValue>,
    /// Number of rounds (1-99)
    #[arg(long)]
    pub rounds: Option<u32>,
}

impl GymArgs {
    /// Overlay the given flags on `base`.
    pub fn resolve(
        &self,
        base: GymConfig,
        dialog: &mut PickerDialog,
    ) -> Result<GymConfig, ValidationError> {
        let mut gym = base;
        let times = [
            (PickerContext::Prep, self.prep),
            (PickerContext::Work, self.work),
            (PickerContext::Rest, self.rest),
        ];
        for (context, value) in times {
            if let Some(value) = value {
                if let Some(selection) = pick_time(dialog, context, value)? {
                    apply_to_gym(&mut gym, selection);
                }
            }
        }
        if let Some(rounds) = self.rounds {
            dialog.open_for(PickerContext::Rounds, rounds);
            if let Some(selection) = dialog.confirm()? {
                apply_to_gym(&mut gym, selection);
            }
        }
        Ok(gym)
    }
}

pub fn picker_dialog(config: &Config) -> PickerDialog {
    PickerDialog::new(config.wheel_geometry(), config.settle_quiet())
}

/// Open a two-column picker for `context` with the wheels turned to `value`.
pub fn dial_time(dialog: &mut PickerDialog, context: PickerContext, value: ClockValue) {
    dialog.open_for(context, 0);
    dialog.minutes().open(value.minutes, MAX_MINUTES);
    dialog.seconds().open(value.seconds, MAX_SECONDS);
}

/// [`dial_time`], then confirm.
pub fn pick_time(
    dialog: &mut PickerDialog,
    context: PickerContext,
    value: ClockValue,
) -> Result<Option<Selection>, ValidationError> {
    dial_time(dialog, context, value);
    dialog.confirm()
}

fn apply_to_gym(gym: &mut GymConfig, selection: Selection) {
    match selection {
        Selection::Prep { secs } => gym.prep_sec = secs,
        Selection::Work { secs } => gym.work_sec = secs,
        Selection::Rest { secs } => gym.rest_sec = secs,
        Selection::Rounds { count } => gym.rounds = count,
        Selection::StandardTime { .. } => {}
    }
}
