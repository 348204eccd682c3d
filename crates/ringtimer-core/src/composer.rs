//! Turning confirmed picker values into durations and counts.

use crate::error::ValidationError;
use crate::picker::PickerState;
use crate::timer::MAX_ROUNDS;

/// `minutes * 60 + seconds` from two confirmed pickers.
///
/// # Errors
///
/// [`ValidationError::InvalidDuration`] when the total is zero, checked before
/// anything else; [`ValidationError::Unconfirmed`] when either picker has not
/// been confirmed.
pub fn compose_time(minutes: &PickerState, seconds: &PickerState) -> Result<u32, ValidationError> {
    let total = total_secs(minutes, seconds);
    if total == 0 {
        return Err(ValidationError::invalid_duration("timer"));
    }
    ensure_confirmed(minutes, "minutes")?;
    ensure_confirmed(seconds, "seconds")?;
    Ok(total)
}

/// Like [`compose_time`] but a zero total is a valid answer, used for phases
/// where zero means "skip".
///
/// # Errors
///
/// [`ValidationError::Unconfirmed`] when either picker has not been confirmed.
pub fn compose_optional_time(
    minutes: &PickerState,
    seconds: &PickerState,
) -> Result<u32, ValidationError> {
    ensure_confirmed(minutes, "minutes")?;
    ensure_confirmed(seconds, "seconds")?;
    Ok(total_secs(minutes, seconds))
}

/// Rounds count from a single picker, floored at 1. The picker itself already
/// caps the value at its max.
pub fn compose_count(picker: &PickerState) -> u32 {
    picker.current_value.clamp(1, MAX_ROUNDS)
}

fn total_secs(minutes: &PickerState, seconds: &PickerState) -> u32 {
    minutes.current_value * 60 + seconds.current_value
}

fn ensure_confirmed(picker: &PickerState, name: &str) -> Result<(), ValidationError> {
    if picker.confirmed {
        Ok(())
    } else {
        Err(ValidationError::Unconfirmed {
            picker: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn confirmed(value: u32, max: u32) -> PickerState {
        PickerState {
            confirmed: true,
            ..PickerState::new(value, max)
        }
    }

    #[test]
    fn composes_minutes_and_seconds() {
        assert_eq!(compose_time(&confirmed(2, 59), &confirmed(5, 59)), Ok(125));
    }

    #[test]
    fn zero_is_rejected_regardless_of_confirmation() {
        let zero = PickerState::new(0, 59);
        assert!(matches!(
            compose_time(&zero, &zero),
            Err(ValidationError::InvalidDuration { .. })
        ));
        assert!(matches!(
            compose_time(&confirmed(0, 59), &confirmed(0, 59)),
            Err(ValidationError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn unconfirmed_pickers_are_rejected() {
        let err = compose_time(&confirmed(1, 59), &PickerState::new(0, 59)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Unconfirmed {
                picker: "seconds".into()
            }
        );
    }

    #[test]
    fn optional_time_allows_zero() {
        assert_eq!(
            compose_optional_time(&confirmed(0, 59), &confirmed(0, 59)),
            Ok(0)
        );
    }

    #[test]
    fn count_is_floored_at_one() {
        assert_eq!(compose_count(&confirmed(0, 99)), 1);
        assert_eq!(compose_count(&confirmed(42, 99)), 42);
        // The picker clamps 150 to its max when opened.
        assert_eq!(compose_count(&confirmed(150, 99)), 99);
    }

    proptest! {
        #[test]
        fn count_always_in_range(v in 0u32..=99) {
            let n = compose_count(&confirmed(v, 99));
            prop_assert!((1..=MAX_ROUNDS).contains(&n));
        }
    }
}
