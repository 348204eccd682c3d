//! Scroll-wheel integer picker.
//!
//! The wheel is a vertical list of items `0..=max` with a spacer above and
//! below, so that scroll offset `value * item_height` puts `value` at the
//! viewport center. The live value while scrolling is the item whose center
//! is geometrically closest to the viewport center; momentum and elastic
//! overscroll can put the offset past either end of the list, where a plain
//! `offset / item_height` would disagree with what is visibly centered.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::debounce::Debounce;

/// Item height in pixels used when no geometry is configured.
pub const DEFAULT_ITEM_HEIGHT: f64 = 128.0;
/// Viewport height in pixels used when no geometry is configured.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 520.0;
/// Quiet period after the last scroll input before the wheel settles.
pub const DEFAULT_SETTLE_QUIET: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelGeometry {
    pub item_height: f64,
    pub viewport_height: f64,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl WheelGeometry {
    /// Height of each of the two spacers that center the end items.
    pub fn spacer(&self) -> f64 {
        ((self.viewport_height - self.item_height) / 2.0).max(0.0)
    }

    /// Center of item `index` in content coordinates.
    pub fn item_center(&self, index: u32) -> f64 {
        self.spacer() + f64::from(index) * self.item_height + self.item_height / 2.0
    }

    /// Center of the viewport in content coordinates for a scroll offset.
    pub fn viewport_center(&self, offset: f64) -> f64 {
        offset + self.viewport_height / 2.0
    }

    /// Scroll offset that centers `value`.
    pub fn canonical_offset(&self, value: u32) -> f64 {
        f64::from(value) * self.item_height
    }

    /// Item in `0..=max` whose center is nearest the viewport center.
    /// Ties go to the lower value.
    pub fn nearest_value(&self, offset: f64, max: u32) -> u32 {
        let center = self.viewport_center(offset);
        (0..=max)
            .min_by(|&a, &b| {
                let da = (self.item_center(a) - center).abs();
                let db = (self.item_center(b) - center).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0)
    }
}

/// Value state of one picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerState {
    pub max: u32,
    /// Always within `[0, max]`.
    pub current_value: u32,
    /// Set only by an explicit confirm, never by scrolling.
    pub confirmed: bool,
}

impl PickerState {
    pub fn new(initial: u32, max: u32) -> Self {
        Self {
            max,
            current_value: initial.min(max),
            confirmed: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValuePicker {
    geometry: WheelGeometry,
    settle_debounce: Debounce,
    state: PickerState,
    /// Continuous scroll offset in pixels.
    offset: f64,
    /// Value currently highlighted under the viewport center.
    live_value: u32,
    open: bool,
}

impl Default for ValuePicker {
    fn default() -> Self {
        Self::new(WheelGeometry::default(), DEFAULT_SETTLE_QUIET)
    }
}

impl ValuePicker {
    pub fn new(geometry: WheelGeometry, settle_quiet: Duration) -> Self {
        Self {
            geometry,
            settle_debounce: Debounce::new(settle_quiet),
            state: PickerState::new(0, 0),
            offset: 0.0,
            live_value: 0,
            open: false,
        }
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn value(&self) -> u32 {
        self.state.current_value
    }

    pub fn live_value(&self) -> u32 {
        self.live_value
    }

    pub fn max(&self) -> u32 {
        self.state.max
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_settling(&self) -> bool {
        self.settle_debounce.is_armed()
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    /// Show the wheel at `initial`, clamped into `[0, max]`.
    pub fn open(&mut self, initial: u32, max: u32) {
        self.state = PickerState::new(initial, max);
        self.live_value = self.state.current_value;
        self.offset = self.geometry.canonical_offset(self.live_value);
        self.settle_debounce.cancel();
        self.open = true;
    }

    /// Apply a scroll delta and return the live value.
    pub fn on_scroll(&mut self, delta: f64, now: Duration) -> u32 {
        if !self.open {
            return self.state.current_value;
        }
        self.offset += delta;
        self.live_value = self.geometry.nearest_value(self.offset, self.state.max);
        self.settle_debounce.arm(now);
        self.live_value
    }

    /// Settle if the scroll has been quiet long enough. Returns true when it did.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.settle_debounce.poll(now) {
            self.settle();
            true
        } else {
            false
        }
    }

    /// Snap the offset onto the nearest item and commit it as the current value.
    pub fn settle(&mut self) -> u32 {
        self.settle_debounce.cancel();
        let value = self.geometry.nearest_value(self.offset, self.state.max);
        self.live_value = value;
        self.state.current_value = value;
        self.offset = self.geometry.canonical_offset(value);
        value
    }

    /// Keyboard step: move by `delta`, clamped, and settle immediately.
    pub fn step(&mut self, delta: i32) -> u32 {
        let target = i64::from(self.state.current_value) + i64::from(delta);
        let value = target.clamp(0, i64::from(self.state.max)) as u32;
        self.settle_debounce.cancel();
        self.state.current_value = value;
        self.live_value = value;
        self.offset = self.geometry.canonical_offset(value);
        value
    }

    /// Confirm the current value. A pending settle is flushed first.
    pub fn confirm(&mut self) -> u32 {
        if self.settle_debounce.is_armed() {
            self.settle();
        }
        self.state.confirmed = true;
        self.open = false;
        self.state.current_value
    }

    /// Close without confirming.
    pub fn cancel(&mut self) {
        self.settle_debounce.cancel();
        self.state.confirmed = false;
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn picker() -> ValuePicker {
        ValuePicker::default()
    }

    #[test]
    fn open_clamps_initial_value() {
        let mut p = picker();
        p.open(75, 59);
        assert_eq!(p.value(), 59);
        assert_eq!(p.offset(), 59.0 * DEFAULT_ITEM_HEIGHT);
        assert!(!p.state().confirmed);
    }

    #[test]
    fn max_zero_only_allows_zero() {
        let mut p = picker();
        p.open(3, 0);
        assert_eq!(p.value(), 0);
        p.on_scroll(400.0, ms(0));
        assert_eq!(p.settle(), 0);
        assert_eq!(p.step(1), 0);
    }

    #[test]
    fn scroll_updates_live_value_but_not_current() {
        let mut p = picker();
        p.open(0, 59);
        let live = p.on_scroll(2.0 * DEFAULT_ITEM_HEIGHT + 10.0, ms(0));
        assert_eq!(live, 2);
        assert_eq!(p.value(), 0);
        assert!(!p.state().confirmed);
    }

    #[test]
    fn settles_after_quiet_period() {
        let mut p = picker();
        p.open(0, 59);
        p.on_scroll(300.0, ms(0));
        p.on_scroll(100.0, ms(80));
        assert!(!p.poll(ms(150)));
        assert!(p.poll(ms(200)));
        // 400 px / 128 px ≈ 3.1 items
        assert_eq!(p.value(), 3);
        assert_eq!(p.offset(), 3.0 * DEFAULT_ITEM_HEIGHT);
        assert!(!p.poll(ms(1_000)));
    }

    #[test]
    fn overscroll_resolves_to_ends() {
        let mut p = picker();
        p.open(0, 10);
        p.on_scroll(-300.0, ms(0));
        assert_eq!(p.settle(), 0);
        p.on_scroll(50.0 * DEFAULT_ITEM_HEIGHT, ms(0));
        assert_eq!(p.settle(), 10);
    }

    #[test]
    fn halfway_tie_goes_to_lower_value() {
        let geometry = WheelGeometry::default();
        assert_eq!(geometry.nearest_value(1.5 * DEFAULT_ITEM_HEIGHT, 59), 1);
        assert_eq!(geometry.nearest_value(1.5 * DEFAULT_ITEM_HEIGHT + 0.1, 59), 2);
    }

    #[test]
    fn step_is_clamped_and_immediate() {
        let mut p = picker();
        p.open(58, 59);
        p.on_scroll(10.0, ms(0));
        assert_eq!(p.step(1), 59);
        assert!(!p.is_settling());
        assert_eq!(p.step(1), 59);
        p.open(0, 59);
        assert_eq!(p.step(-1), 0);
    }

    #[test]
    fn confirm_flushes_pending_settle() {
        let mut p = picker();
        p.open(0, 59);
        p.on_scroll(5.0 * DEFAULT_ITEM_HEIGHT, ms(0));
        assert_eq!(p.confirm(), 5);
        assert!(p.state().confirmed);
        assert!(!p.is_open());
    }

    #[test]
    fn cancel_leaves_unconfirmed() {
        let mut p = picker();
        p.open(4, 59);
        p.cancel();
        assert!(!p.state().confirmed);
        assert!(!p.is_open());
    }

    proptest! {
        #[test]
        fn open_then_settle_is_clamp(v in 0u32..500, max in 0u32..100) {
            let mut p = picker();
            p.open(v, max);
            prop_assert_eq!(p.settle(), v.min(max));
        }

        #[test]
        fn scroll_never_escapes_range(deltas in prop::collection::vec(-5_000.0f64..5_000.0, 1..20), max in 0u32..100) {
            let mut p = picker();
            p.open(0, max);
            for (i, d) in deltas.iter().enumerate() {
                let live = p.on_scroll(*d, ms(i as u64 * 10));
                prop_assert!(live <= max);
            }
            prop_assert!(p.settle() <= max);
        }
    }
}
