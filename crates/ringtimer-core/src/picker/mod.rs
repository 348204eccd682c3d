mod debounce;
mod dialog;
mod wheel;

pub use debounce::Debounce;
pub use dialog::{PickerContext, PickerDialog, Selection, MAX_MINUTES, MAX_SECONDS};
pub use wheel::{
    PickerState, ValuePicker, WheelGeometry, DEFAULT_ITEM_HEIGHT, DEFAULT_SETTLE_QUIET,
    DEFAULT_VIEWPORT_HEIGHT,
};
