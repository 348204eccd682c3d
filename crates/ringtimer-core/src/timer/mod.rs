mod engine;
mod sequence;

pub use engine::{
    format_clock, format_secs, CountdownEngine, Progress, RunStatus, Tick,
    DEFAULT_FINISH_EPSILON_SECS,
};
pub use sequence::{
    build_phases, Advance, GymConfig, Phase, PhaseKind, PhaseSequence, PhaseSequencer, MAX_ROUNDS,
};
