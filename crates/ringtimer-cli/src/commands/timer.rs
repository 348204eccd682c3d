use std::error::Error;
use std::time::Duration;

use clap::Args;
use ringtimer_core::{
    Config, FrameScheduler, MonotonicClock, PickerContext, RunStatus, TimerSession, ToggleOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::args::{dial_time, parse_clock, picker_dialog, ClockValue, GymArgs};
use crate::terminal::TerminalPort;

type Session = TimerSession<MonotonicClock, FrameScheduler, TerminalPort>;

const KEYS_HELP: &str = "keys: p/enter pause-resume, s stop, h hide, v show";

#[derive(Args)]
pub struct RunArgs {
    /// Duration as mm:ss or seconds (default: configured timer)
    #[arg(value_parser = parse_clock)]
    pub duration: Option<ClockValue>,
    /// Print events as JSON lines instead of drawing the clock
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct GymRunArgs {
    #[command(flatten)]
    pub gym: GymArgs,
    /// Print events as JSON lines instead of drawing the clock
    #[arg(long)]
    pub json: bool,
}

pub fn run_standard(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let mut session = new_session(&config, args.json);
    if let Some(value) = args.duration {
        let mut dialog = picker_dialog(&config);
        dial_time(&mut dialog, PickerContext::StandardTime, value);
        session.confirm_picker(&mut dialog)?;
    }
    session.start_standard()?;
    drive(session, config.frame_interval(), args.json)
}

pub fn run_gym(args: GymRunArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let gym = args.gym.resolve(config.gym, &mut picker_dialog(&config))?;
    let mut session = new_session(&config, args.json).with_gym_config(gym);
    session.start_gym()?;
    drive(session, config.frame_interval(), args.json)
}

fn new_session(config: &Config, json: bool) -> Session {
    TimerSession::new(
        MonotonicClock::new(),
        FrameScheduler::new(),
        TerminalPort::new(json, config.cues.clone()),
    )
    .with_engine(config.countdown_engine())
    .with_selection(config.timer)
    .with_gym_config(config.gym)
}

fn drive(session: Session, frame_interval: Duration, json: bool) -> Result<(), Box<dyn Error>> {
    if !json {
        eprintln!("{KEYS_HELP}");
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(frame_loop(session, frame_interval));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    result
}

async fn frame_loop(mut session: Session, frame_interval: Duration) -> Result<(), Box<dyn Error>> {
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    while is_active(session.status()) {
        tokio::select! {
            _ = frames.tick() => {
                if let Some(handle) = session.scheduler_mut().take_due() {
                    session.on_frame(handle)?;
                }
            }
            line = input.next_line(), if input_open => match line? {
                Some(line) => handle_key(&mut session, line.trim()),
                None => {
                    input_open = false;
                    on_input_closed(&mut session);
                }
            },
        }
    }
    Ok(())
}

fn is_active(status: RunStatus) -> bool {
    matches!(status, RunStatus::Running | RunStatus::Paused)
}

/// Without input a paused run could never be resumed, so it is stopped.
fn on_input_closed(session: &mut Session) {
    if session.status() == RunStatus::Paused {
        debug!("input closed while paused, stopping");
        session.stop();
    }
}

fn handle_key(session: &mut Session, key: &str) {
    match key {
        "" | "p" => match session.toggle() {
            ToggleOutcome::Paused => debug!("paused from keyboard"),
            ToggleOutcome::Resumed => debug!("resumed from keyboard"),
            ToggleOutcome::OpenPicker => {}
        },
        "s" | "q" => session.stop(),
        "h" => {
            session.on_visibility_change(false);
            session.on_display_released();
        }
        "v" => session.on_visibility_change(true),
        other => eprintln!("unknown key '{other}' ({KEYS_HELP})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_running_and_paused_keep_the_loop_alive() {
        assert!(is_active(RunStatus::Running));
        assert!(is_active(RunStatus::Paused));
        assert!(!is_active(RunStatus::Idle));
        assert!(!is_active(RunStatus::Finished));
    }

    #[test]
    fn keys_drive_the_session() {
        let config = Config::default();
        let mut session = new_session(&config, true);
        session.start_standard().unwrap();

        handle_key(&mut session, "p");
        assert_eq!(session.status(), RunStatus::Paused);
        handle_key(&mut session, "");
        assert_eq!(session.status(), RunStatus::Running);
        handle_key(&mut session, "h");
        assert!(!session.display_held());
        handle_key(&mut session, "v");
        assert!(session.display_held());
        handle_key(&mut session, "s");
        assert_eq!(session.status(), RunStatus::Idle);
    }

    #[test]
    fn closed_input_stops_a_paused_run() {
        let config = Config::default();
        let mut session = new_session(&config, true);
        session.start_standard().unwrap();
        on_input_closed(&mut session);
        assert_eq!(session.status(), RunStatus::Running);

        handle_key(&mut session, "p");
        on_input_closed(&mut session);
        assert_eq!(session.status(), RunStatus::Idle);
        assert!(!is_active(session.status()));
    }

    #[test]
    fn oversized_config_selection_is_clamped() {
        let mut config = Config::default();
        config.timer.minutes = 100_000_000;
        let session = new_session(&config, true);
        assert_eq!(session.selection().minutes, 59);
    }
}
