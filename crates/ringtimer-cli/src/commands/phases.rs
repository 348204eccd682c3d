use clap::Args;
use ringtimer_core::timer::format_secs;
use ringtimer_core::{Config, PhaseSequencer};
use serde::Serialize;

use super::args::{picker_dialog, GymArgs};

#[derive(Args)]
pub struct PhasesArgs {
    #[command(flatten)]
    pub gym: GymArgs,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PhaseRow {
    index: usize,
    label: String,
    #[serde(flatten)]
    phase: ringtimer_core::Phase,
}

pub fn run(args: PhasesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let gym = args.gym.resolve(config.gym, &mut picker_dialog(&config))?;

    let mut sequencer = PhaseSequencer::new();
    sequencer.start_sequence(&gym)?;
    let rounds = sequencer.total_rounds();
    let rows: Vec<PhaseRow> = sequencer
        .phases()
        .iter()
        .enumerate()
        .map(|(index, phase)| PhaseRow {
            index,
            label: phase.label(rounds),
            phase: *phase,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!(
            "{:>3}  {:<20} {}",
            row.index + 1,
            row.label,
            format_secs(row.phase.duration_secs)
        );
    }
    let total: u64 = rows.iter().map(|r| u64::from(r.phase.duration_secs)).sum();
    println!("total {}", format_total(total));
    Ok(())
}

fn format_total(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_switches_to_hours() {
        assert_eq!(format_total(170), "02:50");
        assert_eq!(format_total(3_725), "1:02:05");
    }
}
