//! Verify command: re-run a replay against its chart.

use std::path::Path;

use anyhow::{Context, Result, bail};
use beatcore::{Chart, Drums, Engine, Instrument, Replay, SyncTrack, Vocals};
use owo_colors::OwoColorize;

use super::print_summary;
use crate::chart_file::{LoadedChart, load_chart};

pub fn run(chart: &Path, replay: &Path) -> Result<()> {
    let loaded = load_chart(chart)?;

    let matched = match loaded {
        LoadedChart::Drums(chart, sync_track) => verify::<Drums>(chart, sync_track, replay)?,
        LoadedChart::Vocals(chart, sync_track) => verify::<Vocals>(chart, sync_track, replay)?,
    };

    if !matched {
        bail!("Replay {} does not match its recorded result", replay.display());
    }
    Ok(())
}

fn verify<I: Instrument>(
    chart: Chart<I::Note>,
    sync_track: SyncTrack,
    path: &Path,
) -> Result<bool> {
    let replay: Replay<I::Params> = Replay::load_from_path(path)
        .with_context(|| format!("Failed to load replay {}", path.display()))?;

    println!(
        "Verifying {} replay recorded {} ({} inputs)",
        replay.instrument.bold(),
        replay.recorded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        replay.inputs.len()
    );

    let mut engine = Engine::<I>::new(chart, sync_track, replay.params.clone())?;
    let verification = replay.verify(&mut engine)?;

    print_summary(&verification.actual);

    if verification.is_match() {
        println!("{}", "Replay matches".green().bold());
        return Ok(true);
    }

    println!("{}", "Replay mismatch".red().bold());
    for mismatch in &verification.mismatches {
        println!(
            "  {}: expected {}, got {}",
            mismatch.field, mismatch.expected, mismatch.actual
        );
    }
    Ok(false)
}
