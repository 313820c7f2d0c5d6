//! Simulate command: bot play over a chart.

use std::path::Path;

use anyhow::{Context, Result, bail};
use beatcore::{
    Chart, Drums, Engine, EngineStats, Instrument, Replay, ReplaySummary, SyncTrack, Vocals,
};
use owo_colors::OwoColorize;
use tracing::info;

use super::{RUN_OUT_SECONDS, print_summary};
use crate::chart_file::{LoadedChart, load_chart};
use crate::params_file::load_params;

pub fn run(chart: &Path, params: Option<&Path>, record: Option<&Path>) -> Result<()> {
    let loaded = load_chart(chart)?;
    println!(
        "Simulating {} chart: {}",
        loaded.instrument().bold(),
        chart.display()
    );

    match loaded {
        LoadedChart::Drums(chart, sync_track) => {
            simulate::<Drums>(chart, sync_track, load_params(params)?, record)
        }
        LoadedChart::Vocals(chart, sync_track) => {
            simulate::<Vocals>(chart, sync_track, load_params(params)?, record)
        }
    }
}

fn simulate<I: Instrument>(
    chart: Chart<I::Note>,
    sync_track: SyncTrack,
    params: I::Params,
    record: Option<&Path>,
) -> Result<()> {
    let song_time = chart.end_time() + RUN_OUT_SECONDS;
    let mut engine = Engine::<I>::new(chart, sync_track, params)?;

    engine.update_bot(song_time);
    info!(
        "Bot finished at {:.3}s with {} inputs",
        song_time,
        engine.input_log().len()
    );

    let summary = ReplaySummary::from_stats(engine.stats().base());
    println!(
        "{} (base score {})",
        "Run complete".green().bold(),
        engine.base_score()
    );
    print_summary(&summary);

    if let Some(path) = record {
        let replay = record_run(&mut engine, song_time, &summary)?;
        replay
            .save_to_path(path)
            .with_context(|| format!("Failed to save replay {}", path.display()))?;
        println!("Replay saved to: {}", path.display());
    }

    Ok(())
}

/// Record the bot's inputs, refusing a replay that would not reproduce the
/// run just shown
fn record_run<I: Instrument>(
    engine: &mut Engine<I>,
    song_time: f64,
    live: &ReplaySummary,
) -> Result<Replay<I::Params>> {
    let inputs = engine.input_log().to_vec();
    let replay = Replay::record(engine, inputs, song_time)?;
    ensure_reproduced(live, &replay.summary)?;
    Ok(replay)
}

fn ensure_reproduced(live: &ReplaySummary, recorded: &ReplaySummary) -> Result<()> {
    let mismatches = live.mismatches(recorded);
    if mismatches.is_empty() {
        return Ok(());
    }

    let fields = mismatches
        .iter()
        .map(|m| format!("{} (live {}, replayed {})", m.field, m.expected, m.actual))
        .collect::<Vec<_>>()
        .join(", ");
    bail!("Replaying the bot's inputs gives a different result: {}", fields)
}

#[cfg(test)]
mod tests {
    use beatcore::{VocalNote, VocalPhrase, VocalsEngineParameters};

    use super::*;

    #[test]
    fn test_recorded_summary_matches_live_run() {
        let sync = SyncTrack::constant(480, 120.0).unwrap();
        let chart = Chart::new(
            vec![
                VocalPhrase::new(0, 480, vec![VocalNote::pitched(0, 480, 60.0)]),
                VocalPhrase::new(960, 1440, vec![VocalNote::pitched(968, 472, 64.0)]),
            ],
            &sync,
        )
        .unwrap();
        let params = VocalsEngineParameters::builder()
            .phrase_hit_percent(0.95)
            .build()
            .unwrap();
        let song_time = chart.end_time() + RUN_OUT_SECONDS;
        let mut engine = Engine::<Vocals>::new(chart, sync, params).unwrap();

        engine.update_bot(song_time);
        let live = ReplaySummary::from_stats(engine.stats().base());
        let replay = record_run(&mut engine, song_time, &live).unwrap();

        assert_eq!(replay.summary, live);
        assert_eq!(live.notes_hit, 2);
    }

    #[test]
    fn test_diverging_replay_is_refused() {
        let live = ReplaySummary::from_stats(&Default::default());
        let mut recorded = live.clone();
        recorded.score += 100;

        let error = ensure_reproduced(&live, &recorded).unwrap_err();
        assert!(error.to_string().contains("score"));
        assert!(ensure_reproduced(&live, &live).is_ok());
    }
}
