//! Recorded runs that can be saved, loaded and verified
//!
//! A replay stores the parameters and inputs of a run together with the
//! result they produced. Because a full replay is deterministic, feeding the
//! same inputs to a fresh engine must reproduce the same summary.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{BaseStats, Engine, EngineParameters, EngineStats, Instrument, InstrumentKind};
use crate::error::{Error, Result};
use crate::input::GameInput;

/// Version written into new replay files
pub const REPLAY_VERSION: u32 = 1;

/// Result of a run, compared field by field on verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub score: i64,
    pub notes_hit: u32,
    pub notes_missed: u32,
    pub max_combo: u32,
    pub star_power_phrases_hit: u32,
    pub stars: f64,
}

impl ReplaySummary {
    pub fn from_stats(stats: &BaseStats) -> Self {
        Self {
            score: stats.committed_score,
            notes_hit: stats.notes_hit,
            notes_missed: stats.notes_missed,
            max_combo: stats.max_combo,
            star_power_phrases_hit: stats.star_power_phrases_hit,
            stars: stats.stars,
        }
    }

    /// Fields that differ from `actual`
    pub fn mismatches(&self, actual: &Self) -> Vec<ReplayMismatch> {
        let mut mismatches = Vec::new();
        let mut check = |field: &'static str, expected: String, found: String| {
            if expected != found {
                mismatches.push(ReplayMismatch {
                    field,
                    expected,
                    actual: found,
                });
            }
        };

        check("score", self.score.to_string(), actual.score.to_string());
        check(
            "notes_hit",
            self.notes_hit.to_string(),
            actual.notes_hit.to_string(),
        );
        check(
            "notes_missed",
            self.notes_missed.to_string(),
            actual.notes_missed.to_string(),
        );
        check(
            "max_combo",
            self.max_combo.to_string(),
            actual.max_combo.to_string(),
        );
        check(
            "star_power_phrases_hit",
            self.star_power_phrases_hit.to_string(),
            actual.star_power_phrases_hit.to_string(),
        );
        check("stars", self.stars.to_string(), actual.stars.to_string());

        mismatches
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayMismatch {
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

/// Outcome of [`Replay::verify`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayVerification {
    pub expected: ReplaySummary,
    pub actual: ReplaySummary,
    pub mismatches: Vec<ReplayMismatch>,
}

impl ReplayVerification {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// A recorded run for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Serialize + DeserializeOwned")]
pub struct Replay<P> {
    pub version: u32,
    pub instrument: InstrumentKind,
    pub recorded_at: DateTime<Utc>,
    /// Song time the run was played up to
    pub song_time: f64,
    pub params: P,
    pub inputs: Vec<GameInput>,
    pub summary: ReplaySummary,
}

impl<P: EngineParameters> Replay<P> {
    /// Record a run by replaying `inputs` on `engine` up to `song_time`.
    ///
    /// The engine is reset first; its final stats become the summary.
    pub fn record<I>(engine: &mut Engine<I>, inputs: Vec<GameInput>, song_time: f64) -> Result<Self>
    where
        I: Instrument<Params = P>,
    {
        let summary = run(engine, &inputs, song_time)?;

        debug!(
            "Recorded {} replay: {} inputs, score {}",
            I::KIND,
            inputs.len(),
            summary.score
        );

        Ok(Self {
            version: REPLAY_VERSION,
            instrument: I::KIND,
            recorded_at: Utc::now(),
            song_time,
            params: engine.params().clone(),
            inputs,
            summary,
        })
    }

    /// Replay the inputs on `engine` and compare against the recorded summary
    pub fn verify<I>(&self, engine: &mut Engine<I>) -> Result<ReplayVerification>
    where
        I: Instrument<Params = P>,
    {
        if self.instrument != I::KIND {
            return Err(Error::InvalidReplay(format!(
                "replay was recorded on {}, engine plays {}",
                self.instrument,
                I::KIND
            )));
        }

        let actual = run(engine, &self.inputs, self.song_time)?;
        let mismatches = self.summary.mismatches(&actual);

        Ok(ReplayVerification {
            expected: self.summary.clone(),
            actual,
            mismatches,
        })
    }

    /// Load a replay from a JSON file
    pub fn load_from_path<Q: AsRef<Path>>(path: Q) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let replay: Self = serde_json::from_str(&content)?;

        if replay.version > REPLAY_VERSION {
            return Err(Error::UnsupportedVersion {
                version: replay.version,
                current: REPLAY_VERSION,
            });
        }
        replay.params.validate()?;

        debug!(
            "Loaded {} replay from {}: {} inputs",
            replay.instrument,
            path.display(),
            replay.inputs.len()
        );
        Ok(replay)
    }

    /// Save the replay as pretty-printed JSON
    pub fn save_to_path<Q: AsRef<Path>>(&self, path: Q) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved replay to {}", path.as_ref().display());
        Ok(())
    }
}

fn run<I: Instrument>(
    engine: &mut Engine<I>,
    inputs: &[GameInput],
    song_time: f64,
) -> Result<ReplaySummary> {
    engine.process_up_to_time(song_time, inputs)?;
    engine.update_engine_at(song_time);
    Ok(ReplaySummary::from_stats(engine.stats().base()))
}
