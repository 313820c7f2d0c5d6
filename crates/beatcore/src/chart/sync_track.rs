use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tempo used when a sync track does not start with an explicit tempo
pub const DEFAULT_BPM: f64 = 120.0;

/// Guards `time_to_tick` against float error on exact tick boundaries
const TICK_EPSILON: f64 = 1e-6;

/// A tempo change at a chart tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub tick: u32,
    pub bpm: f64,
}

/// Tempo map converting between chart ticks and song time (seconds)
#[derive(Debug, Clone, PartialEq)]
pub struct SyncTrack {
    resolution: u32,
    tempos: Vec<TempoChange>,
    /// Song time at which each tempo change starts
    start_times: Vec<f64>,
}

impl SyncTrack {
    /// Build a sync track from a resolution (ticks per quarter note) and tempo changes.
    ///
    /// Tempo changes must have strictly ascending ticks and positive BPM values.
    /// A default tempo is inserted at tick 0 when the list does not start there.
    pub fn new(resolution: u32, tempos: Vec<TempoChange>) -> Result<Self> {
        if resolution == 0 {
            return Err(Error::InvalidChart("resolution must be positive".to_string()));
        }

        for (i, tempo) in tempos.iter().enumerate() {
            if !tempo.bpm.is_finite() || tempo.bpm <= 0.0 {
                return Err(Error::InvalidChart(format!(
                    "tempo {} at tick {} has invalid BPM {}",
                    i, tempo.tick, tempo.bpm
                )));
            }
            if i > 0 && tempo.tick <= tempos[i - 1].tick {
                return Err(Error::InvalidChart(format!(
                    "tempo changes are not ascending at tick {}",
                    tempo.tick
                )));
            }
        }

        let mut tempos = tempos;
        if tempos.first().is_none_or(|t| t.tick != 0) {
            tempos.insert(
                0,
                TempoChange {
                    tick: 0,
                    bpm: DEFAULT_BPM,
                },
            );
        }

        let mut start_times = Vec::with_capacity(tempos.len());
        let mut time = 0.0;
        for (i, tempo) in tempos.iter().enumerate() {
            if i > 0 {
                let prev = &tempos[i - 1];
                time += Self::ticks_to_seconds(tempo.tick - prev.tick, prev.bpm, resolution);
            }
            start_times.push(time);
        }

        Ok(Self {
            resolution,
            tempos,
            start_times,
        })
    }

    /// Sync track with a single tempo for the whole song
    pub fn constant(resolution: u32, bpm: f64) -> Result<Self> {
        Self::new(resolution, vec![TempoChange { tick: 0, bpm }])
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn tempos(&self) -> &[TempoChange] {
        &self.tempos
    }

    /// Convert a tick to song time in seconds
    pub fn tick_to_time(&self, tick: u32) -> f64 {
        let index = self.tempos.partition_point(|t| t.tick <= tick) - 1;
        let tempo = &self.tempos[index];
        self.start_times[index] + Self::ticks_to_seconds(tick - tempo.tick, tempo.bpm, self.resolution)
    }

    /// Convert song time in seconds to the tick in effect at that time.
    ///
    /// Negative times map to tick 0.
    pub fn time_to_tick(&self, time: f64) -> u32 {
        if !(time > 0.0) {
            return 0;
        }

        let index = self.start_times.partition_point(|&start| start <= time) - 1;
        let tempo = &self.tempos[index];
        let elapsed = time - self.start_times[index];
        let ticks = elapsed * tempo.bpm / 60.0 * self.resolution as f64;

        let tick = tempo.tick as f64 + (ticks + TICK_EPSILON).floor();
        tick.min(u32::MAX as f64) as u32
    }

    fn ticks_to_seconds(ticks: u32, bpm: f64, resolution: u32) -> f64 {
        ticks as f64 / resolution as f64 * 60.0 / bpm
    }
}
