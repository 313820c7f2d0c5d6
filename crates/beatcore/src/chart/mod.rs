//! Immutable chart model consumed by the engines.
//!
//! - **Sync track**: tick/time conversion via tempo changes
//! - **Chart**: ordered notes for one instrument difficulty
//! - **Notes**: drum notes and vocal phrases with their sub-notes
//!
//! Charts never carry per-run outcomes. Hit/miss state lives in the engine
//! (see [`crate::engine::NoteOutcomes`]), so one chart can be shared between
//! engines.

mod drums;
mod sync_track;
mod vocals;

pub use drums::*;
pub use sync_track::*;
pub use vocals::*;

use crate::error::{Error, Result};

/// A note (or phrase) placed on the chart timeline
pub trait ChartNote {
    /// Whether a note may start before the previous one ends
    const MAY_OVERLAP: bool = true;

    fn tick(&self) -> u32;

    fn tick_end(&self) -> u32;

    /// Start time in seconds, resolved from the sync track
    fn time(&self) -> f64;

    /// End time in seconds, resolved from the sync track
    fn time_end(&self) -> f64;

    /// Whether this note belongs to a star power phrase
    fn is_star_power(&self) -> bool;

    /// Fill in song times from ticks
    fn resolve_times(&mut self, sync_track: &SyncTrack);

    /// Extra per-note checks beyond start/end ordering
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Ordered notes for one instrument difficulty
#[derive(Debug, Clone, PartialEq)]
pub struct Chart<N> {
    notes: Vec<N>,
}

impl<N: ChartNote> Chart<N> {
    /// Build a chart, resolving note times against the sync track.
    ///
    /// Notes must be ordered by start tick and end at or after their start.
    /// Notes that may not overlap must also start at or after the previous
    /// note's end.
    pub fn new(mut notes: Vec<N>, sync_track: &SyncTrack) -> Result<Self> {
        for (i, note) in notes.iter().enumerate() {
            if note.tick_end() < note.tick() {
                return Err(Error::InvalidChart(format!(
                    "note {} ends at tick {} before it starts at tick {}",
                    i,
                    note.tick_end(),
                    note.tick()
                )));
            }
            if i > 0 && note.tick() < notes[i - 1].tick() {
                return Err(Error::InvalidChart(format!(
                    "note {} at tick {} is out of order",
                    i,
                    note.tick()
                )));
            }
            if i > 0 && !N::MAY_OVERLAP && note.tick() < notes[i - 1].tick_end() {
                return Err(Error::InvalidChart(format!(
                    "note {} at tick {} overlaps the previous note ending at tick {}",
                    i,
                    note.tick(),
                    notes[i - 1].tick_end()
                )));
            }
            note.validate()?;
        }

        for note in &mut notes {
            note.resolve_times(sync_track);
        }

        Ok(Self { notes })
    }

    pub fn notes(&self) -> &[N] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&N> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Song time of the end of the last note, or 0 for an empty chart
    pub fn end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(ChartNote::time_end)
            .fold(0.0, f64::max)
    }
}
