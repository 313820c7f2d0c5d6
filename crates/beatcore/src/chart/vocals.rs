use serde::{Deserialize, Serialize};

use super::{ChartNote, SyncTrack};
use crate::error::{Error, Result};

/// A sung (or spoken) note inside a vocal phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalNote {
    pub tick: u32,
    pub tick_length: u32,
    /// MIDI pitch; `None` for non-pitched talkies
    #[serde(default)]
    pub pitch: Option<f32>,
    /// Pitch at the end of the note when it slides
    #[serde(default)]
    pub end_pitch: Option<f32>,
    #[serde(default)]
    pub percussion: bool,
    #[serde(skip)]
    time: f64,
    #[serde(skip)]
    time_end: f64,
}

impl VocalNote {
    pub fn pitched(tick: u32, tick_length: u32, pitch: f32) -> Self {
        Self {
            tick,
            tick_length,
            pitch: Some(pitch),
            end_pitch: None,
            percussion: false,
            time: 0.0,
            time_end: 0.0,
        }
    }

    pub fn talkie(tick: u32, tick_length: u32) -> Self {
        Self {
            pitch: None,
            ..Self::pitched(tick, tick_length, 0.0)
        }
    }

    pub fn percussion(tick: u32) -> Self {
        Self {
            percussion: true,
            ..Self::talkie(tick, 0)
        }
    }

    /// Slide linearly from the note's pitch to `end_pitch`
    pub fn with_slide(mut self, end_pitch: f32) -> Self {
        self.end_pitch = Some(end_pitch);
        self
    }

    pub fn tick_end(&self) -> u32 {
        self.tick.saturating_add(self.tick_length)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_end(&self) -> f64 {
        self.time_end
    }

    pub fn is_non_pitched(&self) -> bool {
        self.pitch.is_none() && !self.percussion
    }

    /// Whether singing this note counts toward phrase ticks
    pub fn is_sung(&self) -> bool {
        !self.percussion
    }

    /// Expected pitch at a song time, following slides
    pub fn pitch_at_time(&self, time: f64) -> Option<f32> {
        let start = self.pitch?;
        let Some(end) = self.end_pitch else {
            return Some(start);
        };

        let duration = self.time_end - self.time;
        if duration <= 0.0 {
            return Some(start);
        }

        let progress = ((time - self.time) / duration).clamp(0.0, 1.0) as f32;
        Some(start + (end - start) * progress)
    }

    fn contains_tick(&self, tick: u32) -> bool {
        self.tick <= tick && tick < self.tick_end()
    }

    /// Ticks of this note inside `[from, to)`
    pub fn ticks_between(&self, from: u32, to: u32) -> u32 {
        let start = self.tick.max(from);
        let end = self.tick_end().min(to);
        end.saturating_sub(start)
    }
}

/// A vocal phrase: the unit vocals are scored by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalPhrase {
    pub tick: u32,
    pub tick_end: u32,
    #[serde(default)]
    pub star_power: bool,
    pub notes: Vec<VocalNote>,
    #[serde(skip)]
    time: f64,
    #[serde(skip)]
    time_end: f64,
}

impl VocalPhrase {
    pub fn new(tick: u32, tick_end: u32, notes: Vec<VocalNote>) -> Self {
        Self {
            tick,
            tick_end,
            star_power: false,
            notes,
            time: 0.0,
            time_end: 0.0,
        }
    }

    pub fn with_star_power(mut self) -> Self {
        self.star_power = true;
        self
    }

    /// The sung note covering a tick, if any
    pub fn note_at_tick(&self, tick: u32) -> Option<&VocalNote> {
        self.notes
            .iter()
            .find(|note| note.is_sung() && note.contains_tick(tick))
    }

    /// Total ticks of sung notes in the phrase
    pub fn sung_ticks(&self) -> u32 {
        self.sung_ticks_between(self.tick, self.tick_end.saturating_add(1))
    }

    /// Ticks of sung notes overlapping `[from, to)`
    pub fn sung_ticks_between(&self, from: u32, to: u32) -> u32 {
        if to <= from {
            return 0;
        }

        self.notes
            .iter()
            .filter(|note| note.is_sung())
            .map(|note| note.ticks_between(from, to))
            .sum()
    }
}

impl ChartNote for VocalPhrase {
    const MAY_OVERLAP: bool = false;

    fn tick(&self) -> u32 {
        self.tick
    }

    fn tick_end(&self) -> u32 {
        self.tick_end
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn time_end(&self) -> f64 {
        self.time_end
    }

    fn is_star_power(&self) -> bool {
        self.star_power
    }

    fn resolve_times(&mut self, sync_track: &SyncTrack) {
        self.time = sync_track.tick_to_time(self.tick);
        self.time_end = sync_track.tick_to_time(self.tick_end);
        for note in &mut self.notes {
            note.time = sync_track.tick_to_time(note.tick);
            note.time_end = sync_track.tick_to_time(note.tick_end());
        }
    }

    fn validate(&self) -> Result<()> {
        for (i, note) in self.notes.iter().enumerate() {
            if note.tick.checked_add(note.tick_length).is_none() {
                return Err(Error::InvalidChart(format!(
                    "vocal note {} at tick {} has an out of range length {}",
                    i, note.tick, note.tick_length
                )));
            }
            if note.tick < self.tick || note.tick_end() > self.tick_end {
                return Err(Error::InvalidChart(format!(
                    "vocal note {} [{}, {}) lies outside its phrase [{}, {}]",
                    i,
                    note.tick,
                    note.tick_end(),
                    self.tick,
                    self.tick_end
                )));
            }
            if i > 0 && note.tick < self.notes[i - 1].tick {
                return Err(Error::InvalidChart(format!(
                    "vocal note {} at tick {} is out of order",
                    i, note.tick
                )));
            }
            let pitches = note.pitch.iter().chain(note.end_pitch.iter());
            if pitches.into_iter().any(|p| !p.is_finite()) {
                return Err(Error::InvalidChart(format!(
                    "vocal note {} at tick {} has a non-finite pitch",
                    i, note.tick
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase() -> VocalPhrase {
        VocalPhrase::new(
            0,
            480,
            vec![
                VocalNote::pitched(0, 240, 60.0),
                VocalNote::percussion(240),
                VocalNote::talkie(300, 120),
            ],
        )
    }

    #[test]
    fn test_sung_ticks_skip_percussion() {
        assert_eq!(phrase().sung_ticks(), 360);
        assert_eq!(phrase().sung_ticks_between(200, 320), 60);
        assert_eq!(phrase().sung_ticks_between(320, 200), 0);
    }

    #[test]
    fn test_note_at_tick() {
        let phrase = phrase();
        assert_eq!(phrase.note_at_tick(0).unwrap().pitch, Some(60.0));
        assert!(phrase.note_at_tick(240).is_none());
        assert!(phrase.note_at_tick(310).unwrap().is_non_pitched());
        assert!(phrase.note_at_tick(420).is_none());
    }

    #[test]
    fn test_pitch_slide() {
        let sync = SyncTrack::constant(480, 120.0).unwrap();
        let mut phrase = VocalPhrase::new(
            0,
            480,
            vec![VocalNote::pitched(0, 480, 60.0).with_slide(64.0)],
        );
        phrase.resolve_times(&sync);

        let note = &phrase.notes[0];
        assert_eq!(note.pitch_at_time(0.0), Some(60.0));
        assert_eq!(note.pitch_at_time(0.25), Some(62.0));
        assert_eq!(note.pitch_at_time(9.0), Some(64.0));
    }

    #[test]
    fn test_note_length_overflow_rejected() {
        let phrase = VocalPhrase::new(
            0,
            u32::MAX,
            vec![VocalNote::pitched(10, u32::MAX, 60.0)],
        );
        assert_eq!(phrase.notes[0].tick_end(), u32::MAX);
        assert!(matches!(phrase.validate(), Err(Error::InvalidChart(_))));
    }

    #[test]
    fn test_note_outside_phrase_rejected() {
        let phrase = VocalPhrase::new(0, 100, vec![VocalNote::pitched(50, 100, 60.0)]);
        assert!(phrase.validate().is_err());
    }
}
