use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

use super::{ChartNote, SyncTrack};

/// Drum lane a note is charted on
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DrumPad {
    Kick = 0,
    Red = 1,
    Yellow = 2,
    Blue = 3,
    Green = 4,
    /// Five-lane only
    Orange = 5,
    YellowCymbal = 6,
    BlueCymbal = 7,
    GreenCymbal = 8,
}

impl DrumPad {
    pub fn is_cymbal(&self) -> bool {
        matches!(
            self,
            Self::YellowCymbal | Self::BlueCymbal | Self::GreenCymbal
        )
    }

    /// The pad of the same colour with the cymbal distinction dropped
    pub fn without_cymbal(&self) -> Self {
        match self {
            Self::YellowCymbal => Self::Yellow,
            Self::BlueCymbal => Self::Blue,
            Self::GreenCymbal => Self::Green,
            other => *other,
        }
    }
}

/// A single drum hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumNote {
    pub pad: DrumPad,
    pub tick: u32,
    #[serde(default)]
    pub star_power: bool,
    /// Last note of a star power phrase
    #[serde(default)]
    pub star_power_end: bool,
    #[serde(skip)]
    time: f64,
}

impl DrumNote {
    pub fn new(pad: DrumPad, tick: u32) -> Self {
        Self {
            pad,
            tick,
            star_power: false,
            star_power_end: false,
            time: 0.0,
        }
    }

    /// Mark the note as part of a star power phrase
    pub fn with_star_power(mut self, phrase_end: bool) -> Self {
        self.star_power = true;
        self.star_power_end = phrase_end;
        self
    }
}

impl ChartNote for DrumNote {
    fn tick(&self) -> u32 {
        self.tick
    }

    fn tick_end(&self) -> u32 {
        self.tick
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn time_end(&self) -> f64 {
        self.time
    }

    fn is_star_power(&self) -> bool {
        self.star_power
    }

    fn resolve_times(&mut self, sync_track: &SyncTrack) {
        self.time = sync_track.tick_to_time(self.tick);
    }
}
