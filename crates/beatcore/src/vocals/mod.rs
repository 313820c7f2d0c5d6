//! Vocals: pitch detection scored per phrase
//!
//! Singing is sampled continuously. Each sample stands for the pitch held
//! until the next one, at most one sample period ahead, and credits the
//! charted note ticks in that range sung at the right pitch (in any octave).
//! When a phrase ends, enough credited ticks make the whole phrase a hit.

mod engine;
mod parameters;

pub use engine::{PhraseCredit, pitch_matches};
pub use parameters::*;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

use crate::engine::{BaseEngineState, BaseStats, EngineState, EngineStats};
use crate::error::InvalidEnumValueError;

/// Vocals instrument marker for [`crate::engine::Engine`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Vocals;

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
pub enum VocalsAction {
    /// A pitch sample; the input axis carries the sung MIDI pitch
    Pitch = 0,
    StarPower = 1,
}

impl TryFrom<u8> for VocalsAction {
    type Error = InvalidEnumValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or_else(|| InvalidEnumValueError::new("VocalsAction", value))
    }
}

impl From<VocalsAction> for u8 {
    fn from(action: VocalsAction) -> Self {
        action as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocalsStats {
    #[serde(flatten)]
    pub base: BaseStats,
    pub vocal_ticks_hit: u32,
    pub vocal_ticks_missed: u32,
    pub phrases_hit: u32,
}

impl EngineStats for VocalsStats {
    fn base(&self) -> &BaseStats {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseStats {
        &mut self.base
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocalsState {
    pub base: BaseEngineState,
    pub phrase_ticks_hit: u32,
    /// Sung ticks in the current phrase, filled in on first use
    pub phrase_ticks_total: Option<u32>,
    pub did_sing: bool,
    pub pitch_sang: f32,
    /// Tick range `[sung_from, sung_until)` covered by the latest sample
    pub sung_from: u32,
    pub sung_until: u32,
    pub last_sing_time: f64,
    pub last_hit_time: f64,
    /// Last sample index the bot produced
    pub last_bot_sample: Option<u64>,
}

impl EngineState for VocalsState {
    fn base(&self) -> &BaseEngineState {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseEngineState {
        &mut self.base
    }
}
