//! Drums: lane and timing window hit tests over single drum notes

mod engine;
mod parameters;

pub use parameters::*;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

use crate::chart::DrumPad;
use crate::engine::{BaseEngineState, BaseStats, EngineState, EngineStats};
use crate::error::InvalidEnumValueError;

/// Drums instrument marker for [`crate::engine::Engine`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Drums;

/// Player actions on a drum kit
///
/// Pad actions share their numbering with [`DrumPad`].
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
pub enum DrumsAction {
    Kick = 0,
    RedPad = 1,
    YellowPad = 2,
    BluePad = 3,
    GreenPad = 4,
    OrangePad = 5,
    YellowCymbal = 6,
    BlueCymbal = 7,
    GreenCymbal = 8,
    StarPower = 9,
}

impl TryFrom<u8> for DrumsAction {
    type Error = InvalidEnumValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or_else(|| InvalidEnumValueError::new("DrumsAction", value))
    }
}

impl From<DrumsAction> for u8 {
    fn from(action: DrumsAction) -> Self {
        action as u8
    }
}

impl DrumsAction {
    /// The pad this action strikes; `None` for star power
    pub fn pad(self) -> Option<DrumPad> {
        match self {
            Self::StarPower => None,
            pad => DrumPad::from_repr(pad as u8),
        }
    }

    /// The action that strikes `pad`
    pub fn for_pad(pad: DrumPad) -> Self {
        match pad {
            DrumPad::Kick => Self::Kick,
            DrumPad::Red => Self::RedPad,
            DrumPad::Yellow => Self::YellowPad,
            DrumPad::Blue => Self::BluePad,
            DrumPad::Green => Self::GreenPad,
            DrumPad::Orange => Self::OrangePad,
            DrumPad::YellowCymbal => Self::YellowCymbal,
            DrumPad::BlueCymbal => Self::BlueCymbal,
            DrumPad::GreenCymbal => Self::GreenCymbal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrumsStats {
    #[serde(flatten)]
    pub base: BaseStats,
    /// Pad hits that matched no note
    pub overhits: u32,
}

impl EngineStats for DrumsStats {
    fn base(&self) -> &BaseStats {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseStats {
        &mut self.base
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrumsState {
    pub base: BaseEngineState,
    /// A note of the current star power phrase was missed
    pub star_power_phrase_broken: bool,
    /// Pad of the input being resolved
    pub input_pad: Option<DrumPad>,
}

impl EngineState for DrumsState {
    fn base(&self) -> &BaseEngineState {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseEngineState {
        &mut self.base
    }
}
