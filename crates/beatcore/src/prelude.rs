//! Prelude module for convenient imports
//!
//! ```ignore
//! use beatcore::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Engine types: `Engine`, `Instrument`, `EngineEvent`, `NoteOutcome`
//! - Instruments: `Drums`, `Vocals` and their actions and parameters
//! - Chart types: `Chart`, `SyncTrack`, `DrumNote`, `VocalPhrase`, `VocalNote`
//! - Error handling: `Error`, `Result`

// Engine
pub use crate::engine::{
    Engine, EngineEvent, EngineParameters, EngineState, EngineStats, Instrument, NoteOutcome,
};

// Error handling
pub use crate::error::{Error, Result};

// Chart types
pub use crate::chart::{
    Chart, ChartNote, DrumNote, DrumPad, SyncTrack, TempoChange, VocalNote, VocalPhrase,
};

// Instruments
pub use crate::drums::{DrumMode, Drums, DrumsAction, DrumsEngineParameters};
pub use crate::vocals::{Vocals, VocalsAction, VocalsEngineParameters};

// Input and replays
pub use crate::input::GameInput;
pub use crate::replay::Replay;
