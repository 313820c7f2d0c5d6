//! # beatcore
//!
//! Timing and scoring core for rhythm games.
//!
//! This crate provides:
//! - Chart model and tempo map (tick/time conversion)
//! - A generic engine that resolves timestamped inputs against a chart
//! - Drums and vocals instruments with their hit logic, scoring and bots
//! - Versioned binary engine parameters
//! - Replays that record and verify deterministic runs
//!
//! ## Example
//!
//! ```
//! use beatcore::prelude::*;
//!
//! let sync = SyncTrack::constant(480, 120.0)?;
//! let chart = Chart::new(vec![DrumNote::new(DrumPad::Red, 480)], &sync)?;
//! let mut engine = Engine::<Drums>::new(chart, sync, DrumsEngineParameters::default())?;
//!
//! engine.queue_input(GameInput::button(0.51, DrumsAction::RedPad));
//! engine.update_engine();
//! assert_eq!(engine.stats().base.committed_score, 50);
//! # Ok::<(), beatcore::Error>(())
//! ```

pub mod chart;
pub mod drums;
pub mod engine;
pub mod error;
pub mod input;
pub mod prelude;
pub mod replay;
pub mod vocals;

pub use chart::{
    Chart, ChartNote, DrumNote, DrumPad, SyncTrack, TempoChange, VocalNote, VocalPhrase,
};
pub use drums::{DrumMode, Drums, DrumsAction, DrumsEngineParameters, DrumsStats};
pub use engine::{
    BaseEngineParameters, BaseStats, Engine, EngineEvent, EngineParameters, EngineStats,
    EventKind, Instrument, InstrumentKind, NoteOutcome, NoteOutcomes, decode_parameters,
    encode_parameters,
};
pub use error::{Error, InvalidEnumValueError, Result};
pub use input::GameInput;
pub use replay::{Replay, ReplaySummary, ReplayVerification};
pub use vocals::{Vocals, VocalsAction, VocalsEngineParameters, VocalsStats};
