//! Generic timing and scoring engine.
//!
//! [`Engine`] owns the per-run state of one instrument and drives its hit
//! logic. Instrument behaviour is supplied statically through the
//! [`Instrument`] trait, implemented by zero-sized markers such as
//! [`crate::drums::Drums`] and [`crate::vocals::Vocals`].
//!
//! Inputs are queued with [`Engine::queue_input`] and resolved in FIFO order
//! by [`Engine::update_engine`]. For each input the hit logic runs repeatedly
//! at the input's timestamp until it reports no change, so one input can
//! resolve several pending notes.

pub mod codec;
mod events;
mod outcome;
mod parameters;
mod scoring;
mod star_power;
mod state;
mod stats;

pub use events::*;
pub use outcome::*;
pub use parameters::*;
pub use scoring::*;
pub use state::*;
pub use stats::*;

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::debug;

use crate::chart::{Chart, ChartNote, SyncTrack};
use crate::error::{Error, Result};
use crate::input::{GameInput, first_unordered};

/// Instrument an engine scores
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InstrumentKind {
    Drums,
    Vocals,
}

/// Per-instrument behaviour plugged into [`Engine`]
pub trait Instrument: Sized + 'static {
    type Note: ChartNote + Debug + 'static;
    type Action: TryFrom<u8> + Into<u8> + Copy + Debug;
    type Params: EngineParameters;
    type Stats: EngineStats;
    type State: EngineState;

    const KIND: InstrumentKind;

    /// Score ratios needed for one through six stars
    const STAR_SCORE_THRESHOLDS: &'static [f64];

    /// Run the hit logic once at `time`.
    ///
    /// Returns `true` when something changed and the engine should call again
    /// at the same time. Repeated calls without new input must eventually
    /// return `false`.
    fn update_hit_logic(engine: &mut Engine<Self>, time: f64) -> bool;

    /// Whether the note at `index` can be hit by the current input state
    fn can_note_be_hit(engine: &Engine<Self>, index: usize) -> bool;

    fn hit_note(engine: &mut Engine<Self>, index: usize);

    fn miss_note(engine: &mut Engine<Self>, index: usize);

    fn add_score(engine: &mut Engine<Self>, index: usize);

    fn update_multiplier(engine: &mut Engine<Self>) {
        let base = engine.params.base();
        let multiplier = tiered_multiplier(
            engine.stats.base().combo,
            &base.multiplier_thresholds,
            base.max_multiplier,
        );
        engine.stats.base_mut().multiplier = multiplier;
    }

    /// Total points available on the chart, without multipliers
    fn calculate_base_score(chart: &Chart<Self::Note>) -> i64;

    /// Play the chart perfectly up to `song_time`
    fn update_bot(engine: &mut Engine<Self>, song_time: f64);

    fn can_star_power_activate(stats: &BaseStats) -> bool {
        stats.star_power_amount >= STAR_POWER_ACTIVATION_AMOUNT && !stats.star_power_active
    }
}

/// Timing and scoring engine for one instrument
pub struct Engine<I: Instrument> {
    chart: Arc<Chart<I::Note>>,
    sync_track: Arc<SyncTrack>,
    params: I::Params,
    stats: I::Stats,
    state: I::State,
    outcomes: NoteOutcomes,
    base_score: i64,
    input_queue: VecDeque<GameInput>,
    current_input: Option<GameInput>,
    is_bot_update: bool,
    input_log: Vec<GameInput>,
    observers: Vec<EventObserver<I::Note>>,
}

impl<I: Instrument> Engine<I> {
    /// Create an engine for a chart.
    ///
    /// Fails with a configuration error when the parameters are invalid.
    pub fn new(
        chart: impl Into<Arc<Chart<I::Note>>>,
        sync_track: impl Into<Arc<SyncTrack>>,
        params: I::Params,
    ) -> Result<Self> {
        params.validate()?;

        let chart = chart.into();
        let base_score = I::calculate_base_score(&chart);

        debug!(
            "Created {} engine: {} notes, base score {}",
            I::KIND,
            chart.len(),
            base_score
        );

        Ok(Self {
            outcomes: NoteOutcomes::new(chart.len()),
            chart,
            sync_track: sync_track.into(),
            params,
            stats: I::Stats::default(),
            state: I::State::default(),
            base_score,
            input_queue: VecDeque::new(),
            current_input: None,
            is_bot_update: false,
            input_log: Vec::new(),
            observers: Vec::new(),
        })
    }

    /// Register an observer for engine events
    pub fn subscribe(&mut self, observer: impl for<'a> FnMut(&EngineEvent<'a, I::Note>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Append an input to the queue without processing it
    pub fn queue_input(&mut self, input: GameInput) {
        self.input_queue.push_back(input);
    }

    pub fn is_input_queued(&self) -> bool {
        !self.input_queue.is_empty()
    }

    /// Drain the input queue, running the hit logic for each input
    pub fn update_engine(&mut self) {
        if self.input_queue.is_empty() {
            return;
        }

        self.is_bot_update = false;
        while let Some(input) = self.input_queue.pop_front() {
            self.process_input(input);
        }
    }

    /// Advance to `time` without any input
    pub fn update_engine_at(&mut self, time: f64) {
        self.current_input = None;
        self.run_hit_logic(time);
    }

    /// Reset the run and replay `inputs` up to and including `time`.
    ///
    /// Returns the number of inputs consumed. Inputs must be ordered by time;
    /// otherwise nothing is touched and an error is returned.
    pub fn process_up_to_time(&mut self, time: f64, inputs: &[GameInput]) -> Result<usize> {
        if let Some(index) = first_unordered(inputs) {
            let previous = index
                .checked_sub(1)
                .map_or(f64::NAN, |prev| inputs[prev].time);
            return Err(Error::UnorderedInputs {
                index,
                previous,
                time: inputs[index].time,
            });
        }

        self.reset();

        let consumed = inputs.iter().take_while(|input| input.time <= time).count();
        self.input_queue.extend(inputs[..consumed].iter().copied());
        self.update_engine();

        debug!(
            "Replayed {} of {} inputs up to {:.3}s, score {}",
            consumed,
            inputs.len(),
            time,
            self.stats.base().committed_score
        );

        Ok(consumed)
    }

    /// Replay a time range without resetting first. Not supported.
    pub fn process_from_time_to_time(
        &mut self,
        _start_time: f64,
        _end_time: f64,
        _inputs: &[GameInput],
    ) -> Result<usize> {
        Err(Error::Unsupported("processing a time range without a full reset"))
    }

    /// Let the bot play everything up to `song_time`
    pub fn update_bot(&mut self, song_time: f64) {
        self.is_bot_update = true;
        self.current_input = None;
        I::update_bot(self, song_time);
    }

    /// Restore a fresh run: state, stats, outcomes and queued inputs
    pub fn reset(&mut self) {
        self.state.reset();
        self.stats.reset();
        self.outcomes.clear();
        self.input_queue.clear();
        self.input_log.clear();
        self.current_input = None;
        self.is_bot_update = false;
    }

    pub fn stats(&self) -> &I::Stats {
        &self.stats
    }

    pub fn state(&self) -> &I::State {
        &self.state
    }

    pub fn params(&self) -> &I::Params {
        &self.params
    }

    pub fn chart(&self) -> &Chart<I::Note> {
        &self.chart
    }

    pub fn sync_track(&self) -> &SyncTrack {
        &self.sync_track
    }

    pub fn outcomes(&self) -> &NoteOutcomes {
        &self.outcomes
    }

    pub fn base_score(&self) -> i64 {
        self.base_score
    }

    /// Every input processed since the last reset, bot inputs included
    pub fn input_log(&self) -> &[GameInput] {
        &self.input_log
    }

    pub fn current_tick(&self, time: f64) -> u32 {
        self.sync_track.time_to_tick(time)
    }

    pub fn is_input_update(&self) -> bool {
        self.current_input.is_some()
    }

    pub fn is_bot_update(&self) -> bool {
        self.is_bot_update
    }

    /// Run one input through the hit logic at its timestamp
    pub(crate) fn process_input(&mut self, input: GameInput) {
        self.input_log.push(input);
        self.current_input = Some(input);
        self.run_hit_logic(input.time);
        self.current_input = None;
    }

    fn run_hit_logic(&mut self, time: f64) {
        while I::update_hit_logic(self, time) {}
    }

    /// Consume the pending input when its action satisfies `accept`
    pub(crate) fn take_input_if(
        &mut self,
        accept: impl FnOnce(I::Action) -> bool,
    ) -> Option<(GameInput, I::Action)> {
        let input = self.current_input?;
        let action = input.action::<I::Action>()?;
        if !accept(action) {
            return None;
        }

        self.current_input = None;
        Some((input, action))
    }

    pub(crate) fn update_time_variables(&mut self, time: f64) {
        let tick = self.current_tick(time);
        self.state.base_mut().update_time(time, tick);
    }

    pub(crate) fn state_mut(&mut self) -> &mut I::State {
        &mut self.state
    }

    pub(crate) fn stats_mut(&mut self) -> &mut I::Stats {
        &mut self.stats
    }

    /// Mark a note hit and apply the combo, multiplier and score
    pub(crate) fn record_hit(&mut self, index: usize) {
        self.outcomes.mark_hit(index);

        let stats = self.stats.base_mut();
        stats.notes_hit += 1;
        stats.increment_combo();

        I::update_multiplier(self);
        I::add_score(self, index);
        self.update_stars();
    }

    /// Mark a note missed and break the combo
    pub(crate) fn record_miss(&mut self, index: usize) {
        self.outcomes.mark_missed(index);

        let stats = self.stats.base_mut();
        stats.notes_missed += 1;
        stats.combo = 0;

        I::update_multiplier(self);
        self.update_stars();
    }

    pub(crate) fn add_points(&mut self, base_points: i64) {
        let stats = self.stats.base_mut();
        stats.committed_score += note_score(base_points, stats.multiplier, stats.star_power_active);
    }

    pub(crate) fn update_stars(&mut self) {
        let stars = if self.base_score > 0 {
            let ratio = self.stats.base().committed_score as f64 / self.base_score as f64;
            star_progress(ratio, I::STAR_SCORE_THRESHOLDS)
        } else {
            0.0
        };
        self.stats.base_mut().stars = stars;
    }

    pub(crate) fn emit(&mut self, event: &EngineEvent<'_, I::Note>) {
        for observer in &mut self.observers {
            observer(event);
        }
    }

    /// Emit an event that refers to the chart note at `index`
    pub(crate) fn emit_for_note(
        &mut self,
        index: usize,
        build: impl for<'a> FnOnce(&'a I::Note) -> EngineEvent<'a, I::Note>,
    ) {
        let chart = Arc::clone(&self.chart);
        if let Some(note) = chart.get(index) {
            let event = build(note);
            self.emit(&event);
        }
    }
}
