use std::cmp::Reverse;

use tracing::trace;

use super::{Vocals, VocalsAction, VocalsEngineParameters, VocalsState, VocalsStats};
use crate::chart::{Chart, VocalPhrase};
use crate::engine::{Engine, EngineEvent, Instrument, InstrumentKind, POINTS_PER_PHRASE};
use crate::input::GameInput;

/// Silence after the last hit before singing can activate star power
const SING_TO_ACTIVATE_DELAY: f64 = 0.5;

/// Whether a sung pitch matches the expected one in any octave.
///
/// `window` is the tolerance in semitones.
pub fn pitch_matches(sung: f32, expected: f32, window: f64) -> bool {
    let distance = (f64::from(sung) - f64::from(expected)).abs().rem_euclid(12.0);
    distance.min(12.0 - distance) <= window
}

/// Outcome of a finished phrase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhraseCredit {
    /// Share of the phrase's ticks that were sung
    pub ratio: f64,
    pub is_hit: bool,
    /// Ticks added to the hit total; a hit phrase is credited in full
    pub ticks_hit: u32,
    pub ticks_missed: u32,
}

impl PhraseCredit {
    pub fn evaluate(ticks_hit: u32, ticks_total: u32, threshold: f64) -> Self {
        let ratio = if ticks_total == 0 {
            1.0
        } else {
            f64::from(ticks_hit) / f64::from(ticks_total)
        };

        if ratio >= threshold {
            Self {
                ratio,
                is_hit: true,
                ticks_hit: ticks_total,
                ticks_missed: 0,
            }
        } else {
            Self {
                ratio,
                is_hit: false,
                ticks_hit,
                ticks_missed: ticks_total.saturating_sub(ticks_hit),
            }
        }
    }

    /// Ratio relative to the threshold; 1.0 means just enough
    pub fn performance(&self, threshold: f64) -> f64 {
        if threshold > 0.0 {
            self.ratio / threshold
        } else {
            self.ratio
        }
    }
}

impl Instrument for Vocals {
    type Note = VocalPhrase;
    type Action = VocalsAction;
    type Params = VocalsEngineParameters;
    type Stats = VocalsStats;
    type State = VocalsState;

    const KIND: InstrumentKind = InstrumentKind::Vocals;

    const STAR_SCORE_THRESHOLDS: &'static [f64] = &[0.21, 0.46, 0.77, 1.85, 3.08, 4.18];

    fn update_hit_logic(engine: &mut Engine<Self>, time: f64) -> bool {
        engine.update_time_variables(time);

        if engine
            .take_input_if(|action| action == VocalsAction::StarPower)
            .is_some()
        {
            engine.activate_star_power();
        }

        engine.deplete_star_power(engine.used_star_power());

        let index = engine.state().base.note_index;
        let Some((phrase_total, tick_end)) = engine
            .chart()
            .get(index)
            .map(|phrase| (phrase.sung_ticks(), phrase.tick_end))
        else {
            return false;
        };
        let total = *engine
            .state_mut()
            .phrase_ticks_total
            .get_or_insert(phrase_total);

        // Close finished phrases before a pending sample is applied, so the
        // sample lands in the phrase it falls in
        if engine.state().base.current_tick > tick_end {
            close_phrase(engine, index, total);
            return true;
        }

        let sung = engine
            .take_input_if(|action| action == VocalsAction::Pitch)
            .map(|(input, _)| input.axis);
        {
            let state = engine.state_mut();
            state.did_sing = sung.is_some();
            if let Some(pitch) = sung {
                state.pitch_sang = pitch;
                state.last_sing_time = time;
            }
        }

        if sung.is_some() {
            start_sung_range(engine, index, time);
        }

        false
    }

    fn can_note_be_hit(engine: &Engine<Self>, index: usize) -> bool {
        engine.state().did_sing && sung_range_credit(engine, index) > 0
    }

    fn hit_note(engine: &mut Engine<Self>, index: usize) {
        let Some(star_power) = engine.chart().get(index).map(|phrase| phrase.star_power) else {
            return;
        };

        engine.record_hit(index);
        engine.stats_mut().phrases_hit += 1;
        if star_power {
            engine.award_star_power(index);
        }

        trace!(
            "Hit vocal phrase {}, combo {}",
            index,
            engine.stats().base.combo
        );
        engine.emit_for_note(index, |note| EngineEvent::NoteHit { index, note });
    }

    fn miss_note(engine: &mut Engine<Self>, index: usize) {
        let Some(star_power) = engine.chart().get(index).map(|phrase| phrase.star_power) else {
            return;
        };

        engine.record_miss(index);
        if star_power {
            engine.strip_star_power(index);
        }

        trace!("Missed vocal phrase {}", index);
        engine.emit_for_note(index, |note| EngineEvent::NoteMissed { index, note });
    }

    fn add_score(engine: &mut Engine<Self>, _index: usize) {
        engine.add_points(POINTS_PER_PHRASE);
    }

    fn calculate_base_score(chart: &Chart<VocalPhrase>) -> i64 {
        chart.len() as i64 * POINTS_PER_PHRASE
    }

    fn update_bot(engine: &mut Engine<Self>, song_time: f64) {
        let rate = engine.params().approximate_vocal_fps;
        let state = engine.state();
        let mut sample = match state.last_bot_sample {
            Some(last) => last + 1,
            None => (state.base.current_time * rate).ceil().max(0.0) as u64,
        };

        loop {
            let time = sample as f64 / rate;
            if time >= song_time || engine.state().base.note_index >= engine.chart().len() {
                break;
            }

            let from = engine.current_tick(time);
            let until = engine.current_tick(time + 1.0 / rate);
            match bot_pitch(engine, from, until) {
                Some(pitch) => {
                    engine.process_input(GameInput::new(time, VocalsAction::Pitch, pitch))
                }
                None => engine.update_engine_at(time),
            }

            engine.state_mut().last_bot_sample = Some(sample);
            sample += 1;
        }

        engine.update_engine_at(song_time);
    }
}

/// Let the sample just taken cover the ticks up to the next one and credit
/// the open phrase for them
fn start_sung_range(engine: &mut Engine<Vocals>, index: usize, time: f64) {
    let until = engine.current_tick(time + 1.0 / engine.params().approximate_vocal_fps);
    {
        let state = engine.state_mut();
        // Samples faster than the nominal rate never cover a tick twice
        let from = state.base.current_tick.max(state.sung_until);
        state.sung_from = from;
        state.sung_until = until.max(from);
    }

    let credited = sung_range_credit(engine, index);
    let sung_until = engine.state().sung_until;
    let hits_later_phrase = (index + 1..engine.chart().len())
        .take_while(|&next| engine.chart().notes()[next].tick < sung_until)
        .any(|next| sung_range_credit(engine, next) > 0);

    engine.state_mut().phrase_ticks_hit += credited;
    if credited > 0 || hits_later_phrase {
        engine.state_mut().last_hit_time = time;
    } else if should_sing_to_activate(engine, index, time) {
        engine.activate_star_power();
    }
}

/// Ticks of the phrase at `index` the latest sample sang on pitch
fn sung_range_credit(engine: &Engine<Vocals>, index: usize) -> u32 {
    let Some(phrase) = engine.chart().get(index) else {
        return 0;
    };
    let state = engine.state();
    let window = engine.params().base.hit_window;

    phrase
        .notes
        .iter()
        .filter(|note| note.is_sung())
        .map(|note| {
            let ticks = note.ticks_between(state.sung_from, state.sung_until);
            if ticks == 0 {
                return 0;
            }

            let start = engine
                .sync_track()
                .tick_to_time(note.tick.max(state.sung_from));
            match note.pitch_at_time(start) {
                Some(expected) if !pitch_matches(state.pitch_sang, expected, window) => 0,
                // Talkies accept any singing
                _ => ticks,
            }
        })
        .sum()
}

/// Pitch of the sung note overlapping `[from, until)` the most
fn bot_pitch(engine: &Engine<Vocals>, from: u32, until: u32) -> Option<f32> {
    let (note, _) = engine
        .chart()
        .notes()
        .iter()
        .skip(engine.state().base.note_index)
        .take_while(|phrase| phrase.tick < until)
        .flat_map(|phrase| phrase.notes.iter())
        .filter(|note| note.is_sung())
        .map(|note| (note, note.ticks_between(from, until)))
        .filter(|&(_, ticks)| ticks > 0)
        .min_by_key(|&(_, ticks)| Reverse(ticks))?;

    let start = engine.sync_track().tick_to_time(note.tick.max(from));
    Some(note.pitch_at_time(start).unwrap_or_default())
}

fn should_sing_to_activate(engine: &Engine<Vocals>, index: usize, time: f64) -> bool {
    let state = engine.state();
    engine.params().sing_to_activate_star_power
        && engine.chart().notes()[index]
            .note_at_tick(state.base.current_tick)
            .is_none()
        && engine.can_star_power_activate()
        && time - state.last_hit_time > SING_TO_ACTIVATE_DELAY
}

/// Resolve the phrase at `index` and move on to the next one
fn close_phrase(engine: &mut Engine<Vocals>, index: usize, total: u32) {
    let threshold = engine.params().phrase_hit_percent;
    let credit = PhraseCredit::evaluate(engine.state().phrase_ticks_hit, total, threshold);

    {
        let stats = engine.stats_mut();
        stats.vocal_ticks_hit += credit.ticks_hit;
        stats.vocal_ticks_missed += credit.ticks_missed;
    }

    if credit.is_hit {
        Vocals::hit_note(engine, index);
    } else {
        Vocals::miss_note(engine, index);
    }

    {
        let state = engine.state_mut();
        state.base.note_index = index + 1;
        state.phrase_ticks_total = None;
    }
    // The latest sample may already reach into the next phrase
    let carried = sung_range_credit(engine, index + 1);
    engine.state_mut().phrase_ticks_hit = carried;

    engine.update_stars();

    let performance = credit.performance(threshold);
    trace!(
        "Closed vocal phrase {}: {:.1}% sung",
        index,
        credit.ratio * 100.0
    );
    engine.emit_for_note(index, |note| EngineEvent::PhraseCompleted {
        index,
        note,
        performance,
    });
}
