use tracing::{trace, warn};

use super::{Drums, DrumsAction, DrumsEngineParameters, DrumsState, DrumsStats};
use crate::chart::{Chart, ChartNote, DrumNote};
use crate::engine::{
    Engine, EngineEvent, EngineStats, Instrument, InstrumentKind, POINTS_PER_NOTE,
};
use crate::input::GameInput;

impl Instrument for Drums {
    type Note = DrumNote;
    type Action = DrumsAction;
    type Params = DrumsEngineParameters;
    type Stats = DrumsStats;
    type State = DrumsState;

    const KIND: InstrumentKind = InstrumentKind::Drums;

    const STAR_SCORE_THRESHOLDS: &'static [f64] = &[0.21, 0.46, 0.77, 1.85, 3.08, 4.29];

    fn update_hit_logic(engine: &mut Engine<Self>, time: f64) -> bool {
        engine.update_time_variables(time);
        engine.deplete_star_power(engine.used_star_power());

        if engine
            .take_input_if(|action| action == DrumsAction::StarPower)
            .is_some()
        {
            engine.activate_star_power();
        }

        skip_resolved_notes(engine);

        let index = engine.state().base.note_index;
        let window = engine.params().base.hit_window;

        // The window of the oldest pending note has closed
        if let Some(note_time) = engine.chart().get(index).map(ChartNote::time) {
            if time > note_time + window {
                Self::miss_note(engine, index);
                skip_resolved_notes(engine);
                return true;
            }
        }

        let Some((input, action)) = engine.take_input_if(|action| action.pad().is_some()) else {
            return false;
        };

        engine.state_mut().input_pad = action.pad();
        let target = {
            let engine: &Engine<Self> = engine;
            (index..engine.chart().len())
                .take_while(|&i| engine.chart().notes()[i].time() <= time + window)
                .find(|&i| engine.outcomes().is_pending(i) && Self::can_note_be_hit(engine, i))
        };
        engine.state_mut().input_pad = None;

        match target {
            Some(target) => {
                Self::hit_note(engine, target);
                true
            }
            None => {
                overhit(engine, input, action);
                false
            }
        }
    }

    fn can_note_be_hit(engine: &Engine<Self>, index: usize) -> bool {
        let state = engine.state();
        let (Some(note), Some(pad)) = (engine.chart().get(index), state.input_pad) else {
            return false;
        };

        let offset = (note.time() - state.base.current_time).abs();
        offset <= engine.params().base.hit_window && engine.params().mode.pads_match(note.pad, pad)
    }

    fn hit_note(engine: &mut Engine<Self>, index: usize) {
        let Some(phrase_end) = engine.chart().get(index).map(|note| note.star_power_end) else {
            return;
        };

        engine.record_hit(index);
        trace!(
            "Hit drum note {} at {:.3}s, combo {}",
            index,
            engine.state().base.current_time,
            engine.stats().base.combo
        );
        engine.emit_for_note(index, |note| EngineEvent::NoteHit { index, note });

        if phrase_end {
            if !engine.state().star_power_phrase_broken {
                engine.award_star_power(index);
            }
            engine.state_mut().star_power_phrase_broken = false;
        }
    }

    fn miss_note(engine: &mut Engine<Self>, index: usize) {
        let Some((star_power, phrase_end)) = engine
            .chart()
            .get(index)
            .map(|note| (note.star_power, note.star_power_end))
        else {
            return;
        };

        engine.record_miss(index);
        trace!("Missed drum note {}", index);
        engine.emit_for_note(index, |note| EngineEvent::NoteMissed { index, note });

        if star_power && !engine.state().star_power_phrase_broken {
            engine.state_mut().star_power_phrase_broken = true;
            engine.strip_star_power(index);
        }
        if phrase_end {
            engine.state_mut().star_power_phrase_broken = false;
        }
    }

    fn add_score(engine: &mut Engine<Self>, _index: usize) {
        engine.add_points(POINTS_PER_NOTE);
    }

    fn calculate_base_score(chart: &Chart<DrumNote>) -> i64 {
        chart.len() as i64 * POINTS_PER_NOTE
    }

    fn update_bot(engine: &mut Engine<Self>, song_time: f64) {
        loop {
            skip_resolved_notes(engine);

            let index = engine.state().base.note_index;
            let Some(note) = engine.chart().get(index).filter(|note| note.time() <= song_time)
            else {
                break;
            };

            let input = GameInput::button(note.time(), DrumsAction::for_pad(note.pad));
            engine.process_input(input);

            if engine.outcomes().is_pending(index) {
                warn!("Bot input did not resolve drum note {}", index);
                break;
            }
        }

        engine.update_engine_at(song_time);
    }
}

/// Move the cursor past notes that are already hit or missed
fn skip_resolved_notes(engine: &mut Engine<Drums>) {
    let len = engine.chart().len();
    let mut index = engine.state().base.note_index;
    while index < len && !engine.outcomes().is_pending(index) {
        index += 1;
    }
    engine.state_mut().base.note_index = index;
}

/// A pad hit that matched nothing breaks the combo
fn overhit(engine: &mut Engine<Drums>, input: GameInput, action: DrumsAction) {
    trace!("Overhit {} at {:.3}s", action, input.time);

    let stats = engine.stats_mut();
    stats.overhits += 1;
    stats.base_mut().combo = 0;
    Drums::update_multiplier(engine);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::chart::{DrumPad, SyncTrack, TempoChange};
    use crate::drums::DrumMode;
    use crate::engine::{EventKind, NoteOutcome};

    fn sync() -> SyncTrack {
        SyncTrack::constant(480, 120.0).unwrap()
    }

    fn engine_with(
        notes: Vec<DrumNote>,
        params: DrumsEngineParameters,
    ) -> (Engine<Drums>, Rc<RefCell<Vec<EventKind>>>) {
        let sync = sync();
        let chart = Chart::new(notes, &sync).unwrap();
        let mut engine = Engine::new(chart, sync, params).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        engine.subscribe(move |event| sink.borrow_mut().push(EventKind::from(event)));
        (engine, events)
    }

    fn engine(notes: Vec<DrumNote>) -> (Engine<Drums>, Rc<RefCell<Vec<EventKind>>>) {
        engine_with(notes, DrumsEngineParameters::default())
    }

    fn hit(engine: &mut Engine<Drums>, time: f64, action: DrumsAction) {
        engine.queue_input(GameInput::button(time, action));
        engine.update_engine();
    }

    #[test]
    fn test_hit_inside_window() {
        let sync = SyncTrack::new(100, vec![TempoChange { tick: 0, bpm: 60.0 }]).unwrap();
        let chart = Chart::new(vec![DrumNote::new(DrumPad::Red, 100)], &sync).unwrap();
        let params = DrumsEngineParameters::builder().hit_window(0.05).build().unwrap();
        let mut engine = Engine::<Drums>::new(chart, sync, params).unwrap();

        hit(&mut engine, 1.02, DrumsAction::RedPad);

        assert_eq!(engine.outcomes().get(0), NoteOutcome::Hit);
        assert_eq!(engine.stats().base.committed_score, 50);
        assert_eq!(engine.stats().base.combo, 1);
    }

    #[test]
    fn test_wrong_pad_is_overhit() {
        let (mut engine, events) = engine(vec![DrumNote::new(DrumPad::Red, 480)]);
        hit(&mut engine, 0.5, DrumsAction::BluePad);

        assert!(engine.outcomes().is_pending(0));
        assert_eq!(engine.stats().overhits, 1);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_late_input_misses_then_hits_next_note() {
        let (mut engine, events) = engine(vec![
            DrumNote::new(DrumPad::Red, 480),
            DrumNote::new(DrumPad::Kick, 960),
        ]);

        hit(&mut engine, 1.0, DrumsAction::Kick);

        assert_eq!(engine.outcomes().get(0), NoteOutcome::Missed);
        assert_eq!(engine.outcomes().get(1), NoteOutcome::Hit);
        assert_eq!(
            *events.borrow(),
            vec![EventKind::NoteMissed(0), EventKind::NoteHit(1)]
        );
        assert_eq!(engine.stats().base.notes_missed, 1);
        assert_eq!(engine.stats().base.max_combo, 1);
    }

    #[test]
    fn test_chord_notes_hit_separately() {
        let (mut engine, _) = engine(vec![
            DrumNote::new(DrumPad::Kick, 480),
            DrumNote::new(DrumPad::YellowCymbal, 480),
        ]);

        hit(&mut engine, 0.51, DrumsAction::YellowCymbal);
        assert!(engine.outcomes().is_pending(0));
        assert_eq!(engine.outcomes().get(1), NoteOutcome::Hit);

        hit(&mut engine, 0.52, DrumsAction::Kick);
        assert_eq!(engine.outcomes().get(0), NoteOutcome::Hit);
        assert_eq!(engine.state().base.note_index, 2);
    }

    #[test]
    fn test_cymbal_match_depends_on_mode() {
        let notes = vec![DrumNote::new(DrumPad::BlueCymbal, 480)];

        let (mut pro, _) = engine(notes.clone());
        hit(&mut pro, 0.5, DrumsAction::BluePad);
        assert!(pro.outcomes().is_pending(0));

        let params = DrumsEngineParameters::builder()
            .mode(DrumMode::NonProFourLane)
            .build()
            .unwrap();
        let (mut non_pro, _) = engine_with(notes, params);
        hit(&mut non_pro, 0.5, DrumsAction::BluePad);
        assert_eq!(non_pro.outcomes().get(0), NoteOutcome::Hit);
    }

    #[test]
    fn test_multiplier_steps_with_combo() {
        let notes = (1..=12).map(|i| DrumNote::new(DrumPad::Red, i * 240)).collect();
        let (mut engine, _) = engine(notes);

        for i in 1..=12 {
            hit(&mut engine, f64::from(i) * 0.25, DrumsAction::RedPad);
        }

        // the tenth note already scores at x2
        assert_eq!(engine.stats().base.multiplier, 2);
        assert_eq!(engine.stats().base.committed_score, 9 * 50 + 3 * 100);
    }

    #[test]
    fn test_unbroken_phrase_awards_star_power() {
        let (mut engine, events) = engine(vec![
            DrumNote::new(DrumPad::Red, 480).with_star_power(false),
            DrumNote::new(DrumPad::Red, 960).with_star_power(true),
        ]);

        hit(&mut engine, 0.5, DrumsAction::RedPad);
        hit(&mut engine, 1.0, DrumsAction::RedPad);

        assert_eq!(engine.stats().base.star_power_amount, 0.25);
        assert_eq!(engine.stats().base.star_power_phrases_hit, 1);
        assert_eq!(events.borrow().last(), Some(&EventKind::StarPowerPhraseHit(1)));
    }

    #[test]
    fn test_broken_phrase_strips_once() {
        let (mut engine, events) = engine(vec![
            DrumNote::new(DrumPad::Red, 480).with_star_power(false),
            DrumNote::new(DrumPad::Red, 720).with_star_power(false),
            DrumNote::new(DrumPad::Red, 960).with_star_power(true),
        ]);

        engine.update_engine_at(0.9);
        hit(&mut engine, 1.0, DrumsAction::RedPad);

        let stripped = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, EventKind::StarPowerPhraseMissed(_)))
            .count();
        assert_eq!(stripped, 1);
        assert_eq!(engine.stats().base.star_power_amount, 0.0);
        assert!(!engine.state().star_power_phrase_broken);
    }

    #[test]
    fn test_star_power_input_activates() {
        let (mut engine, events) = engine(vec![DrumNote::new(DrumPad::Red, 48000)]);
        engine.stats_mut().base.star_power_amount = 0.5;

        hit(&mut engine, 1.0, DrumsAction::StarPower);
        assert!(engine.stats().base.star_power_active);
        assert_eq!(engine.stats().overhits, 0);

        // a half meter lasts sixteen beats, eight seconds at 120 BPM
        engine.update_engine_at(9.0);
        assert!(!engine.stats().base.star_power_active);
        assert_eq!(
            *events.borrow(),
            vec![
                EventKind::StarPowerStatus(true),
                EventKind::StarPowerStatus(false)
            ]
        );
    }

    #[test]
    fn test_star_power_doubles_score() {
        let (mut engine, _) = engine(vec![DrumNote::new(DrumPad::Red, 480)]);
        engine.stats_mut().base.star_power_amount = 1.0;

        hit(&mut engine, 0.1, DrumsAction::StarPower);
        hit(&mut engine, 0.5, DrumsAction::RedPad);

        assert_eq!(engine.stats().base.committed_score, 100);
    }

    #[test]
    fn test_bot_hits_every_note() {
        let notes = vec![
            DrumNote::new(DrumPad::Kick, 480),
            DrumNote::new(DrumPad::GreenCymbal, 480),
            DrumNote::new(DrumPad::Blue, 720),
            DrumNote::new(DrumPad::Red, 4800),
        ];
        let (mut engine, _) = engine(notes);

        engine.update_bot(1.0);
        assert_eq!(engine.stats().base.notes_hit, 3);
        assert!(engine.outcomes().is_pending(3));

        engine.update_bot(6.0);
        assert_eq!(engine.stats().base.notes_hit, 4);
        assert_eq!(engine.stats().base.notes_missed, 0);
        assert_eq!(engine.input_log().len(), 4);
        assert!(engine.is_bot_update());
    }
}
