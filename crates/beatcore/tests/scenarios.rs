use std::cell::RefCell;
use std::rc::Rc;

use beatcore::prelude::*;
use beatcore::{BaseStats, EventKind, ReplaySummary};

fn drum_engine(notes: Vec<DrumNote>) -> Engine<Drums> {
    let sync = SyncTrack::constant(480, 120.0).unwrap();
    let chart = Chart::new(notes, &sync).unwrap();
    Engine::new(chart, sync, DrumsEngineParameters::default()).unwrap()
}

fn red_notes(count: u32) -> Vec<DrumNote> {
    (1..=count)
        .map(|i| DrumNote::new(DrumPad::Red, i * 480))
        .collect()
}

fn red_hits(times: &[f64]) -> Vec<GameInput> {
    times
        .iter()
        .map(|&time| GameInput::button(time, DrumsAction::RedPad))
        .collect()
}

#[test]
fn test_drum_hit_inside_window() {
    let sync = SyncTrack::constant(100, 60.0).unwrap();
    let chart = Chart::new(vec![DrumNote::new(DrumPad::Red, 100)], &sync).unwrap();
    let params = DrumsEngineParameters::builder()
        .hit_window(0.05)
        .build()
        .unwrap();
    let mut engine = Engine::<Drums>::new(chart, sync, params).unwrap();
    assert!((engine.chart().notes()[0].time() - 1.0).abs() < 1e-9);

    engine.queue_input(GameInput::button(1.02, DrumsAction::RedPad));
    engine.update_engine();

    assert_eq!(engine.outcomes().get(0), NoteOutcome::Hit);
    assert_eq!(engine.stats().base.committed_score, 50);
    assert_eq!(engine.stats().base.notes_hit, 1);
}

#[test]
fn test_vocal_phrase_hit_gets_full_credit() {
    let sync = SyncTrack::constant(480, 120.0).unwrap();
    let phrase = VocalPhrase::new(
        0,
        480,
        vec![
            VocalNote::pitched(0, 240, 60.0),
            VocalNote::pitched(240, 240, 64.0),
        ],
    );
    let chart = Chart::new(vec![phrase], &sync).unwrap();
    let params = VocalsEngineParameters::builder()
        .approximate_vocal_fps(96.0)
        .phrase_hit_percent(0.8)
        .build()
        .unwrap();
    let mut engine = Engine::<Vocals>::new(chart, sync, params).unwrap();

    // One sample every 10 ticks, each covering the 10 ticks after it. The
    // first 10 ticks go unsung and the last 30 are off pitch.
    for k in 1..=48u32 {
        let pitch = match k {
            1..=23 => 60.0,
            24..=44 => 64.0,
            _ => 67.0,
        };
        engine.queue_input(GameInput::new(
            f64::from(k) / 96.0,
            VocalsAction::Pitch,
            pitch,
        ));
        engine.update_engine();
    }
    assert_eq!(engine.state().phrase_ticks_hit, 440);

    engine.update_engine_at(0.6);

    assert_eq!(engine.outcomes().get(0), NoteOutcome::Hit);
    assert_eq!(engine.stats().vocal_ticks_hit, 480);
    assert_eq!(engine.stats().vocal_ticks_missed, 0);
    assert_eq!(engine.stats().phrases_hit, 1);
}

#[test]
fn test_full_replay_is_deterministic() {
    let inputs = red_hits(&[0.5, 1.03, 1.6, 2.49, 3.0]);

    let mut first = drum_engine(red_notes(6));
    first.process_up_to_time(4.0, &inputs).unwrap();
    first.update_engine_at(4.0);

    let mut second = drum_engine(red_notes(6));
    second.update_bot(1.2);
    second.process_up_to_time(4.0, &inputs).unwrap();
    second.update_engine_at(4.0);

    assert_eq!(second.stats(), first.stats());
    assert_eq!(second.state(), first.state());
    assert_eq!(second.outcomes(), first.outcomes());
    assert_eq!(second.input_log(), first.input_log());
}

#[test]
fn test_replay_stops_at_requested_time() {
    let inputs = red_hits(&[0.5, 1.0, 1.5, 2.0]);
    let mut engine = drum_engine(red_notes(4));

    let consumed = engine.process_up_to_time(1.0, &inputs).unwrap();
    assert_eq!(consumed, 2);
    assert_eq!(engine.stats().base.notes_hit, 2);
    assert_eq!(engine.outcomes().get(2), NoteOutcome::Pending);
}

#[test]
fn test_update_at_converged_time_is_idempotent() {
    let mut engine = drum_engine(red_notes(4));
    engine.queue_input(GameInput::button(0.5, DrumsAction::RedPad));
    engine.update_engine();
    engine.update_engine_at(1.6);

    let stats = engine.stats().clone();
    let state = engine.state().clone();
    let outcomes = engine.outcomes().clone();

    engine.update_engine_at(1.6);

    assert_eq!(engine.stats(), &stats);
    assert_eq!(engine.state(), &state);
    assert_eq!(engine.outcomes(), &outcomes);
}

#[test]
fn test_unordered_inputs_leave_state_untouched() {
    let mut engine = drum_engine(red_notes(4));
    engine.queue_input(GameInput::button(0.5, DrumsAction::RedPad));
    engine.update_engine();
    let stats = engine.stats().clone();

    let inputs = red_hits(&[0.5, 1.5, 1.0]);
    let result = engine.process_up_to_time(2.0, &inputs);

    match result {
        Err(Error::UnorderedInputs { index, .. }) => assert_eq!(index, 2),
        other => panic!("expected unordered inputs error, got {:?}", other),
    }
    assert_eq!(engine.stats(), &stats);
    assert_eq!(engine.outcomes().get(0), NoteOutcome::Hit);
}

#[test]
fn test_partial_replay_is_unsupported() {
    let mut engine = drum_engine(red_notes(2));
    let result = engine.process_from_time_to_time(0.0, 1.0, &red_hits(&[0.5]));
    assert!(matches!(result, Err(Error::Unsupported(_))));
    assert_eq!(engine.stats().base.notes_hit, 0);
}

#[test]
fn test_events_follow_resolution_order() {
    let mut engine = drum_engine(vec![
        DrumNote::new(DrumPad::Red, 480).with_star_power(false),
        DrumNote::new(DrumPad::Red, 960).with_star_power(true),
    ]);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event| sink.borrow_mut().push(EventKind::from(event)));

    engine.queue_input(GameInput::button(1.0, DrumsAction::RedPad));
    engine.update_engine();

    assert_eq!(
        *events.borrow(),
        vec![
            EventKind::NoteMissed(0),
            EventKind::StarPowerPhraseMissed(0),
            EventKind::NoteHit(1),
        ]
    );
}

#[test]
fn test_reset_restores_fresh_run() {
    let mut engine = drum_engine(red_notes(3));
    engine.update_bot(5.0);
    assert_eq!(engine.stats().base.notes_hit, 3);

    engine.reset();

    assert_eq!(engine.stats().base, BaseStats::default());
    assert!(
        engine
            .outcomes()
            .iter()
            .all(|outcome| outcome == NoteOutcome::Pending)
    );
    assert!(engine.input_log().is_empty());
    assert!(!engine.is_input_queued());
}

#[test]
fn test_bot_run_star_rating() {
    let mut engine = drum_engine(red_notes(40));
    engine.update_bot(30.0);

    let summary = ReplaySummary::from_stats(&engine.stats().base);
    assert_eq!(summary.notes_hit, 40);
    assert_eq!(summary.notes_missed, 0);
    assert_eq!(summary.max_combo, 40);
    // 5150 of 2000 base points: past four stars, short of five
    assert_eq!(summary.score, 5150);
    assert!(summary.stars > 4.0 && summary.stars < 5.0);
}
