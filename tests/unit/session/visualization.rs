use super::*;
use crate::foundation::core::Canvas;
use crate::layout::measure::FixedAdvanceMeasure;
use crate::playback::frames::FrameQueue;

const SCENARIO: &str = "Romeo loves Juliet. Juliet loves Romeo.";

fn config() -> VisualConfig {
    VisualConfig {
        canvas: Canvas {
            width: 100,
            height: 50,
        },
        padding: 10.0,
        ..VisualConfig::default()
    }
}

fn session(text: &str, options: PlaybackOptions) -> Visualization {
    Visualization::new(
        text,
        config(),
        options,
        &mut FixedAdvanceMeasure::default(),
    )
    .unwrap()
}

fn chronological() -> PlaybackOptions {
    PlaybackOptions {
        story: RevealPolicy::Chronological,
        seed: Some(1),
        ..PlaybackOptions::default()
    }
}

fn tick(v: &mut Visualization, q: &mut FrameQueue, now: f64) {
    for id in q.take_due() {
        v.on_frame(id, now, q);
    }
}

#[test]
fn scenario_builds_cross_and_linear_connections() {
    let v = session(SCENARIO, chronological());
    assert_eq!(v.connections().len(), 4);
    assert_eq!(v.status(0.0), "2 Romeo, 2 Juliet, 4 lines");
    assert_eq!(v.notice(), None);

    let v = session(
        SCENARIO,
        PlaybackOptions {
            pairing: PairingPolicy::Linear,
            ..chronological()
        },
    );
    let keys: Vec<_> = v.connections().iter().map(Connection::key).collect();
    assert_eq!(keys, vec![(0, 3), (5, 2)]);
}

#[test]
fn empty_text_is_a_notice_not_an_error() {
    let mut q = FrameQueue::new();
    let mut v = session("", PlaybackOptions::default());
    assert_eq!(v.notice(), Some(InputNotice::EmptyInput));
    assert_eq!(v.status(0.0), "0 / 0 lines");
    assert!(!v.start(0.0, &mut q));
    assert_eq!(q.pending(), 0);
    assert_eq!(v.revealed(), 0);
    assert!(v.layout().words().is_empty());
}

#[test]
fn missing_category_is_reported() {
    let v = session("Romeo, Romeo, wherefore art thou", PlaybackOptions::default());
    assert_eq!(
        v.notice(),
        Some(InputNotice::NoMarkersFound {
            missing: vec![MarkerCategory::B]
        })
    );
    assert!(v.connections().is_empty());
    assert_eq!(
        v.notice().unwrap().to_string(),
        "no occurrences of Juliet"
    );
    assert_eq!(v.status(0.0), "2 Romeo, 0 Juliet, 0 lines");
}

#[test]
fn status_follows_the_playback_lifecycle() {
    let mut q = FrameQueue::new();
    let mut v = session(SCENARIO, chronological());

    assert!(v.start(0.0, &mut q));
    tick(&mut v, &mut q, 15_000.0);
    assert_eq!(v.status(15_000.0), "2 / 4 lines · 15s / 30s");

    v.pause(&mut q);
    assert_eq!(v.status(99_000.0), "2 / 4 lines · 15s / 30s");

    assert!(v.start(20_000.0, &mut q));
    tick(&mut v, &mut q, 35_000.0);
    assert!(v.is_complete());
    assert_eq!(v.status(35_000.0), "4 lines · completed");

    v.reset(&mut q);
    assert_eq!(v.revealed(), 0);
    assert_eq!(v.status(36_000.0), "0 / 4 lines");
}

#[test]
fn counts_use_thousands_separators() {
    let text = format!("{}{}", "Romeo ".repeat(40), "Juliet ".repeat(30));
    let v = Visualization::new(
        &text,
        VisualConfig::default(),
        PlaybackOptions::default(),
        &mut FixedAdvanceMeasure::default(),
    )
    .unwrap();
    assert_eq!(v.status(0.0), "40 Romeo, 30 Juliet, 1,200 lines");
}

#[test]
fn seed_is_remembered_and_reproducible() {
    let text = format!("{}{}", "Romeo ".repeat(6), "Juliet ".repeat(6));
    let opts = PlaybackOptions {
        seed: Some(42),
        ..PlaybackOptions::default()
    };
    let a = session(&text, opts);
    let b = session(&text, opts);
    assert_eq!(a.connections(), b.connections());
    assert_eq!(a.seed(), 42);

    let drawn = session(&text, PlaybackOptions::default());
    assert_eq!(drawn.options().seed, Some(drawn.seed()));
}

#[test]
fn story_change_rebuilds_and_pauses() {
    let mut q = FrameQueue::new();
    let text = format!("{}{}", "Romeo ".repeat(3), "Juliet ".repeat(3));
    let mut v = session(&text, chronological());
    let before = v.scene().generation;

    v.start(0.0, &mut q);
    tick(&mut v, &mut q, 10_000.0);
    let cursor = v.revealed();
    assert!(cursor > 0);

    assert!(!v.set_story(RevealPolicy::Chronological, &mut q));
    assert!(v.set_story(RevealPolicy::Random, &mut q));
    assert!(!v.is_running());
    assert_eq!(q.pending(), 0);
    assert_eq!(v.revealed(), cursor);
    assert_eq!(v.connections().len(), 9);
    assert_eq!(v.scene().generation, before + 1);
    assert!(
        v.drain_events()
            .iter()
            .any(|e| matches!(e, PlaybackEvent::Retargeted { total: 9, .. }))
    );
}

#[test]
fn pairing_change_clamps_the_cursor() {
    let mut q = FrameQueue::new();
    let mut v = session(SCENARIO, chronological());
    v.start(0.0, &mut q);
    tick(&mut v, &mut q, 25_000.0);
    assert_eq!(v.revealed(), 3);

    assert!(v.set_pairing(PairingPolicy::Linear, &mut q));
    assert_eq!(v.connections().len(), 2);
    assert_eq!(v.revealed(), 2);
    assert!(v.is_complete());
    assert_eq!(v.status(25_000.0), "2 lines · completed");
}

#[test]
fn pairing_round_trip_after_completion_resumes_mid_way() {
    let mut q = FrameQueue::new();
    let mut v = session(SCENARIO, chronological());
    v.start(0.0, &mut q);
    tick(&mut v, &mut q, 30_000.0);
    assert!(v.is_complete());

    assert!(v.set_pairing(PairingPolicy::Linear, &mut q));
    assert!(v.is_complete());
    assert!(v.set_pairing(PairingPolicy::Cross, &mut q));

    assert_eq!(v.revealed(), 2);
    assert_eq!(v.playback().phase, PlaybackPhase::Paused);
    assert_eq!(v.status(40_000.0), "2 / 4 lines · 15s / 30s");

    assert!(v.start(40_000.0, &mut q));
    tick(&mut v, &mut q, 55_000.0);
    assert!(v.is_complete());
    assert_eq!(v.status(55_000.0), "4 lines · completed");
}

#[test]
fn seed_changes_order_but_not_geometry() {
    let text = format!("{}{}", "Romeo ".repeat(5), "Juliet ".repeat(5));
    let with_seed = |seed| {
        session(
            &text,
            PlaybackOptions {
                seed: Some(seed),
                ..PlaybackOptions::default()
            },
        )
    };
    let a = with_seed(1);
    let b = with_seed(2);

    assert_eq!(a.layout().words(), b.layout().words());
    assert_eq!(a.markers(), b.markers());

    let sorted_keys = |v: &Visualization| {
        let mut keys: Vec<_> = v.connections().iter().map(Connection::key).collect();
        keys.sort_unstable();
        keys
    };
    assert_eq!(sorted_keys(&a), sorted_keys(&b));
    assert_eq!(sorted_keys(&a).len(), 25);
}

#[test]
fn speed_and_ease_update_the_timeline() {
    let mut v = session(SCENARIO, chronological());
    v.set_speed(Speed::Fast, 0.0).unwrap();
    assert_eq!(v.playback().duration_ms, 15_000.0);
    v.set_speed(Speed::Slow, 0.0).unwrap();
    assert_eq!(v.playback().duration_ms, 60_000.0);
    v.set_ease(Ease::Accelerating, 0.0);
    assert_eq!(v.playback().ease, Ease::Accelerating);
    assert_eq!(v.summary().speed, Speed::Slow);
}

#[test]
fn summary_serializes_for_json_output() {
    let v = session("Romeo", chronological());
    let json = serde_json::to_value(v.summary()).unwrap();
    assert_eq!(json["romeo"], 1);
    assert_eq!(json["juliet"], 0);
    assert_eq!(json["story"], "chronological");
    assert_eq!(json["pairing"], "cross");
    assert_eq!(json["notice"]["kind"], "no_markers_found");
    assert_eq!(json["notice"]["missing"][0], "b");
}
