//! Orchestration tests for [`Level`] covering modes, events, and tracing.

mod common;

use std::time::Duration;

use beaconet_core::{
    ClickOutcome, EndReason, EventLog, GameMode, Level as PuzzleLevel, LevelBuilder, LevelError,
    LevelEvent, SelectionOutcome, SequenceRandom, SoundKind, TransitionError, Verdict,
};
use common::{TestLevel, connect, id, level_with_draws, place_all};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use beaconet_test_support::tracing::RecordingLayer;

#[fixture]
fn board() -> TestLevel {
    let mut level = level_with_draws(&[0.5]);
    place_all(&mut level);
    level.events_mut().drain();
    level
}

/// Board whose anchor #1 is unstable with its minigame open.
#[fixture]
fn repairing() -> TestLevel {
    let mut level = level_with_draws(&[0.25]);
    place_all(&mut level);
    // A 0.25 draw waits 17.5s and then picks anchor #1 of four.
    level.tick(Duration::from_millis(17_500)).expect("strike");
    level
        .anchor_clicked(id(1))
        .expect("open stabilization session");
    level.events_mut().drain();
    level
}

#[rstest]
fn selector_clicks_drive_highlights_and_lines(mut board: TestLevel) {
    let first = board.anchor_clicked(id(3)).expect("select");
    assert_eq!(first, ClickOutcome::Selection(SelectionOutcome::Selected(id(3))));
    board.anchor_clicked(id(3)).expect("cancel");
    connect(&mut board, 2, 0);

    assert_eq!(
        board.events().events(),
        &[
            LevelEvent::Highlight {
                anchor: id(3),
                on: true,
            },
            LevelEvent::Highlight {
                anchor: id(3),
                on: false,
            },
            LevelEvent::Highlight {
                anchor: id(2),
                on: true,
            },
            LevelEvent::Highlight {
                anchor: id(2),
                on: false,
            },
            LevelEvent::LineAdded(id(2), id(0)),
        ]
    );
    assert!(board.graph().has_edge(id(0), id(2)));
}

#[rstest]
fn pending_selection_is_cleared_when_level_ends(mut board: TestLevel) {
    board.anchor_clicked(id(1)).expect("select");
    board.validate_path_requested().expect("validate");
    assert!(board.selector().pending().is_none());
    assert!(board.events().events().contains(&LevelEvent::Highlight {
        anchor: id(1),
        on: false,
    }));
}

#[rstest]
fn opening_minigame_pauses_the_game_clock(mut repairing: TestLevel) {
    assert_eq!(repairing.mode(), GameMode::MinigameActive);
    let zone = repairing.minigame().target_zone().expect("session running");
    let remaining = repairing.countdown().remaining();
    let until_next = repairing.interference().until_next();

    let report = repairing.tick(Duration::from_secs(30)).expect("tick");
    assert!(report.strikes.is_empty());
    assert!(!report.expired);
    assert_eq!(repairing.countdown().remaining(), remaining);
    assert_eq!(repairing.interference().until_next(), until_next);
    assert_eq!(repairing.minigame().target_zone(), Some(zone));
}

#[rstest]
fn minigame_blocks_other_inputs(mut repairing: TestLevel) {
    assert_eq!(
        repairing.anchor_clicked(id(0)).expect("click"),
        ClickOutcome::Ignored {
            mode: GameMode::MinigameActive
        }
    );
    let pause = repairing.toggle_pause().expect_err("pause is blocked");
    assert_eq!(
        pause,
        LevelError::Transition(TransitionError::ModeConflict {
            current: GameMode::MinigameActive,
            requested: GameMode::Paused,
        })
    );
    assert!(repairing.validate_path_requested().is_err());
    assert!(repairing.events().is_empty());
}

#[rstest]
fn confirm_hides_panel_and_reports_success(mut repairing: TestLevel) {
    // Target is 0.3 for a 0.25 draw; speed 1.0 reaches it after 300ms.
    repairing.tick(Duration::from_millis(300)).expect("sweep");
    let outcome = repairing.confirm_minigame().expect("confirm");
    assert!(outcome.success);
    assert_eq!(
        repairing.events().events(),
        &[
            LevelEvent::MinigamePanel { visible: false },
            LevelEvent::StabilityChanged {
                anchor: id(1),
                stable: true,
            },
        ]
    );
    assert_eq!(repairing.mode(), GameMode::Normal);
}

#[rstest]
fn ended_level_ignores_clicks_and_time(mut board: TestLevel) {
    board.validate_path_requested().expect("validate");
    let remaining = board.countdown().remaining();
    assert_eq!(
        board.anchor_clicked(id(0)).expect("click"),
        ClickOutcome::Ignored {
            mode: GameMode::Ended
        }
    );
    board.tick(Duration::from_secs(60)).expect("tick");
    assert_eq!(board.countdown().remaining(), remaining);
    assert!(board.validate_path_requested().is_err());
}

#[rstest]
fn placement_plays_sound_once_per_anchor() {
    let mut level = level_with_draws(&[0.5]);
    place_all(&mut level);
    let sounds = level
        .events()
        .events()
        .iter()
        .filter(|event| **event == LevelEvent::Sound(SoundKind::Placement))
        .count();
    assert_eq!(sounds, 4);
}

#[rstest]
fn inbound_operations_emit_named_spans(mut board: TestLevel) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        board.anchor_clicked(id(0)).expect("select");
        board.toggle_pause().expect("pause");
        board.toggle_pause().expect("resume");
        board.validate_path_requested().expect("validate");
    });

    let spans = layer.spans();
    let click = spans
        .iter()
        .find(|span| span.name == "level.click")
        .expect("click span recorded");
    assert_eq!(click.fields.get("anchor").map(String::as_str), Some("#0"));
    assert_eq!(click.fields.get("mode").map(String::as_str), Some("normal"));
    assert_eq!(
        spans.iter().filter(|span| span.name == "level.pause").count(),
        2
    );
    let validate = spans
        .iter()
        .find(|span| span.name == "validator.validate")
        .expect("validator span recorded");
    assert_eq!(validate.fields.get("anchors").map(String::as_str), Some("4"));
    assert!(spans.iter().any(|span| span.name == "level.validate"));
}

#[rstest]
fn insufficient_placement_logs_warning() {
    let mut level = level_with_draws(&[0.5]);
    level.anchor_clicked(id(0)).expect("place");

    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        level.validate_path_requested().expect("validate");
    });

    let warning = layer
        .events()
        .into_iter()
        .find(|event| event.level == Level::WARN)
        .expect("warning recorded");
    assert_eq!(warning.fields.get("placed").map(String::as_str), Some("1"));
    assert_eq!(warning.fields.get("required").map(String::as_str), Some("4"));
}

/// Default 20s countdown with interference fixed at `every`, all four beacons
/// placed. Every draw is 0.5, so the first strike hits anchor #2.
fn timed_board(every: Duration) -> TestLevel {
    let config = LevelBuilder::new()
        .with_interference_interval(every, every)
        .build()
        .expect("configuration is valid");
    let mut level = PuzzleLevel::new(config, EventLog::default(), SequenceRandom::new([0.5]));
    place_all(&mut level);
    level.events_mut().drain();
    level
}

#[rstest]
fn long_tick_stops_game_clock_at_expiry() {
    let mut level = timed_board(Duration::from_secs(15));
    let report = level.tick(Duration::from_secs(100)).expect("tick");

    assert!(report.expired);
    assert_eq!(report.strikes.len(), 1);
    assert_eq!(report.strikes[0].target, Some(id(2)));
    assert_eq!(level.graph().stable_occupied().len(), 3);
    assert_eq!(level.countdown().remaining(), Duration::ZERO);
    assert_eq!(
        level.outcome().map(|outcome| (outcome.verdict, &outcome.reason)),
        Some((Verdict::Lost, &EndReason::Timeout))
    );
}

#[rstest]
fn strike_due_at_expiry_fires_before_the_end() {
    let mut level = timed_board(Duration::from_secs(20));
    let report = level.tick(Duration::from_secs(20)).expect("tick");

    assert!(report.expired);
    assert_eq!(report.strikes.len(), 1);
    assert_eq!(
        level.events().events(),
        &[
            LevelEvent::StabilityChanged {
                anchor: id(2),
                stable: false,
            },
            LevelEvent::EndScreen { won: false },
        ]
    );
}

#[rstest]
fn strike_due_after_expiry_never_fires() {
    let mut level = timed_board(Duration::from_secs(25));
    let report = level.tick(Duration::from_secs(30)).expect("tick");

    assert!(report.expired);
    assert!(report.strikes.is_empty());
    assert_eq!(level.graph().stable_occupied().len(), 4);
    assert_eq!(
        level.events().events(),
        &[LevelEvent::EndScreen { won: false }]
    );
}

#[rstest]
fn tiny_interval_with_huge_tick_is_bounded_by_countdown() {
    let mut level = timed_board(Duration::from_millis(1));
    let report = level
        .tick(Duration::from_secs(10_000_000))
        .expect("tick");

    assert!(report.expired);
    assert!(report.strikes.len() <= 20_000);
    assert!(level.graph().stable_occupied().is_empty());
    level.graph().invariants().check_all().expect("graph stays valid");
}
