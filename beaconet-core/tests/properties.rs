//! Property-based checks over random operation sequences.

mod common;

use std::time::Duration;

use beaconet_core::{
    ConnectionGraph, ConnectionSelector, EventLog, GameMode, Level, LevelBuilder, SelectorState,
    SeededRandom, SequenceRandom, StabilizationMinigame,
};
use common::id;
use proptest::prelude::*;

const ANCHORS: usize = 6;

#[derive(Clone, Debug)]
enum GraphOp {
    Place(usize),
    Stability(usize, bool),
    Add(usize, usize),
    Remove(usize, usize),
    Disconnect(usize),
}

fn graph_op() -> impl Strategy<Value = GraphOp> {
    let anchor = 0..ANCHORS + 1;
    prop_oneof![
        2 => anchor.clone().prop_map(GraphOp::Place),
        2 => (anchor.clone(), any::<bool>()).prop_map(|(a, s)| GraphOp::Stability(a, s)),
        4 => (anchor.clone(), anchor.clone()).prop_map(|(a, b)| GraphOp::Add(a, b)),
        1 => (anchor.clone(), anchor.clone()).prop_map(|(a, b)| GraphOp::Remove(a, b)),
        1 => anchor.prop_map(GraphOp::Disconnect),
    ]
}

fn apply(graph: &mut ConnectionGraph, op: &GraphOp) {
    // Rejected operations must leave the graph valid too, so errors are ignored.
    let _ = match *op {
        GraphOp::Place(a) => graph.place_beacon(id(a)).map(drop),
        GraphOp::Stability(a, stable) => graph.set_stability(id(a), stable).map(drop),
        GraphOp::Add(a, b) => graph.add_edge(id(a), id(b)),
        GraphOp::Remove(a, b) => graph.remove_edge(id(a), id(b)).map(drop),
        GraphOp::Disconnect(a) => graph.disconnect_all(id(a)).map(drop),
    };
}

#[derive(Clone, Debug)]
enum LevelOp {
    Click(usize),
    Tick(u64),
    Confirm,
    Pause,
}

fn level_op() -> impl Strategy<Value = LevelOp> {
    prop_oneof![
        6 => (0..4usize).prop_map(LevelOp::Click),
        3 => (1..8_000u64).prop_map(LevelOp::Tick),
        1 => Just(LevelOp::Confirm),
        1 => Just(LevelOp::Pause),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_mutations_preserve_graph_invariants(ops in prop::collection::vec(graph_op(), 0..64)) {
        let mut graph = ConnectionGraph::with_anchors(ANCHORS);
        for op in &ops {
            apply(&mut graph, op);
            let violations = graph.invariants().collect_all();
            prop_assert!(violations.is_empty(), "after {op:?}: {violations:?}");
        }
    }

    #[test]
    fn add_then_remove_restores_edges(
        ops in prop::collection::vec(graph_op(), 0..32),
        a in 0..ANCHORS,
        b in 0..ANCHORS,
    ) {
        let mut graph = ConnectionGraph::with_anchors(ANCHORS);
        for op in &ops {
            apply(&mut graph, op);
        }
        let before = graph.edges();
        if graph.add_edge(id(a), id(b)).is_ok() {
            prop_assert!(graph.remove_edge(id(a), id(b)).expect("known anchors"));
        }
        prop_assert_eq!(graph.edges(), before);
    }

    #[test]
    fn repeated_stability_matches_single_call(
        ops in prop::collection::vec(graph_op(), 0..32),
        anchor in 0..ANCHORS,
        stable in any::<bool>(),
    ) {
        let mut graph = ConnectionGraph::with_anchors(ANCHORS);
        for op in &ops {
            apply(&mut graph, op);
        }
        let mut once = graph.clone();
        let first = once.set_stability(id(anchor), stable);
        let mut twice = once.clone();
        let second = twice.set_stability(id(anchor), stable);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn selector_returns_to_idle_after_second_click(
        ops in prop::collection::vec(graph_op(), 0..32),
        first in 0..ANCHORS,
        second in 0..ANCHORS,
    ) {
        let mut graph = ConnectionGraph::with_anchors(ANCHORS);
        for op in &ops {
            apply(&mut graph, op);
        }
        let mut selector = ConnectionSelector::default();
        let linkable = |graph: &ConnectionGraph, index: usize| {
            graph.anchor(id(index)).is_some_and(|anchor| anchor.is_linkable())
        };
        let both = linkable(&graph, first) && linkable(&graph, second);
        selector.click(&mut graph, id(first));
        selector.click(&mut graph, id(second));
        if both {
            prop_assert_eq!(selector.state(), SelectorState::Idle);
        }
        prop_assert!(graph.invariants().check_all().is_ok());
    }

    #[test]
    fn sweep_never_leaves_unit_interval(
        speed in 0.05f64..12.0,
        steps in prop::collection::vec(0u64..5_000, 1..64),
        draw in 0.0f64..1.0,
    ) {
        let mut graph = ConnectionGraph::with_anchors(1);
        graph.place_beacon(id(0)).expect("place");
        graph.set_stability(id(0), false).expect("destabilise");
        let mut game = StabilizationMinigame::new(0.1, speed);
        let target = game
            .start(&graph, id(0), &mut SequenceRandom::new([draw]))
            .expect("start")
            .target_value();
        prop_assert!(target > 0.1 && target < 0.9);
        for step in steps {
            game.tick(Duration::from_millis(step));
            let value = game.session().expect("running").current_value();
            prop_assert!((0.0..=1.0).contains(&value), "value {value} escaped");
        }
    }

    #[test]
    fn random_play_keeps_level_consistent(
        seed in any::<u64>(),
        ops in prop::collection::vec(level_op(), 0..96),
    ) {
        let config = LevelBuilder::new()
            .with_time_limit(Duration::from_secs(120))
            .with_interference_interval(Duration::from_secs(2), Duration::from_secs(6))
            .build()
            .expect("configuration is valid");
        let mut level = Level::new(config, EventLog::default(), SeededRandom::new(seed));
        for op in &ops {
            let _ = match *op {
                LevelOp::Click(anchor) => level.anchor_clicked(id(anchor)).map(drop),
                LevelOp::Tick(ms) => level.tick(Duration::from_millis(ms)).map(drop),
                LevelOp::Confirm => level.confirm_minigame().map(drop),
                LevelOp::Pause => level.toggle_pause().map(drop),
            };
            prop_assert!(level.graph().invariants().check_all().is_ok());
            prop_assert_eq!(
                level.mode() == GameMode::MinigameActive,
                level.minigame().is_running()
            );
            prop_assert_eq!(level.mode() == GameMode::Ended, level.outcome().is_some());
        }
    }
}
