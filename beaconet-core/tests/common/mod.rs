//! Helpers shared by the core integration tests.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use beaconet_core::{
    AnchorId, ConnectionGraph, EventLog, Level, LevelBuilder, SequenceRandom,
};

pub type TestLevel = Level<EventLog, SequenceRandom>;

#[must_use]
pub fn id(index: usize) -> AnchorId {
    AnchorId::new(index)
}

/// A graph with `count` anchors, every one carrying a stable beacon.
#[must_use]
pub fn placed_graph(count: usize) -> ConnectionGraph {
    let mut graph = ConnectionGraph::with_anchors(count);
    for index in 0..count {
        graph.place_beacon(id(index)).expect("placement must succeed");
    }
    graph
}

/// Adds every edge in `edges`, panicking on rejection.
pub fn link(graph: &mut ConnectionGraph, edges: &[(usize, usize)]) {
    for &(left, right) in edges {
        graph
            .add_edge(id(left), id(right))
            .expect("edge must be accepted");
    }
}

/// A default four-anchor level whose random draws all replay `draws`.
#[must_use]
pub fn level_with_draws(draws: &[f64]) -> TestLevel {
    let config = LevelBuilder::new()
        .with_speed(1.0)
        .build()
        .expect("configuration is valid");
    Level::new(
        config,
        EventLog::default(),
        SequenceRandom::new(draws.iter().copied()),
    )
}

/// Clicks every anchor once so each carries a beacon.
pub fn place_all(level: &mut TestLevel) {
    for index in 0..level.graph().len() {
        level.anchor_clicked(id(index)).expect("placement click");
    }
}

/// Connects two stable beacons through the selector.
pub fn connect(level: &mut TestLevel, left: usize, right: usize) {
    level.anchor_clicked(id(left)).expect("select first endpoint");
    level.anchor_clicked(id(right)).expect("select second endpoint");
}
