//! Unit tests for connection graph mutations.

use rstest::{fixture, rstest};

use super::{ConnectionGraph, StabilityChange};
use crate::{
    anchor::AnchorId,
    error::{EdgeRejection, GraphError},
};

fn id(index: usize) -> AnchorId {
    AnchorId::new(index)
}

#[fixture]
fn placed() -> ConnectionGraph {
    let mut graph = ConnectionGraph::with_anchors(4);
    for index in 0..4 {
        graph.place_beacon(id(index)).expect("placement must succeed");
    }
    graph
}

#[rstest]
fn add_edge_links_both_sides(mut placed: ConnectionGraph) {
    placed.add_edge(id(0), id(2)).expect("edge must be accepted");
    assert!(placed.has_edge(id(0), id(2)));
    assert!(placed.has_edge(id(2), id(0)));
    assert_eq!(placed.edges(), vec![(id(0), id(2))]);
}

#[rstest]
#[case::self_loop(1, 1, EdgeRejection::SelfLoop)]
#[case::duplicate(0, 1, EdgeRejection::Duplicate)]
#[case::duplicate_reversed(1, 0, EdgeRejection::Duplicate)]
fn add_edge_rejects_structural_violations(
    mut placed: ConnectionGraph,
    #[case] left: usize,
    #[case] right: usize,
    #[case] reason: EdgeRejection,
) {
    placed.add_edge(id(0), id(1)).expect("seed edge");
    let before = placed.clone();
    let err = placed
        .add_edge(id(left), id(right))
        .expect_err("edge must be rejected");
    assert_eq!(
        err,
        GraphError::InvalidEdge {
            left: id(left),
            right: id(right),
            reason,
        }
    );
    assert_eq!(placed, before, "rejected edges must not mutate the graph");
}

#[rstest]
fn add_edge_rejects_unoccupied_endpoint() {
    let mut graph = ConnectionGraph::with_anchors(3);
    graph.place_beacon(id(0)).expect("place 0");
    let err = graph.add_edge(id(0), id(2)).expect_err("empty endpoint");
    assert_eq!(
        err,
        GraphError::InvalidEdge {
            left: id(0),
            right: id(2),
            reason: EdgeRejection::Unoccupied(id(2)),
        }
    );
    assert!(graph.edges().is_empty());
}

#[rstest]
fn add_edge_rejects_unstable_endpoint(mut placed: ConnectionGraph) {
    placed.set_stability(id(3), false).expect("destabilise");
    let err = placed.add_edge(id(3), id(1)).expect_err("unstable endpoint");
    assert!(matches!(
        err,
        GraphError::InvalidEdge {
            reason: EdgeRejection::Unstable(anchor),
            ..
        } if anchor == id(3)
    ));
    assert!(placed.edges().is_empty());
}

#[rstest]
fn add_edge_rejects_unknown_anchor(mut placed: ConnectionGraph) {
    let err = placed.add_edge(id(0), id(7)).expect_err("unknown anchor");
    assert_eq!(
        err,
        GraphError::UnknownAnchor {
            anchor: id(7),
            anchor_count: 4,
        }
    );
}

#[rstest]
fn add_then_remove_restores_edge_set(mut placed: ConnectionGraph) {
    placed.add_edge(id(0), id(1)).expect("edge 0-1");
    let before = placed.edges();
    placed.add_edge(id(1), id(2)).expect("edge 1-2");
    assert!(placed.remove_edge(id(1), id(2)).expect("remove 1-2"));
    assert_eq!(placed.edges(), before);
}

#[rstest]
fn remove_edge_is_a_no_op_when_absent(mut placed: ConnectionGraph) {
    let removed = placed.remove_edge(id(0), id(3)).expect("known anchors");
    assert!(!removed);
    assert!(placed.edges().is_empty());
}

#[rstest]
fn disconnect_all_severs_every_link(mut placed: ConnectionGraph) {
    placed.add_edge(id(1), id(0)).expect("edge 1-0");
    placed.add_edge(id(1), id(2)).expect("edge 1-2");
    placed.add_edge(id(1), id(3)).expect("edge 1-3");
    placed.add_edge(id(2), id(3)).expect("edge 2-3");

    let severed = placed.disconnect_all(id(1)).expect("disconnect");
    assert_eq!(severed, vec![id(0), id(2), id(3)]);
    assert_eq!(placed.anchor(id(1)).map(|a| a.degree()), Some(0));
    assert_eq!(placed.edges(), vec![(id(2), id(3))]);
    placed.invariants().check_all().expect("graph stays valid");
}

#[rstest]
fn destabilising_cuts_links_once(mut placed: ConnectionGraph) {
    placed.add_edge(id(0), id(1)).expect("edge 0-1");
    placed.add_edge(id(1), id(2)).expect("edge 1-2");

    let first = placed.set_stability(id(1), false).expect("first call");
    assert_eq!(
        first,
        StabilityChange::Destabilised {
            severed: vec![id(0), id(2)]
        }
    );
    let second = placed.set_stability(id(1), false).expect("second call");
    assert_eq!(second, StabilityChange::Unchanged);
    assert!(placed.edges().is_empty());
}

#[rstest]
fn repeated_false_does_not_cut_links_formed_afterwards(mut placed: ConnectionGraph) {
    placed.set_stability(id(1), false).expect("destabilise");
    placed.add_edge(id(0), id(2)).expect("unrelated edge");
    placed.set_stability(id(1), false).expect("repeat");
    assert_eq!(placed.edges(), vec![(id(0), id(2))]);
}

#[rstest]
fn stabilising_twice_matches_once(mut placed: ConnectionGraph) {
    placed.set_stability(id(2), false).expect("destabilise");
    assert_eq!(
        placed.set_stability(id(2), true).expect("stabilise"),
        StabilityChange::Stabilised
    );
    let once = placed.clone();
    assert_eq!(
        placed.set_stability(id(2), true).expect("stabilise again"),
        StabilityChange::Unchanged
    );
    assert_eq!(placed, once);
    assert_eq!(placed.anchor(id(2)).map(|a| a.degree()), Some(0));
}

#[rstest]
fn set_stability_rejects_empty_anchor() {
    let mut graph = ConnectionGraph::with_anchors(2);
    let err = graph
        .set_stability(id(1), false)
        .expect_err("empty anchors have no beacon");
    assert_eq!(err, GraphError::Unoccupied { anchor: id(1) });
}

#[rstest]
fn stable_occupied_lists_linkable_anchors(mut placed: ConnectionGraph) {
    placed.set_stability(id(0), false).expect("destabilise");
    assert_eq!(placed.stable_occupied(), vec![id(1), id(2), id(3)]);
    assert_eq!(placed.occupied_count(), 4);
}
