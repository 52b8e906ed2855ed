//! Win-condition check over the connection graph.
//!
//! Validation walks the graph breadth-first from the lowest occupied anchor
//! and wins when exactly the required number of beacons is reached and every
//! reached beacon is stable. Fewer placed beacons than required loses without
//! a traversal.

use std::collections::VecDeque;

use tracing::{info, instrument, warn};

use crate::{anchor::AnchorId, graph::ConnectionGraph};

/// Final verdict of a level.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Verdict {
    /// The network meets the win condition.
    Won,
    /// The network does not meet the win condition.
    Lost,
}

impl Verdict {
    /// Returns whether this is [`Verdict::Won`].
    #[must_use]
    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Why validation produced [`Verdict::Lost`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationFailure {
    /// Fewer beacons were placed than required.
    InsufficientPlacement {
        /// Beacons on the board.
        placed: usize,
        /// Beacons the level requires.
        required: usize,
    },
    /// The traversal did not reach exactly the required number of beacons.
    Disconnected {
        /// Beacons reached from the root.
        reached: usize,
        /// Beacons the level requires.
        required: usize,
    },
    /// A reached beacon is unstable.
    Unstable {
        /// First unstable beacon in traversal order.
        anchor: AnchorId,
    },
}

/// Everything a validation pass observed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationReport {
    /// Outcome of the check.
    pub verdict: Verdict,
    /// Traversal root, absent when no traversal ran.
    pub root: Option<AnchorId>,
    /// Reached anchors in breadth-first order, root first.
    pub visited: Vec<AnchorId>,
    /// Beacons on the board.
    pub occupied: usize,
    /// Whether the traversal reached exactly the required count.
    pub all_connected: bool,
    /// Whether every reached beacon is stable.
    pub all_stable: bool,
    /// First failing condition, if any.
    pub failure: Option<ValidationFailure>,
}

/// Checks the win condition for `required` beacons.
///
/// # Examples
/// ```
/// use beaconet_core::{AnchorId, ConnectionGraph, Verdict, validate_path};
///
/// let mut graph = ConnectionGraph::with_anchors(3);
/// for index in 0..3 {
///     graph.place_beacon(AnchorId::new(index))?;
/// }
/// graph.add_edge(AnchorId::new(0), AnchorId::new(1))?;
/// graph.add_edge(AnchorId::new(1), AnchorId::new(2))?;
///
/// let report = validate_path(&graph, 3);
/// assert_eq!(report.verdict, Verdict::Won);
/// assert_eq!(report.visited.len(), 3);
/// # Ok::<(), beaconet_core::GraphError>(())
/// ```
#[must_use]
#[instrument(
    name = "validator.validate",
    skip(graph),
    fields(anchors = graph.len()),
)]
pub fn validate_path(graph: &ConnectionGraph, required: usize) -> ValidationReport {
    let occupied = graph.occupied_count();
    if occupied < required {
        warn!(placed = occupied, required, "not enough beacons placed");
        return ValidationReport {
            verdict: Verdict::Lost,
            root: None,
            visited: Vec::new(),
            occupied,
            all_connected: false,
            all_stable: false,
            failure: Some(ValidationFailure::InsufficientPlacement {
                placed: occupied,
                required,
            }),
        };
    }

    let root = graph.anchors().find(|anchor| anchor.is_occupied()).map(|anchor| anchor.id());
    let visited = root.map_or_else(Vec::new, |root| traverse(graph, root));

    let all_connected = visited.len() == required;
    let first_unstable = visited
        .iter()
        .copied()
        .find(|&id| !graph.anchor(id).is_some_and(|anchor| anchor.is_stable()));
    let all_stable = first_unstable.is_none();

    let failure = if !all_connected {
        Some(ValidationFailure::Disconnected {
            reached: visited.len(),
            required,
        })
    } else {
        first_unstable.map(|anchor| ValidationFailure::Unstable { anchor })
    };
    let verdict = if all_connected && all_stable {
        Verdict::Won
    } else {
        Verdict::Lost
    };
    info!(
        reached = visited.len(),
        all_connected,
        all_stable,
        won = verdict.is_won(),
        "validation finished"
    );
    ValidationReport {
        verdict,
        root,
        visited,
        occupied,
        all_connected,
        all_stable,
        failure,
    }
}

fn traverse(graph: &ConnectionGraph, root: AnchorId) -> Vec<AnchorId> {
    let mut context = BfsContext::new(graph.len());
    context.visit(root);
    while let Some(current) = context.queue.pop_front() {
        let Some(anchor) = graph.anchor(current) else {
            continue;
        };
        for neighbour in anchor.neighbours() {
            if !context.is_visited(neighbour) {
                context.visit(neighbour);
            }
        }
    }
    context.order
}

struct BfsContext {
    visited: Vec<bool>,
    queue: VecDeque<AnchorId>,
    order: Vec<AnchorId>,
}

impl BfsContext {
    fn new(capacity: usize) -> Self {
        Self {
            visited: vec![false; capacity],
            queue: VecDeque::new(),
            order: Vec::with_capacity(capacity),
        }
    }

    fn is_visited(&self, anchor: AnchorId) -> bool {
        // Ids outside the level count as visited so they are never queued.
        self.visited.get(anchor.get()).copied().unwrap_or(true)
    }

    fn visit(&mut self, anchor: AnchorId) {
        if let Some(slot) = self.visited.get_mut(anchor.get()) {
            *slot = true;
            self.queue.push_back(anchor);
            self.order.push(anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn id(index: usize) -> AnchorId {
        AnchorId::new(index)
    }

    #[fixture]
    fn placed() -> ConnectionGraph {
        let mut graph = ConnectionGraph::with_anchors(4);
        for index in 0..4 {
            graph.place_beacon(id(index)).expect("place");
        }
        graph
    }

    fn link(graph: &mut ConnectionGraph, edges: &[(usize, usize)]) {
        for &(left, right) in edges {
            graph.add_edge(id(left), id(right)).expect("link");
        }
    }

    #[rstest]
    fn star_network_wins_in_bfs_order(mut placed: ConnectionGraph) {
        link(&mut placed, &[(0, 2), (2, 1), (2, 3)]);
        let report = validate_path(&placed, 4);
        assert_eq!(report.verdict, Verdict::Won);
        assert_eq!(report.root, Some(id(0)));
        assert_eq!(report.visited, vec![id(0), id(2), id(1), id(3)]);
        assert_eq!(report.failure, None);
    }

    #[rstest]
    fn isolated_unstable_root_fails_stability(mut placed: ConnectionGraph) {
        placed.set_stability(id(0), false).expect("destabilise");
        let report = validate_path(&placed, 1);
        assert!(report.all_connected);
        assert!(!report.all_stable);
        assert_eq!(
            report.failure,
            Some(ValidationFailure::Unstable { anchor: id(0) })
        );
        assert_eq!(report.verdict, Verdict::Lost);
    }

    #[rstest]
    fn root_is_lowest_occupied_anchor() {
        let mut graph = ConnectionGraph::with_anchors(5);
        for index in [4, 2, 3] {
            graph.place_beacon(id(index)).expect("place");
        }
        link(&mut graph, &[(2, 3), (3, 4)]);
        let report = validate_path(&graph, 3);
        assert_eq!(report.root, Some(id(2)));
        assert_eq!(report.verdict, Verdict::Won);
    }

    #[rstest]
    fn reaching_more_than_required_is_not_a_win(mut placed: ConnectionGraph) {
        link(&mut placed, &[(0, 1), (1, 2), (2, 3)]);
        let report = validate_path(&placed, 3);
        assert_eq!(
            report.failure,
            Some(ValidationFailure::Disconnected {
                reached: 4,
                required: 3,
            })
        );
    }

    #[test]
    fn zero_required_on_empty_board_is_vacuous() {
        let graph = ConnectionGraph::with_anchors(2);
        let report = validate_path(&graph, 0);
        assert_eq!(report.root, None);
        assert!(report.visited.is_empty());
        assert_eq!(report.verdict, Verdict::Won);
    }
}
