//! Structural invariant checks for the connection graph.
//!
//! The checkers are surfaced via [`ConnectionGraph::invariants`] so
//! property-based tests and end-of-session reports can assert graph health
//! without reimplementing traversal logic.

mod isolation;
mod symmetry;

use thiserror::Error;

use crate::{anchor::AnchorId, graph::ConnectionGraph};

use self::{
    isolation::{check_unoccupied_isolated, check_unoccupied_stable, check_unstable_isolated},
    symmetry::{check_no_self_loops, check_symmetry},
};

/// Enumerates the structural invariants enforced by the connection graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphInvariant {
    /// Every link is recorded on both endpoints.
    Symmetry,
    /// No anchor links to itself.
    NoSelfLoops,
    /// Anchors without a beacon have no links.
    UnoccupiedIsolated,
    /// Unstable beacons have no links.
    UnstableIsolated,
    /// Anchors without a beacon keep the default stable flag.
    UnoccupiedStable,
}

impl GraphInvariant {
    /// Returns all invariants in the order they should be evaluated.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Symmetry,
            Self::NoSelfLoops,
            Self::UnoccupiedIsolated,
            Self::UnstableIsolated,
            Self::UnoccupiedStable,
        ]
    }
}

/// Reports an invariant violation surfaced by [`GraphInvariantChecker`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GraphInvariantViolation {
    /// A link is missing its counterpart.
    #[error("edge {origin}->{target} is missing the reverse link")]
    MissingBacklink {
        /// Anchor that exposes the one-way link.
        origin: AnchorId,
        /// Anchor lacking the reverse link.
        target: AnchorId,
    },
    /// A link points at an anchor outside the level.
    #[error("anchor {origin} links to unknown anchor {target}")]
    DanglingLink {
        /// Anchor holding the dangling link.
        origin: AnchorId,
        /// Identifier that does not exist.
        target: AnchorId,
    },
    /// An anchor links to itself.
    #[error("anchor {anchor} links to itself")]
    SelfLoop {
        /// Offending anchor.
        anchor: AnchorId,
    },
    /// An anchor without a beacon has links.
    #[error("empty anchor {anchor} has {degree} link(s)")]
    LinkedWhileEmpty {
        /// Offending anchor.
        anchor: AnchorId,
        /// Number of links found.
        degree: usize,
    },
    /// An unstable beacon still has links.
    #[error("unstable anchor {anchor} has {degree} link(s)")]
    LinkedWhileUnstable {
        /// Offending anchor.
        anchor: AnchorId,
        /// Number of links found.
        degree: usize,
    },
    /// An anchor without a beacon is flagged unstable.
    #[error("empty anchor {anchor} is flagged unstable")]
    UnstableWhileEmpty {
        /// Offending anchor.
        anchor: AnchorId,
    },
}

/// Helper returned by [`ConnectionGraph::invariants`] to run structural checks.
///
/// # Examples
/// ```
/// use beaconet_core::{AnchorId, ConnectionGraph, GraphInvariant};
///
/// let mut graph = ConnectionGraph::with_anchors(2);
/// graph.place_beacon(AnchorId::new(0))?;
/// graph.place_beacon(AnchorId::new(1))?;
/// graph.add_edge(AnchorId::new(0), AnchorId::new(1))?;
/// assert!(graph.invariants().check_all().is_ok());
/// assert!(graph.invariants().check(GraphInvariant::Symmetry).is_ok());
/// assert!(graph.invariants().collect_all().is_empty());
/// # Ok::<(), beaconet_core::GraphError>(())
/// ```
#[derive(Debug)]
pub struct GraphInvariantChecker<'graph> {
    graph: &'graph ConnectionGraph,
}

impl<'graph> GraphInvariantChecker<'graph> {
    pub(super) fn new(graph: &'graph ConnectionGraph) -> Self {
        Self { graph }
    }

    /// Runs all invariants, returning the first violation encountered.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check_all(&self) -> Result<(), GraphInvariantViolation> {
        self.check_many(GraphInvariant::all())
    }

    /// Runs a custom subset of invariants in the provided order.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check_many(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
    ) -> Result<(), GraphInvariantViolation> {
        self.run_with_mode(invariants, EvaluationMode::FailFast)
    }

    /// Runs a single invariant.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check(&self, invariant: GraphInvariant) -> Result<(), GraphInvariantViolation> {
        self.check_many([invariant])
    }

    /// Executes every invariant and returns the full set of violations.
    #[must_use]
    pub fn collect_all(&self) -> Vec<GraphInvariantViolation> {
        self.collect_many(GraphInvariant::all())
    }

    /// Executes the selected invariants and returns every violation discovered.
    #[must_use]
    pub fn collect_many(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
    ) -> Vec<GraphInvariantViolation> {
        let mut violations = Vec::new();
        // Collect mode never returns an error.
        let _ = self.run_with_mode(invariants, EvaluationMode::Collect(&mut violations));
        violations
    }

    fn run_with_mode(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
        mut mode: EvaluationMode<'_>,
    ) -> Result<(), GraphInvariantViolation> {
        for invariant in invariants {
            dispatch(self.graph, invariant, &mut mode)?;
        }
        Ok(())
    }
}

fn dispatch(
    graph: &ConnectionGraph,
    invariant: GraphInvariant,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    match invariant {
        GraphInvariant::Symmetry => check_symmetry(graph, mode),
        GraphInvariant::NoSelfLoops => check_no_self_loops(graph, mode),
        GraphInvariant::UnoccupiedIsolated => check_unoccupied_isolated(graph, mode),
        GraphInvariant::UnstableIsolated => check_unstable_isolated(graph, mode),
        GraphInvariant::UnoccupiedStable => check_unoccupied_stable(graph, mode),
    }
}

pub(super) enum EvaluationMode<'a> {
    FailFast,
    Collect(&'a mut Vec<GraphInvariantViolation>),
}

impl EvaluationMode<'_> {
    fn record(
        &mut self,
        violation: GraphInvariantViolation,
    ) -> Result<(), GraphInvariantViolation> {
        match self {
            Self::FailFast => Err(violation),
            Self::Collect(sink) => {
                sink.push(violation);
                Ok(())
            }
        }
    }
}
