//! Symmetry and self-loop checks for the connection graph.
//!
//! Every link must be mirrored on the neighbouring anchor and must point at
//! an anchor that exists in the level.
use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::ConnectionGraph;
use tracing::{Level, debug, trace};

pub(super) fn check_symmetry(
    graph: &ConnectionGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    if tracing::enabled!(Level::TRACE) {
        let link_count: usize = graph.anchors().map(|anchor| anchor.degree()).sum();
        trace!(links = link_count, "checking symmetric links");
    }
    for anchor in graph.anchors() {
        let origin = anchor.id();
        for target in anchor.neighbours() {
            match graph.anchor(target) {
                None => mode.record(GraphInvariantViolation::DanglingLink { origin, target })?,
                Some(other) if !other.is_linked_to(origin) => {
                    debug!(origin = %origin, target = %target, "missing backlink");
                    mode.record(GraphInvariantViolation::MissingBacklink { origin, target })?;
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

pub(super) fn check_no_self_loops(
    graph: &ConnectionGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for anchor in graph.anchors() {
        if anchor.is_linked_to(anchor.id()) {
            mode.record(GraphInvariantViolation::SelfLoop {
                anchor: anchor.id(),
            })?;
        }
    }
    Ok(())
}
