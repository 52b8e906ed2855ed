//! Isolation checks tying links to beacon state.
use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::ConnectionGraph;

pub(super) fn check_unoccupied_isolated(
    graph: &ConnectionGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for anchor in graph.anchors().filter(|anchor| !anchor.is_occupied()) {
        if anchor.degree() > 0 {
            mode.record(GraphInvariantViolation::LinkedWhileEmpty {
                anchor: anchor.id(),
                degree: anchor.degree(),
            })?;
        }
    }
    Ok(())
}

pub(super) fn check_unstable_isolated(
    graph: &ConnectionGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    // Empty anchors are covered by the unoccupied checks.
    for anchor in graph
        .anchors()
        .filter(|anchor| anchor.is_occupied() && !anchor.is_stable())
    {
        if anchor.degree() > 0 {
            mode.record(GraphInvariantViolation::LinkedWhileUnstable {
                anchor: anchor.id(),
                degree: anchor.degree(),
            })?;
        }
    }
    Ok(())
}

pub(super) fn check_unoccupied_stable(
    graph: &ConnectionGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for anchor in graph.anchors() {
        if !anchor.is_occupied() && !anchor.is_stable() {
            mode.record(GraphInvariantViolation::UnstableWhileEmpty {
                anchor: anchor.id(),
            })?;
        }
    }
    Ok(())
}
