//! Connection graph over the level's anchors.
//!
//! The graph owns every [`Anchor`] of a level and is the only place the edge
//! relation can change. Each mutation keeps both neighbour sets in step, so
//! the relation stays a simple undirected graph whose edges only touch
//! occupied, stable anchors.

mod invariants;

use tracing::{debug, trace};

use crate::{
    anchor::{Anchor, AnchorId},
    error::{EdgeRejection, GraphError},
};

pub use self::invariants::{GraphInvariant, GraphInvariantChecker, GraphInvariantViolation};

/// Result of a [`ConnectionGraph::set_stability`] call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StabilityChange {
    /// The anchor already had the requested stability.
    Unchanged,
    /// The anchor went from unstable to stable.
    Stabilised,
    /// The anchor went from stable to unstable and lost these links.
    Destabilised {
        /// Former neighbours, in ascending id order.
        severed: Vec<AnchorId>,
    },
}

/// The anchors of a level plus their symmetric edge relation.
///
/// # Examples
/// ```
/// use beaconet_core::{AnchorId, ConnectionGraph};
///
/// let mut graph = ConnectionGraph::with_anchors(3);
/// let (a, b) = (AnchorId::new(0), AnchorId::new(1));
/// graph.place_beacon(a)?;
/// graph.place_beacon(b)?;
/// graph.add_edge(a, b)?;
/// assert!(graph.has_edge(b, a));
/// assert_eq!(graph.edges(), vec![(a, b)]);
/// # Ok::<(), beaconet_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectionGraph {
    anchors: Vec<Anchor>,
}

impl ConnectionGraph {
    /// Builds `count` empty anchors with ids `0..count`.
    #[must_use]
    pub fn with_anchors(count: usize) -> Self {
        let anchors = (0..count).map(|idx| Anchor::new(AnchorId::new(idx))).collect();
        Self { anchors }
    }

    /// Returns the number of anchors in the level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns whether the level has no anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Looks up an anchor by id.
    #[must_use]
    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.get())
    }

    /// Iterates over every anchor in id order.
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> + '_ {
        self.anchors.iter()
    }

    /// Counts anchors carrying a beacon.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.anchors.iter().filter(|anchor| anchor.is_occupied()).count()
    }

    /// Returns the ids of anchors that are both occupied and stable.
    #[must_use]
    pub fn stable_occupied(&self) -> Vec<AnchorId> {
        self.anchors
            .iter()
            .filter(|anchor| anchor.is_linkable())
            .map(Anchor::id)
            .collect()
    }

    /// Returns whether `left` and `right` are linked.
    #[must_use]
    pub fn has_edge(&self, left: AnchorId, right: AnchorId) -> bool {
        self.anchor(left)
            .is_some_and(|anchor| anchor.is_linked_to(right))
    }

    /// Lists every edge once as `(lower, higher)`, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(AnchorId, AnchorId)> {
        self.anchors
            .iter()
            .flat_map(|anchor| {
                anchor
                    .neighbours()
                    .filter(move |other| anchor.id() < *other)
                    .map(move |other| (anchor.id(), other))
            })
            .collect()
    }

    /// Places a beacon on an empty anchor.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownAnchor`] for ids outside the level and
    /// [`GraphError::AlreadyOccupied`] when a beacon is already present.
    pub fn place_beacon(&mut self, id: AnchorId) -> Result<(), GraphError> {
        self.anchor_mut(id)?.place_beacon()?;
        debug!(anchor = %id, "beacon placed");
        Ok(())
    }

    /// Sets the stability of an occupied anchor.
    ///
    /// Only a stable-to-unstable transition severs links; re-asserting the
    /// current value is a no-op and reports [`StabilityChange::Unchanged`].
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownAnchor`] for ids outside the level and
    /// [`GraphError::Unoccupied`] when the anchor has no beacon.
    ///
    /// # Examples
    /// ```
    /// use beaconet_core::{AnchorId, ConnectionGraph, StabilityChange};
    ///
    /// let mut graph = ConnectionGraph::with_anchors(2);
    /// let (a, b) = (AnchorId::new(0), AnchorId::new(1));
    /// graph.place_beacon(a)?;
    /// graph.place_beacon(b)?;
    /// graph.add_edge(a, b)?;
    ///
    /// let first = graph.set_stability(a, false)?;
    /// assert_eq!(first, StabilityChange::Destabilised { severed: vec![b] });
    /// assert_eq!(graph.set_stability(a, false)?, StabilityChange::Unchanged);
    /// # Ok::<(), beaconet_core::GraphError>(())
    /// ```
    pub fn set_stability(
        &mut self,
        id: AnchorId,
        stable: bool,
    ) -> Result<StabilityChange, GraphError> {
        let anchor = self.anchor_mut(id)?;
        if !anchor.is_occupied() {
            return Err(GraphError::Unoccupied { anchor: id });
        }
        if !anchor.store_stability(stable) {
            trace!(anchor = %id, stable, "stability unchanged");
            return Ok(StabilityChange::Unchanged);
        }
        if stable {
            debug!(anchor = %id, "anchor stabilised");
            return Ok(StabilityChange::Stabilised);
        }
        let severed = self.disconnect_all(id)?;
        debug!(anchor = %id, severed = severed.len(), "anchor destabilised");
        Ok(StabilityChange::Destabilised { severed })
    }

    /// Links two anchors.
    ///
    /// Every check runs before either neighbour set is touched, so the edge
    /// is inserted on both sides or not at all.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownAnchor`] for ids outside the level and
    /// [`GraphError::InvalidEdge`] for self-loops, duplicates, and endpoints
    /// that are unoccupied or unstable.
    pub fn add_edge(&mut self, left: AnchorId, right: AnchorId) -> Result<(), GraphError> {
        let left_anchor = self.checked_anchor(left)?;
        let right_anchor = self.checked_anchor(right)?;
        let reject = |reason| GraphError::InvalidEdge {
            left,
            right,
            reason,
        };
        if left == right {
            return Err(reject(EdgeRejection::SelfLoop));
        }
        for anchor in [left_anchor, right_anchor] {
            if !anchor.is_occupied() {
                return Err(reject(EdgeRejection::Unoccupied(anchor.id())));
            }
            if !anchor.is_stable() {
                return Err(reject(EdgeRejection::Unstable(anchor.id())));
            }
        }
        if left_anchor.is_linked_to(right) {
            return Err(reject(EdgeRejection::Duplicate));
        }

        self.anchor_mut(left)?.link(right);
        self.anchor_mut(right)?.link(left);
        debug!(left = %left, right = %right, "edge added");
        Ok(())
    }

    /// Unlinks two anchors, returning whether an edge was removed.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownAnchor`] for ids outside the level.
    pub fn remove_edge(&mut self, left: AnchorId, right: AnchorId) -> Result<bool, GraphError> {
        self.checked_anchor(left)?;
        self.checked_anchor(right)?;
        let removed_left = self.anchor_mut(left)?.unlink(right);
        let removed_right = self.anchor_mut(right)?.unlink(left);
        debug_assert_eq!(removed_left, removed_right, "edge relation must be symmetric");
        if removed_left {
            debug!(left = %left, right = %right, "edge removed");
        }
        Ok(removed_left || removed_right)
    }

    /// Removes every edge incident to `id` and returns the former neighbours.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownAnchor`] for ids outside the level.
    pub fn disconnect_all(&mut self, id: AnchorId) -> Result<Vec<AnchorId>, GraphError> {
        let neighbours = self.checked_anchor(id)?.neighbour_snapshot();
        for &other in &neighbours {
            self.remove_edge(id, other)?;
        }
        Ok(neighbours)
    }

    /// Returns a checker for the graph's structural invariants.
    #[must_use]
    pub fn invariants(&self) -> GraphInvariantChecker<'_> {
        GraphInvariantChecker::new(self)
    }

    fn checked_anchor(&self, id: AnchorId) -> Result<&Anchor, GraphError> {
        self.anchors.get(id.get()).ok_or(GraphError::UnknownAnchor {
            anchor: id,
            anchor_count: self.anchors.len(),
        })
    }

    fn anchor_mut(&mut self, id: AnchorId) -> Result<&mut Anchor, GraphError> {
        let anchor_count = self.anchors.len();
        self.anchors
            .get_mut(id.get())
            .ok_or(GraphError::UnknownAnchor {
                anchor: id,
                anchor_count,
            })
    }

    #[cfg(test)]
    pub(crate) fn anchor_mut_for_test(&mut self, id: AnchorId) -> &mut Anchor {
        self.anchor_mut(id).expect("test anchor must exist")
    }
}

#[cfg(test)]
mod tests;
