//! Anchor slots and their beacon state.
//!
//! An [`Anchor`] is a fixed placement slot created when the level is built.
//! It tracks whether a beacon sits on it, whether that beacon is stable, and
//! which other anchors it is linked to. Mutation is restricted to the crate so
//! the symmetric edge relation can only change through
//! [`crate::ConnectionGraph`].

use std::{collections::BTreeSet, fmt};

use crate::error::GraphError;

/// Identifier of an anchor, unique for the lifetime of a level.
///
/// # Examples
/// ```
/// use beaconet_core::AnchorId;
///
/// let id = AnchorId::new(3);
/// assert_eq!(id.get(), 3);
/// assert_eq!(id.to_string(), "#3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(usize);

impl AnchorId {
    /// Creates a new anchor identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(index: usize) -> Self { Self(index) }

    /// Returns the underlying index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for AnchorId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// A single placement slot.
///
/// Freshly built anchors are empty and nominally stable; stability only
/// becomes meaningful once a beacon has been placed.
///
/// # Examples
/// ```
/// use beaconet_core::ConnectionGraph;
///
/// let graph = ConnectionGraph::with_anchors(2);
/// let anchor = graph.anchor(0.into()).expect("anchor 0 exists");
/// assert!(!anchor.is_occupied());
/// assert!(anchor.is_stable());
/// assert!(anchor.neighbours().next().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    id: AnchorId,
    occupied: bool,
    stable: bool,
    neighbours: BTreeSet<AnchorId>,
}

impl Anchor {
    pub(crate) fn new(id: AnchorId) -> Self {
        Self {
            id,
            occupied: false,
            stable: true,
            neighbours: BTreeSet::new(),
        }
    }

    /// Returns this anchor's identifier.
    #[must_use]
    pub fn id(&self) -> AnchorId {
        self.id
    }

    /// Returns whether a beacon has been placed.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Returns whether the beacon is functioning.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// Returns whether the anchor can take part in a new connection.
    #[must_use]
    pub fn is_linkable(&self) -> bool {
        self.occupied && self.stable
    }

    /// Iterates over linked anchors in ascending id order.
    pub fn neighbours(&self) -> impl Iterator<Item = AnchorId> + '_ {
        self.neighbours.iter().copied()
    }

    /// Returns the number of links attached to this anchor.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns whether this anchor links to `other`.
    #[must_use]
    pub fn is_linked_to(&self, other: AnchorId) -> bool {
        self.neighbours.contains(&other)
    }

    pub(crate) fn place_beacon(&mut self) -> Result<(), GraphError> {
        if self.occupied {
            return Err(GraphError::AlreadyOccupied { anchor: self.id });
        }
        self.occupied = true;
        self.stable = true;
        Ok(())
    }

    /// Stores the new stability flag and reports whether it changed.
    pub(crate) fn store_stability(&mut self, stable: bool) -> bool {
        let changed = self.stable != stable;
        self.stable = stable;
        changed
    }

    pub(crate) fn link(&mut self, other: AnchorId) -> bool {
        self.neighbours.insert(other)
    }

    pub(crate) fn unlink(&mut self, other: AnchorId) -> bool {
        self.neighbours.remove(&other)
    }

    /// Snapshot of the neighbour set, taken before the set is mutated.
    pub(crate) fn neighbour_snapshot(&self) -> Vec<AnchorId> {
        self.neighbours.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn place_beacon_marks_anchor_occupied_and_stable() {
        let mut anchor = Anchor::new(AnchorId::new(0));
        anchor.store_stability(false);
        anchor.place_beacon().expect("empty anchor accepts a beacon");
        assert!(anchor.is_occupied());
        assert!(anchor.is_stable());
    }

    #[rstest]
    fn place_beacon_rejects_second_placement() {
        let mut anchor = Anchor::new(AnchorId::new(2));
        anchor.place_beacon().expect("first placement succeeds");
        let err = anchor.place_beacon().expect_err("second placement must fail");
        assert_eq!(
            err,
            GraphError::AlreadyOccupied {
                anchor: AnchorId::new(2)
            }
        );
    }

    #[rstest]
    #[case(true, true, false)]
    #[case(true, false, true)]
    #[case(false, false, false)]
    #[case(false, true, true)]
    fn store_stability_reports_changes(
        #[case] initial: bool,
        #[case] next: bool,
        #[case] changed: bool,
    ) {
        let mut anchor = Anchor::new(AnchorId::new(0));
        anchor.store_stability(initial);
        assert_eq!(anchor.store_stability(next), changed);
        assert_eq!(anchor.is_stable(), next);
    }

    #[rstest]
    fn display_prefixes_hash() {
        assert_eq!(AnchorId::new(12).to_string(), "#12");
    }
}
