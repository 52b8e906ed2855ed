//! Two-click connection picker.
//!
//! The selector turns clicks on stable beacons into edge requests. The first
//! click marks an anchor as pending, clicking it again cancels, and clicking
//! another anchor asks the graph for an edge. Rejected edges are reported in
//! the outcome and never surface as errors.

use tracing::debug;

use crate::{anchor::AnchorId, error::GraphError, graph::ConnectionGraph};

/// Selector state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SelectorState {
    /// No anchor is selected.
    #[default]
    Idle,
    /// The first endpoint has been picked.
    Pending(AnchorId),
}

/// What a click did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectionOutcome {
    /// The anchor is not an occupied, stable beacon.
    Ignored,
    /// The anchor became the pending endpoint.
    Selected(AnchorId),
    /// The pending anchor was clicked again.
    Cancelled(AnchorId),
    /// An edge now joins the two anchors.
    Connected {
        /// Pending endpoint.
        from: AnchorId,
        /// Second endpoint.
        to: AnchorId,
    },
    /// The graph refused the edge.
    Rejected {
        /// Pending endpoint.
        from: AnchorId,
        /// Second endpoint.
        to: AnchorId,
        /// Why the graph refused it.
        error: GraphError,
    },
}

impl SelectionOutcome {
    /// Returns the anchor whose highlight was switched on, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<AnchorId> {
        match self {
            Self::Selected(anchor) => Some(*anchor),
            _ => None,
        }
    }

    /// Returns the anchor whose highlight was switched off, if any.
    #[must_use]
    pub fn unhighlighted(&self) -> Option<AnchorId> {
        match self {
            Self::Cancelled(anchor)
            | Self::Connected { from: anchor, .. }
            | Self::Rejected { from: anchor, .. } => Some(*anchor),
            Self::Ignored | Self::Selected(_) => None,
        }
    }
}

/// Connection picker driven by anchor clicks.
///
/// # Examples
/// ```
/// use beaconet_core::{AnchorId, ConnectionGraph, ConnectionSelector, SelectionOutcome};
///
/// let mut graph = ConnectionGraph::with_anchors(2);
/// let (a, b) = (AnchorId::new(0), AnchorId::new(1));
/// graph.place_beacon(a)?;
/// graph.place_beacon(b)?;
///
/// let mut selector = ConnectionSelector::default();
/// assert_eq!(selector.click(&mut graph, a), SelectionOutcome::Selected(a));
/// assert_eq!(
///     selector.click(&mut graph, b),
///     SelectionOutcome::Connected { from: a, to: b }
/// );
/// assert!(graph.has_edge(a, b));
/// # Ok::<(), beaconet_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectionSelector {
    state: SelectorState,
}

impl ConnectionSelector {
    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Returns the pending endpoint, if any.
    #[must_use]
    pub fn pending(&self) -> Option<AnchorId> {
        match self.state {
            SelectorState::Idle => None,
            SelectorState::Pending(anchor) => Some(anchor),
        }
    }

    /// Handles a click on `anchor`, classified by its state right now.
    ///
    /// A pending anchor that lost its stability since it was picked is not
    /// cleared; the next click simply produces a rejected edge.
    pub fn click(&mut self, graph: &mut ConnectionGraph, anchor: AnchorId) -> SelectionOutcome {
        if !graph.anchor(anchor).is_some_and(|a| a.is_linkable()) {
            debug!(anchor = %anchor, "selector ignored click");
            return SelectionOutcome::Ignored;
        }
        match self.state {
            SelectorState::Idle => {
                self.state = SelectorState::Pending(anchor);
                debug!(anchor = %anchor, "connection pending");
                SelectionOutcome::Selected(anchor)
            }
            SelectorState::Pending(from) => {
                self.state = SelectorState::Idle;
                if from == anchor {
                    debug!(anchor = %anchor, "connection cancelled");
                    return SelectionOutcome::Cancelled(anchor);
                }
                match graph.add_edge(from, anchor) {
                    Ok(()) => SelectionOutcome::Connected { from, to: anchor },
                    Err(error) => {
                        debug!(from = %from, to = %anchor, %error, "connection rejected");
                        SelectionOutcome::Rejected {
                            from,
                            to: anchor,
                            error,
                        }
                    }
                }
            }
        }
    }

    /// Drops any pending selection.
    pub fn reset(&mut self) -> Option<AnchorId> {
        let pending = self.pending();
        self.state = SelectorState::Idle;
        pending
    }
}
