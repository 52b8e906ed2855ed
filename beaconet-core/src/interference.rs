//! Recurring random destabilization.

use std::time::Duration;

use tracing::{info, trace};

use crate::{
    anchor::AnchorId,
    error::GraphError,
    graph::{ConnectionGraph, StabilityChange},
    random::RandomSource,
};

/// Default shortest wait between strikes.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(15);
/// Default longest wait between strikes.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(25);

/// One elapsed interference cycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterferenceStrike {
    /// Destabilised anchor, or `None` when no stable beacon existed.
    pub target: Option<AnchorId>,
    /// Links severed by the strike.
    pub severed: Vec<AnchorId>,
}

/// Game-clock timer that periodically destabilises a random stable beacon.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use beaconet_core::{AnchorId, ConnectionGraph, InterferenceTrigger, SequenceRandom};
///
/// let mut graph = ConnectionGraph::with_anchors(2);
/// graph.place_beacon(AnchorId::new(0))?;
/// graph.place_beacon(AnchorId::new(1))?;
/// graph.add_edge(AnchorId::new(0), AnchorId::new(1))?;
///
/// let mut rng = SequenceRandom::new([0.0]);
/// let mut trigger = InterferenceTrigger::new(
///     Duration::from_secs(15),
///     Duration::from_secs(25),
///     &mut rng,
/// );
/// assert!(trigger.advance(Duration::from_secs(14), &mut graph, &mut rng)?.is_empty());
/// let strikes = trigger.advance(Duration::from_secs(1), &mut graph, &mut rng)?;
/// assert_eq!(strikes[0].target, Some(AnchorId::new(0)));
/// assert!(graph.edges().is_empty());
/// # Ok::<(), beaconet_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterferenceTrigger {
    min_interval: Duration,
    max_interval: Duration,
    until_next: Duration,
}

impl InterferenceTrigger {
    /// Creates a trigger and samples the first wait. The level builder
    /// guarantees `0 < min_interval <= max_interval`.
    pub fn new<R: RandomSource + ?Sized>(
        min_interval: Duration,
        max_interval: Duration,
        rng: &mut R,
    ) -> Self {
        let mut trigger = Self {
            min_interval,
            max_interval,
            until_next: Duration::ZERO,
        };
        trigger.until_next = trigger.sample_wait(rng);
        trigger
    }

    /// Game time left before the next strike.
    #[must_use]
    pub fn until_next(&self) -> Duration {
        self.until_next
    }

    /// Configured wait bounds.
    #[must_use]
    pub fn interval(&self) -> (Duration, Duration) {
        (self.min_interval, self.max_interval)
    }

    /// Consumes `dt` of game time, firing every cycle that elapses within it.
    ///
    /// # Errors
    /// Propagates [`GraphError`] from destabilising the chosen anchor.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        dt: Duration,
        graph: &mut ConnectionGraph,
        rng: &mut R,
    ) -> Result<Vec<InterferenceStrike>, GraphError> {
        let mut strikes = Vec::new();
        let mut remaining = dt;
        while remaining >= self.until_next {
            remaining -= self.until_next;
            strikes.push(self.strike(graph, rng)?);
            self.until_next = self.sample_wait(rng);
        }
        self.until_next -= remaining;
        Ok(strikes)
    }

    fn strike<R: RandomSource + ?Sized>(
        &self,
        graph: &mut ConnectionGraph,
        rng: &mut R,
    ) -> Result<InterferenceStrike, GraphError> {
        let candidates = graph.stable_occupied();
        if candidates.is_empty() {
            trace!("interference found no stable beacon");
            return Ok(InterferenceStrike {
                target: None,
                severed: Vec::new(),
            });
        }
        let target = candidates[rng.pick_index(candidates.len()).min(candidates.len() - 1)];
        let severed = match graph.set_stability(target, false)? {
            StabilityChange::Destabilised { severed } => severed,
            StabilityChange::Unchanged | StabilityChange::Stabilised => Vec::new(),
        };
        info!(anchor = %target, severed = severed.len(), "interference struck");
        Ok(InterferenceStrike {
            target: Some(target),
            severed,
        })
    }

    fn sample_wait<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Duration {
        let low = self.min_interval.as_secs_f64();
        let high = self.max_interval.as_secs_f64();
        let wait = Duration::from_secs_f64(rng.uniform(low, high).clamp(low, high));
        // A zero wait would spin forever inside `advance`.
        wait.max(Duration::from_millis(1))
    }
}
