//! Stabilization minigame.
//!
//! A running session sweeps a value along a triangle wave over `[0, 1]`; the
//! player confirms when it sits inside the target zone. Success restores the
//! anchor's stability but never its links.

use std::time::Duration;

use tracing::{debug, info};

use crate::{
    anchor::AnchorId,
    error::{GraphError, TransitionError},
    graph::ConnectionGraph,
    random::RandomSource,
};

/// Lower bound of the target range, exclusive.
pub const TARGET_MIN: f64 = 0.1;
/// Upper bound of the target range, exclusive.
pub const TARGET_MAX: f64 = 0.9;
/// Default half-width of the target zone.
pub const DEFAULT_TOLERANCE: f64 = 0.1;
/// Default sweep speed in units per second.
pub const DEFAULT_SPEED: f64 = 1.5;

/// Sweep direction of the oscillating value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Moving towards 1.
    Rising,
    /// Moving towards 0.
    Falling,
}

/// A running stabilization attempt for one anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct MinigameSession {
    target: AnchorId,
    target_value: f64,
    tolerance: f64,
    current_value: f64,
    direction: Direction,
}

impl MinigameSession {
    /// Anchor being stabilised.
    #[must_use]
    pub fn target(&self) -> AnchorId {
        self.target
    }

    /// Centre of the target zone.
    #[must_use]
    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    /// Half-width of the target zone.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Current position of the sweep.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Current sweep direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns whether confirming now would succeed.
    #[must_use]
    pub fn is_on_target(&self) -> bool {
        (self.current_value - self.target_value).abs() <= self.tolerance
    }

    fn advance(&mut self, distance: f64) {
        // Unfold the wave onto [0, 2) so a single step may cross both ends.
        let unfolded = match self.direction {
            Direction::Rising => self.current_value,
            Direction::Falling => 2.0 - self.current_value,
        };
        let position = (unfolded + distance).rem_euclid(2.0);
        if position <= 1.0 {
            self.direction = Direction::Rising;
            self.current_value = position;
        } else {
            self.direction = Direction::Falling;
            self.current_value = 2.0 - position;
        }
    }
}

/// Minigame state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MinigameState {
    /// No session is running.
    #[default]
    Closed,
    /// A session is on screen.
    Running(MinigameSession),
}

/// Result of [`StabilizationMinigame::confirm`].
#[derive(Clone, Debug, PartialEq)]
pub struct MinigameOutcome {
    /// Anchor the session targeted.
    pub anchor: AnchorId,
    /// Whether the sweep was inside the zone.
    pub success: bool,
    /// Sweep value at the moment of confirmation.
    pub value: f64,
    /// Centre of the zone.
    pub target_value: f64,
}

/// The timed matching challenge.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use beaconet_core::{
///     AnchorId, ConnectionGraph, SequenceRandom, StabilizationMinigame,
/// };
///
/// let anchor = AnchorId::new(0);
/// let mut graph = ConnectionGraph::with_anchors(1);
/// graph.place_beacon(anchor)?;
/// graph.set_stability(anchor, false)?;
///
/// let mut game = StabilizationMinigame::new(0.1, 1.0);
/// let mut rng = SequenceRandom::new([0.5]);
/// game.start(&graph, anchor, &mut rng)?;
/// game.tick(Duration::from_millis(550));
/// let outcome = game.confirm(&mut graph)?;
/// assert!(outcome.success);
/// assert!(graph.anchor(anchor).is_some_and(|a| a.is_stable()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StabilizationMinigame {
    tolerance: f64,
    speed: f64,
    state: MinigameState,
}

impl Default for StabilizationMinigame {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, DEFAULT_SPEED)
    }
}

impl StabilizationMinigame {
    /// Creates a closed minigame. The level builder validates both values.
    #[must_use]
    pub fn new(tolerance: f64, speed: f64) -> Self {
        Self {
            tolerance,
            speed,
            state: MinigameState::Closed,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &MinigameState {
        &self.state
    }

    /// Returns the running session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&MinigameSession> {
        match &self.state {
            MinigameState::Closed => None,
            MinigameState::Running(session) => Some(session),
        }
    }

    /// Returns whether a session is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session().is_some()
    }

    /// Returns `(center, half_width)` of the running session's target zone.
    #[must_use]
    pub fn target_zone(&self) -> Option<(f64, f64)> {
        self.session()
            .map(|session| (session.target_value, session.tolerance))
    }

    /// Opens a session for an occupied, unstable anchor.
    ///
    /// # Errors
    /// Returns [`TransitionError::MinigameRunning`] while another session is
    /// open, [`TransitionError::NotDestabilised`] when the anchor is empty or
    /// stable, and [`TransitionError::Graph`] for unknown anchors.
    pub fn start<R: RandomSource + ?Sized>(
        &mut self,
        graph: &ConnectionGraph,
        anchor: AnchorId,
        rng: &mut R,
    ) -> Result<&MinigameSession, TransitionError> {
        if let Some(session) = self.session() {
            return Err(TransitionError::MinigameRunning {
                anchor: session.target,
            });
        }
        let state = graph.anchor(anchor).ok_or(GraphError::UnknownAnchor {
            anchor,
            anchor_count: graph.len(),
        })?;
        if !state.is_occupied() || state.is_stable() {
            return Err(TransitionError::NotDestabilised {
                anchor,
                occupied: state.is_occupied(),
                stable: state.is_stable(),
            });
        }

        let target_value = rng
            .uniform(TARGET_MIN, TARGET_MAX)
            // The target interval is open. A 0.0 draw lands on TARGET_MIN, and only
            // scripted draws near 1.0 can round onto TARGET_MAX.
            .clamp(TARGET_MIN + f64::EPSILON, TARGET_MAX - f64::EPSILON);
        debug!(anchor = %anchor, target_value, "stabilization session opened");
        self.state = MinigameState::Running(MinigameSession {
            target: anchor,
            target_value,
            tolerance: self.tolerance,
            current_value: 0.0,
            direction: Direction::Rising,
        });
        self.session().ok_or(TransitionError::MinigameClosed)
    }

    /// Advances the sweep by `dt` of real time. A closed minigame ignores it.
    pub fn tick(&mut self, dt: Duration) {
        let speed = self.speed;
        if let MinigameState::Running(session) = &mut self.state {
            session.advance(speed * dt.as_secs_f64());
        }
    }

    /// Closes the running session and applies its result.
    ///
    /// # Errors
    /// Returns [`TransitionError::MinigameClosed`] when no session is running
    /// and [`TransitionError::Graph`] if the anchor cannot be restored.
    pub fn confirm(
        &mut self,
        graph: &mut ConnectionGraph,
    ) -> Result<MinigameOutcome, TransitionError> {
        let MinigameState::Running(session) = std::mem::take(&mut self.state) else {
            return Err(TransitionError::MinigameClosed);
        };
        let success = session.is_on_target();
        if success {
            graph.set_stability(session.target, true)?;
        }
        info!(
            anchor = %session.target,
            success,
            value = session.current_value,
            target = session.target_value,
            "stabilization confirmed"
        );
        Ok(MinigameOutcome {
            anchor: session.target,
            success,
            value: session.current_value,
            target_value: session.target_value,
        })
    }
}
