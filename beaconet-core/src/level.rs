//! Level orchestration.
//!
//! A [`Level`] owns the connection graph and every state machine acting on
//! it. Inbound calls (clicks, minigame confirmation, validation, pause, and
//! clock ticks) are routed here, and every visible change is reported to the
//! level's [`LevelEvents`] sink.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::{
    Result,
    anchor::AnchorId,
    builder::LevelConfig,
    countdown::Countdown,
    error::{GraphError, TransitionError},
    events::{LevelEvents, NullEvents, SoundKind},
    graph::ConnectionGraph,
    interference::{InterferenceStrike, InterferenceTrigger},
    minigame::{MinigameOutcome, StabilizationMinigame},
    mode::GameMode,
    random::{RandomSource, SeededRandom},
    selector::{ConnectionSelector, SelectionOutcome},
    validator::{ValidationReport, Verdict, validate_path},
};

/// How a level ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EndReason {
    /// The player requested validation.
    Validated(ValidationReport),
    /// The countdown reached zero.
    Timeout,
}

/// Final result of a level.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
    /// Won or lost.
    pub verdict: Verdict,
    /// What decided the level.
    pub reason: EndReason,
}

/// What an [`Level::anchor_clicked`] call did.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Clicks are only handled in [`GameMode::Normal`].
    Ignored {
        /// Mode active when the click arrived.
        mode: GameMode,
    },
    /// A beacon was placed on an empty anchor.
    Placed(AnchorId),
    /// A stabilization session opened for an unstable beacon.
    MinigameStarted {
        /// Anchor under repair.
        anchor: AnchorId,
        /// Centre of the target zone.
        target_value: f64,
    },
    /// The click went to the connection selector.
    Selection(SelectionOutcome),
}

/// Game-clock effects of a [`Level::tick`] call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TickReport {
    /// Interference cycles that elapsed.
    pub strikes: Vec<InterferenceStrike>,
    /// Whether the countdown expired during this tick.
    pub expired: bool,
}

/// A running level.
///
/// # Examples
/// ```
/// use beaconet_core::{
///     AnchorId, EventLog, Level, LevelBuilder, SequenceRandom, Verdict,
/// };
///
/// let config = LevelBuilder::new()
///     .with_anchor_count(2)
///     .with_required_count(2)
///     .build()?;
/// let mut level = Level::new(config, EventLog::default(), SequenceRandom::new([0.5]));
/// let (a, b) = (AnchorId::new(0), AnchorId::new(1));
/// level.anchor_clicked(a)?;
/// level.anchor_clicked(b)?;
/// level.anchor_clicked(a)?;
/// level.anchor_clicked(b)?;
///
/// let report = level.validate_path_requested()?;
/// assert_eq!(report.verdict, Verdict::Won);
/// assert!(level.mode().is_terminal());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Level<E = NullEvents, R = SeededRandom> {
    config: LevelConfig,
    graph: ConnectionGraph,
    selector: ConnectionSelector,
    minigame: StabilizationMinigame,
    interference: InterferenceTrigger,
    countdown: Countdown,
    mode: GameMode,
    random: R,
    events: E,
    outcome: Option<Outcome>,
}

impl Level {
    /// Builds a silent level seeded from `config`.
    #[must_use]
    pub fn with_defaults(config: LevelConfig) -> Self {
        let random = config.seeded_random();
        Self::new(config, NullEvents, random)
    }
}

impl<E: LevelEvents, R: RandomSource> Level<E, R> {
    /// Builds a fresh level: every anchor empty, countdown full, mode normal.
    pub fn new(config: LevelConfig, events: E, mut random: R) -> Self {
        let (min, max) = config.interference_interval();
        let interference = InterferenceTrigger::new(min, max, &mut random);
        info!(
            anchors = config.anchor_count(),
            required = config.required_count(),
            time_limit_ms = config.time_limit().as_millis() as u64,
            "level loaded"
        );
        Self {
            graph: ConnectionGraph::with_anchors(config.anchor_count()),
            selector: ConnectionSelector::default(),
            minigame: StabilizationMinigame::new(config.tolerance(), config.speed()),
            interference,
            countdown: Countdown::new(config.time_limit()),
            mode: GameMode::Normal,
            random,
            events,
            outcome: None,
            config,
        }
    }

    /// Level configuration.
    #[must_use]
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Connection graph.
    #[must_use]
    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    /// Connection selector.
    #[must_use]
    pub fn selector(&self) -> &ConnectionSelector {
        &self.selector
    }

    /// Stabilization minigame.
    #[must_use]
    pub fn minigame(&self) -> &StabilizationMinigame {
        &self.minigame
    }

    /// Interference trigger.
    #[must_use]
    pub fn interference(&self) -> &InterferenceTrigger {
        &self.interference
    }

    /// Countdown.
    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Current game mode.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Final result once the level has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Event sink.
    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Mutable event sink.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Consumes the level and returns its event sink.
    pub fn into_events(self) -> E {
        self.events
    }

    /// Routes a click on `anchor`.
    ///
    /// Empty anchors receive a beacon, unstable beacons open the minigame,
    /// and stable beacons go to the connection selector. Clicks outside
    /// [`GameMode::Normal`] are ignored.
    ///
    /// # Errors
    /// Returns [`crate::LevelError::Graph`] for unknown anchors and
    /// [`crate::LevelError::Transition`] if the minigame cannot open.
    #[instrument(name = "level.click", err, skip(self), fields(anchor = %anchor, mode = %self.mode))]
    pub fn anchor_clicked(&mut self, anchor: AnchorId) -> Result<ClickOutcome> {
        if self.mode != GameMode::Normal {
            debug!(mode = %self.mode, "click ignored");
            return Ok(ClickOutcome::Ignored { mode: self.mode });
        }
        let state = self.graph.anchor(anchor).ok_or(GraphError::UnknownAnchor {
            anchor,
            anchor_count: self.graph.len(),
        })?;
        let (occupied, stable) = (state.is_occupied(), state.is_stable());

        if !occupied {
            self.graph.place_beacon(anchor)?;
            self.events.play_sound(SoundKind::Placement);
            info!(anchor = %anchor, placed = self.graph.occupied_count(), "beacon placed");
            return Ok(ClickOutcome::Placed(anchor));
        }
        if !stable {
            return self.open_minigame(anchor);
        }

        let outcome = self.selector.click(&mut self.graph, anchor);
        if let Some(on) = outcome.highlighted() {
            self.events.highlight(on, true);
        }
        if let Some(off) = outcome.unhighlighted() {
            self.events.highlight(off, false);
        }
        if let SelectionOutcome::Connected { from, to } = outcome {
            self.events.line_added(from, to);
        }
        Ok(ClickOutcome::Selection(outcome))
    }

    fn open_minigame(&mut self, anchor: AnchorId) -> Result<ClickOutcome> {
        let next = self.mode.transition(GameMode::MinigameActive)?;
        let session = self.minigame.start(&self.graph, anchor, &mut self.random)?;
        let (target_value, tolerance) = (session.target_value(), session.tolerance());
        self.mode = next;
        self.events.show_minigame_panel(true);
        self.events.set_target_zone(target_value, tolerance);
        info!(anchor = %anchor, target_value, "stabilization started");
        Ok(ClickOutcome::MinigameStarted {
            anchor,
            target_value,
        })
    }

    /// Confirms the running stabilization session and returns to normal play.
    ///
    /// # Errors
    /// Returns [`TransitionError::MinigameClosed`] when no session is running.
    #[instrument(name = "level.confirm", err, skip(self))]
    pub fn confirm_minigame(&mut self) -> Result<MinigameOutcome> {
        if self.mode != GameMode::MinigameActive {
            return Err(TransitionError::MinigameClosed.into());
        }
        let confirmed = self.minigame.confirm(&mut self.graph);
        self.mode = self.mode.transition(GameMode::Normal)?;
        self.events.show_minigame_panel(false);
        let outcome = confirmed?;
        if outcome.success {
            self.events.stability_changed(outcome.anchor, true);
        }
        Ok(outcome)
    }

    /// Runs path validation and ends the level with its verdict.
    ///
    /// # Errors
    /// Returns [`TransitionError::ModeConflict`] outside [`GameMode::Normal`].
    #[instrument(
        name = "level.validate",
        err,
        skip(self),
        fields(required = self.config.required_count()),
    )]
    pub fn validate_path_requested(&mut self) -> Result<ValidationReport> {
        self.mode.transition(GameMode::Ended)?;
        let report = validate_path(&self.graph, self.config.required_count());
        self.finish(report.verdict, EndReason::Validated(report.clone()));
        Ok(report)
    }

    /// Toggles between normal play and the pause menu.
    ///
    /// # Errors
    /// Returns [`TransitionError::ModeConflict`] while the minigame is open
    /// or after the level has ended.
    #[instrument(name = "level.pause", err, skip(self), fields(mode = %self.mode))]
    pub fn toggle_pause(&mut self) -> Result<GameMode> {
        let requested = match self.mode {
            GameMode::Paused => GameMode::Normal,
            _ => GameMode::Paused,
        };
        self.mode = self.mode.transition(requested)?;
        self.events.show_pause_menu(self.mode == GameMode::Paused);
        debug!(mode = %self.mode, "pause toggled");
        Ok(self.mode)
    }

    /// Advances both clocks by `dt`.
    ///
    /// The minigame sweep always follows real time. The countdown and
    /// interference only run in [`GameMode::Normal`], and never past the
    /// moment the countdown expires.
    ///
    /// # Errors
    /// Propagates [`GraphError`] raised while applying an interference strike.
    #[instrument(
        name = "level.tick",
        level = "trace",
        err,
        skip(self),
        fields(dt_ms = dt.as_millis() as u64, mode = %self.mode),
    )]
    pub fn tick(&mut self, dt: Duration) -> Result<TickReport> {
        self.minigame.tick(dt);
        if !self.mode.is_game_clock_running() {
            return Ok(TickReport::default());
        }

        // Game time stops at expiry, so later interference cycles never fire.
        let step = dt.min(self.countdown.remaining());
        let strikes = self
            .interference
            .advance(step, &mut self.graph, &mut self.random)?;
        for strike in &strikes {
            let Some(target) = strike.target else {
                continue;
            };
            self.events.stability_changed(target, false);
            for &other in &strike.severed {
                let (left, right) = if target < other {
                    (target, other)
                } else {
                    (other, target)
                };
                self.events.line_removed(left, right);
            }
        }

        let expired = self.countdown.advance(step);
        if expired {
            info!("countdown expired");
            self.finish(Verdict::Lost, EndReason::Timeout);
        }
        Ok(TickReport { strikes, expired })
    }

    fn finish(&mut self, verdict: Verdict, reason: EndReason) {
        if let Some(pending) = self.selector.reset() {
            self.events.highlight(pending, false);
        }
        self.mode = GameMode::Ended;
        if verdict.is_won() {
            self.events.play_sound(SoundKind::Win);
        }
        self.events.show_end_screen(verdict.is_won());
        info!(won = verdict.is_won(), timeout = matches!(reason, EndReason::Timeout), "level ended");
        self.outcome = Some(Outcome { verdict, reason });
    }
}
