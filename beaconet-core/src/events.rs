//! Outbound notifications emitted by a [`crate::Level`].
//!
//! Presentation layers implement [`LevelEvents`] to draw lines, highlight
//! anchors and play sounds. Every method defaults to a no-op so sinks only
//! override what they render.

use std::fmt;

use crate::anchor::AnchorId;

/// Sound cues requested by the level.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SoundKind {
    /// A beacon was placed on an anchor.
    Placement,
    /// Validation succeeded.
    Win,
}

/// Receiver for the level's outbound calls.
#[expect(unused_variables, reason = "default methods ignore their arguments")]
pub trait LevelEvents {
    /// Toggles the selection highlight of `anchor`.
    fn highlight(&mut self, anchor: AnchorId, on: bool) {}

    /// Plays a sound cue.
    fn play_sound(&mut self, sound: SoundKind) {}

    /// Shows the end screen with the final verdict.
    fn show_end_screen(&mut self, won: bool) {}

    /// Shows or hides the stabilization panel.
    fn show_minigame_panel(&mut self, visible: bool) {}

    /// Publishes the minigame's target zone.
    fn set_target_zone(&mut self, center: f64, half_width: f64) {}

    /// A line now joins `left` and `right`.
    fn line_added(&mut self, left: AnchorId, right: AnchorId) {}

    /// The line between `left` and `right` is gone.
    fn line_removed(&mut self, left: AnchorId, right: AnchorId) {}

    /// The stability of `anchor` flipped.
    fn stability_changed(&mut self, anchor: AnchorId, stable: bool) {}

    /// Shows or hides the pause menu.
    fn show_pause_menu(&mut self, visible: bool) {}
}

impl<E: LevelEvents + ?Sized> LevelEvents for &mut E {
    fn highlight(&mut self, anchor: AnchorId, on: bool) {
        (**self).highlight(anchor, on);
    }

    fn play_sound(&mut self, sound: SoundKind) {
        (**self).play_sound(sound);
    }

    fn show_end_screen(&mut self, won: bool) {
        (**self).show_end_screen(won);
    }

    fn show_minigame_panel(&mut self, visible: bool) {
        (**self).show_minigame_panel(visible);
    }

    fn set_target_zone(&mut self, center: f64, half_width: f64) {
        (**self).set_target_zone(center, half_width);
    }

    fn line_added(&mut self, left: AnchorId, right: AnchorId) {
        (**self).line_added(left, right);
    }

    fn line_removed(&mut self, left: AnchorId, right: AnchorId) {
        (**self).line_removed(left, right);
    }

    fn stability_changed(&mut self, anchor: AnchorId, stable: bool) {
        (**self).stability_changed(anchor, stable);
    }

    fn show_pause_menu(&mut self, visible: bool) {
        (**self).show_pause_menu(visible);
    }
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEvents;

impl LevelEvents for NullEvents {}

/// A single recorded outbound call.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelEvent {
    /// See [`LevelEvents::highlight`].
    Highlight {
        /// Highlighted anchor.
        anchor: AnchorId,
        /// Whether the highlight is on.
        on: bool,
    },
    /// See [`LevelEvents::play_sound`].
    Sound(SoundKind),
    /// See [`LevelEvents::show_end_screen`].
    EndScreen {
        /// Final verdict.
        won: bool,
    },
    /// See [`LevelEvents::show_minigame_panel`].
    MinigamePanel {
        /// Panel visibility.
        visible: bool,
    },
    /// See [`LevelEvents::set_target_zone`].
    TargetZone {
        /// Centre of the zone.
        center: f64,
        /// Half the zone's width.
        half_width: f64,
    },
    /// See [`LevelEvents::line_added`].
    LineAdded(AnchorId, AnchorId),
    /// See [`LevelEvents::line_removed`].
    LineRemoved(AnchorId, AnchorId),
    /// See [`LevelEvents::stability_changed`].
    StabilityChanged {
        /// Anchor whose beacon changed.
        anchor: AnchorId,
        /// New stability.
        stable: bool,
    },
    /// See [`LevelEvents::show_pause_menu`].
    PauseMenu {
        /// Menu visibility.
        visible: bool,
    },
}

impl fmt::Display for LevelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highlight { anchor, on } => write!(f, "highlight {anchor} {}", on_off(*on)),
            Self::Sound(SoundKind::Placement) => f.write_str("sound placement"),
            Self::Sound(SoundKind::Win) => f.write_str("sound win"),
            Self::EndScreen { won } => {
                write!(f, "end-screen {}", if *won { "won" } else { "lost" })
            }
            Self::MinigamePanel { visible } => write!(f, "minigame-panel {}", on_off(*visible)),
            Self::TargetZone { center, half_width } => {
                write!(f, "target-zone {center:.3}±{half_width:.3}")
            }
            Self::LineAdded(left, right) => write!(f, "line+ {left}-{right}"),
            Self::LineRemoved(left, right) => write!(f, "line- {left}-{right}"),
            Self::StabilityChanged { anchor, stable } => write!(
                f,
                "stability {anchor} {}",
                if *stable { "stable" } else { "unstable" }
            ),
            Self::PauseMenu { visible } => write!(f, "pause-menu {}", on_off(*visible)),
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Sink that records every event in order.
///
/// # Examples
/// ```
/// use beaconet_core::{AnchorId, EventLog, LevelEvent, LevelEvents};
///
/// let mut log = EventLog::default();
/// log.highlight(AnchorId::new(2), true);
/// assert_eq!(
///     log.events(),
///     &[LevelEvent::Highlight { anchor: AnchorId::new(2), on: true }]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    events: Vec<LevelEvent>,
}

impl EventLog {
    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[LevelEvent] {
        &self.events
    }

    /// Removes and returns every recorded event.
    pub fn drain(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl LevelEvents for EventLog {
    fn highlight(&mut self, anchor: AnchorId, on: bool) {
        self.events.push(LevelEvent::Highlight { anchor, on });
    }

    fn play_sound(&mut self, sound: SoundKind) {
        self.events.push(LevelEvent::Sound(sound));
    }

    fn show_end_screen(&mut self, won: bool) {
        self.events.push(LevelEvent::EndScreen { won });
    }

    fn show_minigame_panel(&mut self, visible: bool) {
        self.events.push(LevelEvent::MinigamePanel { visible });
    }

    fn set_target_zone(&mut self, center: f64, half_width: f64) {
        self.events.push(LevelEvent::TargetZone { center, half_width });
    }

    fn line_added(&mut self, left: AnchorId, right: AnchorId) {
        self.events.push(LevelEvent::LineAdded(left, right));
    }

    fn line_removed(&mut self, left: AnchorId, right: AnchorId) {
        self.events.push(LevelEvent::LineRemoved(left, right));
    }

    fn stability_changed(&mut self, anchor: AnchorId, stable: bool) {
        self.events.push(LevelEvent::StabilityChanged { anchor, stable });
    }

    fn show_pause_menu(&mut self, visible: bool) {
        self.events.push(LevelEvent::PauseMenu { visible });
    }
}
