//! Global game mode shared by the level's inbound operations.

use std::fmt;

use crate::error::TransitionError;

/// The single owner of the level's pause state.
///
/// The game clock (countdown and interference) only runs in
/// [`GameMode::Normal`]; the minigame keeps its own real-time clock.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum GameMode {
    /// Regular play; clicks and validation are accepted.
    #[default]
    Normal,
    /// The player opened the pause menu.
    Paused,
    /// A stabilization session is on screen.
    MinigameActive,
    /// Validation or the countdown decided the level.
    Ended,
}

impl GameMode {
    /// Returns whether the pausable game clock advances in this mode.
    #[must_use]
    pub const fn is_game_clock_running(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Returns whether no further transition can leave this mode.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Validates a move from `self` to `requested`.
    ///
    /// # Errors
    /// Returns [`TransitionError::ModeConflict`] when the move is not one of
    /// `Normal <-> Paused`, `Normal <-> MinigameActive`, or `Normal -> Ended`.
    ///
    /// # Examples
    /// ```
    /// use beaconet_core::GameMode;
    ///
    /// assert_eq!(GameMode::Normal.transition(GameMode::Paused), Ok(GameMode::Paused));
    /// assert!(GameMode::Ended.transition(GameMode::Normal).is_err());
    /// ```
    pub fn transition(self, requested: Self) -> Result<Self, TransitionError> {
        let allowed = matches!(
            (self, requested),
            (Self::Normal, Self::Paused | Self::MinigameActive | Self::Ended)
                | (Self::Paused | Self::MinigameActive, Self::Normal)
        );
        if allowed {
            Ok(requested)
        } else {
            Err(TransitionError::ModeConflict {
                current: self,
                requested,
            })
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Paused => "paused",
            Self::MinigameActive => "minigame",
            Self::Ended => "ended",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pause(GameMode::Normal, GameMode::Paused)]
    #[case::resume(GameMode::Paused, GameMode::Normal)]
    #[case::open_minigame(GameMode::Normal, GameMode::MinigameActive)]
    #[case::close_minigame(GameMode::MinigameActive, GameMode::Normal)]
    #[case::end(GameMode::Normal, GameMode::Ended)]
    fn permitted_transitions(#[case] from: GameMode, #[case] to: GameMode) {
        assert_eq!(from.transition(to), Ok(to));
    }

    #[rstest]
    #[case::pause_minigame(GameMode::MinigameActive, GameMode::Paused)]
    #[case::minigame_from_pause(GameMode::Paused, GameMode::MinigameActive)]
    #[case::end_while_paused(GameMode::Paused, GameMode::Ended)]
    #[case::resume_after_end(GameMode::Ended, GameMode::Normal)]
    #[case::pause_after_end(GameMode::Ended, GameMode::Paused)]
    #[case::same_mode(GameMode::Normal, GameMode::Normal)]
    fn rejected_transitions(#[case] from: GameMode, #[case] to: GameMode) {
        assert_eq!(
            from.transition(to),
            Err(TransitionError::ModeConflict {
                current: from,
                requested: to,
            })
        );
    }

    #[test]
    fn only_normal_runs_the_game_clock() {
        assert!(GameMode::Normal.is_game_clock_running());
        assert!(!GameMode::Paused.is_game_clock_running());
        assert!(!GameMode::MinigameActive.is_game_clock_running());
        assert!(!GameMode::Ended.is_game_clock_running());
        assert!(GameMode::Ended.is_terminal());
    }
}
