//! Error types for the beaconet core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, time::Duration};

use thiserror::Error;

use crate::{anchor::AnchorId, mode::GameMode};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Reason an edge could not be inserted into the connection graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeRejection {
    /// Both endpoints were the same anchor.
    SelfLoop,
    /// The named endpoint has no beacon.
    Unoccupied(AnchorId),
    /// The named endpoint carries an unstable beacon.
    Unstable(AnchorId),
    /// The edge is already present.
    Duplicate,
}

impl fmt::Display for EdgeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => f.write_str("an anchor cannot link to itself"),
            Self::Unoccupied(anchor) => write!(f, "anchor {anchor} has no beacon"),
            Self::Unstable(anchor) => write!(f, "anchor {anchor} is unstable"),
            Self::Duplicate => f.write_str("the edge already exists"),
        }
    }
}

/// An error produced by [`crate::ConnectionGraph`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The identifier does not name an anchor of this level.
    #[error("anchor {anchor} does not exist (level has {anchor_count} anchors)")]
    UnknownAnchor {
        /// The identifier supplied by the caller.
        anchor: AnchorId,
        /// Number of anchors built for the level.
        anchor_count: usize,
    },
    /// A beacon was placed on an anchor that already carries one.
    #[error("anchor {anchor} is already occupied")]
    AlreadyOccupied {
        /// The occupied anchor.
        anchor: AnchorId,
    },
    /// Stability was changed on an anchor without a beacon.
    #[error("anchor {anchor} has no beacon")]
    Unoccupied {
        /// The empty anchor.
        anchor: AnchorId,
    },
    /// The requested edge violates the simple-graph rules.
    #[error("cannot link {left} and {right}: {reason}")]
    InvalidEdge {
        /// First endpoint as supplied by the caller.
        left: AnchorId,
        /// Second endpoint as supplied by the caller.
        right: AnchorId,
        /// Why the edge was refused.
        reason: EdgeRejection,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The identifier does not name an anchor of this level.
        UnknownAnchor => UnknownAnchor { .. } => "GRAPH_UNKNOWN_ANCHOR",
        /// A beacon was placed on an anchor that already carries one.
        AlreadyOccupied => AlreadyOccupied { .. } => "GRAPH_ALREADY_OCCUPIED",
        /// Stability was changed on an anchor without a beacon.
        Unoccupied => Unoccupied { .. } => "GRAPH_UNOCCUPIED",
        /// The requested edge violates the simple-graph rules.
        InvalidEdge => InvalidEdge { .. } => "GRAPH_INVALID_EDGE",
    }
}

/// A state-machine transition that is not valid from the current state.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TransitionError {
    /// A minigame session is already running.
    #[error("a stabilization session is already running for anchor {anchor}")]
    MinigameRunning {
        /// Anchor targeted by the running session.
        anchor: AnchorId,
    },
    /// No minigame session is running.
    #[error("no stabilization session is running")]
    MinigameClosed,
    /// The anchor does not carry an unstable beacon.
    #[error("anchor {anchor} does not need stabilization (occupied={occupied}, stable={stable})")]
    NotDestabilised {
        /// Anchor that was asked to start a session.
        anchor: AnchorId,
        /// Whether a beacon is present.
        occupied: bool,
        /// Whether the beacon is stable.
        stable: bool,
    },
    /// The game mode does not permit the requested transition.
    #[error("cannot enter {requested} while the level is {current}")]
    ModeConflict {
        /// Mode active when the request arrived.
        current: GameMode,
        /// Mode the caller tried to enter.
        requested: GameMode,
    },
    /// A graph operation failed while applying the transition.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`TransitionError`] variants.
    enum TransitionErrorCode for TransitionError {
        /// A minigame session is already running.
        MinigameRunning => MinigameRunning { .. } => "TRANSITION_MINIGAME_RUNNING",
        /// No minigame session is running.
        MinigameClosed => MinigameClosed => "TRANSITION_MINIGAME_CLOSED",
        /// The anchor does not carry an unstable beacon.
        NotDestabilised => NotDestabilised { .. } => "TRANSITION_NOT_DESTABILISED",
        /// The game mode does not permit the requested transition.
        ModeConflict => ModeConflict { .. } => "TRANSITION_MODE_CONFLICT",
        /// A graph operation failed while applying the transition.
        GraphFailure => Graph(..) => "TRANSITION_GRAPH_FAILURE",
    }
}

/// Error produced when a [`crate::LevelBuilder`] holds an unusable configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A level needs at least one anchor.
    #[error("anchor_count must be at least 1 (got {got})")]
    InvalidAnchorCount {
        /// The invalid anchor count.
        got: usize,
    },
    /// The required count must lie within `1..=anchor_count`.
    #[error("required_count must be between 1 and {anchor_count} (got {got})")]
    InvalidRequiredCount {
        /// The invalid required count.
        got: usize,
        /// Number of anchors in the level.
        anchor_count: usize,
    },
    /// The countdown must last longer than zero.
    #[error("time limit must be positive")]
    ZeroTimeLimit,
    /// The interference interval is empty, inverted, or starts at zero.
    #[error("interference interval {min:?}..={max:?} is invalid")]
    InvalidInterferenceInterval {
        /// Lower bound supplied by the caller.
        min: Duration,
        /// Upper bound supplied by the caller.
        max: Duration,
    },
    /// The tolerance window must be finite and within `(0, 0.1]`.
    #[error("tolerance must be in (0, 0.1] (got {got})")]
    InvalidTolerance {
        /// The invalid tolerance.
        got: f64,
    },
    /// The oscillation speed must be finite and positive.
    #[error("oscillation speed must be finite and positive (got {got})")]
    InvalidSpeed {
        /// The invalid speed.
        got: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConfigError`] variants.
    enum ConfigErrorCode for ConfigError {
        /// A level needs at least one anchor.
        InvalidAnchorCount => InvalidAnchorCount { .. } => "CONFIG_INVALID_ANCHOR_COUNT",
        /// The required count must lie within the anchor count.
        InvalidRequiredCount => InvalidRequiredCount { .. } => "CONFIG_INVALID_REQUIRED_COUNT",
        /// The countdown must last longer than zero.
        ZeroTimeLimit => ZeroTimeLimit => "CONFIG_ZERO_TIME_LIMIT",
        /// The interference interval is invalid.
        InvalidInterferenceInterval => InvalidInterferenceInterval { .. } => "CONFIG_INVALID_INTERFERENCE_INTERVAL",
        /// The tolerance window is out of range.
        InvalidTolerance => InvalidTolerance { .. } => "CONFIG_INVALID_TOLERANCE",
        /// The oscillation speed is out of range.
        InvalidSpeed => InvalidSpeed { .. } => "CONFIG_INVALID_SPEED",
    }
}

/// Umbrella error returned by [`crate::Level`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LevelError {
    /// A graph operation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A state-machine transition was rejected.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// The level configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LevelError {
    /// Returns the stable code string of the wrapped error.
    ///
    /// # Examples
    /// ```
    /// use beaconet_core::{AnchorId, GraphError, LevelError};
    ///
    /// let err = LevelError::from(GraphError::AlreadyOccupied { anchor: AnchorId::new(1) });
    /// assert_eq!(err.code(), "GRAPH_ALREADY_OCCUPIED");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Graph(err) => err.code().as_str(),
            Self::Transition(err) => err.code().as_str(),
            Self::Config(err) => err.code().as_str(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, LevelError>;
