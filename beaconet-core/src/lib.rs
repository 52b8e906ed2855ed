//! Beaconet core library.
//!
//! Logic core of the beacon network puzzle: the anchor graph, the connection
//! selector, path validation, the stabilization minigame, and interference,
//! all driven through [`Level`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod anchor;
mod builder;
mod countdown;
mod error;
mod events;
mod graph;
mod interference;
mod level;
mod minigame;
mod mode;
mod random;
mod selector;
mod validator;

pub use crate::{
    anchor::{Anchor, AnchorId},
    builder::{
        DEFAULT_ANCHOR_COUNT, DEFAULT_REQUIRED_COUNT, DEFAULT_TIME_LIMIT, LevelBuilder,
        LevelConfig, MAX_TOLERANCE,
    },
    countdown::Countdown,
    error::{
        ConfigError, ConfigErrorCode, EdgeRejection, GraphError, GraphErrorCode, LevelError,
        Result, TransitionError, TransitionErrorCode,
    },
    events::{EventLog, LevelEvent, LevelEvents, NullEvents, SoundKind},
    graph::{
        ConnectionGraph, GraphInvariant, GraphInvariantChecker, GraphInvariantViolation,
        StabilityChange,
    },
    interference::{
        DEFAULT_MAX_INTERVAL, DEFAULT_MIN_INTERVAL, InterferenceStrike, InterferenceTrigger,
    },
    level::{ClickOutcome, EndReason, Level, Outcome, TickReport},
    minigame::{
        DEFAULT_SPEED, DEFAULT_TOLERANCE, Direction, MinigameOutcome, MinigameSession,
        MinigameState, StabilizationMinigame, TARGET_MAX, TARGET_MIN,
    },
    mode::GameMode,
    random::{DEFAULT_SEED, RandomSource, SeededRandom, SequenceRandom},
    selector::{ConnectionSelector, SelectionOutcome, SelectorState},
    validator::{ValidationFailure, ValidationReport, Verdict, validate_path},
};
