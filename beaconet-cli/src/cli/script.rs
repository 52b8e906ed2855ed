//! Line-based replay scripts for the `play` command.
//!
//! Each non-blank line holds one inbound event:
//!
//! ```text
//! # place two beacons and link them
//! click 0
//! click 1
//! click 0
//! click 1
//! tick 2.5
//! validate
//! ```
//!
//! `#` starts a comment that runs to the end of the line.

use std::time::Duration;

use beaconet_core::AnchorId;
use thiserror::Error;

/// One inbound event of a replay script.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptAction {
    /// `click <id>`
    Click(AnchorId),
    /// `tick <seconds>`
    Tick(Duration),
    /// `confirm`
    Confirm,
    /// `pause`
    Pause,
    /// `validate`
    Validate,
}

/// A parsed script line with its 1-based line number.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptStep {
    /// Line the action came from.
    pub line: usize,
    /// The action to replay.
    pub action: ScriptAction,
}

/// Errors raised while parsing a replay script.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScriptError {
    /// The first word is not a known command.
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand {
        /// Offending line.
        line: usize,
        /// The unrecognised word.
        command: String,
    },
    /// The command needs an argument that is missing.
    #[error("line {line}: `{command}` expects {expected}")]
    MissingArgument {
        /// Offending line.
        line: usize,
        /// Command missing its argument.
        command: &'static str,
        /// Description of the expected argument.
        expected: &'static str,
    },
    /// Extra words follow a complete command.
    #[error("line {line}: unexpected trailing input `{extra}`")]
    TrailingInput {
        /// Offending line.
        line: usize,
        /// The unexpected text.
        extra: String,
    },
    /// The anchor id is not a non-negative integer.
    #[error("line {line}: invalid anchor id `{value}`")]
    InvalidAnchor {
        /// Offending line.
        line: usize,
        /// The rejected text.
        value: String,
    },
    /// The duration is not a finite, non-negative number of seconds.
    #[error("line {line}: invalid duration `{value}`")]
    InvalidSeconds {
        /// Offending line.
        line: usize,
        /// The rejected text.
        value: String,
    },
}

/// Parses a whole script.
///
/// # Errors
/// Returns the first [`ScriptError`] found, tagged with its line number.
///
/// # Examples
/// ```
/// use beaconet_cli::cli::{ScriptAction, parse_script};
/// use beaconet_core::AnchorId;
///
/// let steps = parse_script("click 2 # place\n\nvalidate\n")?;
/// assert_eq!(steps.len(), 2);
/// assert_eq!(steps[0].action, ScriptAction::Click(AnchorId::new(2)));
/// assert_eq!(steps[1].line, 3);
/// # Ok::<(), beaconet_cli::cli::ScriptError>(())
/// ```
pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = index + 1;
            let content = raw.split_once('#').map_or(raw, |(before, _)| before).trim();
            (!content.is_empty()).then(|| parse_line(line, content))
        })
        .collect()
}

fn parse_line(line: usize, content: &str) -> Result<ScriptStep, ScriptError> {
    let mut words = content.split_whitespace();
    let command = words.next().unwrap_or_default();
    let action = match command.to_ascii_lowercase().as_str() {
        "click" => {
            let value = words.next().ok_or(ScriptError::MissingArgument {
                line,
                command: "click",
                expected: "an anchor id",
            })?;
            let index = value.parse::<usize>().map_err(|_| ScriptError::InvalidAnchor {
                line,
                value: value.to_owned(),
            })?;
            ScriptAction::Click(AnchorId::new(index))
        }
        "tick" => {
            let value = words.next().ok_or(ScriptError::MissingArgument {
                line,
                command: "tick",
                expected: "a number of seconds",
            })?;
            let seconds = parse_seconds(value).map_err(|_| ScriptError::InvalidSeconds {
                line,
                value: value.to_owned(),
            })?;
            ScriptAction::Tick(seconds)
        }
        "confirm" => ScriptAction::Confirm,
        "pause" => ScriptAction::Pause,
        "validate" => ScriptAction::Validate,
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: command.to_owned(),
            });
        }
    };
    let extra: Vec<&str> = words.collect();
    if !extra.is_empty() {
        return Err(ScriptError::TrailingInput {
            line,
            extra: extra.join(" "),
        });
    }
    Ok(ScriptStep { line, action })
}

/// Parses a non-negative, finite number of seconds.
///
/// Shared by script `tick` lines and the duration flags of `play`.
///
/// # Errors
/// Returns a message describing why `raw` was rejected.
pub fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("`{raw}` is not a number: {err}"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|err| format!("`{raw}` is not a valid duration: {err}"))
}
