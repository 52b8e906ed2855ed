//! Command implementations and argument parsing for the beaconet CLI.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use beaconet_core::{
    AnchorId, ConfigError, DEFAULT_SEED, EndReason, EventLog, GameMode, GraphInvariantViolation,
    Level, LevelBuilder, LevelError, LevelEvent, Outcome, SeededRandom, Verdict,
};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use super::script::{ScriptAction, ScriptError, ScriptStep, parse_script, parse_seconds};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "beaconet", about = "Replay scripted input against a beacon network level.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Load a level and replay a script of inbound events.
    Play(PlayCommand),
}

/// Options accepted by the `play` command.
#[derive(Debug, Args, Clone)]
pub struct PlayCommand {
    /// Script with one event per line (`click <id>`, `tick <secs>`,
    /// `confirm`, `pause`, `validate`).
    pub script: PathBuf,

    /// Number of anchors in the level.
    #[arg(long, default_value_t = beaconet_core::DEFAULT_ANCHOR_COUNT)]
    pub anchors: usize,

    /// Number of beacons the network must span.
    #[arg(long, default_value_t = beaconet_core::DEFAULT_REQUIRED_COUNT)]
    pub required: usize,

    /// Countdown length in seconds.
    #[arg(long = "time-limit", value_parser = parse_seconds, default_value = "20")]
    pub time_limit: Duration,

    /// Shortest wait between interference strikes, in seconds.
    #[arg(long = "interference-min", value_parser = parse_seconds, default_value = "15")]
    pub interference_min: Duration,

    /// Longest wait between interference strikes, in seconds.
    #[arg(long = "interference-max", value_parser = parse_seconds, default_value = "25")]
    pub interference_max: Duration,

    /// Half-width of the stabilization target zone.
    #[arg(long, default_value_t = beaconet_core::DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Stabilization sweep speed in units per second.
    #[arg(long, default_value_t = beaconet_core::DEFAULT_SPEED)]
    pub speed: f64,

    /// Seed for interference and target sampling.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl PlayCommand {
    /// Returns a command for `script` with every other option at its default.
    #[must_use]
    pub fn with_script(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            anchors: beaconet_core::DEFAULT_ANCHOR_COUNT,
            required: beaconet_core::DEFAULT_REQUIRED_COUNT,
            time_limit: beaconet_core::DEFAULT_TIME_LIMIT,
            interference_min: beaconet_core::DEFAULT_MIN_INTERVAL,
            interference_max: beaconet_core::DEFAULT_MAX_INTERVAL,
            tolerance: beaconet_core::DEFAULT_TOLERANCE,
            speed: beaconet_core::DEFAULT_SPEED,
            seed: DEFAULT_SEED,
        }
    }

    fn builder(&self) -> LevelBuilder {
        LevelBuilder::new()
            .with_anchor_count(self.anchors)
            .with_required_count(self.required)
            .with_time_limit(self.time_limit)
            .with_interference_interval(self.interference_min, self.interference_max)
            .with_tolerance(self.tolerance)
            .with_speed(self.speed)
            .with_seed(self.seed)
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The script file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The script could not be parsed.
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// The level options were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The level rejected a scripted event.
    #[error("line {line}: {source}")]
    Level {
        /// Script line that was being replayed.
        line: usize,
        /// Error reported by the level.
        #[source]
        source: LevelError,
    },
}

impl CliError {
    /// Returns the stable code of the underlying core error, if any.
    #[must_use]
    pub fn core_code(&self) -> Option<&'static str> {
        match self {
            Self::Config(err) => Some(err.code().as_str()),
            Self::Level { source, .. } => Some(source.code()),
            Self::Io { .. } | Self::Script(_) => None,
        }
    }
}

/// Summarises a replayed script.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaySummary {
    /// Outbound events in emission order.
    pub events: Vec<LevelEvent>,
    /// Mode after the last replayed line.
    pub mode: GameMode,
    /// Final result, if the level ended.
    pub outcome: Option<Outcome>,
    /// Edges left on the board.
    pub edges: Vec<(AnchorId, AnchorId)>,
    /// Script lines replayed.
    pub executed: usize,
    /// Script lines left unplayed because the level had ended.
    pub skipped: usize,
    /// Structural violations found in the final graph.
    pub violations: Vec<GraphInvariantViolation>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the script cannot be read or parsed, the options
/// are invalid, or the level rejects a scripted event.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use beaconet_cli::cli::{Cli, Command, PlayCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "click 0\nclick 1\nvalidate\n")?;
/// let cli = Cli {
///     command: Command::Play(PlayCommand::with_script(file.path())),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.executed, 3);
/// assert!(summary.outcome.is_some());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<PlaySummary, CliError> {
    match cli.command {
        Command::Play(play) => {
            Span::current().record("command", field::display("play"));
            run_play(play)
        }
    }
}

#[instrument(
    name = "cli.play",
    err,
    skip(command),
    fields(script = field::Empty, anchors = command.anchors, seed = command.seed),
)]
pub(super) fn run_play(command: PlayCommand) -> Result<PlaySummary, CliError> {
    Span::current().record("script", field::display(command.script.display()));
    let config = command.builder().build()?;
    let steps = load_script(&command.script)?;

    let random = SeededRandom::new(config.seed());
    let mut level = Level::new(config, EventLog::default(), random);
    let (executed, skipped) = replay(&mut level, &steps)?;
    if skipped > 0 {
        warn!(skipped, "level ended before the script finished");
    }

    let summary = PlaySummary {
        events: level.events().events().to_vec(),
        mode: level.mode(),
        outcome: level.outcome().cloned(),
        edges: level.graph().edges(),
        executed,
        skipped,
        violations: level.graph().invariants().collect_all(),
    };
    info!(
        executed,
        mode = %summary.mode,
        events = summary.events.len(),
        "script replayed"
    );
    Ok(summary)
}

#[instrument(name = "cli.load_script", err, fields(path = field::Empty))]
pub(super) fn load_script(path: &Path) -> Result<Vec<ScriptStep>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let source = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_script(&source)?)
}

/// Replays `steps` until the script ends or the level does, returning the
/// number of executed and skipped lines.
pub(super) fn replay(
    level: &mut Level<EventLog, SeededRandom>,
    steps: &[ScriptStep],
) -> Result<(usize, usize), CliError> {
    for (index, step) in steps.iter().enumerate() {
        if level.mode() == GameMode::Ended {
            return Ok((index, steps.len() - index));
        }
        let result = match step.action {
            ScriptAction::Click(anchor) => level.anchor_clicked(anchor).map(drop),
            ScriptAction::Tick(dt) => level.tick(dt).map(drop),
            ScriptAction::Confirm => level.confirm_minigame().map(drop),
            ScriptAction::Pause => level.toggle_pause().map(drop),
            ScriptAction::Validate => level.validate_path_requested().map(drop),
        };
        result.map_err(|source| CliError::Level {
            line: step.line,
            source,
        })?;
    }
    Ok((steps.len(), 0))
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::io::Cursor;
/// # use beaconet_cli::cli::{PlaySummary, render_summary};
/// # use beaconet_core::GameMode;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = PlaySummary {
///     events: Vec::new(),
///     mode: GameMode::Normal,
///     outcome: None,
///     edges: Vec::new(),
///     executed: 0,
///     skipped: 0,
///     violations: Vec::new(),
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner())?;
/// assert!(text.contains("verdict: undecided"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &PlaySummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "events: {}", summary.events.len())?;
    for event in &summary.events {
        writeln!(writer, "  {event}")?;
    }
    writeln!(writer, "mode: {}", summary.mode)?;
    match &summary.outcome {
        None => writeln!(writer, "verdict: undecided")?,
        Some(outcome) => {
            let verdict = match outcome.verdict {
                Verdict::Won => "won",
                Verdict::Lost => "lost",
            };
            let reason = match &outcome.reason {
                EndReason::Validated(report) => format!(
                    "validated, {} of {} reached",
                    report.visited.len(),
                    report.occupied
                ),
                EndReason::Timeout => "timeout".to_owned(),
            };
            writeln!(writer, "verdict: {verdict} ({reason})")?;
        }
    }
    let edges: Vec<String> = summary
        .edges
        .iter()
        .map(|(left, right)| format!("{left}-{right}"))
        .collect();
    writeln!(writer, "edges: [{}]", edges.join(", "))?;
    writeln!(
        writer,
        "lines: {} executed, {} skipped",
        summary.executed, summary.skipped
    )?;
    if summary.violations.is_empty() {
        writeln!(writer, "invariants: ok")?;
    } else {
        writeln!(writer, "invariants: {} violation(s)", summary.violations.len())?;
        for violation in &summary.violations {
            writeln!(writer, "  {violation}")?;
        }
    }
    Ok(())
}
