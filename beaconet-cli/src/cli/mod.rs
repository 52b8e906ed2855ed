//! Command-line interface for replaying scripted play against a level.
//!
//! The `play` command builds a level from flags, feeds it the inbound events
//! listed in a script file, and reports the outbound events and the verdict.

mod commands;
mod script;

pub use commands::{Cli, CliError, Command, PlayCommand, PlaySummary, render_summary, run_cli};
pub use script::{ScriptAction, ScriptError, ScriptStep, parse_script, parse_seconds};

#[cfg(test)]
mod test_helpers;
