//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::commands::run_play;
use super::{CliError, PlayCommand};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_script(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

pub(super) fn play_expecting_error(command: PlayCommand, panic_msg: &str) -> CliError {
    match run_play(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

/// Script lines that place and chain four beacons.
pub(super) const CHAIN: &str = "\
click 0
click 1
click 2
click 3
click 0
click 1
click 1
click 2
click 2
click 3
";
