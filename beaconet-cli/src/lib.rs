//! Support library for the beaconet CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and unit tests
//! can replay scripts without forking a subprocess.

pub mod cli;
pub mod logging;
