//! Shared test utilities used across beaconet crates.

pub mod tracing;
