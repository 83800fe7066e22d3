//! Shared test utilities for aiMate
//!
//! - Fixtures: temporary data directories and app construction
//! - TUI terminal testing helpers

pub mod fixtures;
pub mod terminal;
