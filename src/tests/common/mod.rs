//! Common Test Utilities
//!
//! Stat-block fixtures and small lookup helpers shared by the unit and
//! property suites.

pub mod fixtures;

pub use fixtures::*;
