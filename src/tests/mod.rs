//! Crate-level test suites
//!
//! - `common`: shared stat-block fixtures
//! - `unit`: fixture-driven parser and dice-chain tests
//! - `property`: proptest invariants

mod common;
mod property;
mod unit;
