//! Trellis - a dependency-graph scheduling engine.
//!
//! Trellis schedules interdependent units of work ("features") for an
//! autonomous execution loop. It builds a dependency graph over features,
//! validates it, computes which features are currently eligible to run,
//! ranks them by priority, finds the critical path, and emits execution
//! plans - a single deterministic order, or a sequence of concurrent
//! waves - that an outer control loop consumes to decide what to work on
//! next.
//!
//! The crate provides both a library (the [`store::FeatureStore`] trait and
//! its in-memory implementation) and a thin CLI binary over a JSONL-backed
//! feature list.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod error;
pub mod output;
pub mod store;

// Public CLI modules (needed by binary)
pub mod app;
pub mod cli;

// Internal graph algorithms; the public surface is the store trait.
pub(crate) mod analysis;
