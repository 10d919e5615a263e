//! Pure graph analysis over the feature store.
//!
//! Every function in this module tree is a side-effect-free computation
//! over the locked inner store state; the trait implementation acquires
//! the store lock once per operation and delegates here, so each result
//! reflects one consistent snapshot of the graph.
//!
//! Component layout:
//!
//! - [`cycles`] - cycle detection and enumeration
//! - [`ready`] - derived READY / BLOCKED sets
//! - [`topo`] - deterministic topological ordering (Kahn's algorithm)
//! - [`critical`] - critical path and priority scores
//! - [`plan`] - sequential / wave execution plans and next-feature choice
//!
//! Planning operations ([`topo`], [`critical`], [`plan`]) require an
//! acyclic graph; callers check [`cycles::ensure_acyclic`] first and fail
//! fast with a [`CycleError`](crate::error::CycleError) rather than
//! produce a partial ordering. Nothing is cached across mutations: graphs
//! stay in the hundreds-of-nodes range, so recomputing on read buys
//! correctness cheaply.

pub(crate) mod critical;
pub(crate) mod cycles;
pub(crate) mod plan;
pub(crate) mod ready;
pub(crate) mod topo;
