// src/dag/mod.rs

//! Target graph and scheduling.
//!
//! - [`graph`] holds the read-only mapping from target name to definition.
//! - [`target`] defines targets and their per-build state.
//! - [`order`] computes the depth-first topological order of a target.
//! - [`scheduler`] runs targets at most once per build and handles runtime
//!   dependency requests.
//! - [`listener`] defines build events and the in-memory recorder.

pub mod graph;
pub mod listener;
pub mod order;
pub mod scheduler;
pub mod target;

pub use graph::TargetGraph;
pub use listener::{BuildEvent, BuildListener, BuildRecorder};
pub use order::topological_order;
pub use scheduler::{Request, Scheduler};
pub use target::{Target, TargetName, TargetState};
