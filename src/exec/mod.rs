// src/exec/mod.rs

//! Target body execution.
//!
//! - [`runner`] provides the `TargetRunner` trait the scheduler calls for each
//!   target body.
//! - [`steps`] is the production `StepRunner`, which interprets the steps
//!   from the build file (`exec`, `echo`, `property`, `depends`).
//! - [`properties`] holds build properties and `${name}` expansion.

pub mod properties;
pub mod runner;
pub mod steps;

pub use properties::Properties;
pub use runner::TargetRunner;
pub use steps::StepRunner;
