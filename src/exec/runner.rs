// src/exec/runner.rs

//! Pluggable target-body abstraction.
//!
//! The scheduler never knows what a target *does*; it hands each target to a
//! `TargetRunner` at most once per build.
//!
//! - [`StepRunner`](crate::exec::StepRunner) is the production runner that
//!   interprets the steps from the build file.
//! - Tests can provide their own runner that, for example, records which
//!   targets ran and issues scripted runtime dependency requests.

use crate::dag::{Scheduler, Target};

/// Body callback invoked by the [`Scheduler`].
///
/// The scheduler passes itself back in so that a body can issue runtime
/// dependency requests through [`Scheduler::runtime_depends`] while it is
/// running.
pub trait TargetRunner {
    fn run(&mut self, target: &Target, scheduler: &mut Scheduler) -> anyhow::Result<()>;
}

impl<F> TargetRunner for F
where
    F: FnMut(&Target, &mut Scheduler) -> anyhow::Result<()>,
{
    fn run(&mut self, target: &Target, scheduler: &mut Scheduler) -> anyhow::Result<()> {
        self(target, scheduler)
    }
}
