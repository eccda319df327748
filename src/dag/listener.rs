// src/dag/listener.rs

//! Build event listeners.
//!
//! Listeners are registered on a single [`Scheduler`](crate::dag::Scheduler),
//! so their lifetime is the lifetime of one build.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::dag::target::TargetName;

/// Something observable that happened during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A top-level request started.
    BuildStarted { targets: Vec<TargetName> },
    /// A target body is about to run. `depth` is the number of bodies
    /// already running when it starts.
    TargetStarted { target: TargetName, depth: usize },
    /// A target in a resolved order was skipped because it already ran.
    TargetSkipped { target: TargetName },
    TargetFinished { target: TargetName, elapsed: Duration },
    TargetFailed { target: TargetName, message: String },
    /// A top-level request finished.
    BuildFinished { success: bool },
}

pub trait BuildListener: Send {
    fn on_event(&mut self, event: &BuildEvent);
}

/// In-memory listener that keeps every event.
///
/// Clones share the same buffer, so a host can keep one clone and hand
/// another to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct BuildRecorder {
    events: Arc<Mutex<Vec<BuildEvent>>>,
}

impl BuildRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BuildEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Names of targets that finished, in completion order.
    pub fn finished_targets(&self) -> Vec<TargetName> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BuildEvent::TargetFinished { target, .. } => Some(target),
                _ => None,
            })
            .collect()
    }

    /// Total time spent inside finished target bodies, per target.
    ///
    /// Nested bodies are included in their owner's time as well.
    pub fn timings(&self) -> Vec<(TargetName, Duration)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BuildEvent::TargetFinished { target, elapsed } => Some((target, elapsed)),
                _ => None,
            })
            .collect()
    }
}

impl BuildListener for BuildRecorder {
    fn on_event(&mut self, event: &BuildEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
