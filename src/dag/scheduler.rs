// src/dag/scheduler.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::model::BuildFile;
use crate::dag::graph::TargetGraph;
use crate::dag::listener::{BuildEvent, BuildListener};
use crate::dag::order::topological_order;
use crate::dag::target::{Target, TargetName, TargetState};
use crate::errors::{Result, TargetdagError};
use crate::exec::TargetRunner;

/// Who is asking for targets to be brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// A build invocation from the host (command line, embedding program).
    TopLevel,
    /// A `depends` request issued from inside the running body of `owner`.
    Nested { owner: &'a str },
}

/// Scheduler for one build: the immutable target graph plus per-build state.
///
/// It is responsible for:
/// - resolving requested targets into a dependency-respecting order
/// - running each target body at most once
/// - rejecting requests that would need an in-progress target again
/// - reporting progress to registered [`BuildListener`]s
pub struct Scheduler {
    graph: TargetGraph,
    states: HashMap<TargetName, TargetState>,
    /// Targets whose bodies are currently running, outermost first.
    in_progress: Vec<TargetName>,
    /// Targets that reached `Done`, in completion order.
    executed: Vec<TargetName>,
    listeners: Vec<Box<dyn BuildListener>>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("graph", &self.graph)
            .field("states", &self.states)
            .field("in_progress", &self.in_progress)
            .field("executed", &self.executed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new(graph: TargetGraph) -> Self {
        Self {
            graph,
            states: HashMap::new(),
            in_progress: Vec::new(),
            executed: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Construct a scheduler from a validated [`BuildFile`].
    pub fn from_build_file(build: &BuildFile) -> Self {
        Self::new(TargetGraph::from_build_file(build))
    }

    pub fn add_listener(&mut self, listener: impl BuildListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Current state of a target. Unknown targets report `None`.
    pub fn state_of(&self, target: &str) -> Option<TargetState> {
        if !self.graph.contains(target) {
            return None;
        }
        Some(self.states.get(target).copied().unwrap_or_default())
    }

    /// Whether the target's body has completed in this build.
    pub fn is_executed(&self, target: &str) -> bool {
        self.state_of(target).is_some_and(TargetState::is_executed)
    }

    /// Targets that completed in this build, in completion order.
    pub fn executed_targets(&self) -> &[TargetName] {
        &self.executed
    }

    /// Targets whose bodies are running right now, outermost first.
    pub fn in_progress(&self) -> &[TargetName] {
        &self.in_progress
    }

    /// Bring each of `names` up to date, in order.
    ///
    /// Each name is resolved with [`topological_order`] and every target in
    /// that order whose body has not run yet is run through `runner`. A target
    /// is marked done as soon as its body returns, so later and nested
    /// requests skip it. The first failure stops everything.
    pub fn execute<R, S>(&mut self, names: &[S], runner: &mut R, request: Request<'_>) -> Result<()>
    where
        R: TargetRunner + ?Sized,
        S: AsRef<str>,
    {
        match request {
            Request::TopLevel => {
                let targets: Vec<TargetName> =
                    names.iter().map(|n| n.as_ref().to_string()).collect();
                info!(?targets, "build started");
                self.emit(BuildEvent::BuildStarted { targets });

                let result = self.execute_names(names, runner);

                match &result {
                    Ok(()) => info!(executed = self.executed.len(), "build succeeded"),
                    Err(err) => error!(error = %err, "build failed"),
                }
                self.emit(BuildEvent::BuildFinished {
                    success: result.is_ok(),
                });
                result
            }
            Request::Nested { owner } => {
                let targets: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
                debug!(owner, ?targets, "nested dependency request");
                self.execute_names(names, runner)
            }
        }
    }

    /// Resolve a `depends` request made from inside the running body of
    /// `owner`.
    ///
    /// For each requested name, in order:
    /// - naming `owner` itself fails with [`TargetdagError::SelfDependency`];
    /// - if `owner` is a (transitive) prerequisite of the requested target,
    ///   completing the request would need `owner` to run again, which fails
    ///   with [`TargetdagError::CircularDependency`];
    /// - otherwise the target is executed as a nested request. Targets that
    ///   already ran in this build are not run again.
    pub fn runtime_depends<R, S>(&mut self, owner: &str, names: &[S], runner: &mut R) -> Result<()>
    where
        R: TargetRunner + ?Sized,
        S: AsRef<str>,
    {
        if self.state_of(owner) != Some(TargetState::InProgress) {
            warn!(owner, "runtime dependency request from a target that is not running");
        }

        for name in names {
            let name = name.as_ref();
            if name == owner {
                return Err(TargetdagError::SelfDependency(owner.to_string()));
            }

            let order = topological_order(name, &self.graph)?;
            let owner_pos = order.iter().position(|t| t == owner);
            let requested_pos = order.iter().position(|t| t == name);

            if let (Some(owner_pos), Some(requested_pos)) = (owner_pos, requested_pos) {
                if owner_pos < requested_pos {
                    let mut chain = order;
                    chain.push(owner.to_string());
                    warn!(
                        owner,
                        target_name = name,
                        ?chain,
                        "runtime dependency would need its owner again"
                    );
                    return Err(TargetdagError::CircularDependency { chain });
                }
            }

            self.execute(&[name], runner, Request::Nested { owner })?;
        }

        Ok(())
    }

    fn execute_names<R, S>(&mut self, names: &[S], runner: &mut R) -> Result<()>
    where
        R: TargetRunner + ?Sized,
        S: AsRef<str>,
    {
        for root in names {
            let root = root.as_ref();
            let order = topological_order(root, &self.graph)?;
            debug!(root, ?order, "resolved execution order");

            for name in order.iter() {
                self.run_target(root, name, runner)?;
            }
        }
        Ok(())
    }

    /// Run a single target from the resolved order of `root`, unless it has
    /// already run.
    fn run_target<R>(&mut self, root: &str, name: &str, runner: &mut R) -> Result<()>
    where
        R: TargetRunner + ?Sized,
    {
        match self.states.get(name).copied().unwrap_or_default() {
            TargetState::Done => {
                debug!(target_name = name, "already executed in this build; skipping");
                self.emit(BuildEvent::TargetSkipped {
                    target: name.to_string(),
                });
                return Ok(());
            }
            TargetState::Failed => {
                return Err(TargetdagError::PreviouslyFailed(name.to_string()));
            }
            TargetState::InProgress => {
                return Err(self.in_progress_cycle(root, name));
            }
            TargetState::Pending => {}
        }

        let target: Arc<Target> = match self.graph.get(name) {
            Some(target) => Arc::clone(target),
            None => {
                return Err(TargetdagError::UnknownTarget {
                    name: name.to_string(),
                    required_by: None,
                });
            }
        };

        let depth = self.in_progress.len();
        self.states.insert(name.to_string(), TargetState::InProgress);
        self.in_progress.push(name.to_string());
        self.emit(BuildEvent::TargetStarted {
            target: name.to_string(),
            depth,
        });
        info!(target_name = name, depth, "executing target");

        let started = Instant::now();
        let outcome = runner.run(&target, self);
        self.in_progress.pop();

        match outcome {
            Ok(()) => {
                let elapsed = started.elapsed();
                self.states.insert(name.to_string(), TargetState::Done);
                self.executed.push(name.to_string());
                debug!(target_name = name, ?elapsed, "target finished");
                self.emit(BuildEvent::TargetFinished {
                    target: name.to_string(),
                    elapsed,
                });
                Ok(())
            }
            Err(err) => {
                self.states.insert(name.to_string(), TargetState::Failed);
                let err = into_build_error(&target, err);
                error!(target_name = name, error = %err, "target failed");
                self.emit(BuildEvent::TargetFailed {
                    target: name.to_string(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Cycle through running bodies: `name` is still running further up the
    /// stack and `root` (requested from inside it) needs it as a prerequisite.
    fn in_progress_cycle(&self, root: &str, name: &str) -> TargetdagError {
        let start = self
            .in_progress
            .iter()
            .position(|t| t == name)
            .unwrap_or(0);
        let mut chain: Vec<String> = self.in_progress[start..].to_vec();
        if root != name && chain.last().map(String::as_str) != Some(root) {
            chain.push(root.to_string());
        }
        chain.push(name.to_string());
        warn!(target_name = name, ?chain, "target is already running further up the build");
        TargetdagError::CircularDependency { chain }
    }

    fn emit(&mut self, event: BuildEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }
}

/// Scheduling errors surfacing from a nested request pass through unchanged,
/// so the host sees the innermost cause. Anything else is a body failure.
fn into_build_error(target: &Target, err: anyhow::Error) -> TargetdagError {
    match err.downcast::<TargetdagError>() {
        Ok(inner) if inner.is_scheduling_error() => inner,
        Ok(inner) => TargetdagError::TargetExecution {
            target: target.name.clone(),
            location: target.location.clone(),
            source: anyhow::Error::new(inner),
        },
        Err(err) => TargetdagError::TargetExecution {
            target: target.name.clone(),
            location: target.location.clone(),
            source: err,
        },
    }
}
