use std::collections::{HashMap, HashSet};

use anyhow::bail;
use targetdag::dag::{Scheduler, Target};
use targetdag::exec::TargetRunner;

/// A fake target body that:
/// - records the order in which bodies were entered and completed
/// - issues scripted runtime dependency requests while a body runs
/// - fails on demand for selected targets
#[derive(Debug, Default)]
pub struct RecordingRunner {
    started: Vec<String>,
    finished: Vec<String>,
    requests: HashMap<String, Vec<Vec<String>>>,
    failing: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `owner` runs, it asks for `names` through
    /// `Scheduler::runtime_depends`. Several calls queue several requests.
    pub fn with_runtime_request(mut self, owner: &str, names: &[&str]) -> Self {
        self.requests
            .entry(owner.to_string())
            .or_default()
            .push(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Make the body of `target` fail after its runtime requests.
    pub fn failing(mut self, target: &str) -> Self {
        self.failing.insert(target.to_string());
        self
    }

    /// Bodies in the order they were entered.
    pub fn started(&self) -> &[String] {
        &self.started
    }

    /// Bodies in the order they completed successfully.
    pub fn finished(&self) -> &[String] {
        &self.finished
    }

    /// How many times the body of `target` was entered.
    pub fn runs_of(&self, target: &str) -> usize {
        self.started.iter().filter(|t| *t == target).count()
    }
}

impl TargetRunner for RecordingRunner {
    fn run(&mut self, target: &Target, scheduler: &mut Scheduler) -> anyhow::Result<()> {
        self.started.push(target.name.clone());

        let requests = self.requests.get(&target.name).cloned().unwrap_or_default();
        for names in requests {
            scheduler.runtime_depends(&target.name, &names, self)?;
        }

        if self.failing.contains(&target.name) {
            bail!("injected failure in '{}'", target.name);
        }

        self.finished.push(target.name.clone());
        Ok(())
    }
}
