// src/exec/steps.rs

//! Production target body: interprets the steps declared in the build file.

use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::config::model::{BuildFile, Step};
use crate::dag::{Scheduler, Target};
use crate::exec::properties::{PROJECT_NAME, Properties, TARGET_NAME};
use crate::exec::runner::TargetRunner;

/// Runs a target's steps in order against a shared set of build properties.
#[derive(Debug, Clone)]
pub struct StepRunner {
    properties: Properties,
}

impl StepRunner {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }

    /// Seed properties from `[properties]`, then apply `overrides`
    /// (e.g. `-D name=value` from the command line).
    pub fn from_build_file(build: &BuildFile, overrides: &[(String, String)]) -> Result<Self> {
        let mut properties = Properties::new()?;
        properties.set(PROJECT_NAME, build.project_name());
        properties.extend(build.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        properties.extend(overrides.iter().cloned());
        Ok(Self::new(properties))
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    fn run_step(&mut self, target: &Target, step: &Step, scheduler: &mut Scheduler) -> Result<()> {
        // Nested requests may have run other targets since the last step.
        self.properties.set(TARGET_NAME, target.name.clone());

        match step {
            Step::Exec(command) => {
                let command = self.properties.expand(command)?;
                run_shell(&target.name, &command)
            }
            Step::Echo(message) => {
                let message = self.properties.expand(message)?;
                info!(target_name = %target.name, "{message}");
                println!("[{}] {}", target.name, message);
                Ok(())
            }
            Step::Property { name, value } => {
                let value = self.properties.expand(value)?;
                debug!(target_name = %target.name, property = %name, %value, "setting property");
                self.properties.set(name.clone(), value);
                Ok(())
            }
            Step::Depends(requested) => {
                scheduler.runtime_depends(&target.name, requested, self)?;
                Ok(())
            }
        }
    }
}

impl TargetRunner for StepRunner {
    fn run(&mut self, target: &Target, scheduler: &mut Scheduler) -> Result<()> {
        for (index, step) in target.steps.iter().enumerate() {
            self.run_step(target, step, scheduler).with_context(|| {
                format!(
                    "step {} ({}) of target '{}'",
                    index + 1,
                    step.kind(),
                    target.name
                )
            })?;
        }
        Ok(())
    }
}

/// Run `command` through the platform shell, inheriting stdio.
fn run_shell(target: &str, command: &str) -> Result<()> {
    info!(target_name = target, cmd = %command, "running command");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };

    let status = cmd
        .status()
        .with_context(|| format!("spawning `{command}` for target '{target}'"))?;

    if !status.success() {
        match status.code() {
            Some(code) => bail!("command `{command}` exited with status {code}"),
            None => bail!("command `{command}` was terminated by a signal"),
        }
    }

    debug!(target_name = target, "command succeeded");
    Ok(())
}
