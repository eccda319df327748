// src/exec/properties.rs

//! Build properties and `${name}` expansion.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use regex::Regex;

/// Property names available to every target body.
pub const PROJECT_NAME: &str = "project.name";
pub const TARGET_NAME: &str = "target.name";

/// Name → value map with `${name}` substitution.
#[derive(Debug, Clone)]
pub struct Properties {
    values: BTreeMap<String, String>,
    reference: Regex,
}

impl Properties {
    pub fn new() -> Result<Self> {
        Ok(Self {
            values: BTreeMap::new(),
            reference: Regex::new(r"\$\{([^}]*)\}")?,
        })
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in entries {
            self.set(name, value);
        }
    }

    /// Replace every `${name}` in `text` with the property value.
    ///
    /// Referencing an undefined property is an error. Expansion is a single
    /// pass; values are not expanded again.
    pub fn expand(&self, text: &str) -> Result<String> {
        for caps in self.reference.captures_iter(text) {
            let name = caps[1].trim();
            if name.is_empty() {
                bail!("empty property reference in '{text}'");
            }
            if !self.values.contains_key(name) {
                bail!("property '{name}' is not defined");
            }
        }

        let expanded = self
            .reference
            .replace_all(text, |caps: &regex::Captures| {
                self.values
                    .get(caps[1].trim())
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned();

        Ok(expanded)
    }
}
