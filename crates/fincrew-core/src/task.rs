//! Parameterized task templates
//!
//! Task descriptions carry `{name}` placeholders that are filled from a
//! [`TaskParams`] mapping when the engine dispatches the task.

use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use crate::role::AgentRole;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Named parameters used for template interpolation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskParams {
    values: BTreeMap<String, String>,
}

impl TaskParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterate over parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every known `{name}` placeholder in `template`
    ///
    /// Unknown placeholders are left untouched.
    pub fn interpolate(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                self.get(&caps[1])
                    .map_or_else(|| caps[0].to_string(), str::to_string)
            })
            .into_owned()
    }
}

/// Uninstantiated unit of work bound to one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskTemplate {
    /// Stable identifier
    pub id: &'static str,
    /// Id of the [`AgentRole`] that owns the task
    pub owner: &'static str,
    /// Description with `{name}` placeholders
    pub description: &'static str,
    /// Expected output with `{name}` placeholders
    pub expected_output: &'static str,
}

impl TaskTemplate {
    /// Fill the template for one run
    pub fn instantiate(&self, agent: Arc<AgentRole>, params: &TaskParams) -> Task {
        Task {
            id: self.id,
            agent,
            description: params.interpolate(self.description),
            expected_output: params.interpolate(self.expected_output),
        }
    }
}

/// A task ready for dispatch
#[derive(Debug, Clone)]
pub struct Task {
    /// Template identifier
    pub id: &'static str,
    /// Role executing the task
    pub agent: Arc<AgentRole>,
    /// Interpolated description
    pub description: String,
    /// Interpolated expected output
    pub expected_output: String,
}
