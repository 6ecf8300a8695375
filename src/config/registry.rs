//! Role-keyed configuration registry for one reduction run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::Value;

/// A configured processing operation: its name plus fixed parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Name of the operation to invoke.
    pub operation: String,

    /// Fixed parameters applied before any workspace binding.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
}

impl StepDescriptor {
    /// Create a descriptor with no fixed parameters.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            parameters: IndexMap::new(),
        }
    }

    /// Add a fixed parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// A registry entry: either a step descriptor or a scalar value.
///
/// Deserializes untagged: a JSON object with an `operation` field becomes a
/// step, anything else a scalar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Definition {
    Step(StepDescriptor),
    Scalar(Value),
}

impl Definition {
    /// Get the step descriptor, if this entry is one.
    pub fn as_step(&self) -> Option<&StepDescriptor> {
        match self {
            Definition::Step(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Get the scalar value, if this entry is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Definition::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl From<StepDescriptor> for Definition {
    fn from(descriptor: StepDescriptor) -> Self {
        Definition::Step(descriptor)
    }
}

impl From<Value> for Definition {
    fn from(value: Value) -> Self {
        Definition::Scalar(value)
    }
}

/// Named role-to-definition store, built once per run and read-only after.
///
/// At most one definition per role: a later write replaces the earlier one.
/// Entries are never removed while a run is in flight.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    name: String,
    entries: IndexMap<String, Definition>,
}

impl ReductionConfig {
    /// Create an empty registry with the given identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Build a registry from a JSON object of role keys to definitions.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, serde_json::Error> {
        let entries: IndexMap<String, Definition> = serde_json::from_str(json)?;
        Ok(Self {
            name: name.into(),
            entries,
        })
    }

    /// Identity of this registry, injected into context-aware steps.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether a role is configured.
    pub fn contains(&self, role: &str) -> bool {
        self.entries.contains_key(role)
    }

    /// Set a scalar value for a role. Last write wins.
    pub fn set_value(&mut self, role: impl Into<String>, value: impl Into<Value>) {
        self.entries
            .insert(role.into(), Definition::Scalar(value.into()));
    }

    /// Set a step descriptor for a role. Last write wins.
    pub fn set_step(&mut self, role: impl Into<String>, descriptor: StepDescriptor) {
        self.entries
            .insert(role.into(), Definition::Step(descriptor));
    }

    /// Get the raw definition for a role.
    pub fn definition(&self, role: &str) -> Option<&Definition> {
        self.entries.get(role)
    }

    /// Get the scalar value for a role, if configured as one.
    pub fn scalar(&self, role: &str) -> Option<&Value> {
        self.definition(role).and_then(Definition::as_scalar)
    }

    /// Get the step descriptor for a role, if configured as one.
    pub fn step(&self, role: &str) -> Option<&StepDescriptor> {
        self.definition(role).and_then(Definition::as_step)
    }

    /// Get the string content of a scalar role.
    pub fn string_value(&self, role: &str) -> Option<&str> {
        self.scalar(role).and_then(Value::as_str)
    }

    /// Iterate over configured role keys, in insertion order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of configured roles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no roles are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
