//! Operation registry for collaborator lookup by name.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::StepOperation;

/// Registry of invocable operations, keyed by name.
///
/// Step descriptors refer to operations by name; this table supplies the
/// implementation behind each name. Registered once before orchestration,
/// looked up for every resolved step.
pub struct OperationRegistry {
    operations: HashMap<String, Arc<dyn StepOperation>>,
}

impl OperationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Register an operation under its own name.
    pub fn register<O: StepOperation + 'static>(&mut self, operation: O) {
        self.operations
            .insert(operation.name().to_string(), Arc::new(operation));
    }

    /// Register an operation from an Arc.
    pub fn register_arc(&mut self, operation: Arc<dyn StepOperation>) {
        self.operations
            .insert(operation.name().to_string(), operation);
    }

    /// Get an operation by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn StepOperation>> {
        self.operations.get(name).cloned()
    }

    /// Check if an operation is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Names of all registered operations, sorted.
    pub fn operation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Remove an operation.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn StepOperation>> {
        self.operations.remove(name)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
