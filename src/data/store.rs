//! Named workspace table shared by every pipeline step.

use std::collections::HashMap;

use thiserror::Error;

use super::workspace::Workspace;

/// Errors raised by workspace table operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkspaceError {
    /// The named workspace does not exist in the table.
    #[error("workspace `{0}` does not exist")]
    Missing(String),

    /// Element-wise arithmetic between incompatible shapes.
    #[error("workspace shape mismatch: `{target}` is {target_shape:?}, `{source_name}` is {source_shape:?}")]
    ShapeMismatch {
        target: String,
        target_shape: (usize, usize),
        source_name: String,
        source_shape: (usize, usize),
    },
}

/// Named table of workspaces, mutated by exactly one step at a time.
///
/// This is the injected form of the process-wide dataset registry: the
/// orchestrator threads it through the call chain rather than reaching for
/// ambient global state, so each dataset's writer is traceable per call.
#[derive(Debug, Default)]
pub struct WorkspaceStore {
    table: HashMap<String, Workspace>,
}

impl WorkspaceStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Insert a workspace under a name, replacing any previous holder.
    pub fn insert(&mut self, name: impl Into<String>, workspace: Workspace) {
        self.table.insert(name.into(), workspace);
    }

    /// Get a workspace by name.
    pub fn get(&self, name: &str) -> Option<&Workspace> {
        self.table.get(name)
    }

    /// Get a mutable workspace by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Workspace> {
        self.table.get_mut(name)
    }

    /// Get a workspace by name, failing when absent.
    pub fn require(&self, name: &str) -> Result<&Workspace, WorkspaceError> {
        self.table
            .get(name)
            .ok_or_else(|| WorkspaceError::Missing(name.to_string()))
    }

    /// Get a mutable workspace by name, failing when absent.
    pub fn require_mut(&mut self, name: &str) -> Result<&mut Workspace, WorkspaceError> {
        self.table
            .get_mut(name)
            .ok_or_else(|| WorkspaceError::Missing(name.to_string()))
    }

    /// Check if a workspace exists.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Remove a workspace, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<Workspace> {
        self.table.remove(name)
    }

    /// Rename a workspace, replacing any previous holder of the new name.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<(), WorkspaceError> {
        let workspace = self
            .table
            .remove(from)
            .ok_or_else(|| WorkspaceError::Missing(from.to_string()))?;
        self.table.insert(to.into(), workspace);
        Ok(())
    }

    /// Add `source` counts into `target`, element-wise.
    ///
    /// Run metadata is left untouched on both sides; accumulating metadata
    /// totals is the caller's responsibility.
    pub fn accumulate(&mut self, target: &str, source: &str) -> Result<(), WorkspaceError> {
        let source_counts = self.require(source)?.counts().clone();
        let target_ws = self.require_mut(target)?;
        if target_ws.shape() != source_counts.dim() {
            return Err(WorkspaceError::ShapeMismatch {
                target: target.to_string(),
                target_shape: target_ws.shape(),
                source_name: source.to_string(),
                source_shape: source_counts.dim(),
            });
        }
        *target_ws.counts_mut() += &source_counts;
        Ok(())
    }

    /// Subtract `source` counts from `target`, element-wise.
    pub fn subtract(&mut self, target: &str, source: &str) -> Result<(), WorkspaceError> {
        let source_counts = self.require(source)?.counts().clone();
        let target_ws = self.require_mut(target)?;
        if target_ws.shape() != source_counts.dim() {
            return Err(WorkspaceError::ShapeMismatch {
                target: target.to_string(),
                target_shape: target_ws.shape(),
                source_name: source.to_string(),
                source_shape: source_counts.dim(),
            });
        }
        *target_ws.counts_mut() -= &source_counts;
        Ok(())
    }

    /// Number of workspaces in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Names of all workspaces, sorted for deterministic listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RunInfo;

    fn store_with(entries: &[(&str, f64)]) -> WorkspaceStore {
        let mut store = WorkspaceStore::new();
        for (name, value) in entries {
            store.insert(*name, Workspace::filled(2, 3, *value, RunInfo::new(10.0, 5.0)));
        }
        store
    }

    #[test]
    fn test_accumulate_adds_counts_only() {
        let mut store = store_with(&[("sample", 2.0), ("other", 3.0)]);

        store.accumulate("sample", "other").unwrap();

        let sample = store.get("sample").unwrap();
        assert_eq!(sample.counts()[[0, 0]], 5.0);
        assert_eq!(sample.counts()[[1, 2]], 5.0);
        // Metadata is not merged by counts accumulation.
        assert_eq!(sample.run().monitor, 10.0);
    }

    #[test]
    fn test_subtract() {
        let mut store = store_with(&[("sample", 5.0), ("background", 2.0)]);

        store.subtract("sample", "background").unwrap();

        assert_eq!(store.get("sample").unwrap().counts()[[1, 1]], 3.0);
        assert_eq!(store.get("background").unwrap().counts()[[0, 0]], 2.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let mut store = store_with(&[("sample", 1.0)]);
        store.insert("odd", Workspace::filled(1, 7, 1.0, RunInfo::default()));

        let err = store.accumulate("sample", "odd").unwrap_err();
        assert!(matches!(err, WorkspaceError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_missing_workspace() {
        let mut store = store_with(&[("sample", 1.0)]);

        let err = store.subtract("sample", "nope").unwrap_err();
        assert_eq!(err, WorkspaceError::Missing("nope".to_string()));
    }

    #[test]
    fn test_rename_replaces_holder() {
        let mut store = store_with(&[("a", 1.0), ("b", 2.0)]);

        store.rename("a", "b").unwrap();

        assert!(!store.contains("a"));
        assert_eq!(store.get("b").unwrap().counts()[[0, 0]], 1.0);
        assert_eq!(store.len(), 1);
    }
}
