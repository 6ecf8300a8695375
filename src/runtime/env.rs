//! Shared execution environment threaded through one orchestration call.

use crate::config::ReductionConfig;
use crate::data::WorkspaceStore;
use crate::error::ReductionError;
use crate::step::{invoke, Bindings, OperationRegistry, ResolvedStep, StepOutcome, StepResolver};

/// Everything one orchestration call threads through its steps: the
/// read-only configuration, the operation registry, and the mutable
/// workspace table.
pub struct ReductionEnv<'a> {
    pub config: &'a ReductionConfig,
    pub operations: &'a OperationRegistry,
    pub workspaces: &'a mut WorkspaceStore,
}

impl<'a> ReductionEnv<'a> {
    pub fn new(
        config: &'a ReductionConfig,
        operations: &'a OperationRegistry,
        workspaces: &'a mut WorkspaceStore,
    ) -> Self {
        Self {
            config,
            operations,
            workspaces,
        }
    }

    /// Resolve an optional role.
    pub fn resolve(&self, role: &str) -> Result<Option<ResolvedStep>, ReductionError> {
        StepResolver::new(self.config, self.operations).resolve(role)
    }

    /// Resolve a role that must be configured.
    pub fn resolve_required(&self, role: &str) -> Result<ResolvedStep, ReductionError> {
        StepResolver::new(self.config, self.operations).resolve_required(role)
    }

    /// Invoke a resolved step with the given bindings.
    pub fn invoke(
        &mut self,
        step: &ResolvedStep,
        bindings: Bindings<'_>,
    ) -> Result<StepOutcome, ReductionError> {
        invoke(step, bindings, self.config, self.workspaces)
    }

    /// Resolve and run a role against one workspace, returning its message.
    ///
    /// Skips silently when the role is not configured. Binds in place unless
    /// the operation declares an input/output pair; `output_workspace`
    /// overrides the output side when given.
    pub fn simple_execution(
        &mut self,
        role: &str,
        workspace: &str,
        output_workspace: Option<&str>,
    ) -> Result<String, ReductionError> {
        let Some(step) = self.resolve(role)? else {
            return Ok(String::new());
        };
        let output = output_workspace.unwrap_or(workspace);
        let outcome = self.invoke(&step, Bindings::pair(workspace, output))?;

        let mut message = String::new();
        if step.capabilities.emits_message {
            message.push_str(&outcome.message);
            message.push('\n');
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReductionConfig, StepDescriptor};
    use crate::data::{RunInfo, Workspace};
    use crate::step::properties;
    use crate::step::testing::{calls, new_call_log, MockOperation};

    #[test]
    fn test_simple_execution_skips_absent_role() {
        let config = ReductionConfig::new("run");
        let operations = OperationRegistry::new();
        let mut store = WorkspaceStore::new();
        let mut env = ReductionEnv::new(&config, &operations, &mut store);

        let message = env.simple_execution("GeometryAlgorithm", "sample", None).unwrap();

        assert!(message.is_empty());
    }

    #[test]
    fn test_simple_execution_runs_and_reports() {
        let log = new_call_log();
        let mut operations = OperationRegistry::new();
        operations.register(
            MockOperation::new("Geometry")
                .declaring(&[properties::WORKSPACE, properties::OUTPUT_MESSAGE])
                .with_message("geometry corrected")
                .logged(&log),
        );
        let mut config = ReductionConfig::new("run");
        config.set_step("GeometryAlgorithm", StepDescriptor::new("Geometry"));
        let mut store = WorkspaceStore::new();
        store.insert("sample", Workspace::filled(1, 2, 1.0, RunInfo::default()));
        let mut env = ReductionEnv::new(&config, &operations, &mut store);

        let message = env.simple_execution("GeometryAlgorithm", "sample", None).unwrap();

        assert_eq!(message, "geometry corrected\n");
        assert_eq!(calls(&log), ["Geometry"]);
    }
}
