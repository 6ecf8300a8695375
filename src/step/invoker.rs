//! Binding and execution of resolved steps.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{ReductionConfig, Value};
use crate::data::WorkspaceStore;
use crate::error::ReductionError;

use super::descriptor::ResolvedStep;
use super::traits::{properties, BeamCenter, StepInvocation};

/// Workspace names and auxiliary inputs bound for one invocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bindings<'a> {
    /// Workspace the step reads. Also written when no output is given.
    pub input: Option<&'a str>,

    /// Workspace the step writes, for operations using an in/out pair.
    pub output: Option<&'a str>,

    /// Beam center injected when the operation accepts one.
    pub beam_center: Option<BeamCenter>,
}

impl<'a> Bindings<'a> {
    /// No workspace binding (beam finders, loaders, writers).
    pub fn none() -> Self {
        Self::default()
    }

    /// Bind one workspace read and written in place.
    pub fn in_place(workspace: &'a str) -> Self {
        Self {
            input: Some(workspace),
            output: Some(workspace),
            beam_center: None,
        }
    }

    /// Bind separate input and output workspaces.
    pub fn pair(input: &'a str, output: &'a str) -> Self {
        Self {
            input: Some(input),
            output: Some(output),
            beam_center: None,
        }
    }

    /// Attach a beam center to inject when accepted.
    pub fn with_beam_center(mut self, beam_center: Option<BeamCenter>) -> Self {
        self.beam_center = beam_center;
        self
    }
}

/// Outputs captured from one step invocation.
#[derive(Debug, Default)]
pub struct StepOutcome {
    /// Declared named outputs the operation produced.
    pub outputs: IndexMap<String, Value>,

    /// The operation's message, empty when it declares none.
    pub message: String,
}

impl StepOutcome {
    /// Beam center reported through `FoundBeamCenterX`/`FoundBeamCenterY`.
    pub fn found_beam_center(&self) -> Option<BeamCenter> {
        let x = self.outputs.get(properties::FOUND_BEAM_CENTER_X)?.as_f64()?;
        let y = self.outputs.get(properties::FOUND_BEAM_CENTER_Y)?.as_f64()?;
        Some(BeamCenter::new(x, y))
    }
}

/// Execute one resolved step against the bound workspaces.
///
/// Binds, in order: the descriptor's fixed parameters, the workspace names
/// (in/out pair when the operation declares one, single in-place `Workspace`
/// otherwise), the registry identity for context-aware operations, and the
/// beam center when one is supplied and accepted. A failing operation maps
/// to [`ReductionError::StepFailed`] tagged with the role; there is no retry
/// and no partial result.
pub fn invoke(
    step: &ResolvedStep,
    bindings: Bindings<'_>,
    config: &ReductionConfig,
    workspaces: &mut WorkspaceStore,
) -> Result<StepOutcome, ReductionError> {
    let mut parameters = step.descriptor.parameters.clone();

    if let Some(input) = bindings.input {
        if step.capabilities.uses_io_pair {
            parameters.insert(properties::INPUT_WORKSPACE.to_string(), Value::from(input));
            let output = bindings.output.unwrap_or(input);
            parameters.insert(properties::OUTPUT_WORKSPACE.to_string(), Value::from(output));
        } else {
            parameters.insert(properties::WORKSPACE.to_string(), Value::from(input));
        }
    }

    if step.capabilities.accepts_reduction_properties {
        parameters.insert(
            properties::REDUCTION_PROPERTIES.to_string(),
            Value::from(config.name()),
        );
    }

    if let Some(center) = bindings.beam_center {
        if step.capabilities.accepts_beam_center {
            parameters.insert(properties::BEAM_CENTER_X.to_string(), Value::from(center.x));
            parameters.insert(properties::BEAM_CENTER_Y.to_string(), Value::from(center.y));
        }
    }

    debug!(
        role = step.role.as_str(),
        operation = step.operation.name(),
        "invoking step"
    );

    let shared_config = step
        .capabilities
        .accepts_reduction_properties
        .then_some(config);
    let mut invocation = StepInvocation::new(parameters, workspaces, shared_config);

    step.operation
        .execute(&mut invocation)
        .map_err(|source| ReductionError::StepFailed {
            role: step.role.clone(),
            operation: step.operation.name().to_string(),
            source,
        })?;

    let outputs = invocation.into_outputs();
    let message = if step.capabilities.emits_message {
        outputs
            .get(properties::OUTPUT_MESSAGE)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    } else {
        String::new()
    };

    Ok(StepOutcome { outputs, message })
}
