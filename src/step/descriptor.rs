//! Step resolution and capability probing.

use std::sync::Arc;

use crate::config::{ReductionConfig, StepDescriptor};
use crate::error::ReductionError;

use super::registry::OperationRegistry;
use super::traits::{properties, StepOperation};

/// Optional collaborator properties discovered once at resolution time.
///
/// The probe only inspects declared property names; a missing capability is
/// never an error, it just changes what the invoker binds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Operation can consult the shared configuration registry.
    pub accepts_reduction_properties: bool,

    /// Operation accepts `BeamCenterX`/`BeamCenterY` inputs.
    pub accepts_beam_center: bool,

    /// Operation binds through an `InputWorkspace`/`OutputWorkspace` pair
    /// rather than a single in-place `Workspace`.
    pub uses_io_pair: bool,

    /// Operation reports an `OutputMessage`.
    pub emits_message: bool,

    /// Operation produces `FoundBeamCenterX`/`FoundBeamCenterY`.
    pub emits_beam_center: bool,
}

impl Capabilities {
    /// Probe an operation's declared properties.
    pub fn probe(operation: &dyn StepOperation) -> Self {
        Self {
            accepts_reduction_properties: operation.declares(properties::REDUCTION_PROPERTIES),
            accepts_beam_center: operation.declares(properties::BEAM_CENTER_X)
                && operation.declares(properties::BEAM_CENTER_Y),
            uses_io_pair: operation.declares(properties::INPUT_WORKSPACE)
                && operation.declares(properties::OUTPUT_WORKSPACE),
            emits_message: operation.declares(properties::OUTPUT_MESSAGE),
            emits_beam_center: operation.declares(properties::FOUND_BEAM_CENTER_X)
                && operation.declares(properties::FOUND_BEAM_CENTER_Y),
        }
    }
}

/// A resolved step: configured descriptor, implementation and capabilities.
#[derive(Clone)]
pub struct ResolvedStep {
    /// Role this step was resolved under.
    pub role: String,

    /// Configured operation name and fixed parameters.
    pub descriptor: StepDescriptor,

    /// Implementation looked up from the operation registry.
    pub operation: Arc<dyn StepOperation>,

    /// Capabilities probed from the implementation.
    pub capabilities: Capabilities,
}

impl std::fmt::Debug for ResolvedStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedStep")
            .field("role", &self.role)
            .field("descriptor", &self.descriptor)
            .field("operation", &self.operation.name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Resolves configured roles against the operation registry.
pub struct StepResolver<'a> {
    config: &'a ReductionConfig,
    operations: &'a OperationRegistry,
}

impl<'a> StepResolver<'a> {
    /// Create a resolver over a configuration and an operation registry.
    pub fn new(config: &'a ReductionConfig, operations: &'a OperationRegistry) -> Self {
        Self { config, operations }
    }

    /// Resolve an optional role.
    ///
    /// Returns `Ok(None)` when the role is not configured as a step: absence
    /// is the mechanism making every correction stage except load optional.
    /// A configured role naming an unregistered operation is an error.
    pub fn resolve(&self, role: &str) -> Result<Option<ResolvedStep>, ReductionError> {
        let Some(descriptor) = self.config.step(role) else {
            return Ok(None);
        };
        let operation = self.operations.get(&descriptor.operation).ok_or_else(|| {
            ReductionError::UnknownOperation {
                role: role.to_string(),
                operation: descriptor.operation.clone(),
            }
        })?;
        let capabilities = Capabilities::probe(operation.as_ref());
        Ok(Some(ResolvedStep {
            role: role.to_string(),
            descriptor: descriptor.clone(),
            operation,
            capabilities,
        }))
    }

    /// Resolve a role that must be configured.
    pub fn resolve_required(&self, role: &str) -> Result<ResolvedStep, ReductionError> {
        self.resolve(role)?.ok_or_else(|| ReductionError::MissingRole {
            role: role.to_string(),
        })
    }
}
