//! Step operation trait and the invocation environment.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{ReductionConfig, Value};
use crate::data::WorkspaceStore;
pub use crate::error::StepFailure;

/// Canonical property names probed on collaborator operations.
///
/// An operation advertises the subset it understands through
/// [`StepOperation::declared_properties`]; the invoker binds a property only
/// when it is declared.
pub mod properties {
    /// Path of the data file a load operation reads.
    pub const FILENAME: &str = "Filename";
    /// Single in-place workspace binding.
    pub const WORKSPACE: &str = "Workspace";
    /// Input side of an input/output workspace pair.
    pub const INPUT_WORKSPACE: &str = "InputWorkspace";
    /// Output side of an input/output workspace pair.
    pub const OUTPUT_WORKSPACE: &str = "OutputWorkspace";
    /// Identity of the shared configuration registry.
    pub const REDUCTION_PROPERTIES: &str = "ReductionProperties";
    /// Beam center abscissa consumed by a correction.
    pub const BEAM_CENTER_X: &str = "BeamCenterX";
    /// Beam center ordinate consumed by a correction.
    pub const BEAM_CENTER_Y: &str = "BeamCenterY";
    /// Beam center abscissa reported by a finder.
    pub const FOUND_BEAM_CENTER_X: &str = "FoundBeamCenterX";
    /// Beam center ordinate reported by a finder.
    pub const FOUND_BEAM_CENTER_Y: &str = "FoundBeamCenterY";
    /// Human-readable message reported by an operation.
    pub const OUTPUT_MESSAGE: &str = "OutputMessage";
    /// Instrument name forwarded to file-locating loaders.
    pub const INSTRUMENT_NAME: &str = "InstrumentName";
    /// Process-info text embedded by the CanSAS writer.
    pub const PROCESS: &str = "Process";
    /// Column separator understood by the ASCII writer.
    pub const SEPARATOR: &str = "Separator";
    /// Comment prefix understood by the ASCII writer.
    pub const COMMENT_INDICATOR: &str = "CommentIndicator";
    /// Whether the ASCII writer emits the X-error column.
    pub const WRITE_X_ERROR: &str = "WriteXError";
}

/// A beam center discovered by a finder step.
///
/// Scoped per correction branch: the sensitivity, sample-transmission and
/// background-transmission centers are resolved independently, never shared.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeamCenter {
    pub x: f64,
    pub y: f64,
}

impl BeamCenter {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Execution environment handed to one step operation.
///
/// Carries the bound parameters, mutable access to the workspace table, the
/// shared configuration (only when the operation declares
/// `ReductionProperties`) and the output map the operation writes into.
pub struct StepInvocation<'a> {
    parameters: IndexMap<String, Value>,
    outputs: IndexMap<String, Value>,
    /// Workspace table the operation reads and mutates.
    pub workspaces: &'a mut WorkspaceStore,
    config: Option<&'a ReductionConfig>,
}

impl<'a> StepInvocation<'a> {
    pub(crate) fn new(
        parameters: IndexMap<String, Value>,
        workspaces: &'a mut WorkspaceStore,
        config: Option<&'a ReductionConfig>,
    ) -> Self {
        Self {
            parameters,
            outputs: IndexMap::new(),
            workspaces,
            config,
        }
    }

    /// All bound parameters, in binding order.
    pub fn parameters(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }

    /// Get a bound parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Get a bound string parameter by name.
    pub fn string_parameter(&self, name: &str) -> Option<&str> {
        self.parameter(name).and_then(Value::as_str)
    }

    /// Get a bound numeric parameter by name.
    pub fn float_parameter(&self, name: &str) -> Option<f64> {
        self.parameter(name).and_then(Value::as_f64)
    }

    /// The shared configuration, present only for context-aware operations.
    pub fn config(&self) -> Option<&ReductionConfig> {
        self.config
    }

    /// Record a declared output value.
    pub fn set_output(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.outputs.insert(name.into(), value.into());
    }

    /// Record the operation's output message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.set_output(properties::OUTPUT_MESSAGE, message.into());
    }

    pub(crate) fn into_outputs(self) -> IndexMap<String, Value> {
        self.outputs
    }
}

/// External processing operation invocable by name.
///
/// This is the collaborator interface: the orchestrator sequences operations
/// and binds their inputs and outputs, but never interprets the data they
/// process.
pub trait StepOperation: Send + Sync {
    /// Operation name used for registry lookup.
    fn name(&self) -> &str;

    /// Parameter and output names this operation declares.
    fn declared_properties(&self) -> &[&str];

    /// Execute against the bound parameters and workspace table.
    fn execute(&self, invocation: &mut StepInvocation<'_>) -> Result<(), StepFailure>;

    /// Check whether a property name is declared.
    fn declares(&self, name: &str) -> bool {
        self.declared_properties().contains(&name)
    }
}
