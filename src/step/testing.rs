//! Mock collaborator operations shared by the pipeline tests.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use crate::config::Value;
use crate::data::{RunInfo, Workspace};

use super::traits::{properties, StepFailure, StepInvocation, StepOperation};

/// Shared record of operation names, in execution order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Shared record of the parameter maps an operation was invoked with.
pub type ParameterCapture = Arc<Mutex<Vec<IndexMap<String, Value>>>>;

pub fn new_capture() -> ParameterCapture {
    Arc::new(Mutex::new(Vec::new()))
}

/// Parameters of the most recent captured invocation.
pub fn captured_parameters(capture: &ParameterCapture) -> IndexMap<String, Value> {
    capture.lock().unwrap().last().cloned().unwrap_or_default()
}

/// Configurable mock operation.
///
/// Declares exactly the properties it is built with, optionally mutates the
/// bound workspace, reports a message or a found beam center, and can record
/// its invocations for order and binding assertions.
pub struct MockOperation {
    name: String,
    declared: Vec<&'static str>,
    message: Option<String>,
    beam_center: Option<(f64, f64)>,
    delta: Option<f64>,
    fail: bool,
    log: Option<CallLog>,
    capture: Option<ParameterCapture>,
}

impl MockOperation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            declared: Vec::new(),
            message: None,
            beam_center: None,
            delta: None,
            fail: false,
            log: None,
            capture: None,
        }
    }

    /// Set the declared property names.
    pub fn declaring(mut self, names: &[&'static str]) -> Self {
        self.declared = names.to_vec();
        self
    }

    /// Report this message through `OutputMessage` when declared.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Report this beam center through `FoundBeamCenterX`/`FoundBeamCenterY`.
    pub fn with_beam_center(mut self, x: f64, y: f64) -> Self {
        self.beam_center = Some((x, y));
        self
    }

    /// Add `delta` to every count of the bound workspace.
    pub fn adding(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Fail on execution.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Record invocation order into a shared log.
    pub fn logged(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Record bound parameters into a shared capture.
    pub fn capturing(mut self, capture: &ParameterCapture) -> Self {
        self.capture = Some(capture.clone());
        self
    }
}

impl StepOperation for MockOperation {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_properties(&self) -> &[&str] {
        &self.declared
    }

    fn execute(&self, invocation: &mut StepInvocation<'_>) -> Result<(), StepFailure> {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.clone());
        }
        if let Some(capture) = &self.capture {
            capture.lock().unwrap().push(invocation.parameters().clone());
        }
        if self.fail {
            return Err(format!("{} exploded", self.name).into());
        }

        if let Some(delta) = self.delta {
            let input = invocation
                .string_parameter(properties::INPUT_WORKSPACE)
                .or_else(|| invocation.string_parameter(properties::WORKSPACE))
                .map(str::to_string);
            let output = invocation
                .string_parameter(properties::OUTPUT_WORKSPACE)
                .map(str::to_string);
            if let Some(input) = input {
                let mut workspace = invocation.workspaces.require(&input)?.clone();
                workspace.counts_mut().mapv_inplace(|v| v + delta);
                invocation.workspaces.insert(output.unwrap_or(input), workspace);
            }
        }

        if let Some((x, y)) = self.beam_center {
            invocation.set_output(properties::FOUND_BEAM_CENTER_X, x);
            invocation.set_output(properties::FOUND_BEAM_CENTER_Y, y);
        }
        if let Some(message) = &self.message {
            invocation.set_message(message.clone());
        }
        Ok(())
    }
}

/// Mock load operation synthesizing a workspace per filename.
pub struct MockLoader {
    name: String,
    declared: Vec<&'static str>,
    runs: IndexMap<String, (f64, f64, f64)>,
    message: bool,
    log: Option<CallLog>,
}

impl MockLoader {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            declared: vec![properties::FILENAME, properties::OUTPUT_WORKSPACE],
            runs: IndexMap::new(),
            message: false,
            log: None,
        }
    }

    /// Register the workspace synthesized for a filename:
    /// every count set to `counts`, with the given monitor and timer.
    pub fn with_file(mut self, filename: &str, counts: f64, monitor: f64, timer: f64) -> Self {
        self.runs
            .insert(filename.to_string(), (counts, monitor, timer));
        self
    }

    /// Declare and emit an `OutputMessage`.
    pub fn with_message(mut self) -> Self {
        self.declared.push(properties::OUTPUT_MESSAGE);
        self.message = true;
        self
    }

    /// Record invocation order into a shared log.
    pub fn logged(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }
}

impl StepOperation for MockLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_properties(&self) -> &[&str] {
        &self.declared
    }

    fn execute(&self, invocation: &mut StepInvocation<'_>) -> Result<(), StepFailure> {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.clone());
        }
        let filename = invocation
            .string_parameter(properties::FILENAME)
            .ok_or("no Filename bound")?
            .to_string();
        let output = invocation
            .string_parameter(properties::OUTPUT_WORKSPACE)
            .ok_or("no OutputWorkspace bound")?
            .to_string();

        let (counts, monitor, timer) = self
            .runs
            .get(&filename)
            .copied()
            .ok_or_else(|| format!("no such file: {filename}"))?;
        invocation
            .workspaces
            .insert(output.clone(), Workspace::filled(2, 4, counts, RunInfo::new(monitor, timer)));

        if self.message {
            invocation.set_message(format!("Read {filename} into {output}\n"));
        }
        Ok(())
    }
}

/// Mock save operation writing a marker file at the bound filename.
pub struct MockSaver {
    name: String,
    declared: Vec<&'static str>,
    capture: Option<ParameterCapture>,
}

impl MockSaver {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            declared: vec![properties::FILENAME, properties::INPUT_WORKSPACE],
            capture: None,
        }
    }

    /// Declare additional writer properties.
    pub fn also_declaring(mut self, names: &[&'static str]) -> Self {
        self.declared.extend_from_slice(names);
        self
    }

    pub fn capturing(mut self, capture: &ParameterCapture) -> Self {
        self.capture = Some(capture.clone());
        self
    }
}

impl StepOperation for MockSaver {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_properties(&self) -> &[&str] {
        &self.declared
    }

    fn execute(&self, invocation: &mut StepInvocation<'_>) -> Result<(), StepFailure> {
        if let Some(capture) = &self.capture {
            capture.lock().unwrap().push(invocation.parameters().clone());
        }
        let filename = invocation
            .string_parameter(properties::FILENAME)
            .ok_or("no Filename bound")?;
        std::fs::write(filename, b"saved")?;
        Ok(())
    }
}
