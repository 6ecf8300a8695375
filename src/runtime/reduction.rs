//! Top-level reduction orchestration.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::{roles, ReductionConfig, StepDescriptor, Value};
use crate::data::WorkspaceStore;
use crate::error::ReductionError;
use crate::step::{
    properties, Bindings, Capabilities, OperationRegistry, ResolvedStep,
};

use super::accumulate::{load_files, FileInput};
use super::corrections::{find_beam_center, process_data_file};
use super::env::ReductionEnv;
use super::report::ExecutionReport;

/// Writer operations used to persist reduced output, looked up by name.
const SAVE_ASCII: &str = "SaveAscii";
const SAVE_CANSAS: &str = "SaveCanSAS1D";
const SAVE_NIST_DAT: &str = "SaveNISTDAT";

/// One reduction request: the input file(s) and the output workspace name.
#[derive(Clone, Debug)]
pub struct ReductionRequest {
    /// Sample data file, or list of files to accumulate.
    pub filename: FileInput,

    /// Name the reduced sample workspace ends up under.
    pub output_workspace: String,
}

impl ReductionRequest {
    pub fn new(filename: impl Into<FileInput>, output_workspace: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            output_workspace: output_workspace.into(),
        }
    }
}

/// Result surface of one reduction run.
#[derive(Debug)]
pub struct ReductionOutput {
    /// Name of the reduced sample workspace.
    pub output_workspace: String,

    /// Name of the I(Q) workspace, when azimuthal averaging was configured.
    pub iq_workspace: Option<String>,

    /// Name of the I(Qx,Qy) workspace, when 2D averaging was configured.
    pub iqxy_workspace: Option<String>,

    /// Aggregated report of every executed step's message.
    pub report: ExecutionReport,
}

/// Sequential reduction runtime owning the workspace table.
///
/// Runs the fixed, branch-aware reduction order against one configuration at
/// a time. Execution is strictly sequential: each step consumes the dataset
/// mutations and declared outputs of the steps before it, so nothing may run
/// concurrently within one call. A hanging collaborator stalls the run;
/// there is no cancellation.
pub struct ReductionRuntime {
    operations: OperationRegistry,
    workspaces: WorkspaceStore,
}

impl ReductionRuntime {
    /// Create a runtime over a registry of collaborator operations.
    pub fn new(operations: OperationRegistry) -> Self {
        Self {
            operations,
            workspaces: WorkspaceStore::new(),
        }
    }

    /// Get reference to the workspace table.
    pub fn workspaces(&self) -> &WorkspaceStore {
        &self.workspaces
    }

    /// Get mutable reference to the workspace table.
    pub fn workspaces_mut(&mut self) -> &mut WorkspaceStore {
        &mut self.workspaces
    }

    /// Get reference to the operation registry.
    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    /// Run the full reduction described by `config` for one request.
    ///
    /// Every error except an invalid output directory is fatal and leaves
    /// already-mutated workspaces in the table as-is.
    pub fn run(
        &mut self,
        config: &ReductionConfig,
        request: &ReductionRequest,
    ) -> Result<ReductionOutput, ReductionError> {
        let mut env = ReductionEnv::new(config, &self.operations, &mut self.workspaces);
        let output_ws = request.output_workspace.clone();
        let mut report = ExecutionReport::new();

        // Beam center discovery shared by the whole run
        if let Some(finder) = env.resolve(roles::BEAM_FINDER)? {
            let outcome = env.invoke(&finder, Bindings::none())?;
            if finder.capabilities.emits_message {
                report.append(&outcome.message);
                report.append("\n");
            }
        }

        // Load the sample data
        let message = load_files(&request.filename, &output_ws, &mut env)?;
        report.append(&format!("Loaded {}\n", request.filename));
        report.append(&message);

        // Main corrections on the sample
        report.append(&process_data_file(&output_ws, &mut env)?);

        // Sample transmission correction
        let (message, _) = transmission_correction(
            roles::TRANSMISSION_BEAM_CENTER,
            roles::TRANSMISSION,
            &output_ws,
            None,
            &mut env,
        )?;
        report.append(&message);

        // Background measurement: load, correct, subtract
        if let Some(background) = background_files(env.config) {
            let background_ws = format!("__background_{output_ws}");
            let mut bck_msg = format!("Loaded background {background}\n");
            bck_msg.push_str(&load_files(&background, &background_ws, &mut env)?);
            bck_msg.push_str(&process_data_file(&background_ws, &mut env)?);

            let (message, final_background) = transmission_correction(
                roles::BCK_TRANSMISSION_BEAM_CENTER,
                roles::BCK_TRANSMISSION,
                &background_ws,
                Some(format!("__{background_ws}_reduced")),
                &mut env,
            )?;
            report.append(&message);

            env.workspaces.subtract(&output_ws, &final_background)?;
            report.append_nested(
                &format!("Background subtracted [{final_background}]"),
                &bck_msg,
            );
        }

        // Absolute scale correction
        report.append(&env.simple_execution(roles::ABSOLUTE_SCALE, &output_ws, None)?);

        // Geometry correction
        report.append(&env.simple_execution(roles::GEOMETRY, &output_ws, None)?);

        // Compute I(Q)
        let mut iq_workspace = None;
        if let Some(step) = env.resolve(roles::IQ)? {
            let name = format!("{output_ws}_Iq");
            let outcome = env.invoke(&step, Bindings::pair(&output_ws, &name))?;
            report.append(&outcome.message);
            iq_workspace = Some(name);
        }

        // Compute I(Qx,Qy)
        let mut iqxy_workspace = None;
        if let Some(step) = env.resolve(roles::IQXY)? {
            let name = format!("{output_ws}_Iqxy");
            let outcome = env.invoke(&step, Bindings::pair(&output_ws, &name))?;
            report.append(&outcome.message);
            iqxy_workspace = Some(name);
        }

        // Verify the output directory and persist the reduced data
        save_stage(
            request,
            iq_workspace.as_deref(),
            iqxy_workspace.as_deref(),
            &mut report,
            &mut env,
        )?;

        Ok(ReductionOutput {
            output_workspace: output_ws,
            iq_workspace,
            iqxy_workspace,
            report,
        })
    }
}

/// Transmission correction shared by the sample and background branches.
///
/// Runs the branch's beam-center finder first when configured, then the
/// transmission step with the found center injected when accepted. Returns
/// the step message and the workspace name the branch continues with: the
/// override output when the step ran through an in/out pair, the untouched
/// input otherwise.
fn transmission_correction(
    beam_center_role: &str,
    transmission_role: &str,
    workspace: &str,
    output_workspace: Option<String>,
    env: &mut ReductionEnv<'_>,
) -> Result<(String, String), ReductionError> {
    let beam_center = find_beam_center(beam_center_role, env)?;

    let Some(step) = env.resolve(transmission_role)? else {
        return Ok((String::new(), workspace.to_string()));
    };

    let output = output_workspace.as_deref().unwrap_or(workspace);
    let outcome = env.invoke(
        &step,
        Bindings::pair(workspace, output).with_beam_center(beam_center),
    )?;

    let mut message = String::new();
    if step.capabilities.emits_message {
        message.push_str(&outcome.message);
        message.push('\n');
    }
    let continues = if step.capabilities.uses_io_pair {
        output.to_string()
    } else {
        workspace.to_string()
    };
    Ok((message, continues))
}

/// Background file(s), when configured and non-empty.
fn background_files(config: &ReductionConfig) -> Option<FileInput> {
    let input = match config.scalar(roles::BACKGROUND_FILES)? {
        Value::Str(name) => FileInput::Single(name.clone()).normalized(),
        Value::List(names) => FileInput::Multiple(names.clone()),
        _ => return None,
    };
    (!input.is_empty()).then_some(input)
}

/// Resolve the output directory and persist I(Q) and I(Qx,Qy).
///
/// A configured directory that does not exist is logged and skipped; the
/// run still completes with a report. This is the one deliberately
/// non-fatal misconfiguration in the pipeline.
fn save_stage(
    request: &ReductionRequest,
    iq_workspace: Option<&str>,
    iqxy_workspace: Option<&str>,
    report: &mut ExecutionReport,
    env: &mut ReductionEnv<'_>,
) -> Result<(), ReductionError> {
    if !env.config.contains(roles::OUTPUT_DIRECTORY) {
        return Ok(());
    }

    let configured = env
        .config
        .string_value(roles::OUTPUT_DIRECTORY)
        .unwrap_or_default()
        .to_string();
    let output_dir: PathBuf = if configured.is_empty() {
        // Fall back to the input file's directory.
        request
            .filename
            .first()
            .and_then(|file| Path::new(file).parent())
            .map(Path::to_path_buf)
            .unwrap_or_default()
    } else {
        PathBuf::from(&configured)
    };

    if output_dir.is_dir() {
        let message = save_output(iq_workspace, iqxy_workspace, &output_dir, env)?;
        report.append(&message);
        info!(directory = %output_dir.display(), "output saved");
    } else if !configured.is_empty() {
        let message = format!("Output directory doesn't exist: {}\n", output_dir.display());
        error!("{}", message.trim_end());
        report.append(&message);
    }
    Ok(())
}

/// Persist the I(Q) and I(Qx,Qy) workspaces into `output_dir`.
fn save_output(
    iq_workspace: Option<&str>,
    iqxy_workspace: Option<&str>,
    output_dir: &Path,
    env: &mut ReductionEnv<'_>,
) -> Result<String, ReductionError> {
    let mut output = String::new();

    if let Some(iq) = iq_workspace {
        if env.workspaces.contains(iq) {
            let process_xml = read_process_info(env.config);

            let filename = output_dir.join(format!("{iq}.txt"));
            run_writer(
                SAVE_ASCII,
                iq,
                &filename,
                &[
                    (properties::SEPARATOR, Value::from("Tab")),
                    (properties::COMMENT_INDICATOR, Value::from("# ")),
                    (properties::WRITE_X_ERROR, Value::from(true)),
                ],
                env,
            )?;

            let filename = output_dir.join(format!("{iq}.xml"));
            run_writer(
                SAVE_CANSAS,
                iq,
                &filename,
                &[(properties::PROCESS, Value::from(process_xml))],
                env,
            )?;

            output.push_str(&format!("I(Q) saved in {}\n", filename.display()));
        } else {
            error!("no I(Q) output found");
        }
    }

    if let Some(iqxy) = iqxy_workspace {
        if env.workspaces.contains(iqxy) {
            let filename = output_dir.join(format!("{iqxy}.dat"));
            run_writer(SAVE_NIST_DAT, iqxy, &filename, &[], env)?;
            output.push_str(&format!("I(Qx,Qy) saved in {}\n", filename.display()));
        } else {
            error!("no I(Qx,Qy) output found");
        }
    }

    Ok(output)
}

/// Contents of the configured process-info file, empty when unset.
fn read_process_info(config: &ReductionConfig) -> String {
    let Some(process_file) = config.string_value(roles::PROCESS_INFO) else {
        return String::new();
    };
    if process_file.is_empty() {
        return String::new();
    }
    match std::fs::read_to_string(process_file) {
        Ok(contents) => contents,
        Err(_) => {
            error!("could not read {process_file}");
            String::new()
        }
    }
}

/// Invoke a writer operation by name, outside any configured role.
fn run_writer(
    operation_name: &str,
    workspace: &str,
    filename: &Path,
    extra: &[(&str, Value)],
    env: &mut ReductionEnv<'_>,
) -> Result<(), ReductionError> {
    let operation = env.operations.get(operation_name).ok_or_else(|| {
        ReductionError::UnknownOperation {
            role: operation_name.to_string(),
            operation: operation_name.to_string(),
        }
    })?;
    let capabilities = Capabilities::probe(operation.as_ref());

    let mut descriptor = StepDescriptor::new(operation_name);
    descriptor.parameters.insert(
        properties::FILENAME.to_string(),
        Value::from(filename.display().to_string()),
    );
    descriptor
        .parameters
        .insert(properties::INPUT_WORKSPACE.to_string(), Value::from(workspace));
    for (name, value) in extra {
        if operation.declares(name) {
            descriptor
                .parameters
                .insert((*name).to_string(), value.clone());
        }
    }

    let step = ResolvedStep {
        role: operation_name.to_string(),
        descriptor,
        operation,
        capabilities,
    };
    env.invoke(&step, Bindings::none())?;
    Ok(())
}
