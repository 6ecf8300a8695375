//! Multi-file loading and accumulation into a single workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{roles, Value};
use crate::error::ReductionError;
use crate::step::{properties, Bindings, ResolvedStep};

use super::env::ReductionEnv;

/// Scratch workspace used while folding multi-file loads.
pub const SCRATCH_LOAD_WORKSPACE: &str = "__tmp_wksp";

/// One or more data files to accumulate into a single workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileInput {
    Single(String),
    Multiple(Vec<String>),
}

impl FileInput {
    /// Normalize: a comma-separated single name becomes a list.
    pub fn normalized(self) -> FileInput {
        match self {
            FileInput::Single(name) if name.contains(',') => FileInput::Multiple(
                name.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            other => other,
        }
    }

    /// First file of the input, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            FileInput::Single(name) => Some(name),
            FileInput::Multiple(names) => names.first().map(String::as_str),
        }
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        match self {
            FileInput::Single(_) => 1,
            FileInput::Multiple(names) => names.len(),
        }
    }

    /// Check whether no files are named.
    pub fn is_empty(&self) -> bool {
        match self {
            FileInput::Single(name) => name.is_empty(),
            FileInput::Multiple(names) => names.is_empty(),
        }
    }
}

impl fmt::Display for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileInput::Single(name) => f.write_str(name),
            FileInput::Multiple(names) => f.write_str(&names.join(", ")),
        }
    }
}

impl From<&str> for FileInput {
    fn from(name: &str) -> Self {
        FileInput::Single(name.to_string())
    }
}

impl From<String> for FileInput {
    fn from(name: String) -> Self {
        FileInput::Single(name)
    }
}

impl From<Vec<String>> for FileInput {
    fn from(names: Vec<String>) -> Self {
        FileInput::Multiple(names)
    }
}

/// Load one file or a file list into `workspace`.
///
/// A list is folded element-wise into the target: file 0 loads directly,
/// every later file loads into a scratch workspace that is accumulated into
/// the target and then removed. `monitor` and `timer` run metadata are
/// summed across all files; later files are added inside the fold loop, the
/// target's own values (still file 0's, since counts accumulation leaves
/// metadata untouched) are added after it. Downstream normalisation reads
/// these accumulated totals.
pub fn load_files(
    input: &FileInput,
    workspace: &str,
    env: &mut ReductionEnv<'_>,
) -> Result<String, ReductionError> {
    let load = env.resolve_required(roles::LOAD)?;
    let instrument = env
        .config
        .string_value(roles::INSTRUMENT_NAME)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let mut output = String::new();
    match input.clone().normalized() {
        FileInput::Single(file) => {
            output.push_str(&format!("Loaded {file}\n"));
            output.push_str(&load_one(&load, &file, workspace, instrument.as_deref(), env)?);
        }
        FileInput::Multiple(files) => {
            let mut monitor = 0.0;
            let mut timer = 0.0;
            for (index, file) in files.iter().enumerate() {
                output.push_str(&format!("Loaded {file}\n"));
                if index == 0 {
                    output.push_str(&load_one(&load, file, workspace, instrument.as_deref(), env)?);
                } else {
                    output.push_str(&load_one(
                        &load,
                        file,
                        SCRATCH_LOAD_WORKSPACE,
                        instrument.as_deref(),
                        env,
                    )?);
                    env.workspaces.accumulate(workspace, SCRATCH_LOAD_WORKSPACE)?;
                    let scratch = env.workspaces.require(SCRATCH_LOAD_WORKSPACE)?;
                    monitor += scratch.run().monitor;
                    timer += scratch.run().timer;
                }
            }

            // The target still carries the first file's totals; add them last.
            let target = env.workspaces.require_mut(workspace)?;
            monitor += target.run().monitor;
            timer += target.run().timer;
            target.run_mut().monitor = monitor;
            target.run_mut().timer = timer;

            if env.workspaces.contains(SCRATCH_LOAD_WORKSPACE) {
                env.workspaces.remove(SCRATCH_LOAD_WORKSPACE);
            }
        }
    }
    Ok(output)
}

/// Run the load step for one file, bound to one output workspace.
fn load_one(
    load: &ResolvedStep,
    file: &str,
    workspace: &str,
    instrument: Option<&str>,
    env: &mut ReductionEnv<'_>,
) -> Result<String, ReductionError> {
    // Loaders bind Filename and OutputWorkspace rather than the usual
    // workspace pair, so the names go in as fixed parameters.
    let mut step = load.clone();
    step.descriptor
        .parameters
        .insert(properties::FILENAME.to_string(), Value::from(file));
    step.descriptor
        .parameters
        .insert(properties::OUTPUT_WORKSPACE.to_string(), Value::from(workspace));
    if let Some(instrument) = instrument {
        if step.operation.declares(properties::INSTRUMENT_NAME) {
            step.descriptor
                .parameters
                .insert(properties::INSTRUMENT_NAME.to_string(), Value::from(instrument));
        }
    }

    let outcome = env.invoke(&step, Bindings::none())?;
    if step.capabilities.emits_message {
        Ok(outcome.message)
    } else {
        Ok(format!("Loaded {file}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReductionConfig, StepDescriptor};
    use crate::data::WorkspaceStore;
    use crate::step::testing::MockLoader;
    use crate::step::OperationRegistry;

    fn loader_operations() -> OperationRegistry {
        let mut operations = OperationRegistry::new();
        operations.register(
            MockLoader::new("HFIRLoad")
                .with_file("run1.dat", 1.0, 100.0, 10.0)
                .with_file("run2.dat", 2.0, 250.0, 20.0)
                .with_file("run3.dat", 4.0, 400.0, 30.0),
        );
        operations
    }

    fn load_config() -> ReductionConfig {
        let mut config = ReductionConfig::new("run");
        config.set_step("LoadAlgorithm", StepDescriptor::new("HFIRLoad"));
        config
    }

    #[test]
    fn test_missing_load_role_is_configuration_error() {
        let config = ReductionConfig::new("run");
        let operations = OperationRegistry::new();
        let mut store = WorkspaceStore::new();
        let mut env = ReductionEnv::new(&config, &operations, &mut store);

        let err = load_files(&FileInput::from("run1.dat"), "sample", &mut env).unwrap_err();

        assert!(err.is_configuration());
        assert!(store.is_empty());
    }

    #[test]
    fn test_single_file_load() {
        let config = load_config();
        let operations = loader_operations();
        let mut store = WorkspaceStore::new();
        let mut env = ReductionEnv::new(&config, &operations, &mut store);

        let message = load_files(&FileInput::from("run1.dat"), "sample", &mut env).unwrap();

        // The loader declares no OutputMessage, so the default line repeats.
        assert_eq!(message, "Loaded run1.dat\nLoaded run1.dat\n");
        let sample = store.get("sample").unwrap();
        assert_eq!(sample.run().monitor, 100.0);
        assert_eq!(sample.counts()[[0, 0]], 1.0);
    }

    #[test]
    fn test_list_load_sums_counts_and_metadata() {
        let config = load_config();
        let operations = loader_operations();
        let mut store = WorkspaceStore::new();
        let mut env = ReductionEnv::new(&config, &operations, &mut store);

        let files = FileInput::from(vec![
            "run1.dat".to_string(),
            "run2.dat".to_string(),
            "run3.dat".to_string(),
        ]);
        load_files(&files, "sample", &mut env).unwrap();

        let sample = store.get("sample").unwrap();
        // Counts summed element-wise across all three files.
        assert_eq!(sample.counts()[[1, 2]], 7.0);
        // Accumulated totals equal the sum of the per-file values.
        assert_eq!(sample.run().monitor, 750.0);
        assert_eq!(sample.run().timer, 60.0);
        // Scratch workspace is removed after folding.
        assert!(!store.contains(SCRATCH_LOAD_WORKSPACE));
    }

    #[test]
    fn test_list_monitor_matches_independent_single_loads() {
        let config = load_config();
        let operations = loader_operations();

        // Load each file on its own and sum the monitors.
        let mut expected = 0.0;
        for file in ["run1.dat", "run2.dat"] {
            let mut store = WorkspaceStore::new();
            let mut env = ReductionEnv::new(&config, &operations, &mut store);
            load_files(&FileInput::from(file), "single", &mut env).unwrap();
            expected += store.get("single").unwrap().run().monitor;
        }

        let mut store = WorkspaceStore::new();
        let mut env = ReductionEnv::new(&config, &operations, &mut store);
        let files = FileInput::from(vec!["run1.dat".to_string(), "run2.dat".to_string()]);
        load_files(&files, "summed", &mut env).unwrap();

        assert_eq!(store.get("summed").unwrap().run().monitor, expected);
    }

    #[test]
    fn test_comma_separated_single_becomes_list() {
        let config = load_config();
        let operations = loader_operations();
        let mut store = WorkspaceStore::new();
        let mut env = ReductionEnv::new(&config, &operations, &mut store);

        load_files(&FileInput::from("run1.dat, run2.dat"), "sample", &mut env).unwrap();

        let sample = store.get("sample").unwrap();
        assert_eq!(sample.counts()[[0, 0]], 3.0);
        assert_eq!(sample.run().monitor, 350.0);
    }

    #[test]
    fn test_load_message_replaces_default_when_declared() {
        let mut operations = OperationRegistry::new();
        operations.register(
            MockLoader::new("HFIRLoad")
                .with_file("run1.dat", 1.0, 100.0, 10.0)
                .with_message(),
        );
        let config = load_config();
        let mut store = WorkspaceStore::new();
        let mut env = ReductionEnv::new(&config, &operations, &mut store);

        let message = load_files(&FileInput::from("run1.dat"), "sample", &mut env).unwrap();

        assert_eq!(message, "Loaded run1.dat\nRead run1.dat into sample\n");
    }
}
