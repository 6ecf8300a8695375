//! SANS Reduction Runtime - configurable data reduction pipeline.
//!
//! This crate orchestrates Small-Angle Neutron Scattering (SANS) data
//! reduction: given a role-keyed configuration naming which operation
//! implements each pipeline responsibility, it executes those operations in
//! the fixed, branch-aware reduction order and aggregates their messages
//! into one report. The numeric work lives in the collaborator operations;
//! the runtime only sequences them and binds their inputs and outputs.
//!
//! - Role-keyed configuration with optional stages (only load is required)
//! - Capability probing, so parameters bind only when an operation declares them
//! - Multi-file accumulation with summed monitor/timer metadata
//! - Mirrored correction sub-pipeline for the optional background branch
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        ReductionRuntime             │
//! │  fixed, branch-aware step order     │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │  ┌───────────┐  ┌───────────────┐  │
//! │  │  Config   │  │ Step System   │  │
//! │  │ (roles →  │  │ (resolve +    │  │
//! │  │  steps)   │  │  invoke)      │  │
//! │  └───────────┘  └───────────────┘  │
//! │  ┌───────────┐  ┌───────────────┐  │
//! │  │ Workspace │  │  Execution    │  │
//! │  │   Store   │  │   Report      │  │
//! │  └───────────┘  └───────────────┘  │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use sansred::{
//!     OperationRegistry, ReductionConfig, ReductionRequest, ReductionRuntime, StepDescriptor,
//! };
//!
//! let mut config = ReductionConfig::new("__sans_reduction_properties");
//! config.set_step("LoadAlgorithm", StepDescriptor::new("HFIRLoad"));
//! config.set_step("NormaliseAlgorithm", StepDescriptor::new("HFIRSANSNormalise"));
//!
//! let operations = OperationRegistry::new();
//! // ... register the collaborator operations ...
//!
//! let mut runtime = ReductionRuntime::new(operations);
//! let output = runtime
//!     .run(&config, &ReductionRequest::new("BioSANS_exp61.xml", "reduced"))
//!     .unwrap();
//! println!("{}", output.report);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod runtime;
pub mod step;

// Re-export commonly used items
pub use config::{Definition, ReductionConfig, StepDescriptor, Value};
pub use data::{RunInfo, Workspace, WorkspaceError, WorkspaceStore};
pub use error::{ReductionError, StepFailure};
pub use runtime::{
    load_files, ExecutionReport, FileInput, ReductionEnv, ReductionOutput, ReductionRequest,
    ReductionRuntime,
};
pub use step::{
    invoke, properties, BeamCenter, Bindings, Capabilities, OperationRegistry, ResolvedStep,
    StepInvocation, StepOperation, StepOutcome, StepResolver,
};
