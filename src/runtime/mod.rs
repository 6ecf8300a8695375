//! Runtime for sequential SANS reduction.

pub mod accumulate;
pub mod corrections;
pub mod env;
pub mod reduction;
pub mod report;

pub use accumulate::{load_files, FileInput, SCRATCH_LOAD_WORKSPACE};
pub use corrections::process_data_file;
pub use env::ReductionEnv;
pub use reduction::{ReductionOutput, ReductionRequest, ReductionRuntime};
pub use report::ExecutionReport;
