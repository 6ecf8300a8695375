//! Data structures for SANS reduction.

pub mod run_info;
pub mod store;
pub mod workspace;

pub use run_info::RunInfo;
pub use store::{WorkspaceError, WorkspaceStore};
pub use workspace::Workspace;
