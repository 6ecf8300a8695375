//! Reduction configuration: role keys mapped to values and step descriptors.

pub mod registry;
pub mod roles;
pub mod value;

pub use registry::{Definition, ReductionConfig, StepDescriptor};
pub use value::Value;
