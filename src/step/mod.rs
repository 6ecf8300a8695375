//! Step system: descriptors, capabilities, registry and invocation.

pub mod descriptor;
pub mod invoker;
pub mod registry;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use descriptor::{Capabilities, ResolvedStep, StepResolver};
pub use invoker::{invoke, Bindings, StepOutcome};
pub use registry::OperationRegistry;
pub use traits::{properties, BeamCenter, StepFailure, StepInvocation, StepOperation};
