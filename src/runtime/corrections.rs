//! Fixed correction sub-pipeline applied to sample and background data.

use crate::config::roles;
use crate::error::ReductionError;
use crate::step::{BeamCenter, Bindings};

use super::env::ReductionEnv;

/// Run the fixed correction sequence on one workspace, in place.
///
/// Order: dark current, normalisation, mask, solid angle, sensitivity.
/// Every stage is optional: an unconfigured role is a silent no-op, not a
/// default. The same sequence serves the sample and background branches.
pub fn process_data_file(
    workspace: &str,
    env: &mut ReductionEnv<'_>,
) -> Result<String, ReductionError> {
    let mut output = String::new();

    // Dark current subtraction
    output.push_str(&env.simple_execution(roles::DARK_CURRENT, workspace, None)?);

    // Normalisation
    output.push_str(&env.simple_execution(roles::NORMALISE, workspace, None)?);

    // Mask
    output.push_str(&env.simple_execution(roles::MASK, workspace, None)?);

    // Solid angle correction
    output.push_str(&env.simple_execution(roles::SOLID_ANGLE, workspace, None)?);

    // Sensitivity correction, with its own beam center when configured
    if let Some(sensitivity) = env.resolve(roles::SENSITIVITY)? {
        let beam_center = find_beam_center(roles::SENSITIVITY_BEAM_CENTER, env)?;
        let outcome = env.invoke(
            &sensitivity,
            Bindings::in_place(workspace).with_beam_center(beam_center),
        )?;
        if sensitivity.capabilities.emits_message {
            output.push_str(&outcome.message);
            output.push('\n');
        }
    }

    Ok(output)
}

/// Run an optional beam-center finder role and return the found center.
///
/// The finder needs no workspace binding; it consults the shared
/// configuration when it is context-aware.
pub(crate) fn find_beam_center(
    role: &str,
    env: &mut ReductionEnv<'_>,
) -> Result<Option<BeamCenter>, ReductionError> {
    let Some(finder) = env.resolve(role)? else {
        return Ok(None);
    };
    let outcome = env.invoke(&finder, Bindings::none())?;
    Ok(outcome.found_beam_center())
}
