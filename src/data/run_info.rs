//! Scalar run metadata attached to a workspace.

use serde::{Deserialize, Serialize};

/// Run-level counters and origin labels for one measurement.
///
/// `monitor` and `timer` are summed when multiple files are accumulated into
/// one workspace; downstream normalisation reads the accumulated totals, not
/// per-file values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    /// Beam monitor counts.
    pub monitor: f64,

    /// Counting time in seconds.
    pub timer: f64,

    /// Facility the run was recorded at, when known.
    pub facility: Option<String>,

    /// Instrument the run was recorded on, when known.
    pub instrument: Option<String>,
}

impl RunInfo {
    /// Create run metadata with the given counters.
    pub fn new(monitor: f64, timer: f64) -> Self {
        Self {
            monitor,
            timer,
            facility: None,
            instrument: None,
        }
    }
}
