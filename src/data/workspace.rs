//! Workspace data container.

use ndarray::Array2;

use super::run_info::RunInfo;

/// A named unit of reduction data: count histograms plus run metadata.
///
/// The pipeline never inspects counts beyond element-wise accumulation and
/// subtraction; interpretation belongs to the collaborator operations.
#[derive(Clone, Debug, PartialEq)]
pub struct Workspace {
    /// Counts, one row per histogram.
    counts: Array2<f64>,

    /// Scalar run metadata.
    run: RunInfo,
}

impl Workspace {
    /// Create a workspace from counts and run metadata.
    pub fn new(counts: Array2<f64>, run: RunInfo) -> Self {
        Self { counts, run }
    }

    /// Create a workspace with every count set to `value`.
    pub fn filled(histograms: usize, bins: usize, value: f64, run: RunInfo) -> Self {
        Self {
            counts: Array2::from_elem((histograms, bins), value),
            run,
        }
    }

    /// Number of histograms in this workspace.
    #[inline]
    pub fn histogram_count(&self) -> usize {
        self.counts.nrows()
    }

    /// Number of bins per histogram.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.counts.ncols()
    }

    /// Counts shape as (histograms, bins).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.counts.dim()
    }

    /// Get reference to the counts.
    #[inline]
    pub fn counts(&self) -> &Array2<f64> {
        &self.counts
    }

    /// Get mutable reference to the counts.
    #[inline]
    pub fn counts_mut(&mut self) -> &mut Array2<f64> {
        &mut self.counts
    }

    /// Get reference to the run metadata.
    #[inline]
    pub fn run(&self) -> &RunInfo {
        &self.run
    }

    /// Get mutable reference to the run metadata.
    #[inline]
    pub fn run_mut(&mut self) -> &mut RunInfo {
        &mut self.run
    }
}
