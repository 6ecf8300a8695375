//! Role keys understood by the reduction pipeline.
//!
//! A role names a pipeline responsibility; the configuration maps it to the
//! step descriptor (or scalar value) that fulfills it. Only [`LOAD`] is
//! required; every other role is optional and skipped silently when absent.

/// Loads one data file into a workspace. Required.
pub const LOAD: &str = "LoadAlgorithm";

/// Dark current subtraction, applied in place.
pub const DARK_CURRENT: &str = "DarkCurrentAlgorithm";

/// Normalisation, applied in place.
pub const NORMALISE: &str = "NormaliseAlgorithm";

/// Detector masking, applied in place.
pub const MASK: &str = "MaskAlgorithm";

/// Solid angle correction, applied in place.
pub const SOLID_ANGLE: &str = "SANSSolidAngleCorrection";

/// Detector sensitivity correction, applied in place.
pub const SENSITIVITY: &str = "SensitivityAlgorithm";

/// Beam center finder feeding the sensitivity correction.
pub const SENSITIVITY_BEAM_CENTER: &str = "SensitivityBeamCenterAlgorithm";

/// Beam center discovery for the whole run.
pub const BEAM_FINDER: &str = "SANSBeamFinderAlgorithm";

/// Sample transmission correction.
pub const TRANSMISSION: &str = "TransmissionAlgorithm";

/// Beam center finder feeding the sample transmission correction.
pub const TRANSMISSION_BEAM_CENTER: &str = "TransmissionBeamCenterAlgorithm";

/// Background transmission correction.
pub const BCK_TRANSMISSION: &str = "BckTransmissionAlgorithm";

/// Beam center finder feeding the background transmission correction.
pub const BCK_TRANSMISSION_BEAM_CENTER: &str = "BckTransmissionBeamCenterAlgorithm";

/// Background measurement file(s); presence enables the background branch.
pub const BACKGROUND_FILES: &str = "BackgroundFiles";

/// Absolute scale correction, applied in place.
pub const ABSOLUTE_SCALE: &str = "AbsoluteScaleAlgorithm";

/// Geometry correction, applied in place.
pub const GEOMETRY: &str = "GeometryAlgorithm";

/// Azimuthal averaging producing the I(Q) output.
pub const IQ: &str = "IQAlgorithm";

/// 2D averaging producing the I(Qx,Qy) output.
pub const IQXY: &str = "IQXYAlgorithm";

/// Directory reduced output is persisted to.
pub const OUTPUT_DIRECTORY: &str = "OutputDirectory";

/// Instrument name used when locating data files. May be empty.
pub const INSTRUMENT_NAME: &str = "InstrumentName";

/// Path of a process-info file embedded in the CanSAS output.
pub const PROCESS_INFO: &str = "ProcessInfo";
