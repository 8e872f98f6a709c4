use serde::Serialize;
use thiserror::Error;

/// Reason a statistic or estimate could not be produced.
///
/// Neither variant is a fault: both are expected outcomes that callers report
/// as "unavailable" instead of printing a number.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unavailable {
    /// Not enough observations for the requested computation
    #[error("insufficient data: {required} observations required, {available} available")]
    Insufficient {
        /// Observations the computation needs
        required: usize,
        /// Observations actually present
        available: usize,
    },

    /// The data is sufficient but the quantity is mathematically undefined
    /// (variance of a single point, deviation of a single difference,
    /// non-finite inputs)
    #[error("statistic is undefined for the given data")]
    Undefined,
}

/// Errors raised while building a [`Series`](crate::Series)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesError {
    /// The observation at `index` does not come strictly after its predecessor
    #[error("timestamps must be strictly increasing (violated at index {index})")]
    NotIncreasing {
        /// Position of the offending observation
        index: usize,
    },
}

/// Errors raised by [`AnalysisConfig::validate`](crate::AnalysisConfig::validate)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No window sizes were configured
    #[error("at least one window size is required")]
    NoWindows,

    /// A window size of zero was configured
    #[error("window sizes must be positive")]
    ZeroWindow,

    /// The band multiplier is negative or not finite
    #[error("band multiplier must be finite and non-negative, got {0}")]
    BandMultiplier(f64),
}
