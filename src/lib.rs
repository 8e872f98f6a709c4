#![doc = include_str!("../README.md")]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::just_underscores_and_digits, clippy::len_without_is_empty)]

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::helper;

mod error;
pub use error::{ConfigError, SeriesError, Unavailable};

mod observation;
pub use observation::{Candle, CandleField, Observation, OptionsField, OptionsSnapshot};

mod series;
pub use series::Series;

mod window;
pub use window::{Window, select};

mod moments;

mod statistics;
pub use statistics::{FieldStatistics, StatisticsMap, compute_stats};

mod distribution;
pub use distribution::{ChangeDistribution, differences, fit_change_distribution};

mod projection;
pub use projection::{DEFAULT_BAND_MULTIPLIER, ProbabilityEstimate, project, project_default};

mod timeframe;
pub use timeframe::Timeframe;

mod analysis;
pub use analysis::{
    AnalysisConfig, DEFAULT_WINDOW_SIZES, WindowReport, analyze, analyze_with_reference,
};
