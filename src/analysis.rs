use log::{debug, trace};
use num_traits::{NumCast, ToPrimitive};
use ordered_float::PrimitiveFloat;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use core::{fmt::Debug, hash::Hash};

use crate::{
    CandleField, ConfigError, DEFAULT_BAND_MULTIPLIER, Observation, OptionsField,
    ProbabilityEstimate, Series, StatisticsMap, Unavailable, compute_stats,
    fit_change_distribution, project, select,
};

/// Window sizes analysed when none are configured
pub const DEFAULT_WINDOW_SIZES: [usize; 3] = [10, 50, 200];

fn default_window_sizes() -> Vec<usize> {
    DEFAULT_WINDOW_SIZES.to_vec()
}

fn default_band_multiplier() -> f64 {
    DEFAULT_BAND_MULTIPLIER
}

/// What to compute for a series.
///
/// The configuration is passed explicitly to [`analyze`]; nothing in the
/// crate holds process-wide settings. `window_sizes` and `band_multiplier`
/// fall back to their defaults when omitted from a serialized config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig<F> {
    /// Window sizes to analyse, in report order
    #[serde(default = "default_window_sizes")]
    pub window_sizes: Vec<usize>,
    /// Field whose changes are projected
    pub target: F,
    /// Fields to summarize
    pub fields: Vec<F>,
    /// Band half-width in standard deviations
    #[serde(default = "default_band_multiplier")]
    pub band_multiplier: f64,
}

impl<F> AnalysisConfig<F> {
    /// Creates a configuration with the default window sizes and band
    ///
    /// # Arguments
    ///
    /// * `target` - Field whose changes are projected
    /// * `fields` - Fields to summarize
    pub fn new(target: F, fields: Vec<F>) -> Self {
        Self {
            window_sizes: default_window_sizes(),
            target,
            fields,
            band_multiplier: DEFAULT_BAND_MULTIPLIER,
        }
    }

    /// Replaces the window sizes
    pub fn with_window_sizes(mut self, window_sizes: Vec<usize>) -> Self {
        self.window_sizes = window_sizes;
        self
    }

    /// Replaces the band multiplier
    pub fn with_band_multiplier(mut self, band_multiplier: f64) -> Self {
        self.band_multiplier = band_multiplier;
        self
    }

    /// Checks that the configuration can be run
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - An error if no window sizes are given, a
    ///   window size is zero, or the band multiplier is negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_sizes.is_empty() {
            return Err(ConfigError::NoWindows);
        }
        if self.window_sizes.contains(&0) {
            return Err(ConfigError::ZeroWindow);
        }
        if !(self.band_multiplier.is_finite() && self.band_multiplier >= 0.0) {
            return Err(ConfigError::BandMultiplier(self.band_multiplier));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig<CandleField> {
    /// Close-to-close changes, statistics of every candle field
    fn default() -> Self {
        Self::new(CandleField::Close, CandleField::iter().collect())
    }
}

impl Default for AnalysisConfig<OptionsField> {
    /// Mid-price changes, statistics of the Greeks and volume
    fn default() -> Self {
        Self::new(
            OptionsField::Mid,
            OptionsField::iter()
                .filter(|f| *f != OptionsField::Mid)
                .collect(),
        )
    }
}

/// Results for one window size.
///
/// Statistics and probabilities are reported separately: a window of one
/// observation still has statistics, while its probabilities are
/// [`Unavailable::Insufficient`].
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "F: Serialize + Eq + Hash, T: Serialize"))]
pub struct WindowReport<F, T> {
    /// Window size
    pub count: usize,
    /// Statistics per field
    pub statistics: Result<StatisticsMap<F, T>, Unavailable>,
    /// Probabilities for the next change of the target field
    pub probabilities: Result<ProbabilityEstimate<T>, Unavailable>,
}

impl<F, T> WindowReport<F, T> {
    /// Returns `true` if both statistics and probabilities are available
    pub fn is_complete(&self) -> bool {
        self.statistics.is_ok() && self.probabilities.is_ok()
    }
}

/// Runs the whole pipeline for every configured window size.
///
/// The reference value for the probability band is the target field of the
/// most recent observation of the whole series.
///
/// # Arguments
///
/// * `series` - The series to analyse
/// * `config` - What to compute
///
/// # Returns
///
/// * `Result<Vec<WindowReport<O::Field, O::Value>>, ConfigError>` - One report
///   per window size in configuration order, or the configuration error
///
/// # Examples
///
/// ```
/// # use ta_probability::{analyze, AnalysisConfig, Candle, CandleField, Series, Unavailable};
/// # use chrono::{TimeDelta, TimeZone, Utc};
/// let t0 = Utc.with_ymd_and_hms(2025, 1, 6, 14, 30, 0).unwrap();
/// let closes = [10.0, 12.0, 11.0, 15.0];
/// let series = Series::new(
///     closes
///         .iter()
///         .enumerate()
///         .map(|(i, &c)| Candle::new(t0 + TimeDelta::minutes(i as i64), c, c, c, 100.0))
///         .collect(),
/// )
/// .unwrap();
///
/// let config = AnalysisConfig::<CandleField>::default().with_window_sizes(vec![4, 10]);
/// let reports = analyze(&series, &config).unwrap();
///
/// assert!(reports[0].is_complete());
/// let estimate = reports[0].probabilities.unwrap();
/// assert!(estimate.range_lower < 15.0 && 15.0 < estimate.range_upper);
///
/// assert_eq!(
///     reports[1].probabilities.err(),
///     Some(Unavailable::Insufficient { required: 10, available: 4 })
/// );
/// ```
pub fn analyze<O>(
    series: &Series<O>,
    config: &AnalysisConfig<O::Field>,
) -> Result<Vec<WindowReport<O::Field, O::Value>>, ConfigError>
where
    O: Observation,
    O::Value: Default + PrimitiveFloat,
    O::Field: Debug,
{
    let reference = series.last().map(|o| o.value(config.target));
    run(series, config, reference)
}

/// Runs the whole pipeline against an explicit reference value.
///
/// Used when the current value comes from a separate quote rather than from
/// the last observation, such as the current average mid of an option chain.
///
/// # Arguments
///
/// * `series` - The series to analyse
/// * `config` - What to compute
/// * `reference` - The current value of the target field
///
/// # Returns
///
/// * `Result<Vec<WindowReport<O::Field, O::Value>>, ConfigError>` - One report
///   per window size in configuration order, or the configuration error
pub fn analyze_with_reference<O>(
    series: &Series<O>,
    config: &AnalysisConfig<O::Field>,
    reference: O::Value,
) -> Result<Vec<WindowReport<O::Field, O::Value>>, ConfigError>
where
    O: Observation,
    O::Value: Default + PrimitiveFloat,
    O::Field: Debug,
{
    run(series, config, Some(reference))
}

fn run<O>(
    series: &Series<O>,
    config: &AnalysisConfig<O::Field>,
    reference: Option<O::Value>,
) -> Result<Vec<WindowReport<O::Field, O::Value>>, ConfigError>
where
    O: Observation,
    O::Value: Default + PrimitiveFloat,
    O::Field: Debug,
{
    config.validate()?;
    let band_multiplier = <O::Value as NumCast>::from(config.band_multiplier)
        .ok_or(ConfigError::BandMultiplier(config.band_multiplier))?;

    let reports = config
        .window_sizes
        .iter()
        .map(|&count| {
            let window = select(series, count);
            match &window {
                Ok(_) => debug!("window of {count} selected from {} observations", series.len()),
                Err(err) => debug!("window of {count} unavailable: {err}"),
            }

            let statistics = window.and_then(|w| compute_stats(&w, &config.fields));
            let probabilities = window
                .and_then(|w| fit_change_distribution(&w, config.target))
                .and_then(|dist| {
                    trace!(
                        "window of {count}: {:?} changes fitted with mean {:?} and stddev {:?}",
                        config.target,
                        dist.mean().to_f64(),
                        dist.stddev().to_f64()
                    );
                    project(&dist, reference.ok_or(Unavailable::Undefined)?, band_multiplier)
                });
            if let Err(err) = &probabilities {
                debug!("window of {count}: probabilities unavailable: {err}");
            }

            WindowReport {
                count,
                statistics,
                probabilities,
            }
        })
        .collect();

    Ok(reports)
}
