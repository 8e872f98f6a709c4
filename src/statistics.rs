use ahash::RandomState;
use hashbrown::HashMap;
use num_traits::Float;
use ordered_float::PrimitiveFloat;
use serde::Serialize;

use crate::{
    Observation, Unavailable, Window,
    helper::{median_from_sorted_slice, sorted},
    moments::Moments,
};

/// Statistics of every requested field, keyed by field
pub type StatisticsMap<F, T> = HashMap<F, FieldStatistics<T>, RandomState>;

/// Central tendency and dispersion of one numeric field over a window.
///
/// The mean and median are defined for any non-empty set of values. The
/// sample variance needs at least two values and is reported as
/// [`Unavailable::Undefined`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStatistics<T> {
    /// Number of values summarized
    count: usize,
    /// Arithmetic mean
    mean: T,
    /// Median
    median: T,
    /// Sample variance, absent for a single value
    variance: Option<T>,
}

impl<T> FieldStatistics<T>
where
    T: Float + Default + PrimitiveFloat,
{
    /// Summarizes a set of values.
    ///
    /// The mean uses compensated summation, the median is the midpoint of the
    /// sorted values (the average of the two middle values for an even count)
    /// and the variance is Bessel-corrected (divisor `n - 1`).
    ///
    /// # Arguments
    ///
    /// * `values` - The values, in any order
    ///
    /// # Returns
    ///
    /// * `Result<Self, Unavailable>` - The statistics;
    ///   [`Unavailable::Insufficient`] if `values` is empty and
    ///   [`Unavailable::Undefined`] if the mean or variance is not finite
    ///
    /// # Examples
    ///
    /// ```
    /// # use ta_probability::{FieldStatistics, Unavailable};
    /// # use assert_approx_eq::assert_approx_eq;
    /// let stats = FieldStatistics::<f64>::from_values(&[10.0, 12.0, 11.0, 15.0]).unwrap();
    /// assert_approx_eq!(stats.mean(), 12.0, 1e-12);
    /// assert_approx_eq!(stats.median(), 11.5, 1e-12);
    /// assert_approx_eq!(stats.variance().unwrap(), 14.0 / 3.0, 1e-12);
    ///
    /// let single = FieldStatistics::from_values(&[7.0]).unwrap();
    /// assert_eq!(single.mean(), 7.0);
    /// assert_eq!(single.median(), 7.0);
    /// assert_eq!(single.variance(), Err(Unavailable::Undefined));
    /// ```
    pub fn from_values(values: &[T]) -> Result<Self, Unavailable> {
        let insufficient = Unavailable::Insufficient {
            required: 1,
            available: values.len(),
        };

        let mut moments = Moments::from_slice(values);
        moments.set_ddof(true);
        let mean = moments.mean().ok_or(insufficient)?;
        let variance = moments.variance();
        if !Float::is_finite(mean) || variance.is_some_and(|v| !Float::is_finite(v)) {
            return Err(Unavailable::Undefined);
        }
        let median = median_from_sorted_slice(&sorted(values)).ok_or(insufficient)?;

        Ok(Self {
            count: moments.count(),
            mean,
            median,
            variance,
        })
    }
}

impl<T: Copy> FieldStatistics<T> {
    /// Returns the number of values summarized
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the arithmetic mean
    pub const fn mean(&self) -> T {
        self.mean
    }

    /// Returns the median
    pub const fn median(&self) -> T {
        self.median
    }

    /// Returns the sample variance, or [`Unavailable::Undefined`] for a single value
    pub fn variance(&self) -> Result<T, Unavailable> {
        self.variance.ok_or(Unavailable::Undefined)
    }
}

/// Computes mean, median and sample variance of each field over a window.
///
/// Fields listed more than once appear once in the result; the order of the
/// map carries no meaning.
///
/// # Arguments
///
/// * `window` - The observations to summarize
/// * `fields` - Fields to summarize
///
/// # Returns
///
/// * `Result<StatisticsMap<O::Field, O::Value>, Unavailable>` - Statistics per
///   field. Windows are never empty, so this fails only for an empty window
///   built by hand.
///
/// # Examples
///
/// ```
/// # use ta_probability::{compute_stats, select, Candle, CandleField, Series};
/// # use chrono::{TimeDelta, TimeZone, Utc};
/// # use assert_approx_eq::assert_approx_eq;
/// let t0 = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
/// let series = Series::new(
///     [(11.0_f64, 9.0, 10.0), (13.0, 11.5, 12.0), (12.5, 10.0, 11.0)]
///         .iter()
///         .enumerate()
///         .map(|(i, &(h, l, c))| Candle::new(t0 + TimeDelta::days(i as i64), h, l, c, 100.0))
///         .collect(),
/// )
/// .unwrap();
///
/// let window = select(&series, 3).unwrap();
/// let stats = compute_stats(&window, &[CandleField::High, CandleField::Close]).unwrap();
///
/// assert_eq!(stats.len(), 2);
/// assert_eq!(stats[&CandleField::Close].median(), 11.0);
/// assert_approx_eq!(stats[&CandleField::High].mean(), 36.5 / 3.0, 1e-12);
/// ```
pub fn compute_stats<O>(
    window: &Window<'_, O>,
    fields: &[O::Field],
) -> Result<StatisticsMap<O::Field, O::Value>, Unavailable>
where
    O: Observation,
    O::Value: Default + PrimitiveFloat,
{
    let mut stats = HashMap::with_capacity_and_hasher(fields.len(), RandomState::default());
    for &field in fields {
        if stats.contains_key(&field) {
            continue;
        }
        let values: Vec<O::Value> = window.values(field).collect();
        stats.insert(field, FieldStatistics::from_values(&values)?);
    }
    Ok(stats)
}
