use num_traits::Float;
use serde::Serialize;

use crate::{Observation, Unavailable, Window, moments::Moments};

/// Returns the first differences of `values`, `values[i] - values[i - 1]`.
///
/// The result holds one element less than `values`, and none for fewer than
/// two values.
///
/// # Examples
///
/// ```
/// # use ta_probability::differences;
/// assert_eq!(differences(&[10.0, 12.0, 11.0, 15.0]), vec![2.0, -1.0, 4.0]);
/// assert!(differences(&[10.0]).is_empty());
/// ```
pub fn differences<T: Float>(values: &[T]) -> Vec<T> {
    values.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// A Normal distribution fitted to period-over-period changes of a field.
///
/// `stddev` is never negative. A zero `stddev` means every observed change
/// was identical; the distribution is then a point mass and the projector
/// applies its degenerate convention instead of the Normal CDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeDistribution<T> {
    /// Mean change per period
    mean: T,
    /// Sample standard deviation of the change per period
    stddev: T,
}

impl<T: Float + Default> ChangeDistribution<T> {
    /// Creates a distribution from known parameters.
    ///
    /// # Arguments
    ///
    /// * `mean` - Mean change per period
    /// * `stddev` - Standard deviation of the change
    ///
    /// # Returns
    ///
    /// * `Option<Self>` - The distribution, or `None` if `stddev` is negative or NaN
    pub fn new(mean: T, stddev: T) -> Option<Self> {
        (stddev >= T::zero()).then_some(Self { mean, stddev })
    }

    /// Fits a Normal distribution to the first differences of `values`.
    ///
    /// The mean is the arithmetic mean of the differences and the standard
    /// deviation is Bessel-corrected (divisor `n - 1` over the `n`
    /// differences).
    ///
    /// # Arguments
    ///
    /// * `values` - Consecutive values of one field, oldest first
    ///
    /// # Returns
    ///
    /// * `Result<Self, Unavailable>` - The distribution;
    ///   [`Unavailable::Insufficient`] for fewer than two values and
    ///   [`Unavailable::Undefined`] for exactly two (a single difference has
    ///   no sample deviation) or when a value is not finite
    ///
    /// # Examples
    ///
    /// ```
    /// # use ta_probability::{ChangeDistribution, Unavailable};
    /// # use assert_approx_eq::assert_approx_eq;
    /// let dist = ChangeDistribution::<f64>::fit(&[10.0, 12.0, 11.0, 15.0]).unwrap();
    /// assert_approx_eq!(dist.mean(), 5.0 / 3.0, 1e-12);
    /// assert_approx_eq!(dist.stddev(), 2.516611478, 1e-9);
    ///
    /// assert_eq!(
    ///     ChangeDistribution::fit(&[10.0]),
    ///     Err(Unavailable::Insufficient { required: 2, available: 1 })
    /// );
    /// assert_eq!(ChangeDistribution::fit(&[10.0, 12.0]), Err(Unavailable::Undefined));
    /// ```
    pub fn fit(values: &[T]) -> Result<Self, Unavailable> {
        if values.len() < 2 {
            return Err(Unavailable::Insufficient {
                required: 2,
                available: values.len(),
            });
        }

        let changes = differences(values);
        let mut moments = Moments::from_slice(&changes);
        moments.set_ddof(true);

        let mean = moments.mean().ok_or(Unavailable::Undefined)?;
        let stddev = moments.stddev().ok_or(Unavailable::Undefined)?;
        if !(mean.is_finite() && stddev.is_finite()) {
            return Err(Unavailable::Undefined);
        }
        Ok(Self { mean, stddev })
    }
}

impl<T: Float> ChangeDistribution<T> {
    /// Returns the mean change per period
    pub const fn mean(&self) -> T {
        self.mean
    }

    /// Returns the standard deviation of the change per period
    pub const fn stddev(&self) -> T {
        self.stddev
    }

    /// Returns `true` if the distribution collapses to a point mass
    pub fn is_degenerate(&self) -> bool {
        self.stddev.is_zero()
    }
}

/// Fits a Normal distribution to the changes of `field` across a window.
///
/// See [`ChangeDistribution::fit`] for the formulas and outcomes.
///
/// # Arguments
///
/// * `window` - The observations, oldest first
/// * `field` - The field whose period-over-period changes are modelled
///
/// # Returns
///
/// * `Result<ChangeDistribution<O::Value>, Unavailable>` - The fitted distribution
pub fn fit_change_distribution<O>(
    window: &Window<'_, O>,
    field: O::Field,
) -> Result<ChangeDistribution<O::Value>, Unavailable>
where
    O: Observation,
    O::Value: Default,
{
    let values: Vec<O::Value> = window.values(field).collect();
    ChangeDistribution::fit(&values)
}
