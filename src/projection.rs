use num_traits::Float;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use core::cmp::Ordering;

use crate::{ChangeDistribution, Unavailable};

/// Band half-width, in standard deviations, used by [`project_default`]
pub const DEFAULT_BAND_MULTIPLIER: f64 = 1.5;

/// Probabilities for the next single-period change of a field.
///
/// Probabilities are percentages in `[0, 100]`; the band boundaries are in
/// the units of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityEstimate<T> {
    /// Probability that the next change is positive, in percent
    pub prob_increase: T,
    /// Probability that the next change is zero or negative, in percent
    pub prob_decrease: T,
    /// Probability that the next change stays within the band, in percent
    pub prob_in_range: T,
    /// Lower band boundary, `reference - band_multiplier * stddev`
    pub range_lower: T,
    /// Upper band boundary, `reference + band_multiplier * stddev`
    pub range_upper: T,
}

/// Projects a fitted change distribution onto the next period.
///
/// With `N` the Normal CDF of the distribution:
///
/// - `prob_decrease = N(0)` and `prob_increase = 1 - N(0)`
/// - `range_lower / range_upper = reference ∓ band_multiplier * stddev`
/// - `prob_in_range = N(range_upper - reference) - N(range_lower - reference)`
///
/// The in-range probability is evaluated on the change, not on the absolute
/// value: it is the probability that the next change lies within
/// `± band_multiplier * stddev` of zero. All probabilities are scaled to
/// percent.
///
/// A zero standard deviation makes the distribution a point mass at `mean`.
/// Then the whole probability goes to the side given by the sign of `mean`
/// (50 / 50 when `mean` is zero), the band collapses onto `reference`, and
/// `prob_in_range` is 100 only when `mean` is zero.
///
/// # Arguments
///
/// * `distribution` - The fitted change distribution
/// * `reference` - The current value of the field
/// * `band_multiplier` - Band half-width in standard deviations
///
/// # Returns
///
/// * `Result<ProbabilityEstimate<T>, Unavailable>` - The estimate, or
///   [`Unavailable::Undefined`] if the mean, the standard deviation or the
///   reference is not finite
///
/// # Panics
///
/// Panics if `band_multiplier` is negative or not finite.
///
/// # Examples
///
/// ```
/// # use ta_probability::{project, ChangeDistribution};
/// # use assert_approx_eq::assert_approx_eq;
/// let dist = ChangeDistribution::<f64>::fit(&[10.0, 12.0, 11.0, 15.0]).unwrap();
/// let estimate = project(&dist, 15.0, 1.5).unwrap();
///
/// assert_approx_eq!(estimate.prob_increase, 74.61, 0.01);
/// assert_approx_eq!(estimate.prob_decrease, 25.39, 0.01);
/// assert_approx_eq!(estimate.prob_in_range, 78.36, 0.01);
/// assert_approx_eq!(estimate.range_lower, 11.2251, 0.0001);
/// assert_approx_eq!(estimate.range_upper, 18.7749, 0.0001);
/// ```
pub fn project<T: Float>(
    distribution: &ChangeDistribution<T>,
    reference: T,
    band_multiplier: T,
) -> Result<ProbabilityEstimate<T>, Unavailable> {
    assert!(
        band_multiplier.is_finite() && band_multiplier >= T::zero(),
        "band multiplier must be finite and non-negative"
    );

    let mean = distribution.mean();
    let stddev = distribution.stddev();
    if !(mean.is_finite() && stddev.is_finite() && reference.is_finite()) {
        return Err(Unavailable::Undefined);
    }

    let half_width = band_multiplier * stddev;
    let range_lower = reference - half_width;
    let range_upper = reference + half_width;

    let (decrease, in_range) = if distribution.is_degenerate() {
        point_mass(mean)
    } else {
        let to_f64 = |x: T| x.to_f64().ok_or(Unavailable::Undefined);
        let normal =
            Normal::new(to_f64(mean)?, to_f64(stddev)?).map_err(|_| Unavailable::Undefined)?;
        let decrease = normal.cdf(0.0);
        let upper = normal.cdf(to_f64(range_upper - reference)?);
        let lower = normal.cdf(to_f64(range_lower - reference)?);
        let in_range = upper - lower;
        (decrease, in_range)
    };

    let percent = |p: f64| T::from(p * 100.0).ok_or(Unavailable::Undefined);
    Ok(ProbabilityEstimate {
        prob_increase: percent(1.0 - decrease)?,
        prob_decrease: percent(decrease)?,
        prob_in_range: percent(in_range)?,
        range_lower,
        range_upper,
    })
}

/// Projects with the default band of [`DEFAULT_BAND_MULTIPLIER`] standard deviations
pub fn project_default<T: Float>(
    distribution: &ChangeDistribution<T>,
    reference: T,
) -> Result<ProbabilityEstimate<T>, Unavailable> {
    let band_multiplier = T::from(DEFAULT_BAND_MULTIPLIER).ok_or(Unavailable::Undefined)?;
    project(distribution, reference, band_multiplier)
}

impl<T: Float> ChangeDistribution<T> {
    /// Projects this distribution onto the next period, see [`project`]
    pub fn project(
        &self,
        reference: T,
        band_multiplier: T,
    ) -> Result<ProbabilityEstimate<T>, Unavailable> {
        project(self, reference, band_multiplier)
    }
}

// (P(change <= 0), P(change within a zero-width band)) for a point mass at `mean`
fn point_mass<T: Float>(mean: T) -> (f64, f64) {
    match mean.partial_cmp(&T::zero()) {
        Some(Ordering::Greater) => (0.0, 0.0),
        Some(Ordering::Less) => (1.0, 0.0),
        _ => (0.5, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn dist(mean: f64, stddev: f64) -> ChangeDistribution<f64> {
        ChangeDistribution::new(mean, stddev).unwrap()
    }

    #[test]
    fn project_works() {
        let estimate = project(&dist(0.5, 2.0), 100.0, 1.5).unwrap();

        assert_approx_eq!(estimate.prob_decrease, 40.1294, 0.0001);
        assert_approx_eq!(estimate.prob_increase, 59.8706, 0.0001);
        assert_approx_eq!(estimate.prob_in_range, 85.4291, 0.0001);
        assert_eq!(estimate.range_lower, 97.0);
        assert_eq!(estimate.range_upper, 103.0);
    }

    #[test]
    fn zero_mean_band_matches_standard_normal() {
        let estimate = project(&dist(0.0, 3.0), 50.0, 1.5).unwrap();

        assert_approx_eq!(estimate.prob_increase, 50.0, 1e-9);
        assert_approx_eq!(estimate.prob_decrease, 50.0, 1e-9);
        assert_approx_eq!(estimate.prob_in_range, 86.6386, 0.0001);
    }

    #[test]
    fn probabilities_sum_to_one_hundred() {
        for &(mean, stddev) in &[(0.3, 1.0), (-2.0, 0.5), (150.0, 40.0), (-0.001, 0.002)] {
            let estimate = project(&dist(mean, stddev), 10.0, 1.5).unwrap();
            assert_approx_eq!(estimate.prob_increase + estimate.prob_decrease, 100.0, 1e-9);
            assert!((0.0..=100.0).contains(&estimate.prob_in_range));
        }
    }

    #[test]
    fn reference_lies_inside_band() {
        let estimate = project(&dist(-1.25, 0.75), 42.0, 0.5).unwrap();
        assert!(estimate.range_lower < 42.0);
        assert!(42.0 < estimate.range_upper);
    }

    #[test]
    fn zero_band_has_zero_in_range_probability() {
        let estimate = project(&dist(0.1, 1.0), 10.0, 0.0).unwrap();
        assert_eq!(estimate.range_lower, 10.0);
        assert_eq!(estimate.range_upper, 10.0);
        assert_eq!(estimate.prob_in_range, 0.0);
    }

    #[test]
    fn degenerate_positive_mean() {
        let estimate = project(&dist(3.0, 0.0), 20.0, 1.5).unwrap();
        assert_eq!(estimate.prob_increase, 100.0);
        assert_eq!(estimate.prob_decrease, 0.0);
        assert_eq!(estimate.prob_in_range, 0.0);
        assert_eq!(estimate.range_lower, 20.0);
        assert_eq!(estimate.range_upper, 20.0);
    }

    #[test]
    fn degenerate_negative_mean() {
        let estimate = project(&dist(-3.0, 0.0), 20.0, 1.5).unwrap();
        assert_eq!(estimate.prob_increase, 0.0);
        assert_eq!(estimate.prob_decrease, 100.0);
        assert_eq!(estimate.prob_in_range, 0.0);
    }

    #[test]
    fn degenerate_zero_mean() {
        let estimate = project(&dist(0.0, 0.0), 20.0, 1.5).unwrap();
        assert_eq!(estimate.prob_increase, 50.0);
        assert_eq!(estimate.prob_decrease, 50.0);
        assert_eq!(estimate.prob_in_range, 100.0);
    }

    #[test]
    fn degenerate_from_equal_changes() {
        let fitted = ChangeDistribution::fit(&[7.0, 10.0, 13.0, 16.0]).unwrap();
        let estimate = fitted.project(16.0, 1.5).unwrap();
        assert_eq!(estimate.prob_increase, 100.0);
        assert_eq!(estimate.prob_decrease, 0.0);
    }

    #[test]
    fn non_finite_inputs_are_undefined() {
        assert_eq!(
            project(&dist(f64::INFINITY, 1.0), 1.0, 1.5),
            Err(Unavailable::Undefined)
        );
        assert_eq!(
            project(&dist(0.0, f64::INFINITY), 1.0, 1.5),
            Err(Unavailable::Undefined)
        );
        assert_eq!(project(&dist(0.0, 1.0), f64::NAN, 1.5), Err(Unavailable::Undefined));
    }

    #[test]
    fn project_default_uses_one_and_a_half_stddevs() {
        let d = dist(0.2, 4.0);
        assert_eq!(project_default(&d, 9.0), project(&d, 9.0, 1.5));
        assert_eq!(project_default(&d, 9.0).unwrap().range_upper, 15.0);
    }

    #[test]
    fn project_is_idempotent() {
        let d = dist(-0.4, 1.7);
        assert_eq!(project(&d, 33.0, 1.5), project(&d, 33.0, 1.5));
    }

    #[test]
    #[should_panic(expected = "band multiplier must be finite and non-negative")]
    fn negative_band_panics() {
        let _ = project(&dist(0.0, 1.0), 1.0, -1.0);
    }
}
