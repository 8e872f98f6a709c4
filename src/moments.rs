use num_traits::Float;

use crate::Kbn;

/// First and second moments of a slice of values.
///
/// Both passes use Kahan-Babuska-Neumaier summation. The mean is accumulated
/// first and the second central moment is summed over deviations from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Moments<T> {
    /// Number of values
    count: usize,
    /// Mean of values
    mean: T,
    /// Second central moment
    m2: T,
    /// Delta Degrees of Freedom
    ddof: bool,
}

impl<T: Float + Default> Moments<T> {
    /// Computes the moments of `values`
    ///
    /// # Arguments
    ///
    /// * `values` - The values, in any order
    ///
    /// # Returns
    ///
    /// * `Self` - The moments, with `ddof` disabled
    pub(crate) fn from_slice(values: &[T]) -> Self {
        let mut moments = Self {
            count: values.len(),
            mean: T::zero(),
            m2: T::zero(),
            ddof: false,
        };

        let Some(n) = T::from(values.len()).filter(|n| *n > T::zero()) else {
            return moments;
        };

        let mut sum = Kbn::<T>::default();
        for &v in values {
            sum += v;
        }
        moments.mean = sum.total() / n;

        let mut sum_sq_dev = Kbn::<T>::default();
        for &v in values {
            let dev = v - moments.mean;
            sum_sq_dev += dev * dev;
        }
        moments.m2 = sum_sq_dev.total() / n;

        moments
    }

    /// Returns the Delta Degrees of Freedom
    #[inline]
    pub(crate) const fn ddof(&self) -> bool {
        self.ddof
    }

    /// Sets the Delta Degrees of Freedom
    ///
    /// # Arguments
    ///
    /// * `ddof` - `true` for the Bessel-corrected (sample) variance
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The moments object
    #[inline]
    pub(crate) const fn set_ddof(&mut self, ddof: bool) -> &mut Self {
        self.ddof = ddof;
        self
    }

    /// Returns the number of values
    #[inline]
    pub(crate) const fn count(&self) -> usize {
        self.count
    }

    /// Returns the arithmetic mean, or `None` for an empty slice
    #[inline]
    pub(crate) fn mean(&self) -> Option<T> {
        (self.count > 0).then_some(self.mean)
    }

    /// Returns the variance
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The variance, or `None` if the divisor (`n`, or `n - 1`
    ///   with `ddof`) is not positive
    #[inline]
    pub(crate) fn variance(&self) -> Option<T> {
        let n = T::from(self.count)?;
        let denom = if self.ddof() { n - T::one() } else { n };
        if denom > T::zero() {
            Some(self.m2 * n / denom)
        } else {
            None
        }
    }

    /// Returns the standard deviation
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The standard deviation, or `None` when the variance is
    ///   undefined
    #[inline]
    pub(crate) fn stddev(&self) -> Option<T> {
        self.variance().map(T::sqrt)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn mean_works() {
        let moments = Moments::from_slice(&[
            1_000_000.1,
            1_000_000.2,
            1_000_000.3,
            1_000_000.4,
        ]);
        assert_eq!(moments.count(), 4);
        assert_approx_eq!(moments.mean().unwrap(), 1_000_000.25, 1e-9);
    }

    #[test]
    fn variance_works() {
        let inputs = [25.4, 26.2, 26.0];
        let mut moments = Moments::from_slice(&inputs);

        assert!(!moments.ddof());
        assert_approx_eq!(moments.variance().unwrap(), 0.1156, 0.0001);
        assert_approx_eq!(moments.stddev().unwrap(), 0.3399, 0.0001);

        moments.set_ddof(true);
        assert_approx_eq!(moments.variance().unwrap(), 0.1733, 0.0001);
        assert_approx_eq!(moments.stddev().unwrap(), 0.4163, 0.0001);
    }

    #[test]
    fn variance_of_large_prices_keeps_precision() {
        let inputs = [100_000.1, 100_000.2, 100_000.3];
        let mut moments = Moments::from_slice(&inputs);
        moments.set_ddof(true);
        assert_approx_eq!(moments.variance().unwrap(), 0.01, 1e-9);
    }

    #[test]
    fn single_value_sample_variance_is_none() {
        let mut moments = Moments::from_slice(&[42.0]);
        assert_eq!(moments.variance(), Some(0.0));

        moments.set_ddof(true);
        assert_eq!(moments.variance(), None);
        assert_eq!(moments.stddev(), None);
        assert_eq!(moments.mean(), Some(42.0));
    }

    #[test]
    fn nan_input_propagates() {
        let mut moments = Moments::from_slice(&[1.0, f64::NAN, 3.0]);
        moments.set_ddof(true);
        assert!(moments.mean().unwrap().is_nan());
        assert!(moments.variance().unwrap().is_nan());
        assert!(moments.stddev().unwrap().is_nan());
    }

    #[test]
    fn empty_slice_has_no_moments() {
        let moments = Moments::<f64>::from_slice(&[]);
        assert_eq!(moments.count(), 0);
        assert_eq!(moments.mean(), None);
        assert_eq!(moments.variance(), None);
    }
}
