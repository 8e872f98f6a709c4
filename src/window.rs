use crate::{Observation, Series, Unavailable};

/// A read-only view of the most recent observations of a [`Series`].
///
/// A window always holds exactly the number of observations it was selected
/// with, and that number is never zero. It borrows from the series and never
/// pads or extrapolates.
#[derive(Debug, PartialEq)]
pub struct Window<'a, O> {
    observations: &'a [O],
}

impl<O> Clone for Window<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for Window<'_, O> {}

/// Selects the last `count` observations of `series`, oldest first.
///
/// # Arguments
///
/// * `series` - The series to select from
/// * `count` - Number of observations, must be positive
///
/// # Returns
///
/// * `Result<Window<'_, O>, Unavailable>` - The window, or
///   [`Unavailable::Insufficient`] if the series is shorter than `count`
///
/// # Panics
///
/// Panics if `count` is zero.
///
/// # Examples
///
/// ```
/// # use ta_probability::{select, Candle, CandleField, Series, Unavailable};
/// # use chrono::{TimeDelta, TimeZone, Utc};
/// let t0 = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
/// let closes = [10.0, 12.0, 11.0, 15.0];
/// let series = Series::new(
///     closes
///         .iter()
///         .enumerate()
///         .map(|(i, &c)| Candle::new(t0 + TimeDelta::days(i as i64), c, c, c, 0.0))
///         .collect(),
/// )
/// .unwrap();
///
/// let window = select(&series, 3).unwrap();
/// assert_eq!(window.values(CandleField::Close).collect::<Vec<_>>(), vec![12.0, 11.0, 15.0]);
///
/// assert_eq!(
///     select(&series, 10).err(),
///     Some(Unavailable::Insufficient { required: 10, available: 4 })
/// );
/// ```
pub fn select<O>(series: &Series<O>, count: usize) -> Result<Window<'_, O>, Unavailable> {
    assert!(count > 0, "window count can not be zero");

    let available = series.len();
    if available < count {
        return Err(Unavailable::Insufficient {
            required: count,
            available,
        });
    }

    Ok(Window {
        observations: &series.as_slice()[available - count..],
    })
}

impl<O: Observation> Series<O> {
    /// Selects the last `count` observations, see [`select`]
    pub fn window(&self, count: usize) -> Result<Window<'_, O>, Unavailable> {
        select(self, count)
    }
}

impl<'a, O> Window<'a, O> {
    /// Returns the number of observations in the window
    pub const fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns the observations, oldest first
    pub const fn as_slice(&self) -> &'a [O] {
        self.observations
    }

    /// Returns an iterator over the observations, oldest first
    pub fn iter(&self) -> core::slice::Iter<'a, O> {
        self.observations.iter()
    }

    /// Returns the oldest observation
    pub fn first(&self) -> Option<&'a O> {
        self.observations.first()
    }

    /// Returns the most recent observation
    pub fn last(&self) -> Option<&'a O> {
        self.observations.last()
    }
}

impl<'a, O: Observation> Window<'a, O> {
    /// Returns the values of `field`, oldest first
    pub fn values(&self, field: O::Field) -> impl Iterator<Item = O::Value> + 'a {
        self.observations.iter().map(move |o| o.value(field))
    }
}
