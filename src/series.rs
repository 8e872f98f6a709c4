use chrono::{NaiveTime, TimeDelta};
use num_traits::Float;

use crate::{Candle, Observation, SeriesError};

/// An ordered sequence of observations for one instrument and timeframe.
///
/// Timestamps are strictly increasing; a series is validated once when it is
/// built and is read-only afterwards. An empty series is valid: having too
/// few observations is reported by the consumers, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<O> {
    observations: Vec<O>,
}

impl<O> Default for Series<O> {
    fn default() -> Self {
        Self {
            observations: Vec::new(),
        }
    }
}

impl<O: Observation> Series<O> {
    /// Creates a series from observations that are already in time order.
    ///
    /// # Arguments
    ///
    /// * `observations` - Observations ordered oldest to newest
    ///
    /// # Returns
    ///
    /// * `Result<Self, SeriesError>` - The series, or the index of the first
    ///   observation that does not come strictly after its predecessor
    ///
    /// # Examples
    ///
    /// ```
    /// # use ta_probability::{Candle, Series, SeriesError};
    /// # use chrono::{TimeZone, Utc};
    /// let t0 = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
    /// let t1 = Utc.with_ymd_and_hms(2025, 1, 7, 0, 0, 0).unwrap();
    ///
    /// let ok = Series::new(vec![
    ///     Candle::new(t0, 11.0, 9.0, 10.0, 500.0),
    ///     Candle::new(t1, 12.0, 10.0, 11.0, 650.0),
    /// ]);
    /// assert_eq!(ok.map(|s| s.len()), Ok(2));
    ///
    /// let err = Series::new(vec![
    ///     Candle::new(t1, 12.0, 10.0, 11.0, 650.0),
    ///     Candle::new(t0, 11.0, 9.0, 10.0, 500.0),
    /// ]);
    /// assert_eq!(err, Err(SeriesError::NotIncreasing { index: 1 }));
    /// ```
    pub fn new(observations: Vec<O>) -> Result<Self, SeriesError> {
        if let Some(index) = observations
            .windows(2)
            .position(|pair| pair[0].timestamp() >= pair[1].timestamp())
        {
            return Err(SeriesError::NotIncreasing { index: index + 1 });
        }
        Ok(Self { observations })
    }

    /// Creates a series from observations in any order.
    ///
    /// Observations are sorted by timestamp; duplicate timestamps are still
    /// rejected.
    pub fn from_unordered(mut observations: Vec<O>) -> Result<Self, SeriesError> {
        observations.sort_by_key(|o| o.timestamp());
        Self::new(observations)
    }

    /// Creates a series from rows that may share timestamps.
    ///
    /// Rows are sorted by timestamp and every group of rows with the same
    /// timestamp is folded into one observation by `merge`. Groups for which
    /// `merge` returns `None` are skipped.
    ///
    /// # Arguments
    ///
    /// * `rows` - Rows in any order
    /// * `merge` - Folds the rows of one timestamp into a single observation
    ///
    /// # Returns
    ///
    /// * `Result<Self, SeriesError>` - The series, or an ordering error if
    ///   `merge` produced timestamps out of order
    pub fn from_grouped<F>(mut rows: Vec<O>, merge: F) -> Result<Self, SeriesError>
    where
        F: Fn(&[O]) -> Option<O>,
    {
        rows.sort_by_key(|o| o.timestamp());
        let merged = rows
            .chunk_by(|a, b| a.timestamp() == b.timestamp())
            .filter_map(merge)
            .collect();
        Self::new(merged)
    }

    /// Returns a series holding only the most recent `count` observations,
    /// or a copy of the whole series if it is shorter
    pub fn tail(&self, count: usize) -> Self
    where
        O: Clone,
    {
        let start = self.observations.len().saturating_sub(count);
        Self {
            observations: self.observations[start..].to_vec(),
        }
    }

    /// Returns the values of `field` in time order
    pub fn values(&self, field: O::Field) -> impl Iterator<Item = O::Value> + '_ {
        self.observations.iter().map(move |o| o.value(field))
    }
}

impl<O> Series<O> {
    /// Returns the number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` if the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns the observations, oldest first
    pub fn as_slice(&self) -> &[O] {
        &self.observations
    }

    /// Returns an iterator over the observations, oldest first
    pub fn iter(&self) -> core::slice::Iter<'_, O> {
        self.observations.iter()
    }

    /// Returns the most recent observation
    pub fn last(&self) -> Option<&O> {
        self.observations.last()
    }
}

impl<T: Float> Series<Candle<T>> {
    /// Aggregates candles into fixed-width bins.
    ///
    /// Bins are anchored at midnight UTC of the first candle's day. Within a
    /// bin the high is the maximum, the low the minimum, the close the last
    /// close and the volume the sum; each bin is labelled with its start.
    /// Bins without candles are dropped.
    ///
    /// # Arguments
    ///
    /// * `width` - Bin width, a positive whole number of seconds
    ///
    /// # Returns
    ///
    /// * `Self` - The resampled series
    ///
    /// # Panics
    ///
    /// Panics if `width` is shorter than one second or has a fractional second.
    pub fn resample(&self, width: TimeDelta) -> Self {
        let step = width.num_seconds();
        assert!(
            step > 0 && width.subsec_nanos() == 0,
            "resample width must be a positive whole number of seconds"
        );

        let Some(first) = self.observations.first() else {
            return Self::default();
        };
        let origin = first.timestamp.date_naive().and_time(NaiveTime::MIN).and_utc();

        let mut bins: Vec<Candle<T>> = Vec::new();
        let mut current_bin = None;
        for candle in &self.observations {
            let bin = (candle.timestamp - origin).num_seconds().div_euclid(step);
            match bins.last_mut() {
                Some(acc) if current_bin == Some(bin) => {
                    acc.high = acc.high.max(candle.high);
                    acc.low = acc.low.min(candle.low);
                    acc.close = candle.close;
                    acc.volume = acc.volume + candle.volume;
                }
                _ => {
                    current_bin = Some(bin);
                    bins.push(Candle {
                        timestamp: origin + TimeDelta::seconds(bin * step),
                        ..*candle
                    });
                }
            }
        }

        Self { observations: bins }
    }
}

impl<'a, O> IntoIterator for &'a Series<O> {
    type Item = &'a O;
    type IntoIter = core::slice::Iter<'a, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
