use chrono::{DateTime, Utc};
use num_traits::Float;
use serde::{Deserialize, Serialize};

use core::hash::Hash;

use crate::Kbn;

/// A timestamped record whose numeric fields can be read by name.
///
/// This is the single seam between instrument-specific data and the
/// statistical core: every component reads values through [`Observation::value`],
/// so candles and option-chain snapshots share one implementation.
pub trait Observation {
    /// Numeric type of the fields
    type Value: Float;
    /// Field selector
    type Field: Copy + Eq + Hash;

    /// Returns the instant the observation was recorded at
    fn timestamp(&self) -> DateTime<Utc>;

    /// Returns the value of `field`
    fn value(&self, field: Self::Field) -> Self::Value;
}

/// Numeric fields of a [`Candle`]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum CandleField {
    /// Highest traded price
    High,
    /// Lowest traded price
    Low,
    /// Closing price
    Close,
    /// Traded volume
    Volume,
}

/// A price bar for equities or crypto pairs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle<T> {
    /// Opening instant of the bar
    pub timestamp: DateTime<Utc>,
    /// Highest traded price
    pub high: T,
    /// Lowest traded price
    pub low: T,
    /// Closing price
    pub close: T,
    /// Traded volume
    pub volume: T,
}

impl<T> Candle<T> {
    /// Creates a new candle
    pub const fn new(timestamp: DateTime<Utc>, high: T, low: T, close: T, volume: T) -> Self {
        Self {
            timestamp,
            high,
            low,
            close,
            volume,
        }
    }
}

impl<T: Float> Observation for Candle<T> {
    type Value = T;
    type Field = CandleField;

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn value(&self, field: CandleField) -> T {
        match field {
            CandleField::High => self.high,
            CandleField::Low => self.low,
            CandleField::Close => self.close,
            CandleField::Volume => self.volume,
        }
    }
}

/// Numeric fields of an [`OptionsSnapshot`]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum OptionsField {
    /// Sensitivity to the underlying price
    Delta,
    /// Sensitivity of delta to the underlying price
    Gamma,
    /// Sensitivity to time decay
    Theta,
    /// Sensitivity to implied volatility
    Vega,
    /// Sensitivity to the interest rate
    Rho,
    /// Contracts traded
    Volume,
    /// Midpoint between bid and ask
    Mid,
}

/// Greeks, volume and mid price of an option chain on one date.
///
/// A chain holds many contracts per date; [`OptionsSnapshot::average`] folds the
/// rows of one date into the single observation a series keeps for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionsSnapshot<T> {
    /// Quote date
    pub date: DateTime<Utc>,
    /// Delta
    pub delta: T,
    /// Gamma
    pub gamma: T,
    /// Theta
    pub theta: T,
    /// Vega
    pub vega: T,
    /// Rho
    pub rho: T,
    /// Contracts traded
    pub volume: T,
    /// Midpoint between bid and ask
    pub mid: T,
}

impl<T: Float + Default> OptionsSnapshot<T> {
    /// Averages every field over `rows`, keeping the date of the first row.
    ///
    /// # Arguments
    ///
    /// * `rows` - Chain rows quoted on the same date
    ///
    /// # Returns
    ///
    /// * `Option<Self>` - The averaged snapshot, or `None` if `rows` is empty
    pub fn average(rows: &[Self]) -> Option<Self> {
        let first = rows.first()?;
        let n = T::from(rows.len())?;
        let mean = |read: fn(&Self) -> T| {
            let mut sum = Kbn::<T>::default();
            for row in rows {
                sum += read(row);
            }
            sum.total() / n
        };

        Some(Self {
            date: first.date,
            delta: mean(|r| r.delta),
            gamma: mean(|r| r.gamma),
            theta: mean(|r| r.theta),
            vega: mean(|r| r.vega),
            rho: mean(|r| r.rho),
            volume: mean(|r| r.volume),
            mid: mean(|r| r.mid),
        })
    }
}

impl<T: Float> Observation for OptionsSnapshot<T> {
    type Value = T;
    type Field = OptionsField;

    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }

    fn value(&self, field: OptionsField) -> T {
        match field {
            OptionsField::Delta => self.delta,
            OptionsField::Gamma => self.gamma,
            OptionsField::Theta => self.theta,
            OptionsField::Vega => self.vega,
            OptionsField::Rho => self.rho,
            OptionsField::Volume => self.volume,
            OptionsField::Mid => self.mid,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;
    use strum::IntoEnumIterator;

    use super::*;

    fn snapshot(delta: f64, volume: f64, mid: f64) -> OptionsSnapshot<f64> {
        OptionsSnapshot {
            date: Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap(),
            delta,
            gamma: 0.02,
            theta: -0.1,
            vega: 0.15,
            rho: 0.01,
            volume,
            mid,
        }
    }

    #[test]
    fn candle_value_works() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 3, 14, 30, 0).unwrap();
        let candle = Candle::new(ts, 101.5, 99.0, 100.25, 12_000.0);

        assert_eq!(candle.timestamp(), ts);
        assert_eq!(candle.value(CandleField::High), 101.5);
        assert_eq!(candle.value(CandleField::Low), 99.0);
        assert_eq!(candle.value(CandleField::Close), 100.25);
        assert_eq!(candle.value(CandleField::Volume), 12_000.0);
    }

    #[test]
    fn field_names_round_trip_through_strings() {
        assert_eq!(CandleField::iter().count(), 4);
        assert_eq!(OptionsField::iter().count(), 7);
        assert_eq!(CandleField::Close.to_string(), "Close");
        assert_eq!("Vega".parse::<OptionsField>().unwrap(), OptionsField::Vega);
    }

    #[test]
    fn average_works() {
        let rows = [
            snapshot(0.6, 100.0, 2.0),
            snapshot(-0.4, 300.0, 4.0),
            snapshot(0.1, 200.0, 3.0),
        ];
        let avg = OptionsSnapshot::average(&rows).unwrap();

        assert_approx_eq!(avg.delta, 0.1, 1e-12);
        assert_approx_eq!(avg.volume, 200.0, 1e-12);
        assert_approx_eq!(avg.mid, 3.0, 1e-12);
        assert_approx_eq!(avg.gamma, 0.02, 1e-12);
        assert_eq!(avg.date, rows[0].date);
        assert_eq!(avg.value(OptionsField::Mid), avg.mid);
    }

    #[test]
    fn average_of_empty_rows_is_none() {
        assert!(OptionsSnapshot::<f64>::average(&[]).is_none());
    }
}
