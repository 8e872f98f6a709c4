use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Candle timeframes offered by the market data providers
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum Timeframe {
    /// One minute
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    M1,
    /// Five minutes
    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    M5,
    /// Thirty minutes
    #[strum(serialize = "30m")]
    #[serde(rename = "30m")]
    M30,
    /// One hour
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    H1,
    /// Four hours
    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    H4,
    /// One day
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    D1,
    /// One week
    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    W1,
}

impl Timeframe {
    /// Returns the length of one candle in seconds
    pub const fn seconds(self) -> i64 {
        match self {
            Self::M1 => 60,
            Self::M5 => 300,
            Self::M30 => 1_800,
            Self::H1 => 3_600,
            Self::H4 => 14_400,
            Self::D1 => 86_400,
            Self::W1 => 604_800,
        }
    }

    /// Returns the length of one candle
    pub fn duration(self) -> TimeDelta {
        TimeDelta::seconds(self.seconds())
    }
}
