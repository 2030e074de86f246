//! Bar interval (`amount × unit`) shared by requests, responses and scheduling.
//!
//! A [`TimeFrame`] round-trips through the compact string form used in
//! configuration files: `15m`, `1h`, `1d`, `1w`, `1mo`.
//!
//! ```
//! use market_data_ingestor::models::timeframe::{TimeFrame, TimeFrameUnit};
//!
//! let tf: TimeFrame = "15m".parse().unwrap();
//! assert_eq!(tf, TimeFrame::new(15, TimeFrameUnit::Minute));
//! assert_eq!(tf.to_duration().as_secs(), 900);
//! assert_eq!(tf.to_string(), "15m");
//! ```

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFrameError {
    #[error("Invalid amount for {:?}: {}", unit, message)]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    /// Fixed 30-day month when converted to a [`Duration`].
    Month,
}

impl TimeFrameUnit {
    const fn secs(self) -> u64 {
        match self {
            TimeFrameUnit::Minute => 60,
            TimeFrameUnit::Hour => 3_600,
            TimeFrameUnit::Day => 86_400,
            TimeFrameUnit::Week => 7 * 86_400,
            TimeFrameUnit::Month => 30 * 86_400,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "d",
            TimeFrameUnit::Week => "w",
            TimeFrameUnit::Month => "mo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub const fn new(amount: u32, unit: TimeFrameUnit) -> Self {
        Self { amount, unit }
    }

    pub fn minutes(amount: u32) -> Result<Self, TimeFrameError> {
        Self::checked(amount, TimeFrameUnit::Minute)
    }

    pub fn hours(amount: u32) -> Result<Self, TimeFrameError> {
        Self::checked(amount, TimeFrameUnit::Hour)
    }

    pub fn days(amount: u32) -> Result<Self, TimeFrameError> {
        Self::checked(amount, TimeFrameUnit::Day)
    }

    fn checked(amount: u32, unit: TimeFrameUnit) -> Result<Self, TimeFrameError> {
        if amount == 0 {
            return Err(TimeFrameError::InvalidAmount {
                unit,
                message: "amount must be greater than zero".into(),
            });
        }
        Ok(Self { amount, unit })
    }

    /// Wall-clock length of one interval.
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.amount) * self.unit.secs())
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TimeFrameError::InvalidInput {
                message: format!("missing unit in timeframe {s:?}"),
            })?;
        let (digits, unit) = s.split_at(split);
        let amount: u32 = digits.parse().map_err(|_| TimeFrameError::InvalidInput {
            message: format!("invalid amount in timeframe {s:?}"),
        })?;
        let unit = match unit {
            "m" | "min" | "minute" | "minutes" => TimeFrameUnit::Minute,
            "h" | "hr" | "hour" | "hours" => TimeFrameUnit::Hour,
            "d" | "day" | "days" => TimeFrameUnit::Day,
            "w" | "wk" | "week" | "weeks" => TimeFrameUnit::Week,
            "mo" | "month" | "months" => TimeFrameUnit::Month,
            other => {
                return Err(TimeFrameError::InvalidInput {
                    message: format!("unknown timeframe unit {other:?}"),
                });
            }
        };
        Self::checked(amount, unit)
    }
}

impl TryFrom<String> for TimeFrame {
    type Error = TimeFrameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeFrame> for String {
    fn from(value: TimeFrame) -> Self {
        value.to_string()
    }
}
