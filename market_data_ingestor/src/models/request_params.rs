use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timeframe::TimeFrame;

/// Universal parameters for requesting time-series bar data from any market data provider.
///
/// This struct is designed to be vendor-agnostic. It is intended as the standard input for all
/// [`DataProvider`](crate::providers::DataProvider) implementations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// List of symbols to request (e.g., `["GC=F"]`, `["BTC-USD"]`).
    pub symbols: Vec<String>,

    /// The time interval for each bar (e.g., 15 minutes, 1 day).
    ///
    /// **Validation of allowed values is performed by each data provider implementation,
    /// according to their own API rules.**
    pub timeframe: TimeFrame,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (exclusive, UTC).
    pub end: DateTime<Utc>,
}

impl BarsRequestParams {
    /// Request covering the `lookback` window that ends at `end`.
    pub fn trailing(
        symbols: Vec<String>,
        timeframe: TimeFrame,
        lookback: chrono::Duration,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            symbols,
            timeframe,
            start: end - lookback,
            end,
        }
    }
}
