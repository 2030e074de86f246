use chrono::DateTime;
use serde::Deserialize;

use crate::models::bar::Bar;

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Deserialize, Debug)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Absent when the range contains no bars.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Deserialize, Debug)]
pub struct ChartMeta {
    pub symbol: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

/// Column-oriented OHLCV arrays; `null` marks a bar the exchange did not fill.
#[derive(Deserialize, Debug, Default)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResult {
    /// Zips the column arrays into bars.
    ///
    /// Rows with a missing OHLC value or a timestamp that does not advance past
    /// the previous kept bar are dropped. Missing volume counts as zero.
    pub fn into_bars(self) -> Vec<Bar> {
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let column = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        let mut bars: Vec<Bar> = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
                continue;
            };
            let (Some(open), Some(high), Some(low), Some(close)) = (
                column(&quote.open, i),
                column(&quote.high, i),
                column(&quote.low, i),
                column(&quote.close, i),
            ) else {
                continue;
            };
            if bars.last().is_some_and(|prev| prev.timestamp >= timestamp) {
                continue;
            }
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: column(&quote.volume, i).unwrap_or(0.0),
            });
        }
        bars
    }
}
