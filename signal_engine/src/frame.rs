//! Aligned per-bar indicator values with the warm-up rows removed.

use chrono::{DateTime, Utc};
use market_data_ingestor::models::bar::BarSeries;

use crate::indicators::{self, IndicatorError};

/// Periods for every indicator the classifier reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ema_long: usize,
    pub atr: usize,
    pub adx: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_long: 200,
            atr: 14,
            adx: 14,
        }
    }
}

/// One bar where every indicator is defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ema_long: f64,
    pub atr: f64,
    pub adx: f64,
}

impl IndicatorRow {
    fn is_finite(&self) -> bool {
        [
            self.close,
            self.rsi,
            self.macd,
            self.macd_signal,
            self.ema_long,
            self.atr,
            self.adx,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Fully-defined indicator rows, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// Runs the indicator set over `series` and keeps only the rows where
    /// every indicator is defined and finite.
    ///
    /// An empty series yields [`IndicatorError::EmptyInput`].
    pub fn compute(series: &BarSeries, params: &IndicatorParams) -> Result<Self, IndicatorError> {
        let close = series.closes();
        let high = series.highs();
        let low = series.lows();

        let rsi = indicators::rsi(&close, params.rsi)?;
        let macd = indicators::macd(&close, params.macd_fast, params.macd_slow, params.macd_signal)?;
        let ema_long = indicators::ema(&close, params.ema_long)?;
        let atr = indicators::atr(&high, &low, &close, params.atr)?;
        let adx = indicators::adx(&high, &low, &close, params.adx)?;

        let rows = series
            .bars
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                Some(IndicatorRow {
                    timestamp: bar.timestamp,
                    close: bar.close,
                    rsi: rsi[i]?,
                    macd: macd.line[i]?,
                    macd_signal: macd.signal[i]?,
                    ema_long: ema_long[i]?,
                    atr: atr[i]?,
                    adx: adx[i]?,
                })
            });
        Ok(Self::from_rows(rows))
    }

    /// Builds a frame from precomputed rows, dropping non-finite ones.
    pub fn from_rows(rows: impl IntoIterator<Item = IndicatorRow>) -> Self {
        Self {
            rows: rows.into_iter().filter(IndicatorRow::is_finite).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    /// Mean ATR over all rows, `None` for an empty frame.
    pub fn mean_atr(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        Some(self.rows.iter().map(|r| r.atr).sum::<f64>() / self.rows.len() as f64)
    }
}
