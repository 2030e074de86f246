//! Technical indicators over a price series.
//!
//! Every function returns one `Option<f64>` per input bar. Leading `None`s mark
//! the warm-up region where the formula lacks history. Empty input is an error;
//! short input just yields more `None`s. A zero period yields an all-`None` series.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

use thiserror::Error;

pub use adx::adx;
pub use atr::atr;
pub use ema::ema;
pub use macd::{MacdSeries, macd};
pub use rsi::rsi;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("indicator input series is empty")]
    EmptyInput,

    #[error("input columns differ in length: high={high}, low={low}, close={close}")]
    LengthMismatch { high: usize, low: usize, close: usize },
}

pub(crate) fn check_hlc(high: &[f64], low: &[f64], close: &[f64]) -> Result<usize, IndicatorError> {
    if high.len() != low.len() || low.len() != close.len() {
        return Err(IndicatorError::LengthMismatch {
            high: high.len(),
            low: low.len(),
            close: close.len(),
        });
    }
    if close.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }
    Ok(close.len())
}

/// Greatest of the bar range and the gaps to the previous close.
pub(crate) fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    match prev_close {
        Some(pc) => (high - low).max((high - pc).abs()).max((low - pc).abs()),
        None => high - low,
    }
}

/// Wilder's running average: `(prev * (n - 1) + x) / n`.
#[inline]
pub(crate) fn wilder(prev: f64, x: f64, period: usize) -> f64 {
    let n = period as f64;
    (prev * (n - 1.0) + x) / n
}

#[cfg(test)]
pub(crate) fn assert_close(actual: Option<f64>, expected: f64) {
    let v = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!((v - expected).abs() < 1e-9, "expected {expected}, got {v}");
}
