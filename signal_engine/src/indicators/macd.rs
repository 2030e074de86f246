use super::{IndicatorError, ema::ema_of_defined};

/// MACD line and its signal line, aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    /// `EMA(fast) − EMA(slow)`, defined once the slow EMA is.
    pub line: Vec<Option<f64>>,
    /// EMA of the defined part of `line`.
    pub signal: Vec<Option<f64>>,
}

/// Moving Average Convergence Divergence.
///
/// With the usual 12/26/9 the line starts at index 25 and the signal at index 33.
pub fn macd(
    close: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdSeries, IndicatorError> {
    if close.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }
    let wrapped: Vec<Option<f64>> = close.iter().copied().map(Some).collect();
    let fast_ema = ema_of_defined(&wrapped, fast);
    let slow_ema = ema_of_defined(&wrapped, slow);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal = ema_of_defined(&line, signal);

    Ok(MacdSeries { line, signal })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_close, ema};

    #[test]
    fn standard_warm_up_offsets() {
        let close: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let out = macd(&close, 12, 26, 9).unwrap();
        assert!(out.line[..25].iter().all(Option::is_none));
        assert!(out.line[25..].iter().all(Option::is_some));
        assert!(out.signal[..33].iter().all(Option::is_none));
        assert!(out.signal[33..].iter().all(Option::is_some));
    }

    #[test]
    fn line_is_difference_of_emas() {
        let close: Vec<f64> = (0..40).map(|i| 50.0 + i as f64 * 0.5).collect();
        let out = macd(&close, 3, 6, 4).unwrap();
        let fast = ema(&close, 3).unwrap();
        let slow = ema(&close, 6).unwrap();
        for i in 5..40 {
            assert_close(out.line[i], fast[i].unwrap() - slow[i].unwrap());
        }
    }

    #[test]
    fn rising_prices_put_line_above_signal() {
        // accelerating uptrend keeps the fast EMA pulling away from the slow one
        let close: Vec<f64> = (0..80).map(|i| 100.0 + (i * i) as f64 * 0.01).collect();
        let out = macd(&close, 12, 26, 9).unwrap();
        let last = close.len() - 1;
        assert!(out.line[last].unwrap() > 0.0);
        assert!(out.line[last].unwrap() > out.signal[last].unwrap());
    }

    #[test]
    fn short_input_has_no_signal() {
        let out = macd(&[1.0; 20], 12, 26, 9).unwrap();
        assert!(out.line.iter().chain(&out.signal).all(Option::is_none));
        assert_eq!(macd(&[], 12, 26, 9), Err(IndicatorError::EmptyInput));
    }
}
