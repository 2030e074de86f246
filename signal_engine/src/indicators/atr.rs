use super::{IndicatorError, check_hlc, true_range, wilder};

/// Average True Range with Wilder smoothing, in price units.
///
/// The first value is the mean of the first `period` true ranges (index
/// `period - 1`); the first true range is just `high - low`.
pub fn atr(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    let n = check_hlc(high, low, close)?;
    let mut out = vec![None; n];
    if period == 0 || n < period {
        return Ok(out);
    }

    let tr: Vec<f64> = (0..n)
        .map(|i| true_range(high[i], low[i], i.checked_sub(1).map(|p| close[p])))
        .collect();

    let mut value = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(value);
    for i in period..n {
        value = wilder(value, tr[i], period);
        out[i] = Some(value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_close;

    #[test]
    fn seed_then_wilder() {
        let high = [10.0, 11.0, 12.0, 15.0];
        let low = [8.0, 9.0, 11.0, 12.0];
        let close = [9.0, 10.0, 11.5, 14.0];
        // TR: 2, max(2, 2, 0)=2, max(1, 2, 1)=2, max(3, 3.5, 0.5)=3.5
        let out = atr(&high, &low, &close, 3).unwrap();
        assert_eq!(out[..2], [None, None]);
        assert_close(out[2], 2.0);
        assert_close(out[3], (2.0 * 2.0 + 3.5) / 3.0);
    }

    #[test]
    fn too_short_is_undefined() {
        assert_eq!(atr(&[2.0], &[1.0], &[1.5], 14).unwrap(), vec![None]);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert!(matches!(
            atr(&[2.0, 3.0], &[1.0], &[1.5, 2.5], 1),
            Err(IndicatorError::LengthMismatch { .. })
        ));
    }
}
