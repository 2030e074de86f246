use super::{IndicatorError, check_hlc, true_range, wilder};

/// Average Directional Index (trend strength, `[0, 100]`).
///
/// 1. +DM / −DM and true range from consecutive bars (from index 1)
/// 2. Wilder-smoothed sums of each, seeded with the plain sum of the first `period`
/// 3. +DI, −DI and DX from the smoothed sums (from index `period`)
/// 4. ADX = mean of the first `period` DX values (index `2·period − 1`), then Wilder smoothing
pub fn adx(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    let n = check_hlc(high, low, close)?;
    let mut out = vec![None; n];
    if period == 0 || n < 2 * period {
        return Ok(out);
    }

    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    let mut tr = vec![0.0; n];
    for i in 1..n {
        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];
        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
        tr[i] = true_range(high[i], low[i], Some(close[i - 1]));
    }

    let w = period as f64;
    let mut s_plus: f64 = plus_dm[1..=period].iter().sum();
    let mut s_minus: f64 = minus_dm[1..=period].iter().sum();
    let mut s_tr: f64 = tr[1..=period].iter().sum();

    let mut dx = vec![0.0; n];
    dx[period] = directional_index(s_plus, s_minus, s_tr);
    for i in (period + 1)..n {
        s_plus = s_plus - s_plus / w + plus_dm[i];
        s_minus = s_minus - s_minus / w + minus_dm[i];
        s_tr = s_tr - s_tr / w + tr[i];
        dx[i] = directional_index(s_plus, s_minus, s_tr);
    }

    let first = 2 * period - 1;
    let mut value = dx[period..=first].iter().sum::<f64>() / w;
    out[first] = Some(value);
    for i in (first + 1)..n {
        value = wilder(value, dx[i], period);
        out[i] = Some(value);
    }
    Ok(out)
}

fn directional_index(s_plus: f64, s_minus: f64, s_tr: f64) -> f64 {
    if s_tr <= 0.0 {
        return 0.0;
    }
    let di_plus = 100.0 * s_plus / s_tr;
    let di_minus = 100.0 * s_minus / s_tr;
    let sum = di_plus + di_minus;
    if sum > 0.0 {
        100.0 * (di_plus - di_minus).abs() / sum
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_close;

    fn trend(n: usize, step: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * step).collect();
        let high = close.iter().map(|c| c + 0.5).collect();
        let low = close.iter().map(|c| c - 0.5).collect();
        (high, low, close)
    }

    #[test]
    fn first_value_at_twice_the_period() {
        let (h, l, c) = trend(40, 1.0);
        let out = adx(&h, &l, &c, 14).unwrap();
        assert!(out[..27].iter().all(Option::is_none));
        assert!(out[27..].iter().all(Option::is_some));
    }

    #[test]
    fn steady_trend_is_maximally_directional() {
        // every bar: +DM = 1, -DM = 0, so DX = 100 throughout
        let (h, l, c) = trend(30, 1.0);
        let out = adx(&h, &l, &c, 5).unwrap();
        assert_close(out[29], 100.0);
    }

    #[test]
    fn flat_market_has_no_trend_strength() {
        let (h, l, c) = trend(30, 0.0);
        let out = adx(&h, &l, &c, 5).unwrap();
        assert_close(out[29], 0.0);
    }

    #[test]
    fn stays_within_bounds_on_choppy_data() {
        let close: Vec<f64> = (0..120).map(|i| 100.0 + ((i * 7) % 11) as f64 - 5.0).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.5).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.5).collect();
        let out = adx(&high, &low, &close, 14).unwrap();
        for v in out.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn short_input_is_undefined() {
        let (h, l, c) = trend(27, 1.0);
        assert!(adx(&h, &l, &c, 14).unwrap().iter().all(Option::is_none));
        assert_eq!(adx(&[], &[], &[], 14), Err(IndicatorError::EmptyInput));
    }
}
