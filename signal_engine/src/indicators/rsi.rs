use super::{IndicatorError, wilder};

/// Relative Strength Index with Wilder smoothing, in `[0, 100]`.
///
/// The first average gain/loss is the simple mean of the first `period` price
/// changes, so the first value sits at index `period`. A flat window reports 50;
/// a window with gains and no losses reports 100.
pub fn rsi(close: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    if close.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }
    let mut out = vec![None; close.len()];
    if period == 0 || close.len() <= period {
        return Ok(out);
    }

    let change = |i: usize| close[i] - close[i - 1];

    let (mut gain_sum, mut loss_sum) = (0.0, 0.0);
    for i in 1..=period {
        let c = change(i);
        gain_sum += c.max(0.0);
        loss_sum += (-c).max(0.0);
    }
    let mut avg_gain = gain_sum / period as f64;
    let mut avg_loss = loss_sum / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..close.len() {
        let c = change(i);
        avg_gain = wilder(avg_gain, c.max(0.0), period);
        avg_loss = wilder(avg_loss, (-c).max(0.0), period);
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    Ok(out)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
