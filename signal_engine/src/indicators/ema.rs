use super::IndicatorError;

/// Exponential moving average, α = 2/(period+1).
///
/// Seeded with the first observation (no bias adjustment), then
/// `value = α·x + (1−α)·value`. A value is reported once `period` observations
/// have been folded in, i.e. from index `period - 1`.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    if values.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    Ok(ema_of_defined(&wrapped, period))
}

/// EMA over a series that itself has a warm-up prefix.
///
/// Leading `None`s are skipped and the average is seeded with the first defined
/// value. A `None` after that point is reported as `None` without disturbing
/// the running average.
pub(crate) fn ema_of_defined(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut value = 0.0;
    let mut seen = 0usize;
    for (slot, x) in out.iter_mut().zip(values) {
        let Some(x) = *x else { continue };
        value = if seen == 0 {
            x
        } else {
            alpha * x + (1.0 - alpha) * value
        };
        seen += 1;
        if seen >= period {
            *slot = Some(value);
        }
    }
    out
}
