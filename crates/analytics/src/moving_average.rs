use crate::error::AnalyticsError;
use crate::scale::{scale_of, scaled_mean};

/// Trailing (right-aligned) simple moving average.
///
/// Element `i` is the mean of the present values in `[max(0, i - window + 1), i]`,
/// so the first `window - 1` points use an expanding window and the function
/// never looks ahead. Absent values are skipped; a window holding no present
/// value at all yields `None`. The output always has the input's length.
pub fn moving_average(
    series: &[Option<f64>],
    window: usize,
) -> Result<Vec<Option<f64>>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow(window));
    }

    let out = (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let present = series[start..=i].iter().flatten();
            let scale = scale_of(present.clone());
            scaled_mean(present, scale).map(|mean| mean * scale)
        })
        .collect();

    Ok(out)
}
