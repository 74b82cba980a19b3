//! Magnitude normalisation for the summing kernels.
//!
//! Sums of squares over values near `f64::MAX` overflow and over values near
//! `f64::MIN_POSITIVE` underflow. Dividing a series by a power of two close to
//! its largest magnitude keeps every intermediate in a safe range. Scaling by a
//! power of two is exact for normal numbers, so results for ordinary data are
//! bit-for-bit what the unscaled formula gives.

/// The power of two `2^e` with `2^e <= max_abs < 2^(e+1)`, or `1.0` when
/// `max_abs` is zero or not finite. Subnormal magnitudes use the smallest
/// normal power so the scale itself is never subnormal.
pub(crate) fn power_of_two_scale(max_abs: f64) -> f64 {
    if max_abs == 0.0 || !max_abs.is_finite() {
        return 1.0;
    }
    let biased_exponent = (max_abs.to_bits() >> 52) & 0x7ff;
    f64::from_bits(biased_exponent.max(1) << 52)
}

/// Scale for a series: the power of two just below its largest magnitude.
pub(crate) fn scale_of<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    power_of_two_scale(values.into_iter().fold(0.0, |m: f64, v| m.max(v.abs())))
}

/// Mean of `values / scale`, or `None` for an empty series.
///
/// The result is clamped to the scaled min and max. Summation error then can
/// never push the mean outside the data, and a constant series gets an exact
/// mean with zero deviations.
pub(crate) fn scaled_mean<'a>(
    values: impl IntoIterator<Item = &'a f64>,
    scale: f64,
) -> Option<f64> {
    let (mut sum, mut n) = (0.0, 0usize);
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        let s = v / scale;
        sum += s;
        n += 1;
        lo = lo.min(s);
        hi = hi.max(s);
    }
    (n > 0).then(|| (sum / n as f64).clamp(lo, hi))
}
