use crate::error::AnalyticsError;
use crate::scale::{scale_of, scaled_mean};
use serde::{Serialize, Serializer};
use std::fmt;

/// Pearson product-moment correlation coefficient of two equal-length series.
///
/// When either series has zero variance the coefficient is defined as `0.0`.
/// The result is clamped to `[-1, 1]` and is never NaN for finite input.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, AnalyticsError> {
    if x.len() != y.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(AnalyticsError::NoData);
    }

    // r is invariant under positive scaling, so each series is brought near
    // unit magnitude before any products are formed.
    let (scale_x, scale_y) = (scale_of(x), scale_of(y));
    let mean_x = scaled_mean(x, scale_x).ok_or(AnalyticsError::NoData)?;
    let mean_y = scaled_mean(y, scale_y).ok_or(AnalyticsError::NoData)?;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a / scale_x - mean_x;
        let dy = b / scale_y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Ok(0.0);
    }
    Ok((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Qualitative bucket for a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    StrongPositive,
    ModeratePositive,
    StrongNegative,
    ModerateNegative,
    Weak,
}

impl Interpretation {
    /// Buckets `r`. Branches are checked in this order and the first match wins.
    pub fn from_r(r: f64) -> Self {
        if r >= 0.7 {
            Self::StrongPositive
        } else if r >= 0.4 {
            Self::ModeratePositive
        } else if r <= -0.7 {
            Self::StrongNegative
        } else if r <= -0.4 {
            Self::ModerateNegative
        } else {
            Self::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongPositive => "Strong positive correlation",
            Self::ModeratePositive => "Moderate positive correlation",
            Self::StrongNegative => "Strong negative correlation",
            Self::ModerateNegative => "Moderate negative correlation",
            Self::Weak => "Weak or no correlation",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Interpretation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;
    const X: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn perfectly_linear_series() {
        let r = pearson(&X, &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
        assert!((r - 1.0).abs() < EPS);
        assert_eq!(Interpretation::from_r(r).label(), "Strong positive correlation");

        let r = pearson(&X, &[5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < EPS);
        assert_eq!(Interpretation::from_r(r).label(), "Strong negative correlation");
    }

    #[test]
    fn self_correlation_is_one() {
        let y = [3.1, -2.0, 8.5, 0.0, 4.4];
        assert!((pearson(&y, &y).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn symmetric_and_affine_invariant() {
        let y = [2.5, 1.0, 4.0, 3.5, 9.0];
        let r_xy = pearson(&X, &y).unwrap();
        let r_yx = pearson(&y, &X).unwrap();
        assert!((r_xy - r_yx).abs() < EPS);

        let scaled: Vec<f64> = y.iter().map(|v| 3.0 * v + 17.0).collect();
        assert!((pearson(&X, &scaled).unwrap() - r_xy).abs() < 1e-9);
    }

    #[test]
    fn zero_variance_is_zero_not_nan() {
        let r = pearson(&X, &[4.0; 5]).unwrap();
        assert_eq!(r, 0.0);
        assert_eq!(Interpretation::from_r(r), Interpretation::Weak);
    }

    #[test]
    fn extreme_magnitudes_keep_full_range() {
        let tiny = [1e-160, 2e-160, 3e-160, 4e-160];
        let r = pearson(&tiny, &tiny).unwrap();
        assert!((r - 1.0).abs() < EPS);
        assert_eq!(Interpretation::from_r(r), Interpretation::StrongPositive);

        let huge = [1e200, 2e200, 3e200, 4e200];
        let r = pearson(&huge, &huge).unwrap();
        assert!((r - 1.0).abs() < EPS);
        assert_eq!(Interpretation::from_r(r), Interpretation::StrongPositive);

        let r = pearson(&tiny, &[4e200, 3e200, 2e200, 1e200]).unwrap();
        assert!((r + 1.0).abs() < EPS);

        let r = pearson(&[-f64::MAX, f64::MAX, 0.0], &[f64::MAX, -f64::MAX, 0.0]).unwrap();
        assert!((r + 1.0).abs() < EPS);
    }

    #[test]
    fn constant_series_with_inexact_sum_is_zero() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], &[0.1; 7]).unwrap();
        assert_eq!(r, 0.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(pearson(&[], &[]), Err(AnalyticsError::NoData));
        assert_eq!(
            pearson(&X, &[1.0]),
            Err(AnalyticsError::LengthMismatch { left: 5, right: 1 })
        );
    }

    #[test]
    fn bucket_thresholds() {
        assert_eq!(Interpretation::from_r(0.7), Interpretation::StrongPositive);
        assert_eq!(Interpretation::from_r(0.69), Interpretation::ModeratePositive);
        assert_eq!(Interpretation::from_r(0.4), Interpretation::ModeratePositive);
        assert_eq!(Interpretation::from_r(0.39), Interpretation::Weak);
        assert_eq!(Interpretation::from_r(-0.39), Interpretation::Weak);
        assert_eq!(Interpretation::from_r(-0.4), Interpretation::ModerateNegative);
        assert_eq!(Interpretation::from_r(-0.69), Interpretation::ModerateNegative);
        assert_eq!(Interpretation::from_r(-0.7), Interpretation::StrongNegative);
        assert_eq!(Interpretation::from_r(-1.0), Interpretation::StrongNegative);
        assert_eq!(Interpretation::from_r(0.0).to_string(), "Weak or no correlation");
    }
}
