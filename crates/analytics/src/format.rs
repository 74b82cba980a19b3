/// Rounds `value` to `digits` decimal places, half away from zero.
///
/// Values too large to scale without overflow are returned unchanged.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
