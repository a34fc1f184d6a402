//! Rounding and averaging helpers shared by the engines.

/// Round to the nearest integer with halves rounded up (towards +∞).
///
/// `f64::round` rounds halves away from zero, which disagrees on negative
/// halves (-2.5 becomes -3 there, -2 here). Non-finite input yields 0.
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}

/// Round to one decimal place for percentage display.
pub fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean, 0 for an empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `part / whole × 100`, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Sum that pins at the `i64` bounds instead of overflowing.
pub fn saturating_sum<I>(values: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    values.into_iter().fold(0i64, i64::saturating_add)
}
