//! Derived metrics.

/// Feels-like temperature from air temperature (°C) and relative humidity (%).
///
/// 14.5 °C is the fixed point: the humidity term vanishes there.
pub fn apparent_temperature_raw(temp_c: f64, rel_humidity_pct: f64) -> f64 {
    temp_c - (0.55 - 0.0055 * rel_humidity_pct) * (temp_c - 14.5)
}

/// [`apparent_temperature_raw`] rounded to a whole degree, halves rounding up.
pub fn apparent_temp(temp_c: f64, rel_humidity_pct: f64) -> i32 {
    (apparent_temperature_raw(temp_c, rel_humidity_pct) + 0.5).floor() as i32
}
