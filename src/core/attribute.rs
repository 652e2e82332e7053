/// The pad attribute — one bounded numeric value that choices adjust.

pub const PAD_MIN: f64 = -100.0;
pub const PAD_MAX: f64 = 100.0;

/// Apply a signed delta, clamping into `[PAD_MIN, PAD_MAX]`. Total: no
/// delta, applied once or many times, can push the value out of range.
pub fn apply_delta(current: f64, delta: f64) -> f64 {
    (current + delta).clamp(PAD_MIN, PAD_MAX)
}

/// Clamp a raw value (e.g. from a snapshot or foundation file) into range.
pub fn clamp(value: f64) -> f64 {
    value.clamp(PAD_MIN, PAD_MAX)
}
