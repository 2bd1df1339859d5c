// Small angle and smoothing helpers shared by the motion and camera code.

use std::f32::consts::{PI, TAU};

/// Wrap an angle in radians into (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

/// Signed shortest angular distance from `from` to `to`, in (-PI, PI].
pub fn angle_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Frame-rate independent interpolation factor `1 - e^(-rate * dt)`.
///
/// Applying `value += (target - value) * smoothing_factor(rate, dt)` each
/// frame converges at the same wall-clock speed regardless of frame rate.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}
