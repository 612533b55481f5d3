//! Shared clamping and thrust-limiting logic.
//!
//! Both control laws end in the same two steps: invert the affine motor
//! model to go from acceleration to normalized thrust, then bound the XY
//! thrust by the tilt limit and the remaining thrust capacity.

use nalgebra::Vector3;

/// Symmetric clamp of `value` to `[-limit, limit]`.
pub fn constrain(value: f64, limit: f64) -> f64 {
    value.clamp(-limit, limit)
}

/// Inverts the affine motor model per axis:
/// `thrust = (accel·mass - throttle_b) / throttle_a`.
pub fn accel_to_thrust(
    accel: &Vector3<f64>,
    mass: f64,
    throttle_a: f64,
    throttle_b: f64,
) -> Vector3<f64> {
    accel.map(|a| (a * mass - throttle_b) / throttle_a)
}

/// Bounds the XY thrust in place, leaving Z untouched.
///
/// The XY magnitude may not exceed either the tilt limit
/// `|tz|·tan(tilt_max)` or the remaining capacity
/// `sqrt(thr_max² - tz²)`. The capacity radicand is clamped to zero so a
/// Z thrust beyond `thr_max` cannot produce a NaN, and a zero-magnitude
/// XY vector is left unchanged.
pub fn saturate_xy(thrust: &mut Vector3<f64>, tilt_max_deg: f64, thr_max: f64) {
    let tilt_max = tilt_max_deg.to_radians();
    let max_xy_tilt = thrust.z.abs() * tilt_max.tan();
    let max_xy_capacity = (thr_max * thr_max - thrust.z * thrust.z).max(0.0).sqrt();
    let max_xy = max_xy_tilt.min(max_xy_capacity);

    let xy_squared = thrust.x * thrust.x + thrust.y * thrust.y;
    if xy_squared > max_xy * max_xy {
        let magnitude = xy_squared.sqrt();
        if magnitude > 0.0 {
            thrust.x = thrust.x / magnitude * max_xy;
            thrust.y = thrust.y / magnitude * max_xy;
        }
    }
}
