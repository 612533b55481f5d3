//! Per-tick controller inputs.
//!
//! The vehicle state and trajectory reference are consumed read-only by
//! both control laws; the per-axis tracking errors derived from them are
//! computed here.

use nalgebra::Vector3;

/// Flight mode as seen by the position controllers.
///
/// The controllers only need to know whether the vehicle is under
/// autonomous (offboard) control; every other mode behaves identically,
/// so the full flight-stack mode enumeration is collapsed to two values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// Autonomous/offboard flight; integral action is engaged.
    Autonomous,
    /// Any other mode; integral accumulators are held at zero.
    #[default]
    Other,
}

/// Vehicle state sampled at the start of a control tick. Read-only.
#[derive(Clone, Copy, Debug)]
pub struct DroneState {
    /// Position in the inertial frame (m).
    pub position: Vector3<f64>,
    /// Velocity in the inertial frame (m/s).
    pub velocity: Vector3<f64>,
    /// Current flight mode.
    pub mode: ControlMode,
}

impl Default for DroneState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            mode: ControlMode::Other,
        }
    }
}

/// One point on the reference trajectory. Read-only.
#[derive(Clone, Copy, Debug)]
pub struct TrajectoryReference {
    /// Reference position (m).
    pub position_ref: Vector3<f64>,
    /// Reference velocity (m/s).
    pub velocity_ref: Vector3<f64>,
    /// Reference (feedforward) acceleration (m/s²).
    pub acceleration_ref: Vector3<f64>,
    /// Reference yaw (rad). Carried for downstream attitude generation.
    pub yaw_ref: f64,
}

impl Default for TrajectoryReference {
    fn default() -> Self {
        Self {
            position_ref: Vector3::zeros(),
            velocity_ref: Vector3::zeros(),
            acceleration_ref: Vector3::zeros(),
            yaw_ref: 0.0,
        }
    }
}

/// Per-axis position tracking error, reference minus current.
pub fn position_error(state: &DroneState, reference: &TrajectoryReference) -> Vector3<f64> {
    reference.position_ref - state.position
}

/// Per-axis velocity tracking error, reference minus current.
pub fn velocity_error(state: &DroneState, reference: &TrajectoryReference) -> Vector3<f64> {
    reference.velocity_ref - state.velocity
}
