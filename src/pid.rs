//! Feedforward + PID position controller.
//!
//! Per-axis law: `accel = accel_ref + Kp·pos_error + Kd·vel_error +
//! Ki·integral`, with gravity compensation on the vertical axis. The
//! integral only engages inside a position-error deadband and is reset
//! outside it, as well as whenever the vehicle leaves autonomous mode.

use nalgebra::Vector3;

use crate::config::ControllerConfig;
use crate::saturation::{accel_to_thrust, constrain, saturate_xy};
use crate::state::{position_error, velocity_error, ControlMode, DroneState, TrajectoryReference};
use crate::GRAVITY;

/// Mutable per-instance state of the PID law.
#[derive(Clone, Copy, Debug)]
pub struct PidState {
    /// Per-axis integral accumulator, bounded by `int_max`.
    pub integral: Vector3<f64>,
}

impl Default for PidState {
    fn default() -> Self {
        Self {
            integral: Vector3::zeros(),
        }
    }
}

/// PID position controller. Owns its mutable state; the configuration is
/// read-only for the controller's lifetime.
#[derive(Clone, Debug)]
pub struct PidController {
    config: ControllerConfig,
    state: PidState,
}

impl PidController {
    /// Creates a controller with zeroed state.
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_state(config, PidState::default())
    }

    /// Creates a controller starting from an arbitrary state.
    pub fn with_state(config: ControllerConfig, state: PidState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }

    /// Zeroes the integral accumulator.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    /// Runs one control tick and returns the normalized thrust setpoint.
    ///
    /// Call exactly once per fixed-rate tick with `dt > 0`; `dt <= 0` is a
    /// caller contract violation and is not checked here.
    pub fn pos_controller(
        &mut self,
        drone: &DroneState,
        reference: &TrajectoryReference,
        dt: f64,
    ) -> Vector3<f64> {
        let config = &self.config;

        let mut pos_error = position_error(drone, reference);
        let mut vel_error = velocity_error(drone, reference);
        for i in 0..3 {
            pos_error[i] = constrain(pos_error[i], config.pos_error_max[i]);
            vel_error[i] = constrain(vel_error[i], config.vel_error_max[i]);
        }

        // Feedforward + PID, using the integral carried over from the
        // previous tick.
        let mut accel_sp = Vector3::zeros();
        for i in 0..3 {
            accel_sp[i] = reference.acceleration_ref[i]
                + config.kp[i] * pos_error[i]
                + config.kd[i] * vel_error[i]
                + config.ki[i] * self.state.integral[i];
        }
        accel_sp.z += GRAVITY;

        for i in 0..3 {
            if pos_error[i].abs() < config.int_start_error {
                self.state.integral[i] += pos_error[i] * dt;
                self.state.integral[i] = constrain(self.state.integral[i], config.int_max[i]);
            } else {
                self.state.integral[i] = 0.0;
            }

            // The mode gate wins over the deadband update.
            if drone.mode != ControlMode::Autonomous {
                self.state.integral[i] = 0.0;
            }
        }

        let mut thrust_sp =
            accel_to_thrust(&accel_sp, config.mass, config.throttle_a, config.throttle_b);
        saturate_xy(&mut thrust_sp, config.tilt_max_deg, config.thr_max);
        thrust_sp
    }
}
