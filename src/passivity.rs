//! Passivity-based position controller with UDE disturbance rejection.
//!
//! The nominal term is a PD law whose damping acts on the high-passed
//! position error rather than the velocity error. A disturbance estimate
//! `u_d` is built from three filter cascades (UDE: uncertainty and
//! disturbance estimation) and subtracted from the nominal action:
//!
//! ```text
//! z  = HP_ps(pos_error)
//! u_l = accel_ref + Kp·pos_error + Kd·z
//! y1 = HP_ude(position)
//! y2 = LP_ps(pos_error)
//! y3 = LP_ude(accel_ref + Kp·integral + Kd·y2)
//! u_d = clamp(y1 - y3, int_max)
//! accel = u_l - u_d            (+ gravity on z)
//! ```
//!
//! Unlike the PID law there is no integral-engage deadband: the estimator
//! already bounds its contribution through the `u_d` clamp.

use nalgebra::Vector3;

use crate::config::ControllerConfig;
use crate::filter::{HighPassFilter, LowPassFilter};
use crate::saturation::{accel_to_thrust, constrain, saturate_xy};
use crate::state::{position_error, velocity_error, ControlMode, DroneState, TrajectoryReference};
use crate::GRAVITY;

/// Intermediate vectors of the last tick, retained for introspection.
/// They do not feed back into the law except through the filter and
/// integral state itself.
#[derive(Clone, Copy, Debug)]
pub struct UdeDiagnostics {
    /// Nominal (PD + feedforward) control term.
    pub u_l: Vector3<f64>,
    /// Clamped disturbance estimate.
    pub u_d: Vector3<f64>,
    /// High-passed position error feeding the damping term.
    pub z: Vector3<f64>,
    /// High-passed position.
    pub y1: Vector3<f64>,
    /// Low-passed position error.
    pub y2: Vector3<f64>,
    /// Low-passed integral-feedback term.
    pub y3: Vector3<f64>,
}

impl Default for UdeDiagnostics {
    fn default() -> Self {
        Self {
            u_l: Vector3::zeros(),
            u_d: Vector3::zeros(),
            z: Vector3::zeros(),
            y1: Vector3::zeros(),
            y2: Vector3::zeros(),
            y3: Vector3::zeros(),
        }
    }
}

/// Mutable per-instance state of the passivity/UDE law: the integral
/// accumulator and one independent filter per axis and role.
#[derive(Clone, Debug)]
pub struct PassivityState {
    /// Per-axis integral accumulator, bounded by `int_max`.
    pub integral: Vector3<f64>,
    hp_pos_error: [HighPassFilter; 3],
    hp_position: [HighPassFilter; 3],
    lp_pos_error: [LowPassFilter; 3],
    lp_integral_term: [LowPassFilter; 3],
    diagnostics: UdeDiagnostics,
}

impl PassivityState {
    /// Zero-initialized state with filter time constants taken from the
    /// config: `t_ps` for the error filters, `t_ude[i]` for the position
    /// and integral-term filters of axis `i`.
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            integral: Vector3::zeros(),
            hp_pos_error: std::array::from_fn(|_| HighPassFilter::new(config.t_ps)),
            hp_position: std::array::from_fn(|i| HighPassFilter::new(config.t_ude[i])),
            lp_pos_error: std::array::from_fn(|_| LowPassFilter::new(config.t_ps)),
            lp_integral_term: std::array::from_fn(|i| LowPassFilter::new(config.t_ude[i])),
            diagnostics: UdeDiagnostics::default(),
        }
    }
}

/// Passivity/UDE position controller. Owns its mutable state; the
/// configuration is read-only for the controller's lifetime.
#[derive(Clone, Debug)]
pub struct PassivityController {
    config: ControllerConfig,
    state: PassivityState,
}

impl PassivityController {
    /// Creates a controller with zeroed accumulator and filter state.
    pub fn new(config: ControllerConfig) -> Self {
        let state = PassivityState::new(&config);
        Self::with_state(config, state)
    }

    /// Creates a controller starting from an arbitrary state.
    pub fn with_state(config: ControllerConfig, state: PassivityState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &PassivityState {
        &self.state
    }

    /// Intermediates of the most recent tick.
    pub fn diagnostics(&self) -> &UdeDiagnostics {
        &self.state.diagnostics
    }

    /// Zeroes the accumulator and all filter states.
    pub fn reset(&mut self) {
        self.state = PassivityState::new(&self.config);
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
        let state = &mut self.state;

        let mut pos_error = position_error(drone, reference);
        let mut vel_error = velocity_error(drone, reference);
        for i in 0..3 {
            pos_error[i] = constrain(pos_error[i], config.pos_error_max[i]);
            vel_error[i] = constrain(vel_error[i], config.vel_error_max[i]);
        }

        // Damping acts on the high-passed position error.
        let mut z = Vector3::zeros();
        for i in 0..3 {
            z[i] = state.hp_pos_error[i].apply(pos_error[i], dt);
        }

        let mut u_l = Vector3::zeros();
        for i in 0..3 {
            u_l[i] =
                reference.acceleration_ref[i] + config.kp[i] * pos_error[i] + config.kd[i] * z[i];
        }

        // UDE cascade; y3 uses the integral carried over from the
        // previous tick.
        let mut y1 = Vector3::zeros();
        let mut y2 = Vector3::zeros();
        let mut y3 = Vector3::zeros();
        for i in 0..3 {
            y1[i] = state.hp_position[i].apply(drone.position[i], dt);
            y2[i] = state.lp_pos_error[i].apply(pos_error[i], dt);
            y3[i] = state.lp_integral_term[i].apply(
                reference.acceleration_ref[i]
                    + config.kp[i] * state.integral[i]
                    + config.kd[i] * y2[i],
                dt,
            );
        }

        let mut u_d = y1 - y3;

        for i in 0..3 {
            // No engage deadband here, unlike the PID law.
            state.integral[i] += pos_error[i] * dt;
            state.integral[i] = constrain(state.integral[i], config.int_max[i]);

            if drone.mode != ControlMode::Autonomous {
                state.integral[i] = 0.0;
            }

            u_d[i] = constrain(u_d[i], config.int_max[i]);
        }

        let mut accel_sp = u_l - u_d;
        accel_sp.z += GRAVITY;

        state.diagnostics = UdeDiagnostics {
            u_l,
            u_d,
            z,
            y1,
            y2,
            y3,
        };

        let mut thrust_sp =
            accel_to_thrust(&accel_sp, config.mass, config.throttle_a, config.throttle_b);
        saturate_xy(&mut thrust_sp, config.tilt_max_deg, config.thr_max);
        thrust_sp
    }
}
