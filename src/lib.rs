//! Position controllers for multirotor aircraft.
//!
//! Given the drone's current state and a point on a reference trajectory,
//! each controller produces a normalized 3-axis thrust setpoint once per
//! control tick. Two interchangeable control laws are provided:
//!
//! - [`PidController`]: feedforward + P + D + conditionally-integrated I
//! - [`PassivityController`]: passivity-based PD law with an uncertainty
//!   and disturbance estimation (UDE) correction built from single-pole
//!   filter cascades
//!
//! Both laws share the same error clamping, affine motor-model inversion
//! and tilt/capacity thrust saturation. Everything below the thrust
//! setpoint (attitude control, motor mixing) is out of scope.

pub mod config;
pub mod filter;
pub mod passivity;
pub mod pid;
pub mod saturation;
pub mod state;

pub use config::{ConfigError, ControllerConfig};
pub use passivity::{PassivityController, PassivityState, UdeDiagnostics};
pub use pid::{PidController, PidState};
pub use state::{ControlMode, DroneState, TrajectoryReference};

/// Gravitational acceleration used for vertical-axis compensation (m/s²).
pub const GRAVITY: f64 = 9.8;
