//! Controller configuration.
//!
//! All tunable parameters for both control laws live in one struct that is
//! loaded once (from a TOML file or built in code) and never mutated by the
//! controllers. Defaults match a ~1 kg quadrotor with a normalized thrust
//! range of 0.1..0.9.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised while loading or validating a [`ControllerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid parameter: {name}")]
    InvalidParameter { name: &'static str },
}

/// Tunable parameters shared by the PID and passivity/UDE position
/// controllers. Immutable for the lifetime of a controller instance;
/// cheap to clone and safe to share between instances.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Vehicle mass (kg).
    pub mass: f64,
    /// Linear coefficient of the thrust model `accel·mass = a·thrust + b`.
    pub throttle_a: f64,
    /// Constant coefficient of the thrust model.
    pub throttle_b: f64,

    /// Proportional gain per axis.
    pub kp: Vector3<f64>,
    /// Derivative gain per axis.
    pub kd: Vector3<f64>,
    /// Integral gain per axis (PID law only).
    pub ki: Vector3<f64>,

    /// UDE filter time constant per axis (passivity law only).
    pub t_ude: Vector3<f64>,
    /// Passivity filter time constant (passivity law only).
    pub t_ps: f64,

    /// Position error clamp per axis (m).
    pub pos_error_max: Vector3<f64>,
    /// Velocity error clamp per axis (m/s).
    pub vel_error_max: Vector3<f64>,
    /// Integral accumulator and disturbance-estimate clamp per axis.
    pub int_max: Vector3<f64>,

    /// Minimum normalized collective thrust.
    pub thr_min: f64,
    /// Maximum normalized collective thrust.
    pub thr_max: f64,
    /// Maximum lean angle for XY thrust saturation (degrees).
    pub tilt_max_deg: f64,
    /// Position-error deadband below which the PID integral engages (m).
    pub int_start_error: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            throttle_a: 20.0,
            throttle_b: 0.0,
            kp: Vector3::new(1.0, 1.0, 2.0),
            kd: Vector3::new(0.5, 0.5, 0.5),
            ki: Vector3::new(0.2, 0.2, 0.2),
            t_ude: Vector3::new(1.0, 1.0, 1.0),
            t_ps: 1.0,
            pos_error_max: Vector3::new(0.6, 0.6, 1.0),
            vel_error_max: Vector3::new(0.3, 0.3, 1.0),
            int_max: Vector3::new(0.5, 0.5, 0.5),
            thr_min: 0.1,
            thr_max: 0.9,
            tilt_max_deg: 20.0,
            int_start_error: 0.3,
        }
    }
}

impl ControllerConfig {
    /// Parses a config from TOML text. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks the parameters a controller divides by or feeds to `tan`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, name: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter { name })
            }
        }

        check(self.mass > 0.0, "mass")?;
        check(self.throttle_a > 0.0, "throttle_a")?;
        check(self.t_ps > 0.0, "t_ps")?;
        check(self.t_ude.iter().all(|&t| t > 0.0), "t_ude")?;
        check(self.thr_max > 0.0, "thr_max")?;
        check(
            self.tilt_max_deg > 0.0 && self.tilt_max_deg < 90.0,
            "tilt_max_deg",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_over_defaults() {
        let config = ControllerConfig::from_toml_str(
            r#"
            mass = 1.5
            kp = [2.0, 2.0, 4.0]
            thr_max = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.mass, 1.5);
        assert_eq!(config.kp, Vector3::new(2.0, 2.0, 4.0));
        assert_eq!(config.thr_max, 0.8);
        // Unspecified keys keep their defaults.
        assert_eq!(config.throttle_a, 20.0);
        assert_eq!(config.tilt_max_deg, 20.0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        for text in [
            "mass = 0.0",
            "throttle_a = -1.0",
            "t_ps = 0.0",
            "t_ude = [1.0, 0.0, 1.0]",
            "tilt_max_deg = 90.0",
            "thr_max = -0.1",
        ] {
            let result = ControllerConfig::from_toml_str(text);
            assert!(
                matches!(result, Err(ConfigError::InvalidParameter { .. })),
                "expected rejection of {text:?}"
            );
        }
    }

    #[test]
    fn test_parse_error_reported() {
        let result = ControllerConfig::from_toml_str("mass = [not toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
