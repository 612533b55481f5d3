use nalgebra::Vector3;
use uav_pos_control::{
    ControlMode, ControllerConfig, DroneState, PassivityController, PidController,
    TrajectoryReference, GRAVITY,
};

// Closed-loop hover demo: both controllers fly a point-mass model from the
// ground to a 5 m setpoint. The forward model inverts the same affine
// motor map the controllers use, so the loop is consistent end to end.
fn main() {
    let config = ControllerConfig::default();
    let dt = 0.01; // 100 Hz control loop

    let reference = TrajectoryReference {
        position_ref: Vector3::new(0.0, 0.0, 5.0),
        ..Default::default()
    };

    let mut pid = PidController::new(config.clone());
    let mut passivity = PassivityController::new(config.clone());

    println!("t [s]   PID z [m]   passivity z [m]");
    let mut pid_state = (Vector3::zeros(), Vector3::zeros());
    let mut psv_state = (Vector3::zeros(), Vector3::zeros());

    for step in 0..=1000 {
        let t = step as f64 * dt;
        if step % 100 == 0 {
            println!("{:5.2}   {:9.3}   {:15.3}", t, pid_state.0.z, psv_state.0.z);
        }

        let drone_pid = DroneState {
            position: pid_state.0,
            velocity: pid_state.1,
            mode: ControlMode::Autonomous,
        };
        let thrust = pid.pos_controller(&drone_pid, &reference, dt);
        step_point_mass(&mut pid_state, &thrust, &config, dt);

        let drone_psv = DroneState {
            position: psv_state.0,
            velocity: psv_state.1,
            mode: ControlMode::Autonomous,
        };
        let thrust = passivity.pos_controller(&drone_psv, &reference, dt);
        step_point_mass(&mut psv_state, &thrust, &config, dt);
    }

    println!(
        "final: PID ({:.3}, {:.3}, {:.3}), passivity ({:.3}, {:.3}, {:.3})",
        pid_state.0.x, pid_state.0.y, pid_state.0.z, psv_state.0.x, psv_state.0.y, psv_state.0.z
    );
}

/// Semi-implicit Euler step of a point mass driven by normalized thrust.
fn step_point_mass(
    state: &mut (Vector3<f64>, Vector3<f64>),
    thrust: &Vector3<f64>,
    config: &ControllerConfig,
    dt: f64,
) {
    // Forward motor model: accel = (a·thrust + b) / mass, gravity on z.
    let mut accel =
        thrust.map(|t| (config.throttle_a * t + config.throttle_b) / config.mass);
    accel.z -= GRAVITY;

    state.1 += accel * dt;
    state.0 += state.1 * dt;
}
