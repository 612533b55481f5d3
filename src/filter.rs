//! Single-pole IIR filter primitives.
//!
//! Both filters hold one scalar of state and are stepped once per control
//! tick with the caller-supplied `dt`. Each axis/role pair in a controller
//! owns its own instance; instances are never shared.

/// First-order low-pass filter with time constant `tau`:
/// `y += dt / (tau + dt) * (x - y)`.
#[derive(Clone, Copy, Debug)]
pub struct LowPassFilter {
    time_constant: f64,
    output: f64,
}

impl LowPassFilter {
    /// Creates a filter at zero state.
    pub fn new(time_constant: f64) -> Self {
        Self {
            time_constant,
            output: 0.0,
        }
    }

    /// Advances the filter by one sample and returns the filtered value.
    pub fn apply(&mut self, sample: f64, dt: f64) -> f64 {
        let alpha = dt / (self.time_constant + dt);
        self.output += alpha * (sample - self.output);
        self.output
    }

    /// Last filtered value without advancing the state.
    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    /// Changes the time constant, keeping the current state.
    pub fn set_time_constant(&mut self, time_constant: f64) {
        self.time_constant = time_constant;
    }

    /// Returns the state to zero.
    pub fn reset(&mut self) {
        self.output = 0.0;
    }
}

/// Complementary high-pass filter: `x - lowpass(x)`, sharing the time
/// constant with the internally maintained low-pass of the same input.
#[derive(Clone, Copy, Debug)]
pub struct HighPassFilter {
    low_pass: LowPassFilter,
}

impl HighPassFilter {
    /// Creates a filter at zero state.
    pub fn new(time_constant: f64) -> Self {
        Self {
            low_pass: LowPassFilter::new(time_constant),
        }
    }

    /// Advances the filter by one sample and returns the filtered value.
    pub fn apply(&mut self, sample: f64, dt: f64) -> f64 {
        sample - self.low_pass.apply(sample, dt)
    }

    pub fn time_constant(&self) -> f64 {
        self.low_pass.time_constant()
    }

    /// Changes the time constant, keeping the current state.
    pub fn set_time_constant(&mut self, time_constant: f64) {
        self.low_pass.set_time_constant(time_constant);
    }

    /// Returns the state to zero.
    pub fn reset(&mut self) {
        self.low_pass.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_low_pass_starts_at_zero() {
        let filter = LowPassFilter::new(1.0);
        assert_eq!(filter.output(), 0.0);
    }

    /// A constant input drives the low-pass output geometrically to the
    /// input value, regardless of the step size.
    #[test]
    fn test_low_pass_step_response_converges() {
        for dt in [0.005, 0.02, 0.1] {
            let mut filter = LowPassFilter::new(0.5);
            let mut previous_gap = 10.0;
            for _ in 0..((20.0 / dt) as usize) {
                filter.apply(10.0, dt);
                let gap = (10.0 - filter.output()).abs();
                // Near convergence the update underflows below one ulp of
                // the output and the gap freezes, so the decrease is not
                // strict.
                assert!(gap <= previous_gap);
                previous_gap = gap;
            }
            assert_relative_eq!(filter.output(), 10.0, epsilon = 1e-6);
        }
    }

    /// After one time constant the discrete step response should be close
    /// to the continuous 1 - 1/e mark.
    #[test]
    fn test_low_pass_time_constant_matches() {
        let tau = 0.5;
        let dt = 0.001;
        let mut filter = LowPassFilter::new(tau);
        for _ in 0..((tau / dt) as usize) {
            filter.apply(1.0, dt);
        }
        let expected = 1.0 - (-1.0f64).exp();
        assert_relative_eq!(filter.output(), expected, epsilon = 1e-2);
    }

    #[test]
    fn test_high_pass_step_response_decays_to_zero() {
        let mut filter = HighPassFilter::new(0.5);
        let first = filter.apply(10.0, 0.01);
        // Initial transient passes most of the step through.
        assert!(first > 9.0);
        let mut last = first;
        for _ in 0..5000 {
            last = filter.apply(10.0, 0.01);
        }
        assert_relative_eq!(last, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut low_pass = LowPassFilter::new(1.0);
        low_pass.apply(5.0, 0.1);
        assert!(low_pass.output() != 0.0);
        low_pass.reset();
        assert_eq!(low_pass.output(), 0.0);

        let mut high_pass = HighPassFilter::new(1.0);
        high_pass.apply(5.0, 0.1);
        high_pass.reset();
        // With cleared state the next sample passes through like the first.
        let out = high_pass.apply(5.0, 0.1);
        let fresh = HighPassFilter::new(1.0).apply(5.0, 0.1);
        assert_eq!(out, fresh);
    }

    #[test]
    fn test_independent_instances() {
        let mut a = LowPassFilter::new(1.0);
        let mut b = LowPassFilter::new(1.0);
        a.apply(10.0, 0.1);
        assert_eq!(b.output(), 0.0);
        b.apply(-10.0, 0.1);
        assert!(a.output() > 0.0 && b.output() < 0.0);
    }
}
