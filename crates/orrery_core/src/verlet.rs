use crate::context::{Clock, StepContext};
use crate::error::{IntegratorError, Result};
use crate::traits::Integrator;

/// Entries per body: `[x, y, z, vx, vy, vz]`.
pub const BODY_STRIDE: usize = 6;

/// Velocity Verlet, a second order symplectic scheme.
///
/// Unlike the Runge-Kutta family this one knows the state layout: it walks the vector in
/// blocks of [`BODY_STRIDE`], reading the derivative's first three entries of each block as
/// velocities and the last three as accelerations. Positions are drifted for the whole
/// system before the second force evaluation, and velocities are kicked last with the mean
/// of both accelerations. Reordering those phases loses the symplectic property.
pub struct VelocityVerlet {
    context: StepContext,
}

impl VelocityVerlet {
    pub fn new(time_step: f64, run_time: f64) -> Result<Self> {
        let clock = Clock::new(time_step, run_time)?;
        tracing::debug!(time_step, run_time, "built velocity Verlet integrator");
        Ok(Self::with_clock(clock))
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        Self {
            context: StepContext::new(clock),
        }
    }
}

impl Integrator for VelocityVerlet {
    fn context(&self) -> &StepContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StepContext {
        &mut self.context
    }

    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        if state.len() % BODY_STRIDE != 0 {
            return Err(IntegratorError::shape(
                "velocity Verlet state",
                format!("a multiple of {BODY_STRIDE}"),
                state.len(),
            ));
        }
        let bodies = state.len() / BODY_STRIDE;
        if masses.len() != bodies {
            return Err(IntegratorError::shape("velocity Verlet masses", bodies, masses.len()));
        }
        self.context.check_state(state, masses)?;

        let t = self.context.clock.time();
        let dt = self.context.clock.time_step();
        let half_dt_squared = 0.5 * dt * dt;
        tracing::trace!(t, dt, bodies, scheme = "verlet", "step");

        let mut next = state.to_vec();

        // x(t + dt) = x(t) + v(t)*dt + 0.5*a(t)*dt^2
        let a1 = self.context.evaluate(t, &next, masses)?;
        for (body, rate) in next
            .chunks_exact_mut(BODY_STRIDE)
            .zip(a1.chunks_exact(BODY_STRIDE))
        {
            for axis in 0..3 {
                body[axis] += dt * rate[axis] + half_dt_squared * rate[axis + 3];
            }
        }

        // v(t + dt) = v(t) + 0.5*(a(t) + a(t + dt))*dt
        let a2 = self.context.evaluate(t + dt, &next, masses)?;
        for ((body, first), second) in next
            .chunks_exact_mut(BODY_STRIDE)
            .zip(a1.chunks_exact(BODY_STRIDE))
            .zip(a2.chunks_exact(BODY_STRIDE))
        {
            for axis in 3..BODY_STRIDE {
                body[axis] += 0.5 * dt * (first[axis] + second[axis]);
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAVITY: f64 = -9.8;

    fn free_fall(_t: f64, y: &[f64], _m: &[f64]) -> Vec<f64> {
        let mut rate = vec![0.0; y.len()];
        for (out, body) in rate
            .chunks_exact_mut(BODY_STRIDE)
            .zip(y.chunks_exact(BODY_STRIDE))
        {
            out[..3].copy_from_slice(&body[3..]);
            out[5] = GRAVITY;
        }
        rate
    }

    // Unit-mass spring pulling every body towards the origin.
    fn spring(_t: f64, y: &[f64], _m: &[f64]) -> Vec<f64> {
        let mut rate = vec![0.0; y.len()];
        for (out, body) in rate
            .chunks_exact_mut(BODY_STRIDE)
            .zip(y.chunks_exact(BODY_STRIDE))
        {
            for axis in 0..3 {
                out[axis] = body[axis + 3];
                out[axis + 3] = -body[axis];
            }
        }
        rate
    }

    fn energy(y: &[f64]) -> f64 {
        y.iter().map(|v| 0.5 * v * v).sum()
    }

    #[test]
    fn free_fall_velocity_is_exact() {
        let dt = 0.01;
        let mut verlet = VelocityVerlet::new(dt, 1.0).expect("verlet should build");
        verlet.bind_derivative(free_fall);

        let mut state = vec![0.0, 0.0, 100.0, 0.0, 0.0, 0.0];
        loop {
            state = verlet.step(&state, &[1.0]).unwrap();
            let running = verlet.advance_time();
            let t = verlet.time();
            assert!((state[5] - GRAVITY * t).abs() < 1e-12, "v={} at t={t}", state[5]);
            assert!((state[2] - (100.0 + 0.5 * GRAVITY * t * t)).abs() < 1e-9);
            assert_eq!(state[3], 0.0);
            if !running {
                break;
            }
        }
    }

    #[test]
    fn second_evaluation_sees_drifted_positions() {
        let mut verlet = VelocityVerlet::new(0.1, 1.0).expect("verlet should build");
        verlet.bind_derivative(spring);
        let next = verlet.step(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0], &[1.0]).unwrap();

        // x1 = 1 - 0.005, v1 = -0.05 * (1 + x1)
        let x1 = 1.0 - 0.5 * 0.01;
        assert!((next[0] - x1).abs() < 1e-14);
        assert!((next[3] + 0.05 * (1.0 + x1)).abs() < 1e-14);
    }

    #[test]
    fn long_run_energy_stays_bounded() {
        let mut verlet = VelocityVerlet::new(0.05, 200.0).expect("verlet should build");
        verlet.bind_derivative(spring);
        let mut state = vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.5, 0.0, 0.0];
        let initial = energy(&state);
        loop {
            state = verlet.step(&state, &[1.0, 1.0]).unwrap();
            assert!(((energy(&state) - initial) / initial).abs() < 5e-3);
            if !verlet.advance_time() {
                break;
            }
        }
    }

    #[test]
    fn rejects_partial_body_blocks_before_evaluating() {
        let mut verlet = VelocityVerlet::new(0.1, 1.0).expect("verlet should build");
        verlet.bind_derivative(|_t: f64, _y: &[f64], _m: &[f64]| -> Vec<f64> {
            panic!("derivative must not run on a malformed state")
        });
        let state = vec![1.0; 7];
        let err = verlet.step(&state, &[1.0]).expect_err("expected shape error");
        assert!(matches!(err, IntegratorError::ShapeMismatch { actual: 7, .. }));
        assert_eq!(state, vec![1.0; 7]);
    }

    #[test]
    fn rejects_mass_vector_shorter_than_body_count() {
        let mut verlet = VelocityVerlet::new(0.1, 1.0).expect("verlet should build");
        verlet.bind_derivative(|_t: f64, y: &[f64], masses: &[f64]| -> Vec<f64> {
            let mut rate = vec![0.0; y.len()];
            for body in 0..y.len() / BODY_STRIDE {
                rate[body * BODY_STRIDE + 5] = -masses[body];
            }
            rate
        });
        let err = verlet
            .step(&[0.0; 12], &[1.0])
            .expect_err("expected shape error");
        assert!(matches!(
            err,
            IntegratorError::ShapeMismatch {
                context: "velocity Verlet masses",
                actual: 1,
                ..
            }
        ));
        assert!(verlet.step(&[0.0; 12], &[1.0, 2.0]).is_ok());
    }

    #[test]
    fn bodies_are_advanced_independently() {
        let mut verlet = VelocityVerlet::new(0.1, 1.0).expect("verlet should build");
        verlet.bind_derivative(free_fall);
        let next = verlet
            .step(
                &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 5.0, 5.0, 5.0, 0.0, 0.0, 0.0],
                &[1.0, 2.0],
            )
            .unwrap();
        assert!((next[0] - 0.1).abs() < 1e-14);
        assert!((next[2] - 0.5 * GRAVITY * 0.01).abs() < 1e-14);
        assert!((next[8] - (5.0 + 0.5 * GRAVITY * 0.01)).abs() < 1e-14);
        assert!((next[11] - GRAVITY * 0.1).abs() < 1e-14);
    }
}
