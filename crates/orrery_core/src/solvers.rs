use crate::context::{Clock, StepContext};
use crate::error::Result;
use crate::traits::Integrator;

/// Explicit (forward) Euler, first order.
pub struct ExplicitEuler {
    context: StepContext,
}

impl ExplicitEuler {
    pub fn new(time_step: f64, run_time: f64) -> Result<Self> {
        let clock = Clock::new(time_step, run_time)?;
        tracing::debug!(time_step, run_time, "built explicit Euler integrator");
        Ok(Self::with_clock(clock))
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        Self {
            context: StepContext::new(clock),
        }
    }
}

impl Integrator for ExplicitEuler {
    fn context(&self) -> &StepContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StepContext {
        &mut self.context
    }

    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        self.context.check_state(state, masses)?;
        let t = self.context.clock.time();
        let dt = self.context.clock.time_step();
        tracing::trace!(t, dt, scheme = "euler", "step");

        // y_next = y + dt*f(t, y)
        let rate = self.context.evaluate(t, state, masses)?;
        Ok(state.iter().zip(&rate).map(|(y, f)| y + dt * f).collect())
    }
}

/// Classic Runge-Kutta 4th Order Solver
pub struct RungeKutta4 {
    context: StepContext,
    tmp: Vec<f64>,
}

impl RungeKutta4 {
    pub fn new(time_step: f64, run_time: f64) -> Result<Self> {
        let clock = Clock::new(time_step, run_time)?;
        tracing::debug!(time_step, run_time, "built RK4 integrator");
        Ok(Self::with_clock(clock))
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        Self {
            context: StepContext::new(clock),
            tmp: Vec::new(),
        }
    }
}

impl Integrator for RungeKutta4 {
    fn context(&self) -> &StepContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StepContext {
        &mut self.context
    }

    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        self.context.check_state(state, masses)?;
        let t0 = self.context.clock.time();
        let dt = self.context.clock.time_step();
        let n = state.len();
        self.tmp.resize(n, 0.0);
        tracing::trace!(t = t0, dt, scheme = "rk4", "step");

        // k1 = dt*f(t, y)
        let k1 = scaled(dt, self.context.evaluate(t0, state, masses)?);

        // k2 = dt*f(t + dt/2, y + k1/2)
        for i in 0..n {
            self.tmp[i] = state[i] + 0.5 * k1[i];
        }
        let k2 = scaled(dt, self.context.evaluate(t0 + 0.5 * dt, &self.tmp, masses)?);

        // k3 = dt*f(t + dt/2, y + k2/2)
        for i in 0..n {
            self.tmp[i] = state[i] + 0.5 * k2[i];
        }
        let k3 = scaled(dt, self.context.evaluate(t0 + 0.5 * dt, &self.tmp, masses)?);

        // k4 = dt*f(t + dt, y + k3)
        for i in 0..n {
            self.tmp[i] = state[i] + k3[i];
        }
        let k4 = scaled(dt, self.context.evaluate(t0 + dt, &self.tmp, masses)?);

        // y_next = y + (k1 + 2k2 + 2k3 + k4)/6
        Ok((0..n)
            .map(|i| state[i] + (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0)
            .collect())
    }
}

/// Runge-Kutta 3/8 rule, fourth order with Kutta's alternative coefficients.
pub struct RungeKutta38 {
    context: StepContext,
    tmp: Vec<f64>,
}

impl RungeKutta38 {
    pub fn new(time_step: f64, run_time: f64) -> Result<Self> {
        let clock = Clock::new(time_step, run_time)?;
        tracing::debug!(time_step, run_time, "built RK 3/8 integrator");
        Ok(Self::with_clock(clock))
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        Self {
            context: StepContext::new(clock),
            tmp: Vec::new(),
        }
    }
}

impl Integrator for RungeKutta38 {
    fn context(&self) -> &StepContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StepContext {
        &mut self.context
    }

    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        self.context.check_state(state, masses)?;
        let t0 = self.context.clock.time();
        let dt = self.context.clock.time_step();
        let n = state.len();
        let third = 1.0 / 3.0;
        self.tmp.resize(n, 0.0);
        tracing::trace!(t = t0, dt, scheme = "rk38", "step");

        // k1 = dt*f(t, y)
        let k1 = scaled(dt, self.context.evaluate(t0, state, masses)?);

        // k2 = dt*f(t + dt/3, y + k1/3)
        for i in 0..n {
            self.tmp[i] = state[i] + third * k1[i];
        }
        let k2 = scaled(dt, self.context.evaluate(t0 + third * dt, &self.tmp, masses)?);

        // k3 = dt*f(t + 2dt/3, y - k1/3 + k2)
        for i in 0..n {
            self.tmp[i] = state[i] - third * k1[i] + k2[i];
        }
        let k3 = scaled(
            dt,
            self.context.evaluate(t0 + 2.0 * third * dt, &self.tmp, masses)?,
        );

        // k4 = dt*f(t + dt, y + k1 - k2 + k3)
        for i in 0..n {
            self.tmp[i] = state[i] + k1[i] - k2[i] + k3[i];
        }
        let k4 = scaled(dt, self.context.evaluate(t0 + dt, &self.tmp, masses)?);

        // y_next = y + (k1 + 3k2 + 3k3 + k4)/8
        Ok((0..n)
            .map(|i| state[i] + (k1[i] + 3.0 * k2[i] + 3.0 * k3[i] + k4[i]) / 8.0)
            .collect())
    }
}

/// Runge-Kutta-Fehlberg 4(5), run at a fixed step with the fifth-order weights only.
pub struct RungeKuttaFehlberg {
    context: StepContext,
    tmp: Vec<f64>,
}

impl RungeKuttaFehlberg {
    pub fn new(time_step: f64, run_time: f64) -> Result<Self> {
        let clock = Clock::new(time_step, run_time)?;
        tracing::debug!(time_step, run_time, "built Runge-Kutta-Fehlberg integrator");
        Ok(Self::with_clock(clock))
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        Self {
            context: StepContext::new(clock),
            tmp: Vec::new(),
        }
    }
}

impl Integrator for RungeKuttaFehlberg {
    fn context(&self) -> &StepContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StepContext {
        &mut self.context
    }

    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        self.context.check_state(state, masses)?;
        let t0 = self.context.clock.time();
        let dt = self.context.clock.time_step();
        let n = state.len();
        self.tmp.resize(n, 0.0);
        tracing::trace!(t = t0, dt, scheme = "rkf45", "step");

        // Fehlberg coefficients
        let c2 = 1.0 / 4.0;
        let c3 = 3.0 / 8.0;
        let c4 = 12.0 / 13.0;
        let c5 = 1.0;
        let c6 = 1.0 / 2.0;

        let a21 = 1.0 / 4.0;

        let a31 = 3.0 / 32.0;
        let a32 = 9.0 / 32.0;

        let a41 = 1932.0 / 2197.0;
        let a42 = -7200.0 / 2197.0;
        let a43 = 7296.0 / 2197.0;

        let a51 = 439.0 / 216.0;
        let a52 = -8.0;
        let a53 = 3680.0 / 513.0;
        let a54 = -845.0 / 4104.0;

        let a61 = -8.0 / 27.0;
        let a62 = 2.0;
        let a63 = -3544.0 / 2565.0;
        let a64 = 1859.0 / 4104.0;
        let a65 = -11.0 / 40.0;

        // b coefficients (5th order); b2 is zero
        let b1 = 16.0 / 135.0;
        let b3 = 6656.0 / 12825.0;
        let b4 = 28561.0 / 56430.0;
        let b5 = -9.0 / 50.0;
        let b6 = 2.0 / 55.0;

        // k1
        let k1 = scaled(dt, self.context.evaluate(t0, state, masses)?);

        // k2
        for i in 0..n {
            self.tmp[i] = state[i] + a21 * k1[i];
        }
        let k2 = scaled(dt, self.context.evaluate(t0 + c2 * dt, &self.tmp, masses)?);

        // k3
        for i in 0..n {
            self.tmp[i] = state[i] + a31 * k1[i] + a32 * k2[i];
        }
        let k3 = scaled(dt, self.context.evaluate(t0 + c3 * dt, &self.tmp, masses)?);

        // k4
        for i in 0..n {
            self.tmp[i] = state[i] + a41 * k1[i] + a42 * k2[i] + a43 * k3[i];
        }
        let k4 = scaled(dt, self.context.evaluate(t0 + c4 * dt, &self.tmp, masses)?);

        // k5
        for i in 0..n {
            self.tmp[i] = state[i] + a51 * k1[i] + a52 * k2[i] + a53 * k3[i] + a54 * k4[i];
        }
        let k5 = scaled(dt, self.context.evaluate(t0 + c5 * dt, &self.tmp, masses)?);

        // k6
        for i in 0..n {
            self.tmp[i] = state[i]
                + a61 * k1[i]
                + a62 * k2[i]
                + a63 * k3[i]
                + a64 * k4[i]
                + a65 * k5[i];
        }
        let k6 = scaled(dt, self.context.evaluate(t0 + c6 * dt, &self.tmp, masses)?);

        Ok((0..n)
            .map(|i| {
                state[i] + b1 * k1[i] + b3 * k3[i] + b4 * k4[i] + b5 * k5[i] + b6 * k6[i]
            })
            .collect())
    }
}

fn scaled(dt: f64, mut rate: Vec<f64>) -> Vec<f64> {
    for value in &mut rate {
        *value *= dt;
    }
    rate
}
