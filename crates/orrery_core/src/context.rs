//! Time bookkeeping and bound dependencies shared by every scheme.

use crate::error::{IntegratorError, Result};
use crate::history::HistoryBuffer;
use crate::traits::Derivative;

/// Simulated clock of one integrator run.
///
/// The run length is fixed at construction as `ceil(run_time / time_step)` steps, and
/// `advance` stops on exactly that call. Comparing the product `steps * time_step`
/// against `run_time` instead would let rounding add a step (`10 * 0.09 < 0.9`).
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    time_step: f64,
    run_time: f64,
    steps: u64,
    total_steps: u64,
}

/// Number of fixed steps needed to cover `run_time`.
pub fn step_count(time_step: f64, run_time: f64) -> u64 {
    (run_time / time_step).ceil() as u64
}

impl Clock {
    pub fn new(time_step: f64, run_time: f64) -> Result<Self> {
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(IntegratorError::Configuration(format!(
                "time_step must be positive and finite, got {time_step}"
            )));
        }
        if !run_time.is_finite() || run_time <= 0.0 {
            return Err(IntegratorError::Configuration(format!(
                "run_time must be positive and finite, got {run_time}"
            )));
        }
        Ok(Self::unchecked(time_step, run_time))
    }

    /// Skips validation. Only used to exercise degenerate steps in tests.
    pub(crate) fn unchecked(time_step: f64, run_time: f64) -> Self {
        Self {
            time_step,
            run_time,
            steps: 0,
            total_steps: step_count(time_step, run_time),
        }
    }

    pub fn time(&self) -> f64 {
        self.steps as f64 * self.time_step
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn advance(&mut self) -> bool {
        self.steps = self.steps.saturating_add(1);
        let running = self.steps < self.total_steps;
        if !running {
            tracing::debug!(
                time = self.time(),
                run_time = self.run_time,
                steps = self.steps,
                "run time exhausted"
            );
        }
        running
    }
}

/// State every integrator owns: its clock, the bound derivative and an optional history handle.
pub struct StepContext {
    pub clock: Clock,
    derivative: Option<Box<dyn Derivative>>,
    history: Option<HistoryBuffer>,
}

impl StepContext {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            derivative: None,
            history: None,
        }
    }

    pub fn bind_derivative(&mut self, derivative: Box<dyn Derivative>) {
        tracing::debug!(
            dimension = ?derivative.dimension(),
            bodies = ?derivative.bodies(),
            "derivative bound"
        );
        self.derivative = Some(derivative);
    }

    pub fn bind_history(&mut self, history: HistoryBuffer) {
        tracing::debug!(entries = history.len(), "history buffer bound");
        self.history = Some(history);
    }

    pub fn history(&self) -> Option<&HistoryBuffer> {
        self.history.as_ref()
    }

    /// Fails unless a derivative is bound and accepts a state and mass vector of these lengths.
    pub fn check_state(&self, state: &[f64], masses: &[f64]) -> Result<()> {
        let derivative = self.derivative()?;
        if let Some(dim) = derivative.dimension() {
            if dim != state.len() {
                return Err(IntegratorError::shape("state vector", dim, state.len()));
            }
        }
        if let Some(bodies) = derivative.bodies() {
            if bodies != masses.len() {
                return Err(IntegratorError::shape("mass vector", bodies, masses.len()));
            }
        }
        Ok(())
    }

    /// One stage evaluation `f(t, y)`, with the output length checked against `y`.
    pub fn evaluate(&self, t: f64, y: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        let rate = self.derivative()?.evaluate(t, y, masses);
        if rate.len() != y.len() {
            return Err(IntegratorError::shape("derivative output", y.len(), rate.len()));
        }
        Ok(rate)
    }

    fn derivative(&self) -> Result<&dyn Derivative> {
        self.derivative
            .as_deref()
            .ok_or(IntegratorError::UnboundDependency("derivative function"))
    }
}
