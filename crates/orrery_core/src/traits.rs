use crate::context::{Clock, StepContext};
use crate::error::Result;
use crate::history::HistoryBuffer;

/// The right-hand side of a point-mass system.
/// Must be pure: no hidden state, inputs untouched.
pub trait Derivative {
    /// Returns the state length this function expects, if it cares.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Returns the number of bodies, i.e. the mass vector length, if it cares.
    fn bodies(&self) -> Option<usize> {
        None
    }

    /// Evaluates the rate of change of `state` at time `t`.
    /// t: current time
    /// state: flat state vector
    /// masses: one entry per body, passed through untouched
    fn evaluate(&self, t: f64, state: &[f64], masses: &[f64]) -> Vec<f64>;
}

impl<F> Derivative for F
where
    F: Fn(f64, &[f64], &[f64]) -> Vec<f64>,
{
    fn evaluate(&self, t: f64, state: &[f64], masses: &[f64]) -> Vec<f64> {
        self(t, state, masses)
    }
}

/// A fixed-step scheme that advances a state vector one `time_step` at a time.
///
/// Implementors only provide access to their [`StepContext`] and the `step` formula;
/// binding and time bookkeeping are shared.
pub trait Integrator {
    fn context(&self) -> &StepContext;

    fn context_mut(&mut self) -> &mut StepContext;

    /// Computes the state one `time_step` after `state`.
    /// Never touches the clock; call [`Integrator::advance_time`] once the step is accepted.
    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>>;

    fn bind_derivative<D>(&mut self, derivative: D)
    where
        D: Derivative + 'static,
        Self: Sized,
    {
        self.context_mut().bind_derivative(Box::new(derivative));
    }

    fn bind_history(&mut self, history: HistoryBuffer) {
        self.context_mut().bind_history(history);
    }

    /// Moves time forward by one step. Returns true while `time < run_time`.
    fn advance_time(&mut self) -> bool {
        self.context_mut().clock.advance()
    }

    fn clock(&self) -> &Clock {
        &self.context().clock
    }

    fn time(&self) -> f64 {
        self.clock().time()
    }

    fn time_step(&self) -> f64 {
        self.clock().time_step()
    }

    fn run_time(&self) -> f64 {
        self.clock().run_time()
    }

    fn steps_taken(&self) -> u64 {
        self.clock().steps_taken()
    }

    fn total_steps(&self) -> u64 {
        self.clock().total_steps()
    }
}
