use crate::context::{Clock, StepContext};
use crate::error::{IntegratorError, Result};
use crate::traits::Integrator;

/// Two-step Adams-Bashforth.
///
/// Reads the bound history buffer to find the previous state. The driver seeds the buffer
/// with the initial state and appends every accepted result, so on entry the most recent
/// entry is the state being stepped and the one before it is `y(t - dt)`.
///
/// With a single entry there is no previous state yet and the step falls back to
/// explicit Euler.
pub struct AdamsBashforth2 {
    context: StepContext,
}

impl AdamsBashforth2 {
    pub fn new(time_step: f64, run_time: f64) -> Result<Self> {
        let clock = Clock::new(time_step, run_time)?;
        tracing::debug!(time_step, run_time, "built two-step Adams-Bashforth integrator");
        Ok(Self::with_clock(clock))
    }

    pub(crate) fn with_clock(clock: Clock) -> Self {
        Self {
            context: StepContext::new(clock),
        }
    }
}

impl Integrator for AdamsBashforth2 {
    fn context(&self) -> &StepContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut StepContext {
        &mut self.context
    }

    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        self.context.check_state(state, masses)?;
        let history = self
            .context
            .history()
            .ok_or(IntegratorError::UnboundDependency("history buffer"))?;
        let t = self.context.clock.time();
        let dt = self.context.clock.time_step();

        let previous = match history.len() {
            0 => {
                return Err(IntegratorError::InsufficientHistory {
                    required: 1,
                    available: 0,
                })
            }
            1 => None,
            _ => history.from_back(1),
        };

        let current = self.context.evaluate(t, state, masses)?;
        let Some(previous) = previous else {
            tracing::debug!(t, "Adams-Bashforth bootstrap step");
            return Ok(state
                .iter()
                .zip(&current)
                .map(|(y, f)| y + dt * f)
                .collect());
        };
        if previous.len() != state.len() {
            return Err(IntegratorError::shape(
                "history entry",
                state.len(),
                previous.len(),
            ));
        }
        tracing::trace!(t, dt, scheme = "ab2", "step");

        // y_next = y + 3/2*dt*f(t, y) - 1/2*dt*f(t - dt, y_prev)
        let lagged = self.context.evaluate(t - dt, &previous, masses)?;
        Ok((0..state.len())
            .map(|i| state[i] + 1.5 * dt * current[i] - 0.5 * dt * lagged[i])
            .collect())
    }
}
