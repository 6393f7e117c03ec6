use crate::error::Result;
use crate::history::HistoryBuffer;
use crate::traits::Integrator;

/// Drives `integrator` from `initial_state` until its run time is exhausted.
///
/// The history buffer is seeded with the initial state when empty, then receives every
/// accepted step before time is advanced, which is the order multistep schemes rely on.
/// The buffer is bound to the integrator. Returns the final state.
pub fn run<I: Integrator>(
    integrator: &mut I,
    initial_state: &[f64],
    masses: &[f64],
    history: &HistoryBuffer,
) -> Result<Vec<f64>> {
    if history.is_empty() {
        history.push(initial_state.to_vec());
    }
    integrator.bind_history(history.clone());

    let mut state = initial_state.to_vec();
    loop {
        state = integrator.step(&state, masses)?;
        history.push(state.clone());
        if !integrator.advance_time() {
            break;
        }
    }

    tracing::debug!(
        time = integrator.time(),
        steps = integrator.clock().steps_taken(),
        "run finished"
    );
    Ok(state)
}
