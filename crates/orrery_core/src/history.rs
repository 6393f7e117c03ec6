use std::cell::RefCell;
use std::rc::Rc;

/// Append-only log of accepted state vectors, in step order.
///
/// Cloning yields another handle onto the same log: the driver keeps one to append
/// with, integrators keep one to read from. Integrators never push or clear.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    states: Rc<RefCell<Vec<Vec<f64>>>>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a log that already holds `initial`.
    pub fn seeded(initial: &[f64]) -> Self {
        let history = Self::new();
        history.push(initial.to_vec());
        history
    }

    pub fn push(&self, state: Vec<f64>) {
        self.states.borrow_mut().push(state);
    }

    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entry `back` places before the most recent one (`0` is the most recent).
    pub fn from_back(&self, back: usize) -> Option<Vec<f64>> {
        let states = self.states.borrow();
        let index = states.len().checked_sub(back + 1)?;
        states.get(index).cloned()
    }

    pub fn last(&self) -> Option<Vec<f64>> {
        self.from_back(0)
    }
}
