use thiserror::Error;

/// Failures raised synchronously by integrator construction and stepping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegratorError {
    #[error("invalid integrator configuration: {0}")]
    Configuration(String),

    #[error("step called before a {0} was bound")]
    UnboundDependency(&'static str),

    /// Adams-Bashforth stepped against an empty history buffer. The driver must seed the
    /// buffer with the initial state before the first step (see `driver::run`).
    #[error("insufficient history: need at least {required} entries, found {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        actual: usize,
    },
}

impl IntegratorError {
    pub(crate) fn shape(context: &'static str, expected: impl ToString, actual: usize) -> Self {
        IntegratorError::ShapeMismatch {
            context,
            expected: expected.to_string(),
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, IntegratorError>;
