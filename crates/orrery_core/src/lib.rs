pub mod context;
pub mod driver;
pub mod error;
pub mod history;
pub mod multistep;
pub mod scheme;
pub mod solvers;
/// The `orrery_core` crate provides fixed-step time integrators for systems of point masses.
/// A state vector is a flat `[f64]`; a user-supplied derivative maps `(t, state, masses)` to
/// its rate of change, and an integrator advances the state one fixed step per call.
///
/// Key components:
/// - **Traits**: `Derivative` (right-hand sides), `Integrator` (binding, stepping, time).
/// - **Solvers**: explicit Euler, RK4, RK 3/8, Runge-Kutta-Fehlberg.
/// - **Verlet**: velocity Verlet over `[x, y, z, vx, vy, vz]` body blocks.
/// - **Multistep**: two-step Adams-Bashforth reading an external `HistoryBuffer`.
/// - **Scheme**: `SchemeKind`/`IntegratorSettings` selection and the `AnyIntegrator` enum.
pub mod traits;
pub mod verlet;

pub use error::{IntegratorError, Result};
pub use history::HistoryBuffer;
pub use scheme::{AnyIntegrator, IntegratorSettings, SchemeKind};
pub use traits::{Derivative, Integrator};
