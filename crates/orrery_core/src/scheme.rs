//! Scheme selection: the closed set of integrators, chosen by name or from settings.

use crate::context::StepContext;
use crate::error::{IntegratorError, Result};
use crate::multistep::AdamsBashforth2;
use crate::solvers::{ExplicitEuler, RungeKutta38, RungeKutta4, RungeKuttaFehlberg};
use crate::traits::Integrator;
use crate::verlet::VelocityVerlet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    Euler,
    Rk4,
    Rk38,
    Rkf45,
    Verlet,
    #[serde(rename = "ab2")]
    AdamsBashforth2,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 6] = [
        SchemeKind::Euler,
        SchemeKind::Rk4,
        SchemeKind::Rk38,
        SchemeKind::Rkf45,
        SchemeKind::Verlet,
        SchemeKind::AdamsBashforth2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemeKind::Euler => "euler",
            SchemeKind::Rk4 => "rk4",
            SchemeKind::Rk38 => "rk38",
            SchemeKind::Rkf45 => "rkf45",
            SchemeKind::Verlet => "verlet",
            SchemeKind::AdamsBashforth2 => "ab2",
        }
    }

    /// Global order of accuracy.
    pub fn order(self) -> u32 {
        match self {
            SchemeKind::Euler => 1,
            SchemeKind::Rk4 | SchemeKind::Rk38 => 4,
            SchemeKind::Rkf45 => 5,
            SchemeKind::Verlet | SchemeKind::AdamsBashforth2 => 2,
        }
    }

    pub fn is_symplectic(self) -> bool {
        matches!(self, SchemeKind::Verlet)
    }

    /// Whether stepping needs a bound history buffer.
    pub fn uses_history(self) -> bool {
        matches!(self, SchemeKind::AdamsBashforth2)
    }

    pub fn build(self, time_step: f64, run_time: f64) -> Result<AnyIntegrator> {
        Ok(match self {
            SchemeKind::Euler => AnyIntegrator::Euler(ExplicitEuler::new(time_step, run_time)?),
            SchemeKind::Rk4 => AnyIntegrator::Rk4(RungeKutta4::new(time_step, run_time)?),
            SchemeKind::Rk38 => AnyIntegrator::Rk38(RungeKutta38::new(time_step, run_time)?),
            SchemeKind::Rkf45 => {
                AnyIntegrator::Rkf45(RungeKuttaFehlberg::new(time_step, run_time)?)
            }
            SchemeKind::Verlet => AnyIntegrator::Verlet(VelocityVerlet::new(time_step, run_time)?),
            SchemeKind::AdamsBashforth2 => {
                AnyIntegrator::AdamsBashforth2(AdamsBashforth2::new(time_step, run_time)?)
            }
        })
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemeKind {
    type Err = IntegratorError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "euler" | "forward_euler" => Ok(SchemeKind::Euler),
            "rk4" | "runge_kutta_4" => Ok(SchemeKind::Rk4),
            "rk38" | "rk3/8" | "runge_kutta_3_8" => Ok(SchemeKind::Rk38),
            "rkf45" | "rkf" | "runge_kutta_fehlberg" => Ok(SchemeKind::Rkf45),
            "verlet" | "velocity_verlet" => Ok(SchemeKind::Verlet),
            "ab2" | "adams_bashforth" | "adams_bashforth_2" => Ok(SchemeKind::AdamsBashforth2),
            other => Err(IntegratorError::Configuration(format!(
                "unknown integration scheme \"{other}\""
            ))),
        }
    }
}

/// Serializable description of one integrator run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorSettings {
    pub scheme: SchemeKind,
    pub time_step: f64,
    pub run_time: f64,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            scheme: SchemeKind::Rk4,
            time_step: 0.01,
            run_time: 1.0,
        }
    }
}

impl IntegratorSettings {
    pub fn validate(&self) -> Result<()> {
        crate::context::Clock::new(self.time_step, self.run_time).map(|_| ())
    }

    /// Number of steps a full run takes.
    pub fn expected_steps(&self) -> u64 {
        crate::context::step_count(self.time_step, self.run_time)
    }

    pub fn build(&self) -> Result<AnyIntegrator> {
        self.scheme.build(self.time_step, self.run_time)
    }
}

/// Every scheme behind one statically dispatched type.
pub enum AnyIntegrator {
    Euler(ExplicitEuler),
    Rk4(RungeKutta4),
    Rk38(RungeKutta38),
    Rkf45(RungeKuttaFehlberg),
    Verlet(VelocityVerlet),
    AdamsBashforth2(AdamsBashforth2),
}

impl AnyIntegrator {
    pub fn kind(&self) -> SchemeKind {
        match self {
            AnyIntegrator::Euler(_) => SchemeKind::Euler,
            AnyIntegrator::Rk4(_) => SchemeKind::Rk4,
            AnyIntegrator::Rk38(_) => SchemeKind::Rk38,
            AnyIntegrator::Rkf45(_) => SchemeKind::Rkf45,
            AnyIntegrator::Verlet(_) => SchemeKind::Verlet,
            AnyIntegrator::AdamsBashforth2(_) => SchemeKind::AdamsBashforth2,
        }
    }
}

impl Integrator for AnyIntegrator {
    fn context(&self) -> &StepContext {
        match self {
            AnyIntegrator::Euler(s) => s.context(),
            AnyIntegrator::Rk4(s) => s.context(),
            AnyIntegrator::Rk38(s) => s.context(),
            AnyIntegrator::Rkf45(s) => s.context(),
            AnyIntegrator::Verlet(s) => s.context(),
            AnyIntegrator::AdamsBashforth2(s) => s.context(),
        }
    }

    fn context_mut(&mut self) -> &mut StepContext {
        match self {
            AnyIntegrator::Euler(s) => s.context_mut(),
            AnyIntegrator::Rk4(s) => s.context_mut(),
            AnyIntegrator::Rk38(s) => s.context_mut(),
            AnyIntegrator::Rkf45(s) => s.context_mut(),
            AnyIntegrator::Verlet(s) => s.context_mut(),
            AnyIntegrator::AdamsBashforth2(s) => s.context_mut(),
        }
    }

    fn step(&mut self, state: &[f64], masses: &[f64]) -> Result<Vec<f64>> {
        match self {
            AnyIntegrator::Euler(s) => s.step(state, masses),
            AnyIntegrator::Rk4(s) => s.step(state, masses),
            AnyIntegrator::Rk38(s) => s.step(state, masses),
            AnyIntegrator::Rkf45(s) => s.step(state, masses),
            AnyIntegrator::Verlet(s) => s.step(state, masses),
            AnyIntegrator::AdamsBashforth2(s) => s.step(state, masses),
        }
    }
}
