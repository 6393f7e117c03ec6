use orrery_core::driver::run;
use orrery_core::{HistoryBuffer, Integrator, IntegratorError, IntegratorSettings, SchemeKind};

const G: f64 = 1.0;

/// Newtonian gravity between bodies laid out as `[x, y, z, vx, vy, vz]` blocks.
fn gravity(_t: f64, y: &[f64], masses: &[f64]) -> Vec<f64> {
    let bodies = y.len() / 6;
    let mut rate = vec![0.0; y.len()];
    for i in 0..bodies {
        rate[6 * i..6 * i + 3].copy_from_slice(&y[6 * i + 3..6 * i + 6]);
        for j in 0..bodies {
            if i == j {
                continue;
            }
            let d: Vec<f64> = (0..3).map(|k| y[6 * j + k] - y[6 * i + k]).collect();
            let r2 = d.iter().map(|v| v * v).sum::<f64>();
            let inv_r3 = 1.0 / (r2 * r2.sqrt());
            for k in 0..3 {
                rate[6 * i + 3 + k] += G * masses[j] * d[k] * inv_r3;
            }
        }
    }
    rate
}

fn energy(y: &[f64], masses: &[f64]) -> f64 {
    let bodies = y.len() / 6;
    let mut total = 0.0;
    for i in 0..bodies {
        let v2: f64 = y[6 * i + 3..6 * i + 6].iter().map(|v| v * v).sum();
        total += 0.5 * masses[i] * v2;
        for j in i + 1..bodies {
            let r2: f64 = (0..3).map(|k| (y[6 * j + k] - y[6 * i + k]).powi(2)).sum();
            total -= G * masses[i] * masses[j] / r2.sqrt();
        }
    }
    total
}

// Light body on a circular orbit around a heavy one.
fn circular_binary() -> (Vec<f64>, Vec<f64>) {
    let masses = vec![1.0, 1e-6];
    let state = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    (state, masses)
}

fn orbit_radius(y: &[f64]) -> f64 {
    (0..3).map(|k| (y[6 + k] - y[k]).powi(2)).sum::<f64>().sqrt()
}

#[test]
fn every_scheme_keeps_a_circular_orbit_round() {
    let (initial, masses) = circular_binary();
    for kind in SchemeKind::ALL {
        let settings = IntegratorSettings {
            scheme: kind,
            time_step: 0.001,
            run_time: 1.0,
        };
        let mut integrator = settings.build().expect("integrator should build");
        integrator.bind_derivative(gravity);
        let history = HistoryBuffer::new();

        let end = run(&mut integrator, &initial, &masses, &history).expect("run should finish");

        assert_eq!(end.len(), initial.len());
        let steps = integrator.clock().steps_taken();
        assert_eq!(steps, settings.expected_steps());
        assert_eq!(history.len() as u64, steps + 1);
        let drift = (orbit_radius(&end) - 1.0).abs();
        assert!(drift < 1e-2, "{kind}: radius drifted by {drift}");
    }
}

#[test]
fn higher_order_schemes_conserve_energy_better() {
    let (initial, masses) = circular_binary();
    let start = energy(&initial, &masses);
    let energy_error = |kind: SchemeKind| {
        let mut integrator = kind.build(0.01, 6.0).expect("integrator should build");
        integrator.bind_derivative(gravity);
        let end = run(&mut integrator, &initial, &masses, &HistoryBuffer::new())
            .expect("run should finish");
        ((energy(&end, &masses) - start) / start).abs()
    };

    let euler = energy_error(SchemeKind::Euler);
    let rk4 = energy_error(SchemeKind::Rk4);
    let rkf = energy_error(SchemeKind::Rkf45);
    let verlet = energy_error(SchemeKind::Verlet);
    assert!(rk4 < euler, "rk4 {rk4} vs euler {euler}");
    assert!(rkf < euler, "rkf {rkf} vs euler {euler}");
    assert!(verlet < euler, "verlet {verlet} vs euler {euler}");
    assert!(rk4 < 1e-6);
}

#[test]
fn adams_bashforth_converges_at_second_order() {
    let global_error = |dt: f64| {
        let mut integrator = SchemeKind::AdamsBashforth2
            .build(dt, 1.0)
            .expect("integrator should build");
        integrator.bind_derivative(|t: f64, y: &[f64], _m: &[f64]| {
            y.iter().map(|v| -v + t).collect::<Vec<f64>>()
        });
        let end = run(&mut integrator, &[1.0], &[], &HistoryBuffer::new())
            .expect("run should finish");
        // y = t - 1 + 2e^{-t}
        (end[0] - 2.0 * (-1.0_f64).exp()).abs()
    };
    let ratio = global_error(0.01) / global_error(0.005);
    assert!(ratio > 3.0 && ratio < 5.0, "ratio was {ratio}");
}

#[test]
fn verlet_rejects_flat_state_through_enum() {
    let mut integrator = SchemeKind::Verlet.build(0.1, 1.0).expect("integrator should build");
    integrator.bind_derivative(gravity);
    let err = integrator
        .step(&[1.0, 2.0, 3.0], &[1.0])
        .expect_err("expected shape error");
    assert!(matches!(err, IntegratorError::ShapeMismatch { .. }));
    assert_eq!(integrator.time(), 0.0);
}

#[test]
fn stepping_before_binding_fails_for_every_scheme() {
    for kind in SchemeKind::ALL {
        let mut integrator = kind.build(0.1, 1.0).expect("integrator should build");
        integrator.bind_history(HistoryBuffer::seeded(&[0.0; 6]));
        assert_eq!(
            integrator.step(&[0.0; 6], &[1.0]),
            Err(IntegratorError::UnboundDependency("derivative function")),
            "{kind}"
        );
    }
}
