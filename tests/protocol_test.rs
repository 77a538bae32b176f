//! Call-protocol tests for the TVD integrators.
//!
//! Covers phase promotion, single-step versus integrate-to-output
//! equivalence, no-op calls and protocol violations.

use tvd_rs::time::HistoryKind;
use tvd_rs::{
    Derivative, IntegrationState, IntegratorInfo, MultistepTvd, MultistepTvdConfig, Phase,
    ProtocolViolation, RkTvd, RkTvdConfig, StepMode, TvdIntegrator,
};

/// du/dt = sin(t) - u, with a call counter.
#[derive(Default)]
struct Forced {
    calls: usize,
}

impl Derivative for Forced {
    fn eval(&mut self, t: f64, u: &[f64], udot: &mut [f64]) {
        self.calls += 1;
        for (d, &v) in udot.iter_mut().zip(u) {
            *d = t.sin() - v;
        }
    }
}

fn initial_state() -> IntegrationState {
    IntegrationState::new(0.0, vec![1.0, 0.0, -0.5])
}

#[test]
fn test_single_steps_match_integrate_to_output() {
    // dt = 1/64 keeps every t = n * dt exact, so both runs take 40 steps.
    let dt = 1.0 / 64.0;
    let n = 40;

    for order in 1..=3 {
        let mut f = Forced::default();

        let mut stepped = initial_state();
        let mut single = RkTvd::new(RkTvdConfig::new(order).single_step());
        for _ in 0..n {
            let report = single.step(&mut f, &mut stepped, f64::INFINITY, dt).unwrap();
            assert_eq!(report.steps, 1);
        }

        let mut direct = initial_state();
        let mut to_output = RkTvd::new(RkTvdConfig::new(order));
        let report = to_output
            .step(&mut f, &mut direct, n as f64 * dt, dt)
            .unwrap();

        assert_eq!(report.steps, n);
        assert_eq!(stepped, direct, "order {} trajectories differ", order);
    }
}

#[test]
fn test_first_call_promotes_phase() {
    let mut solver = RkTvd::new(RkTvdConfig::new(2));
    assert_eq!(solver.phase(), Phase::Uninitialized);

    let mut state = initial_state();
    solver
        .step(&mut Forced::default(), &mut state, 0.1, 0.01)
        .unwrap();
    assert_eq!(solver.phase(), Phase::Continuing);

    // Continuing calls keep stepping from where the last one stopped.
    let t_before = state.t;
    solver
        .step(&mut Forced::default(), &mut state, 0.2, 0.01)
        .unwrap();
    assert_eq!(solver.phase(), Phase::Continuing);
    assert!(state.t > t_before);
}

#[test]
fn test_explicit_init() {
    let state = initial_state();

    let mut solver = RkTvd::new(RkTvdConfig::new(3));
    solver.init(&state).unwrap();
    assert_eq!(solver.phase(), Phase::Continuing);

    let mut bad = RkTvd::new(RkTvdConfig::new(0));
    assert_eq!(bad.init(&state), Err(ProtocolViolation::InvalidOrder(0)));
    assert_eq!(bad.phase(), Phase::Uninitialized);
}

#[test]
fn test_invalid_order_is_fatal_for_the_call() {
    for order in [0, 4, 100] {
        let mut f = Forced::default();
        let mut state = initial_state();
        let mut solver = RkTvd::new(RkTvdConfig::new(order));

        let result = solver.step(&mut f, &mut state, 1.0, 0.1);

        assert_eq!(result, Err(ProtocolViolation::InvalidOrder(order)));
        assert_eq!(state, initial_state());
        assert_eq!(f.calls, 0);
    }
}

#[test]
fn test_invalid_step_size() {
    for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
        let mut state = initial_state();

        let rk =
            RkTvd::new(RkTvdConfig::default()).step(&mut Forced::default(), &mut state, 1.0, dt);
        assert!(matches!(rk, Err(ProtocolViolation::InvalidStepSize(_))));

        let ms = MultistepTvd::new(MultistepTvdConfig::default()).step(
            &mut Forced::default(),
            &mut state,
            1.0,
            dt,
        );
        assert!(matches!(ms, Err(ProtocolViolation::InvalidStepSize(_))));
        assert_eq!(state, initial_state());
    }
}

#[test]
fn test_step_size_below_time_resolution() {
    // At t = 1e17 the f64 spacing is 16, so t + 1.0 == t.
    let t0 = 1e17;
    let dt = 1.0;

    let mut f = Forced::default();
    let mut state = IntegrationState::new(t0, vec![1.0]);
    let mut rk = RkTvd::new(RkTvdConfig::new(1));
    assert_eq!(
        rk.step(&mut f, &mut state, t0 + 100.0, dt),
        Err(ProtocolViolation::InvalidStepSize(dt))
    );
    assert_eq!(rk.phase(), Phase::Uninitialized);

    let mut ms = MultistepTvd::new(MultistepTvdConfig::default());
    assert_eq!(
        ms.step(&mut f, &mut state, t0, dt),
        Err(ProtocolViolation::InvalidStepSize(dt))
    );
    assert_eq!(ms.phase(), Phase::Uninitialized);

    assert_eq!(state, IntegrationState::new(t0, vec![1.0]));
    assert_eq!(f.calls, 0);

    // A step the time variable can resolve is accepted.
    let report = rk.step(&mut f, &mut state, t0 + 64.0, 32.0).unwrap();
    assert_eq!(report.steps, 2);
    assert_eq!(state.t, t0 + 64.0);
}

#[test]
fn test_past_output_time_is_noop() {
    let mut f = Forced::default();

    let mut state = IntegrationState::new(2.0, vec![1.0, 2.0]);
    let mut rk = RkTvd::new(RkTvdConfig::new(3));
    let report = rk.step(&mut f, &mut state, 1.0, 0.1).unwrap();
    assert!(report.is_skipped());
    assert_eq!(state, IntegrationState::new(2.0, vec![1.0, 2.0]));
    assert_eq!(rk.phase(), Phase::Uninitialized);

    let mut ms = MultistepTvd::new(MultistepTvdConfig::default());
    let report = ms.step(&mut f, &mut state, 1.0, 0.1).unwrap();
    assert!(report.is_skipped());
    assert_eq!(state, IntegrationState::new(2.0, vec![1.0, 2.0]));
    assert_eq!(ms.phase(), Phase::Uninitialized);

    assert_eq!(f.calls, 0);
}

#[test]
fn test_noop_precedes_validation() {
    // A call past tout returns before the order is ever checked.
    let mut state = IntegrationState::new(5.0, vec![0.0]);
    let mut solver = RkTvd::new(RkTvdConfig::new(9));

    assert!(solver.step(&mut Forced::default(), &mut state, 1.0, 0.1).is_ok());
}

#[test]
fn test_rhs_evaluation_count() {
    let mut f = Forced::default();
    let mut state = initial_state();
    let mut solver = RkTvd::new(RkTvdConfig::new(3).with_mode(StepMode::IntegrateToOutput));

    let report = solver.step(&mut f, &mut state, 0.5, 0.125).unwrap();

    assert_eq!(report.steps, 4);
    assert_eq!(report.rhs_evals, 12);
    assert_eq!(f.calls, 12);
    assert_eq!(solver.stats().rhs_evals, 12);
}

#[test]
fn test_multistep_bootstrap_then_continue() {
    let mut f = Forced::default();
    let mut state = initial_state();
    let mut solver = MultistepTvd::new(MultistepTvdConfig::default());

    let first = solver.step(&mut f, &mut state, 0.5, 0.125).unwrap();
    assert_eq!(solver.phase(), Phase::Continuing);
    // Four RK3 steps (4 evaluations each with the history push), then
    // multistep steps at t = 0.5 only.
    assert_eq!(first.steps, 5);
    assert_eq!(f.calls, 4 * 4 + 1);
    assert_eq!(state.t, 0.625);

    let calls_before = f.calls;
    let second = solver.step(&mut f, &mut state, 1.0, 0.125).unwrap();
    // t = 0.625, 0.75, 0.875 and 1.0 all satisfy t <= tout.
    assert_eq!(second.steps, 4);
    assert_eq!(f.calls - calls_before, 4);
    assert_eq!(state.t, 1.0 + 0.125);
}

#[test]
fn test_multistep_seed_violations() {
    let mut solver = MultistepTvd::new(MultistepTvdConfig::default());

    assert_eq!(
        solver.seed_history(vec![vec![0.0; 3]; 4], vec![vec![0.0; 3]; 5], 3),
        Err(ProtocolViolation::HistoryDepth {
            kind: HistoryKind::Derivative,
            expected: 4,
            actual: 5
        })
    );
    assert!(matches!(
        solver.seed_history(vec![vec![0.0; 3]; 4], vec![vec![0.0; 2]; 4], 3),
        Err(ProtocolViolation::HistoryLength { slot: 0, .. })
    ));
    assert_eq!(solver.phase(), Phase::Uninitialized);

    solver
        .seed_history(vec![vec![0.0; 3]; 4], vec![vec![0.0; 3]; 4], 3)
        .unwrap();
    assert_eq!(solver.phase(), Phase::Continuing);

    // A seeded solver does not bootstrap.
    let mut f = Forced::default();
    let mut state = initial_state();
    let report = solver.step(&mut f, &mut state, 0.0, 0.1).unwrap();
    assert_eq!(report.steps, 1);
    assert_eq!(f.calls, 1);
}

#[test]
fn test_runtime_selection_agrees() {
    let dt = 1.0 / 256.0;
    let mut results = Vec::new();

    for mut integrator in [
        TvdIntegrator::from(RkTvd::new(RkTvdConfig::new(3))),
        TvdIntegrator::from(MultistepTvd::new(MultistepTvdConfig::default())),
    ] {
        let mut state = initial_state();
        // Multistep ends one step past tout; stop it a half step early.
        let tout = match integrator {
            TvdIntegrator::RungeKutta(_) => 1.0,
            TvdIntegrator::Multistep(_) => 1.0 - 0.5 * dt,
        };
        integrator
            .step(&mut Forced::default(), &mut state, tout, dt)
            .unwrap();

        assert_eq!(state.t, 1.0, "{} did not land on t = 1", integrator.name());
        assert_eq!(integrator.order(), 3);
        results.push(state);
    }

    for (a, b) in results[0].u.iter().zip(&results[1].u) {
        assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
    }
}
