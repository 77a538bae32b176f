//! Third-order five-step TVD multistep time integration.
//!
//! ```text
//! u_{n+1} = (25 u_n + 50 dt L(u_n) + 7 u_{n-4} + 10 dt L(u_{n-4})) / 32
//! ```
//!
//! All coefficients are non-negative, so each step is a convex combination
//! of forward Euler steps and the scheme is TVD. It costs a single RHS
//! evaluation per step but needs the four previous `(u, L(u))` pairs. On the
//! first call those are generated with four steps of third-order TVD-RK.

use super::error::ProtocolViolation;
use super::history::{HISTORY_DEPTH, StepHistory};
use super::integrator::{
    Derivative, IntegrationState, IntegrationStats, IntegratorInfo, Phase, StepReport,
    check_step_size,
};
use super::rk_tvd::{RkTvd, RkTvdConfig};

/// Configuration for a [`MultistepTvd`] solver.
#[derive(Clone, Debug, Default)]
pub struct MultistepTvdConfig {
    /// Print a line after bootstrap and after each integration segment.
    pub verbose: bool,
}

impl MultistepTvdConfig {
    /// Enable verbose output.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

/// Five-step, third-order TVD multistep solver object.
#[derive(Clone, Debug)]
pub struct MultistepTvd {
    config: MultistepTvdConfig,
    phase: Phase,
    history: StepHistory,
    udot: Vec<f64>,
    next: Vec<f64>,
    stats: IntegrationStats,
}

impl MultistepTvd {
    /// Create an uninitialized solver; the first step bootstraps the history.
    pub fn new(config: MultistepTvdConfig) -> Self {
        Self {
            config,
            phase: Phase::Uninitialized,
            history: StepHistory::default(),
            udot: Vec::new(),
            next: Vec::new(),
            stats: IntegrationStats::default(),
        }
    }

    /// Current protocol phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Totals accumulated since construction or the last reset.
    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    /// Past `(u, du/dt)` snapshots; empty until bootstrapped or seeded.
    pub fn history(&self) -> &StepHistory {
        &self.history
    }

    /// Drop the history and return to [`Phase::Uninitialized`].
    pub fn reset(&mut self) {
        self.phase = Phase::Uninitialized;
        self.history = StepHistory::default();
        self.stats = IntegrationStats::default();
    }

    /// Restart from known snapshots instead of bootstrapping.
    ///
    /// `u` and `udot` are ordered most recent first and must each hold
    /// exactly [`HISTORY_DEPTH`] slots of length `dim`. On success the solver
    /// is in [`Phase::Continuing`].
    pub fn seed_history(
        &mut self,
        u: Vec<Vec<f64>>,
        udot: Vec<Vec<f64>>,
        dim: usize,
    ) -> Result<(), ProtocolViolation> {
        self.history = StepHistory::from_snapshots(u, udot, dim)?;
        self.size_scratch(dim);
        self.phase = Phase::Continuing;
        Ok(())
    }

    /// Advance `state` with fixed steps of size `dt` while `t <= tout`.
    ///
    /// - If `state.t > tout` the call returns immediately and changes nothing.
    /// - In [`Phase::Uninitialized`] the history is first filled by four
    ///   TVD-RK3 steps, regardless of `tout`.
    /// - The loop stops at the first `t > tout`, so the solution always ends
    ///   past `tout`.
    pub fn step<F: Derivative>(
        &mut self,
        f: &mut F,
        state: &mut IntegrationState,
        tout: f64,
        dt: f64,
    ) -> Result<StepReport, ProtocolViolation> {
        if state.t > tout {
            return Ok(StepReport::skipped(state.t));
        }
        check_step_size(state.t, dt)?;

        let mut report = StepReport::default();
        match self.phase {
            Phase::Uninitialized => self.bootstrap(f, state, dt, &mut report)?,
            Phase::Continuing if self.history.dim() != state.dim() => {
                return Err(ProtocolViolation::dimension_mismatch(
                    self.history.dim(),
                    state.dim(),
                ));
            }
            Phase::Continuing => {}
        }

        while state.t <= tout {
            self.advance(f, state, dt);
            report.steps += 1;
            report.rhs_evals += 1;
        }

        let report = report.finish(state.t, tout);
        self.stats.record(&report);

        if self.config.verbose {
            println!(
                "{}: {} steps to t = {:.6e} (dt = {:.2e}, overshoot = {:.2e})",
                self.name(),
                report.steps,
                report.t_final,
                dt,
                report.overshoot
            );
        }

        Ok(report)
    }

    /// Fill the history with four single TVD-RK3 steps.
    ///
    /// Before each step the current `(u, L(u))` is pushed, so the initial
    /// state ends up in the oldest slot.
    fn bootstrap<F: Derivative>(
        &mut self,
        f: &mut F,
        state: &mut IntegrationState,
        dt: f64,
        report: &mut StepReport,
    ) -> Result<(), ProtocolViolation> {
        let dim = state.dim();
        let mut starter = RkTvd::new(RkTvdConfig::new(3).single_step());

        self.history = StepHistory::new(dim);
        self.size_scratch(dim);

        for _ in 0..HISTORY_DEPTH {
            f.eval(state.t, &state.u, &mut self.udot);
            self.history.push(&state.u, &self.udot);

            let tout = state.t + dt;
            let rk = starter.step(f, state, tout, dt)?;
            report.steps += rk.steps;
            report.rhs_evals += rk.rhs_evals + 1;
        }

        self.phase = Phase::Continuing;

        if self.config.verbose {
            println!(
                "{}: history bootstrapped with {} tvd-rk3 steps, t = {:.6e}",
                self.name(),
                HISTORY_DEPTH,
                state.t
            );
        }

        Ok(())
    }

    /// Take one multistep step and shift the history.
    fn advance<F: Derivative>(&mut self, f: &mut F, state: &mut IntegrationState, dt: f64) {
        f.eval(state.t, &state.u, &mut self.udot);

        let (u_old, udot_old) = self.history.oldest();
        for ((((next, &ui), &di), &uo), &dold) in self
            .next
            .iter_mut()
            .zip(&state.u)
            .zip(&self.udot)
            .zip(u_old)
            .zip(udot_old)
        {
            *next = (25.0 * ui + 50.0 * dt * di + 7.0 * uo + 10.0 * dt * dold) / 32.0;
        }

        self.history.push(&state.u, &self.udot);
        state.u.copy_from_slice(&self.next);
        state.t += dt;
    }

    fn size_scratch(&mut self, dim: usize) {
        self.udot = vec![0.0; dim];
        self.next = vec![0.0; dim];
    }
}

impl IntegratorInfo for MultistepTvd {
    fn name(&self) -> &'static str {
        "tvd-ms3"
    }

    fn order(&self) -> usize {
        3
    }

    fn n_stages(&self) -> usize {
        1
    }

    fn is_ssp(&self) -> bool {
        true
    }

    fn stage_times(&self, _dt: f64) -> Vec<f64> {
        vec![0.0]
    }
}
