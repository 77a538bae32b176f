//! Shared integrator abstractions.
//!
//! This module provides the pieces common to every TVD integrator:
//! - [`IntegrationState`]: the caller-owned `(t, u)` pair advanced in place
//! - [`Derivative`]: the spatial right-hand side `f(t, u) -> du/dt`
//! - [`Phase`] / [`StepMode`]: the call protocol flags
//! - [`IntegratorInfo`]: non-generic metadata about a scheme
//! - [`TvdIntegrator`]: runtime selection between the RK and multistep schemes
//!
//! # Example
//! ```
//! use tvd_rs::time::{IntegrationState, RkTvd, RkTvdConfig};
//!
//! // du/dt = -u, u(0) = 1
//! let mut rhs = |_t: f64, u: &[f64], udot: &mut [f64]| {
//!     for (d, &v) in udot.iter_mut().zip(u) {
//!         *d = -v;
//!     }
//! };
//!
//! let mut state = IntegrationState::new(0.0, vec![1.0]);
//! let mut solver = RkTvd::new(RkTvdConfig::new(3));
//! solver.step(&mut rhs, &mut state, 1.0, 0.01).unwrap();
//!
//! assert!((state.u[0] - (-state.t).exp()).abs() < 1e-6);
//! ```

use super::error::ProtocolViolation;
use super::multistep_tvd::MultistepTvd;
use super::rk_tvd::RkTvd;

// =============================================================================
// State and Right-Hand Side
// =============================================================================

/// Solution vector and current time, owned by the caller.
///
/// Integrators mutate it in place. The length of `u` must stay fixed for the
/// lifetime of a solver.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationState {
    /// Current time.
    pub t: f64,
    /// Solution vector.
    pub u: Vec<f64>,
}

impl IntegrationState {
    /// Create a state at time `t` with initial solution `u`.
    pub fn new(t: f64, u: Vec<f64>) -> Self {
        Self { t, u }
    }

    /// Number of unknowns.
    pub fn dim(&self) -> usize {
        self.u.len()
    }
}

/// Time derivative of a semi-discrete system: `udot = f(t, u)`.
///
/// `udot` always has the same length as `u`. Implementations should be
/// deterministic; the integrators call them several times per step with
/// intermediate stage values.
///
/// Any closure `FnMut(f64, &[f64], &mut [f64])` is a `Derivative`.
pub trait Derivative {
    /// Write `f(t, u)` into `udot`.
    fn eval(&mut self, t: f64, u: &[f64], udot: &mut [f64]);
}

impl<F> Derivative for F
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    fn eval(&mut self, t: f64, u: &[f64], udot: &mut [f64]) {
        self(t, u, udot)
    }
}

// =============================================================================
// Call Protocol
// =============================================================================

/// Lifecycle of a solver object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No step taken yet; the next call validates and initializes.
    #[default]
    Uninitialized,
    /// Initialized; calls step without re-validating the configuration.
    Continuing,
}

/// How far a single call to an RK-TVD solver advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepMode {
    /// Step repeatedly until `t >= tout`.
    #[default]
    IntegrateToOutput,
    /// Take exactly one step.
    SingleStep,
}

/// Summary of one integrator call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Steps taken, including bootstrap steps.
    pub steps: usize,
    /// Right-hand side evaluations.
    pub rhs_evals: usize,
    /// Time reached.
    pub t_final: f64,
    /// Amount by which `t_final` passed `tout` (zero if it did not).
    pub overshoot: f64,
}

impl StepReport {
    /// Report for a call that returned without stepping.
    pub fn skipped(t: f64) -> Self {
        Self {
            t_final: t,
            ..Self::default()
        }
    }

    /// Whether the call left the state untouched.
    pub fn is_skipped(&self) -> bool {
        self.steps == 0
    }

    pub(crate) fn finish(mut self, t_final: f64, tout: f64) -> Self {
        self.t_final = t_final;
        self.overshoot = (t_final - tout).max(0.0);
        self
    }
}

/// Running totals over the lifetime of a solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    /// Total steps taken.
    pub steps: u64,
    /// Total right-hand side evaluations.
    pub rhs_evals: u64,
}

impl IntegrationStats {
    pub(crate) fn record(&mut self, report: &StepReport) {
        self.steps += report.steps as u64;
        self.rhs_evals += report.rhs_evals as u64;
    }
}

/// `dt` must be finite and positive, and `t + dt` must exceed `t`.
pub(crate) fn check_step_size(t: f64, dt: f64) -> Result<(), ProtocolViolation> {
    if dt.is_finite() && dt > 0.0 && t + dt > t {
        Ok(())
    } else {
        Err(ProtocolViolation::InvalidStepSize(dt))
    }
}

// =============================================================================
// IntegratorInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Non-generic information about a time integrator.
pub trait IntegratorInfo: Send + Sync {
    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Order of accuracy of the integrator.
    fn order(&self) -> usize;

    /// Number of right-hand side evaluations per step.
    fn n_stages(&self) -> usize;

    /// Whether the integrator is strong stability preserving (SSP).
    ///
    /// SSP integrators maintain TVD and other nonlinear stability properties.
    fn is_ssp(&self) -> bool;

    /// Times at which the RHS is evaluated relative to the current time.
    fn stage_times(&self, dt: f64) -> Vec<f64>;
}

// =============================================================================
// Runtime Selection
// =============================================================================

/// Either TVD scheme behind one interface.
#[derive(Clone, Debug)]
pub enum TvdIntegrator {
    /// One-step TVD Runge-Kutta of order 1, 2 or 3.
    RungeKutta(RkTvd),
    /// Five-step third-order TVD multistep.
    Multistep(MultistepTvd),
}

impl TvdIntegrator {
    /// Advance `state` towards `tout` with the wrapped scheme.
    pub fn step<F: Derivative>(
        &mut self,
        f: &mut F,
        state: &mut IntegrationState,
        tout: f64,
        dt: f64,
    ) -> Result<StepReport, ProtocolViolation> {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.step(f, state, tout, dt),
            TvdIntegrator::Multistep(ms) => ms.step(f, state, tout, dt),
        }
    }

    /// Current protocol phase.
    pub fn phase(&self) -> Phase {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.phase(),
            TvdIntegrator::Multistep(ms) => ms.phase(),
        }
    }

    /// Totals accumulated since construction or the last reset.
    pub fn stats(&self) -> IntegrationStats {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.stats(),
            TvdIntegrator::Multistep(ms) => ms.stats(),
        }
    }

    /// Return to [`Phase::Uninitialized`].
    pub fn reset(&mut self) {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.reset(),
            TvdIntegrator::Multistep(ms) => ms.reset(),
        }
    }
}

impl From<RkTvd> for TvdIntegrator {
    fn from(rk: RkTvd) -> Self {
        TvdIntegrator::RungeKutta(rk)
    }
}

impl From<MultistepTvd> for TvdIntegrator {
    fn from(ms: MultistepTvd) -> Self {
        TvdIntegrator::Multistep(ms)
    }
}

impl IntegratorInfo for TvdIntegrator {
    fn name(&self) -> &'static str {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.name(),
            TvdIntegrator::Multistep(ms) => ms.name(),
        }
    }

    fn order(&self) -> usize {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.order(),
            TvdIntegrator::Multistep(ms) => ms.order(),
        }
    }

    fn n_stages(&self) -> usize {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.n_stages(),
            TvdIntegrator::Multistep(ms) => ms.n_stages(),
        }
    }

    fn is_ssp(&self) -> bool {
        true // Both schemes are TVD
    }

    fn stage_times(&self, dt: f64) -> Vec<f64> {
        match self {
            TvdIntegrator::RungeKutta(rk) => rk.stage_times(dt),
            TvdIntegrator::Multistep(ms) => ms.stage_times(dt),
        }
    }
}
