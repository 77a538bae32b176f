//! TVD Runge-Kutta time integration.
//!
//! Explicit one-step schemes of order 1 to 3 in Shu-Osher form. Each is a
//! convex combination of forward Euler steps, so they preserve the TVD
//! property of the spatial discretization under the same CFL restriction.
//!
//! ```text
//! order 1: u_new = u + dt * L(u, t)
//! order 2: u1    = u + dt * L(u, t)
//!          u_new = 1/2 * (u + u1 + dt * L(u1, t + dt))
//! order 3: u1    = u + dt * L(u, t)
//!          u2    = 1/4 * (3u + u1 + dt * L(u1, t + dt))
//!          u_new = 1/3 * (u + 2 u2 + 2 dt * L(u2, t + dt/2))
//! ```

use super::error::ProtocolViolation;
use super::integrator::{
    Derivative, IntegrationState, IntegrationStats, IntegratorInfo, Phase, StepMode, StepReport,
    check_step_size,
};

/// Supported Runge-Kutta orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RkOrder {
    /// Forward Euler.
    First,
    /// Two-stage TVD-RK2 (Heun form).
    Second,
    /// Three-stage TVD-RK3 (Shu-Osher).
    Third,
}

impl RkOrder {
    /// Order of accuracy.
    pub fn as_usize(self) -> usize {
        match self {
            RkOrder::First => 1,
            RkOrder::Second => 2,
            RkOrder::Third => 3,
        }
    }

    /// RHS evaluations per step.
    pub fn n_stages(self) -> usize {
        self.as_usize()
    }

    fn name(self) -> &'static str {
        match self {
            RkOrder::First => "forward-euler",
            RkOrder::Second => "tvd-rk2",
            RkOrder::Third => "tvd-rk3",
        }
    }

    fn stage_times(self, dt: f64) -> Vec<f64> {
        match self {
            RkOrder::First => vec![0.0],
            RkOrder::Second => vec![0.0, dt],
            RkOrder::Third => vec![0.0, dt, 0.5 * dt],
        }
    }
}

impl TryFrom<usize> for RkOrder {
    type Error = ProtocolViolation;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RkOrder::First),
            2 => Ok(RkOrder::Second),
            3 => Ok(RkOrder::Third),
            _ => Err(ProtocolViolation::InvalidOrder(value)),
        }
    }
}

/// Configuration for an [`RkTvd`] solver.
#[derive(Clone, Debug)]
pub struct RkTvdConfig {
    /// Requested order (1, 2 or 3); validated on the first step.
    pub order: usize,
    /// Whether a call integrates to `tout` or takes a single step.
    pub mode: StepMode,
    /// Print a summary line after each integration segment.
    pub verbose: bool,
}

impl Default for RkTvdConfig {
    fn default() -> Self {
        Self {
            order: 3,
            mode: StepMode::IntegrateToOutput,
            verbose: false,
        }
    }
}

impl RkTvdConfig {
    /// Create a configuration of the given order integrating to output.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Set the step mode.
    pub fn with_mode(mut self, mode: StepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Take a single step per call.
    pub fn single_step(self) -> Self {
        self.with_mode(StepMode::SingleStep)
    }

    /// Enable verbose output.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

/// Resolved configuration, present once the solver is initialized.
#[derive(Clone, Copy, Debug)]
struct Ready {
    order: RkOrder,
    dim: usize,
}

/// TVD Runge-Kutta solver object.
///
/// Owns the protocol phase and the stage buffers; the solution is owned by
/// the caller and passed to every [`step`](RkTvd::step).
#[derive(Clone, Debug)]
pub struct RkTvd {
    config: RkTvdConfig,
    ready: Option<Ready>,
    // Stage scratch: k holds the latest RHS, u1/u2 the intermediate stages.
    k: Vec<f64>,
    u1: Vec<f64>,
    u2: Vec<f64>,
    stats: IntegrationStats,
}

impl RkTvd {
    /// Create an uninitialized solver.
    pub fn new(config: RkTvdConfig) -> Self {
        Self {
            config,
            ready: None,
            k: Vec::new(),
            u1: Vec::new(),
            u2: Vec::new(),
            stats: IntegrationStats::default(),
        }
    }

    /// Solver configuration.
    pub fn config(&self) -> &RkTvdConfig {
        &self.config
    }

    /// Current protocol phase.
    pub fn phase(&self) -> Phase {
        match self.ready {
            Some(_) => Phase::Continuing,
            None => Phase::Uninitialized,
        }
    }

    /// Totals accumulated since construction or the last reset.
    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    /// Validate the configuration against `state` and size the stage buffers.
    ///
    /// Promotes the phase to [`Phase::Continuing`]. Called implicitly by the
    /// first [`step`](RkTvd::step).
    pub fn init(&mut self, state: &IntegrationState) -> Result<(), ProtocolViolation> {
        self.initialize(state).map(|_| ())
    }

    fn initialize(&mut self, state: &IntegrationState) -> Result<RkOrder, ProtocolViolation> {
        let order = RkOrder::try_from(self.config.order)?;
        let dim = state.dim();

        self.k = vec![0.0; dim];
        self.u1 = if order == RkOrder::First {
            Vec::new()
        } else {
            vec![0.0; dim]
        };
        self.u2 = if order == RkOrder::Third {
            vec![0.0; dim]
        } else {
            Vec::new()
        };
        self.ready = Some(Ready { order, dim });
        Ok(order)
    }

    /// Return to [`Phase::Uninitialized`] and clear the statistics.
    pub fn reset(&mut self) {
        self.ready = None;
        self.stats = IntegrationStats::default();
    }

    /// Advance `state` with fixed steps of size `dt`.
    ///
    /// - If `state.t > tout` the call returns immediately and changes nothing.
    /// - [`StepMode::IntegrateToOutput`] steps while `t < tout`. When `dt`
    ///   does not divide `tout - t` the last step passes `tout`; the excess
    ///   is reported as [`StepReport::overshoot`].
    /// - [`StepMode::SingleStep`] takes exactly one step.
    ///
    /// The first call validates the order; later calls do not.
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

        let order = match self.ready {
            Some(ready) if ready.dim == state.dim() => ready.order,
            Some(ready) => {
                return Err(ProtocolViolation::dimension_mismatch(
                    ready.dim,
                    state.dim(),
                ));
            }
            None => self.initialize(state)?,
        };

        let mut report = StepReport::default();
        match self.config.mode {
            StepMode::SingleStep => {
                self.advance(order, f, state, dt);
                report.steps += 1;
            }
            StepMode::IntegrateToOutput => {
                while state.t < tout {
                    self.advance(order, f, state, dt);
                    report.steps += 1;
                }
            }
        }
        report.rhs_evals = report.steps * order.n_stages();
        let report = report.finish(state.t, tout);
        self.stats.record(&report);

        if self.config.verbose && self.config.mode == StepMode::IntegrateToOutput {
            println!(
                "{}: {} steps to t = {:.6e} (dt = {:.2e}, overshoot = {:.2e})",
                order.name(),
                report.steps,
                report.t_final,
                dt,
                report.overshoot
            );
        }

        Ok(report)
    }

    /// Take one step of the resolved order.
    fn advance<F: Derivative>(
        &mut self,
        order: RkOrder,
        f: &mut F,
        state: &mut IntegrationState,
        dt: f64,
    ) {
        let t = state.t;
        let u = &mut state.u;

        // Stage 1: u1 = u + dt * L(u, t)
        f.eval(t, u, &mut self.k);

        match order {
            RkOrder::First => {
                for (ui, &ki) in u.iter_mut().zip(&self.k) {
                    *ui += dt * ki;
                }
            }
            RkOrder::Second => {
                for ((u1, &ui), &ki) in self.u1.iter_mut().zip(u.iter()).zip(&self.k) {
                    *u1 = ui + dt * ki;
                }

                // u_new = 1/2 * (u + u1 + dt * L(u1, t + dt))
                f.eval(t + dt, &self.u1, &mut self.k);
                for ((ui, &u1), &ki) in u.iter_mut().zip(&self.u1).zip(&self.k) {
                    *ui = 0.5 * (*ui + u1 + dt * ki);
                }
            }
            RkOrder::Third => {
                for ((u1, &ui), &ki) in self.u1.iter_mut().zip(u.iter()).zip(&self.k) {
                    *u1 = ui + dt * ki;
                }

                // Stage 2: u2 = 1/4 * (3u + u1 + dt * L(u1, t + dt))
                f.eval(t + dt, &self.u1, &mut self.k);
                for (((u2, &ui), &u1), &ki) in self
                    .u2
                    .iter_mut()
                    .zip(u.iter())
                    .zip(&self.u1)
                    .zip(&self.k)
                {
                    *u2 = 0.25 * (3.0 * ui + u1 + dt * ki);
                }

                // Stage 3: u_new = 1/3 * (u + 2 u2 + 2 dt * L(u2, t + dt/2))
                f.eval(t + 0.5 * dt, &self.u2, &mut self.k);
                for ((ui, &u2), &ki) in u.iter_mut().zip(&self.u2).zip(&self.k) {
                    *ui = (*ui + 2.0 * u2 + 2.0 * dt * ki) / 3.0;
                }
            }
        }

        state.t = t + dt;
    }
}

impl IntegratorInfo for RkTvd {
    fn name(&self) -> &'static str {
        RkOrder::try_from(self.config.order)
            .map(RkOrder::name)
            .unwrap_or("rk-tvd")
    }

    fn order(&self) -> usize {
        RkOrder::try_from(self.config.order)
            .map(RkOrder::as_usize)
            .unwrap_or(0)
    }

    fn n_stages(&self) -> usize {
        RkOrder::try_from(self.config.order)
            .map(RkOrder::n_stages)
            .unwrap_or(0)
    }

    fn is_ssp(&self) -> bool {
        true
    }

    fn stage_times(&self, dt: f64) -> Vec<f64> {
        RkOrder::try_from(self.config.order)
            .map(|order| order.stage_times(dt))
            .unwrap_or_default()
    }
}
