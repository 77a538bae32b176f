//! # tvd-rs
//!
//! Time integration and grid support for method-of-lines solvers of
//! hyperbolic conservation laws.
//!
//! This crate provides:
//! - 1D grid generation (linear, logarithmic, geometric, bilinear spacing)
//! - TVD Runge-Kutta integrators of order 1, 2 and 3
//! - A five-step, third-order TVD multistep integrator
//!
//! The spatial discretization is supplied by the caller as a [`Derivative`]
//! computing `du/dt` from `(t, u)`.
//!
//! # Example
//! ```
//! use tvd_rs::{Grid1D, IntegrationState, MultistepTvd, MultistepTvdConfig, compute_dt};
//!
//! let grid = Grid1D::linear(0.0, 1.0, 50, "periodic").unwrap();
//! let n = grid.n_cells();
//! let h = grid.widths()[0];
//!
//! // First-order upwind advection with unit speed on a periodic domain.
//! let mut rhs = |_t: f64, u: &[f64], udot: &mut [f64]| {
//!     for i in 0..n {
//!         let upwind = u[(i + n - 1) % n];
//!         udot[i] = -(u[i] - upwind) / h;
//!     }
//! };
//!
//! let u0 = grid.centers().iter().map(|&x| if x < 0.5 { 1.0 } else { 0.0 }).collect();
//! let mut state = IntegrationState::new(0.0, u0);
//! let dt = compute_dt(&grid, 1.0, 0.4);
//!
//! let mut solver = MultistepTvd::new(MultistepTvdConfig::default());
//! solver.step(&mut rhs, &mut state, 0.2, dt).unwrap();
//!
//! // TVD: no new extrema
//! assert!(state.u.iter().all(|&v| (-1e-12..=1.0 + 1e-12).contains(&v)));
//! ```

pub mod mesh;
pub mod time;

// Re-export main types for convenience
pub use mesh::{Grid1D, GridError, Spacing};
pub use time::{
    Derivative, HISTORY_DEPTH, IntegrationState, IntegrationStats, IntegratorInfo, MultistepTvd,
    MultistepTvdConfig, Phase, ProtocolViolation, RkOrder, RkTvd, RkTvdConfig, StepHistory,
    StepMode, StepReport, TvdIntegrator, compute_dt,
};
