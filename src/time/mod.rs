//! Time integration methods.
//!
//! Explicit TVD schemes for the semi-discrete systems produced by
//! method-of-lines discretizations:
//! - [`RkTvd`]: one-step Runge-Kutta of order 1, 2 or 3
//! - [`MultistepTvd`]: five-step, third-order multistep, bootstrapped by RK

mod error;
mod history;
mod integrator;
mod multistep_tvd;
mod rk_tvd;
mod timestep;

pub use error::{HistoryKind, ProtocolViolation};
pub use history::{HISTORY_DEPTH, StepHistory};
pub use integrator::{
    Derivative, IntegrationState, IntegrationStats, IntegratorInfo, Phase, StepMode, StepReport,
    TvdIntegrator,
};
pub use multistep_tvd::{MultistepTvd, MultistepTvdConfig};
pub use rk_tvd::{RkOrder, RkTvd, RkTvdConfig};
pub use timestep::compute_dt;
