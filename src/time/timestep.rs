//! CFL-limited step size selection.

use crate::mesh::Grid1D;

/// Compute a fixed time step from the CFL condition on `grid`.
///
/// dt = CFL * h_min / |max_wave_speed|
///
/// # Arguments
/// * `grid` - The grid (for h_min)
/// * `max_wave_speed` - Largest characteristic speed of the system
/// * `cfl` - CFL number (at most 1 for the TVD schemes in this module)
pub fn compute_dt(grid: &Grid1D, max_wave_speed: f64, cfl: f64) -> f64 {
    let speed = max_wave_speed.abs();

    if speed < 1e-14 {
        // No propagation, any timestep is fine
        return f64::INFINITY;
    }

    cfl * grid.h_min() / speed
}
