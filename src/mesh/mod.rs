//! Mesh representation.
//!
//! Provides the 1D grid used by method-of-lines discretizations:
//! - Uniform, logarithmic, geometric and bilinear spacing laws
//! - Per-cell metrics (edges, widths, centers) derived from the edges
//! - Grids built from caller-supplied edges

mod grid1d;

pub use grid1d::{Grid1D, GridError, Spacing};
