//! 1D grid representation.
//!
//! A 1D grid is a partition of an interval [x_min, x_max] into contiguous
//! cells. Grids are built once by one of the spacing laws below and are
//! immutable afterwards.

use thiserror::Error;

/// Ratios closer to one than this are treated as uniform spacing.
const UNIT_RATIO_TOL: f64 = 1e-12;

/// Error type for grid construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Upper bound not strictly above lower bound, or a bound is not finite.
    #[error("Invalid range: x_max ({x_max}) must be finite and greater than x_min ({x_min})")]
    InvalidRange { x_min: f64, x_max: f64 },

    /// Logarithmic spacing needs a strictly positive origin.
    #[error("Log spacing requires x_min > 0, got {0}")]
    NonPositiveLogOrigin(f64),

    /// Fewer than one cell requested.
    #[error("Invalid cell count: {0} (need at least 1)")]
    InvalidCellCount(usize),

    /// Geometric ratio not strictly positive and finite.
    #[error("Invalid geometric ratio: {0} (must be finite and > 0)")]
    InvalidRatio(f64),

    /// Bilinear crossing point outside the open interval (x_min, x_max).
    #[error("Invalid crossing: x_cross ({x_cross}) must lie strictly inside ({x_min}, {x_max})")]
    InvalidCrossing { x_min: f64, x_cross: f64, x_max: f64 },

    /// Cell with non-positive width.
    #[error("Degenerate cell {index}: edges are not strictly increasing")]
    DegenerateCell { index: usize },

    /// Explicit edge list too short to form a cell.
    #[error("Need at least 2 edges, got {0}")]
    TooFewEdges(usize),
}

/// Spacing law a grid was generated with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spacing {
    /// Uniform cell widths.
    Linear,
    /// Constant ratio between consecutive edges.
    Log,
    /// Constant ratio between consecutive cell widths.
    Geometric { ratio: f64 },
    /// Two uniform sub-grids joined at `x_cross`, the first with `split` cells.
    Bilinear { x_cross: f64, split: usize },
    /// Edges supplied directly by the caller.
    Explicit,
}

/// Immutable 1D grid of an interval.
///
/// Cell `i` spans `[edges[i], edges[i + 1]]`. Widths and centers are derived
/// from the edges at construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid1D {
    name: String,
    spacing: Spacing,
    edges: Vec<f64>,
    widths: Vec<f64>,
    centers: Vec<f64>,
}

impl Grid1D {
    /// Create a uniformly spaced grid of [x_min, x_max].
    ///
    /// `edges[i] = x_min + i * (x_max - x_min) / n_cells`
    pub fn linear(
        x_min: f64,
        x_max: f64,
        n_cells: usize,
        name: impl Into<String>,
    ) -> Result<Self, GridError> {
        check_range(x_min, x_max)?;
        check_count(n_cells)?;

        let edges = linear_edges(x_min, x_max, n_cells);
        Self::assemble(name.into(), Spacing::Linear, edges)
    }

    /// Create a logarithmically spaced grid of [x_min, x_max].
    ///
    /// `edges[i] = x_min * (x_max / x_min)^(i / n_cells)`, so the ratio
    /// `edges[i + 1] / edges[i]` is the same for every cell.
    pub fn log(
        x_min: f64,
        x_max: f64,
        n_cells: usize,
        name: impl Into<String>,
    ) -> Result<Self, GridError> {
        check_range(x_min, x_max)?;
        if x_min <= 0.0 {
            return Err(GridError::NonPositiveLogOrigin(x_min));
        }
        check_count(n_cells)?;

        let span = x_max / x_min;
        let n = n_cells as f64;
        let mut edges: Vec<f64> = (0..=n_cells)
            .map(|i| x_min * span.powf(i as f64 / n))
            .collect();
        pin_endpoints(&mut edges, x_min, x_max);

        Self::assemble(name.into(), Spacing::Log, edges)
    }

    /// Create a grid whose cell widths form a geometric progression.
    ///
    /// The first width is chosen so the widths sum to `x_max - x_min`:
    /// ```text
    /// w_0 = (x_max - x_min) * (ratio - 1) / (ratio^n_cells - 1)
    /// w_i = w_0 * ratio^i
    /// ```
    /// A ratio of one degenerates to uniform spacing. Very large ratios or
    /// cell counts can produce widths below floating-point resolution near
    /// `x_min`; those are reported as [`GridError::DegenerateCell`].
    pub fn geometric(
        x_min: f64,
        x_max: f64,
        ratio: f64,
        n_cells: usize,
        name: impl Into<String>,
    ) -> Result<Self, GridError> {
        check_range(x_min, x_max)?;
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(GridError::InvalidRatio(ratio));
        }
        check_count(n_cells)?;

        let length = x_max - x_min;
        let edges = if (ratio - 1.0).abs() < UNIT_RATIO_TOL {
            linear_edges(x_min, x_max, n_cells)
        } else {
            let w0 = length * (ratio - 1.0) / (ratio.powf(n_cells as f64) - 1.0);

            let mut edges = Vec::with_capacity(n_cells + 1);
            let mut x = x_min;
            let mut w = w0;
            edges.push(x);
            for _ in 0..n_cells {
                x += w;
                w *= ratio;
                edges.push(x);
            }
            pin_endpoints(&mut edges, x_min, x_max);
            edges
        };

        Self::assemble(name.into(), Spacing::Geometric { ratio }, edges)
    }

    /// Create a grid from two uniform sub-grids joined at `x_cross`.
    ///
    /// `[x_min, x_cross]` gets `n_cells[0]` cells and `[x_cross, x_max]` gets
    /// `n_cells[1]` cells. The edge at index `n_cells[0]` is exactly `x_cross`.
    pub fn bilinear(
        x_min: f64,
        x_cross: f64,
        x_max: f64,
        n_cells: [usize; 2],
        name: impl Into<String>,
    ) -> Result<Self, GridError> {
        check_range(x_min, x_max)?;
        if !(x_cross > x_min && x_cross < x_max) {
            return Err(GridError::InvalidCrossing {
                x_min,
                x_cross,
                x_max,
            });
        }
        let [n_left, n_right] = n_cells;
        check_count(n_left)?;
        check_count(n_right)?;

        let mut edges = linear_edges(x_min, x_cross, n_left);
        // The right sub-grid starts at x_cross, which is already the last edge.
        edges.extend(linear_edges(x_cross, x_max, n_right).into_iter().skip(1));

        Self::assemble(
            name.into(),
            Spacing::Bilinear {
                x_cross,
                split: n_left,
            },
            edges,
        )
    }

    /// Wrap an explicit, strictly increasing edge sequence.
    pub fn from_edges(edges: Vec<f64>, name: impl Into<String>) -> Result<Self, GridError> {
        if edges.len() < 2 {
            return Err(GridError::TooFewEdges(edges.len()));
        }
        let (first, last) = (edges[0], edges[edges.len() - 1]);
        check_range(first, last)?;

        Self::assemble(name.into(), Spacing::Explicit, edges)
    }

    /// Validate edges and derive per-cell metrics.
    fn assemble(name: String, spacing: Spacing, edges: Vec<f64>) -> Result<Self, GridError> {
        let widths: Vec<f64> = edges.windows(2).map(|e| e[1] - e[0]).collect();

        // Negated comparison also rejects NaN widths.
        if let Some(index) = widths.iter().position(|&w| !(w > 0.0)) {
            return Err(GridError::DegenerateCell { index });
        }

        let centers = edges.windows(2).map(|e| (e[0] + e[1]) / 2.0).collect();

        Ok(Self {
            name,
            spacing,
            edges,
            widths,
            centers,
        })
    }

    /// Informational label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spacing law used to build this grid.
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Number of cells.
    pub fn n_cells(&self) -> usize {
        self.widths.len()
    }

    /// Cell edges, length `n_cells + 1`.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Left edge of every cell: `left[i] = edges[i]`.
    pub fn left(&self) -> &[f64] {
        &self.edges[..self.n_cells()]
    }

    /// Right edge of every cell: `right[i] = edges[i + 1]`.
    pub fn right(&self) -> &[f64] {
        &self.edges[1..]
    }

    /// Cell widths: `right[i] - left[i]`.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Cell centers: `(left[i] + right[i]) / 2`.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Left endpoint of the domain.
    pub fn x_min(&self) -> f64 {
        self.edges[0]
    }

    /// Right endpoint of the domain.
    pub fn x_max(&self) -> f64 {
        self.edges[self.n_cells()]
    }

    /// Total domain length.
    pub fn length(&self) -> f64 {
        self.x_max() - self.x_min()
    }

    /// Minimum cell width.
    pub fn h_min(&self) -> f64 {
        self.widths.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Maximum cell width.
    pub fn h_max(&self) -> f64 {
        self.widths.iter().copied().fold(0.0, f64::max)
    }

    /// Index of the cell containing `x`.
    ///
    /// Interior edges belong to the cell on their right; `x_max` belongs to
    /// the last cell. Returns `None` outside the domain.
    pub fn locate(&self, x: f64) -> Option<usize> {
        if !(x >= self.x_min() && x <= self.x_max()) {
            return None;
        }
        let idx = self.edges.partition_point(|&e| e <= x);
        Some(idx.saturating_sub(1).min(self.n_cells() - 1))
    }
}

fn check_range(x_min: f64, x_max: f64) -> Result<(), GridError> {
    if x_min.is_finite() && x_max.is_finite() && x_max > x_min {
        Ok(())
    } else {
        Err(GridError::InvalidRange { x_min, x_max })
    }
}

fn check_count(n_cells: usize) -> Result<(), GridError> {
    if n_cells < 1 {
        Err(GridError::InvalidCellCount(n_cells))
    } else {
        Ok(())
    }
}

fn linear_edges(x_min: f64, x_max: f64, n_cells: usize) -> Vec<f64> {
    let h = (x_max - x_min) / n_cells as f64;
    let mut edges: Vec<f64> = (0..=n_cells).map(|i| x_min + i as f64 * h).collect();
    pin_endpoints(&mut edges, x_min, x_max);
    edges
}

/// Round-off in the spacing formulas must not move the domain bounds.
fn pin_endpoints(edges: &mut [f64], x_min: f64, x_max: f64) {
    let last = edges.len() - 1;
    edges[0] = x_min;
    edges[last] = x_max;
}
