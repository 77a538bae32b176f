//! Fixed-depth step history for multistep schemes.

use super::error::{HistoryKind, ProtocolViolation};

/// Number of past `(u, du/dt)` snapshots kept by [`StepHistory`].
pub const HISTORY_DEPTH: usize = 4;

/// Rolling buffer of the last [`HISTORY_DEPTH`] solution/derivative pairs.
///
/// Slot 0 is the most recent snapshot, slot `HISTORY_DEPTH - 1` the oldest.
/// Slot buffers are allocated once; [`push`](StepHistory::push) recycles the
/// oldest slot instead of allocating.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepHistory {
    u: [Vec<f64>; HISTORY_DEPTH],
    udot: [Vec<f64>; HISTORY_DEPTH],
    dim: usize,
    filled: usize,
}

impl StepHistory {
    /// Create an empty history for solutions of length `dim`.
    pub fn new(dim: usize) -> Self {
        Self {
            u: std::array::from_fn(|_| vec![0.0; dim]),
            udot: std::array::from_fn(|_| vec![0.0; dim]),
            dim,
            filled: 0,
        }
    }

    /// Build a full history from caller-supplied snapshots, most recent first.
    ///
    /// Both lists must hold exactly [`HISTORY_DEPTH`] slots of length `dim`.
    pub fn from_snapshots(
        u: Vec<Vec<f64>>,
        udot: Vec<Vec<f64>>,
        dim: usize,
    ) -> Result<Self, ProtocolViolation> {
        let u = into_slots(u, HistoryKind::Solution)?;
        let udot = into_slots(udot, HistoryKind::Derivative)?;

        for (slot, (a, b)) in u.iter().zip(&udot).enumerate() {
            for len in [a.len(), b.len()] {
                if len != dim {
                    return Err(ProtocolViolation::HistoryLength {
                        slot,
                        expected: dim,
                        actual: len,
                    });
                }
            }
        }

        Ok(Self {
            u,
            udot,
            dim,
            filled: HISTORY_DEPTH,
        })
    }

    /// Shift every snapshot one slot older and store `(u, udot)` in slot 0.
    ///
    /// # Panics
    /// If `u` or `udot` does not have length [`dim`](StepHistory::dim).
    pub fn push(&mut self, u: &[f64], udot: &[f64]) {
        self.u.rotate_right(1);
        self.udot.rotate_right(1);
        self.u[0].copy_from_slice(u);
        self.udot[0].copy_from_slice(udot);
        self.filled = (self.filled + 1).min(HISTORY_DEPTH);
    }

    /// Solution snapshot `slot` steps back (0 = most recent).
    pub fn u(&self, slot: usize) -> &[f64] {
        &self.u[slot]
    }

    /// Derivative snapshot `slot` steps back (0 = most recent).
    pub fn udot(&self, slot: usize) -> &[f64] {
        &self.udot[slot]
    }

    /// Oldest snapshot pair.
    pub fn oldest(&self) -> (&[f64], &[f64]) {
        (&self.u[HISTORY_DEPTH - 1], &self.udot[HISTORY_DEPTH - 1])
    }

    /// Length of each snapshot.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of slots holding pushed or seeded data.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Whether every slot holds data.
    pub fn is_full(&self) -> bool {
        self.filled == HISTORY_DEPTH
    }
}

fn into_slots(
    slots: Vec<Vec<f64>>,
    kind: HistoryKind,
) -> Result<[Vec<f64>; HISTORY_DEPTH], ProtocolViolation> {
    let actual = slots.len();
    slots
        .try_into()
        .map_err(|_| ProtocolViolation::HistoryDepth {
            kind,
            expected: HISTORY_DEPTH,
            actual,
        })
}
