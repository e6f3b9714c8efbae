//! Settle-event bookkeeping for a single spin.

use reelspin_core::CellIndex;

/// Result of recording a single settle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The settle was counted; `remaining` cells are still moving.
    Pending {
        /// Cells that have not settled yet.
        remaining: usize,
    },
    /// The settle was counted and it was the last one.
    Completed,
    /// The cell already settled during this spin; the event was ignored.
    Duplicate,
    /// The cell is not part of the grid; the event was ignored.
    OutOfRange,
}

/// Counts per-cell settle events until every cell of the grid has landed.
///
/// Each cell is counted at most once, so the pending count reaches zero
/// exactly once.
#[derive(Clone, Debug)]
pub struct CompletionAggregator {
    settled: Vec<bool>,
    pending: usize,
}

impl CompletionAggregator {
    /// Creates an aggregator expecting one settle from each of `cell_count` cells.
    #[must_use]
    pub fn new(cell_count: usize) -> Self {
        Self {
            settled: vec![false; cell_count],
            pending: cell_count,
        }
    }

    /// Number of cells that have not settled yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Records that `cell` settled.
    pub fn record(&mut self, cell: CellIndex) -> SettleOutcome {
        let Some(slot) = self.settled.get_mut(cell.as_usize()) else {
            return SettleOutcome::OutOfRange;
        };
        if *slot {
            return SettleOutcome::Duplicate;
        }

        *slot = true;
        self.pending -= 1;
        if self.pending == 0 {
            SettleOutcome::Completed
        } else {
            SettleOutcome::Pending {
                remaining: self.pending,
            }
        }
    }
}
