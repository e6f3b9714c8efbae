#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that scores a completed spin with the left-anchored run rule.
//!
//! A row wins when two or more cells starting at column 0 share a symbol.
//! Scanning stops at the first mismatch, so runs that begin further right are
//! never counted.

use reelspin_core::{
    AnimationState, CellCoord, Command, Event, GridDimensions, RowWin, SymbolSnapshot,
};

/// Shortest run that counts as a win.
pub const MIN_RUN_LENGTH: u32 = 2;

/// Outcome of evaluating a single spin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WinReport {
    rows: Vec<RowWin>,
}

impl WinReport {
    /// Reports whether any row produced a winning run.
    #[must_use]
    pub fn is_win(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Winning rows in ascending row order.
    #[must_use]
    pub fn rows(&self) -> &[RowWin] {
        &self.rows
    }

    /// Consumes the report, yielding the winning rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<RowWin> {
        self.rows
    }
}

/// Scores every row of `snapshot`.
///
/// Rows the snapshot does not fully cover are skipped.
#[must_use]
pub fn evaluate(dimensions: GridDimensions, snapshot: &SymbolSnapshot) -> WinReport {
    let rows = (0..dimensions.rows())
        .filter_map(|row| {
            let symbols = snapshot.row(dimensions, row);
            let (&first, rest) = symbols.split_first()?;
            let matching = rest.iter().take_while(|symbol| **symbol == first).count();
            let run_length = u32::try_from(matching).ok()?.saturating_add(1);
            (run_length >= MIN_RUN_LENGTH).then_some(RowWin {
                row,
                run_length,
                symbol: first,
            })
        })
        .collect();

    WinReport { rows }
}

/// Win evaluation system that celebrates winning runs.
#[derive(Debug, Default)]
pub struct WinEvaluator {
    dimensions: Option<GridDimensions>,
    last_report: Option<WinReport>,
}

impl WinEvaluator {
    /// Creates a new evaluator that waits for the grid to be configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report produced by the most recent completed spin.
    #[must_use]
    pub fn last_report(&self) -> Option<&WinReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and emits the commands that celebrate wins.
    ///
    /// Every cell of a winning run is moved into [`AnimationState::Winning`]
    /// and a single [`Command::AnnounceWin`] follows when any row won.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GridConfigured { dimensions } => {
                    self.dimensions = Some(*dimensions);
                    self.last_report = None;
                }
                Event::SpinCompleted { snapshot } => self.score(snapshot, out),
                _ => {}
            }
        }
    }

    fn score(&mut self, snapshot: &SymbolSnapshot, out: &mut Vec<Command>) {
        let Some(dimensions) = self.dimensions else {
            tracing::warn!("spin completed before the grid was configured");
            return;
        };

        let report = evaluate(dimensions, snapshot);
        for win in report.rows() {
            for column in 0..win.run_length {
                out.push(Command::SetAnimationState {
                    cell: dimensions.index(CellCoord::new(win.row, column)),
                    state: AnimationState::Winning,
                });
            }
        }

        if report.is_win() {
            tracing::info!(rows = report.rows().len(), "win");
            out.push(Command::AnnounceWin {
                rows: report.rows().to_vec(),
            });
        } else {
            tracing::debug!("no win");
        }
        self.last_report = Some(report);
    }
}
