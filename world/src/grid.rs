//! Dense row-major collection of cells.

use reelspin_core::{
    AnimationState, CellCoord, CellIndex, CellSnapshot, Event, GridDimensions, Kinematics, Point,
    SymbolSnapshot,
};

use crate::cell::Cell;

#[derive(Clone, Debug)]
pub(crate) struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn new(
        dimensions: GridDimensions,
        kinematics: Kinematics,
        entry_distance: f32,
    ) -> Self {
        let cells = dimensions
            .coords()
            .map(|coord| Cell::new(dimensions.index(coord), coord, kinematics, entry_distance))
            .collect();
        Self { dimensions, cells }
    }

    pub(crate) fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Assigns one symbol per cell in index order.
    ///
    /// # Panics
    ///
    /// Panics when the snapshot does not hold exactly one symbol per cell.
    pub(crate) fn assign_symbols(&mut self, snapshot: &SymbolSnapshot) {
        assert_eq!(
            snapshot.len(),
            self.cells.len(),
            "symbol snapshot must cover every cell"
        );
        for (cell, symbol) in self.cells.iter_mut().zip(snapshot.as_slice()) {
            cell.set_symbol(*symbol);
        }
    }

    /// Places every cell's rest coordinate at its centre, with row 0 at the bottom.
    pub(crate) fn layout_default_positions(&mut self, origin: Point, cell_size: f32) {
        let rows = self.dimensions.rows();
        for cell in &mut self.cells {
            let coord = cell.coord();
            let visual_row = rows - 1 - coord.row();
            cell.set_default_position(Point::new(
                origin.x + cell_size * (coord.column() as f32 + 0.5),
                origin.y + cell_size * (visual_row as f32 + 0.5),
            ));
        }
    }

    /// Advances every animating cell by `dt` seconds, in index order.
    pub(crate) fn update_all(&mut self, dt: f32, out: &mut Vec<Event>) {
        for cell in &mut self.cells {
            if cell.state() != AnimationState::Idle {
                cell.update(dt, out);
            }
        }
    }

    /// Requests a state transition for a single cell.
    ///
    /// # Panics
    ///
    /// Panics when the index lies outside the grid.
    pub(crate) fn set_state(
        &mut self,
        index: CellIndex,
        state: AnimationState,
        out: &mut Vec<Event>,
    ) {
        let cell_count = self.cells.len();
        let Some(cell) = self.cells.get_mut(index.as_usize()) else {
            panic!(
                "cell index {} lies outside a grid of {cell_count} cells",
                index.get()
            );
        };
        cell.enter(state, out);
    }

    pub(crate) fn symbols(&self) -> SymbolSnapshot {
        SymbolSnapshot::new(self.cells.iter().map(Cell::symbol).collect())
    }

    pub(crate) fn snapshots(&self) -> Vec<CellSnapshot> {
        self.cells.iter().map(Cell::snapshot).collect()
    }

    pub(crate) fn snapshot(&self, coord: CellCoord) -> CellSnapshot {
        self.cells[self.dimensions.index(coord).as_usize()].snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelspin_core::SymbolId;

    fn grid() -> Grid {
        Grid::new(
            GridDimensions::new(3, 5),
            Kinematics::new(14_400.0, 6_000.0),
            800.0,
        )
    }

    #[test]
    fn assigns_symbols_in_index_order() {
        let mut grid = grid();
        let snapshot = SymbolSnapshot::from_raw(&[0, 0, 0, 1, 2, 3, 3, 4, 5, 6, 7, 1, 1, 1, 1]);

        grid.assign_symbols(&snapshot);

        assert_eq!(grid.symbols(), snapshot);
        assert_eq!(grid.snapshot(CellCoord::new(1, 2)).symbol, SymbolId::new(4));
    }

    #[test]
    #[should_panic(expected = "must cover every cell")]
    fn short_snapshots_are_rejected() {
        grid().assign_symbols(&SymbolSnapshot::from_raw(&[1, 2, 3]));
    }

    #[test]
    fn row_zero_is_laid_out_at_the_bottom() {
        let mut grid = grid();
        grid.layout_default_positions(Point::new(200.0, 100.0), 50.0);

        let bottom_left = grid.snapshot(CellCoord::new(0, 0)).default_position;
        let top_right = grid.snapshot(CellCoord::new(2, 4)).default_position;

        assert_eq!(bottom_left, Point::new(225.0, 225.0));
        assert_eq!(top_right, Point::new(425.0, 125.0));
    }

    #[test]
    #[should_panic(expected = "outside a grid of 15 cells")]
    fn set_state_rejects_out_of_range_indices() {
        let mut events = Vec::new();
        grid().set_state(CellIndex::new(15), AnimationState::Exit, &mut events);
    }

    #[test]
    fn update_order_does_not_affect_final_state() {
        let dts = [0.016, 0.033, 0.008, 0.05, 0.016, 0.02];
        let mut forward = grid();
        let mut events = Vec::new();
        for index in 0..15 {
            let state = if index % 2 == 0 {
                AnimationState::Entry
            } else {
                AnimationState::Exit
            };
            forward.set_state(CellIndex::new(index), state, &mut events);
        }
        let mut reversed = forward.clone();

        for dt in dts {
            forward.update_all(dt, &mut events);
            for cell in reversed.cells.iter_mut().rev() {
                if cell.state() != AnimationState::Idle {
                    cell.update(dt, &mut events);
                }
            }
        }

        assert_eq!(forward.snapshots(), reversed.snapshots());
    }
}
