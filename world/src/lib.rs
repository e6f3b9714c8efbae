#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Reel Spin.

mod cell;
mod grid;

use reelspin_core::{Command, Event, SlotConfig, WELCOME_BANNER};

use self::grid::Grid;

/// Represents the authoritative Reel Spin world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    layout: Option<Layout>,
    tick_index: u64,
}

#[derive(Clone, Copy, Debug)]
struct Layout {
    cell_size: f32,
}

impl World {
    /// Creates a new world holding a default-sized grid of idle cells.
    ///
    /// The grid is not laid out until [`Command::LayoutDefaultPositions`] is applied.
    #[must_use]
    pub fn new() -> Self {
        let config = SlotConfig::default();
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(
                config.dimensions(),
                config.kinematics(),
                config.entry_distance,
            ),
            layout: None,
            tick_index: 0,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Panics
///
/// Panics when a command references a cell outside the grid or carries a
/// symbol snapshot whose length differs from the cell count.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            dimensions,
            kinematics,
            entry_distance,
        } => {
            world.grid = Grid::new(dimensions, kinematics, entry_distance);
            world.layout = None;
            out_events.push(Event::GridConfigured { dimensions });
        }
        Command::LayoutDefaultPositions { origin, cell_size } => {
            world.grid.layout_default_positions(origin, cell_size);
            world.layout = Some(Layout { cell_size });
        }
        Command::AssignSymbols { snapshot } => {
            world.grid.assign_symbols(&snapshot);
            out_events.push(Event::SymbolsAssigned { snapshot });
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.grid.update_all(dt.as_secs_f32(), out_events);
        }
        Command::SetAnimationState { cell, state } => {
            world.grid.set_state(cell, state, out_events);
        }
        Command::CompleteSpin { snapshot } => {
            out_events.push(Event::SpinCompleted { snapshot });
        }
        Command::AnnounceWin { rows } => {
            if !rows.is_empty() {
                out_events.push(Event::WinAnnounced { rows });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use reelspin_core::{CellCoord, CellSnapshot, CellView, GridDimensions, SymbolSnapshot};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Row and column counts of the current grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.grid.dimensions()
    }

    /// Side length of a cell, once the grid has been laid out.
    #[must_use]
    pub fn cell_size(world: &World) -> Option<f32> {
        world.layout.map(|layout| layout.cell_size)
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of every cell in index order.
    #[must_use]
    pub fn cell_view(world: &World) -> CellView {
        CellView::from_snapshots(world.grid.snapshots())
    }

    /// Captures the state of a single cell.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate lies outside the grid.
    #[must_use]
    pub fn cell(world: &World, coord: CellCoord) -> CellSnapshot {
        world.grid.snapshot(coord)
    }

    /// Symbols currently displayed, in cell index order.
    #[must_use]
    pub fn symbols(world: &World) -> SymbolSnapshot {
        world.grid.symbols()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reelspin_core::{
        AnimationState, CellCoord, CellIndex, GridDimensions, Kinematics, Point, SymbolSnapshot,
    };

    use super::*;

    fn configured_world(rows: u32, columns: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureGrid {
                dimensions: GridDimensions::new(rows, columns),
                kinematics: Kinematics::new(14_400.0, 6_000.0),
                entry_distance: 800.0,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn apply_configures_grid() {
        let mut world = World::new();
        let mut events = Vec::new();
        let dimensions = GridDimensions::new(4, 6);

        apply(
            &mut world,
            Command::ConfigureGrid {
                dimensions,
                kinematics: Kinematics::new(10.0, 20.0),
                entry_distance: 100.0,
            },
            &mut events,
        );

        assert_eq!(query::dimensions(&world), dimensions);
        assert_eq!(query::cell_view(&world).len(), 24);
        assert_eq!(events, vec![Event::GridConfigured { dimensions }]);
    }

    #[test]
    fn layout_records_cell_size() {
        let mut world = configured_world(3, 5);
        let mut events = Vec::new();
        assert_eq!(query::cell_size(&world), None);

        apply(
            &mut world,
            Command::LayoutDefaultPositions {
                origin: Point::new(0.0, 0.0),
                cell_size: 64.0,
            },
            &mut events,
        );

        assert_eq!(query::cell_size(&world), Some(64.0));
        assert_eq!(
            query::cell(&world, CellCoord::new(2, 0)).default_position,
            Point::new(32.0, 32.0)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn tick_reports_time_before_settles() {
        let mut world = configured_world(1, 2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetAnimationState {
                cell: CellIndex::new(1),
                state: AnimationState::Entry,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: Duration::from_secs(2)
                },
                Event::AnimationStateChanged {
                    cell: CellIndex::new(1),
                    from: AnimationState::Entry,
                    to: AnimationState::Idle,
                },
                Event::CellSettled {
                    cell: CellIndex::new(1)
                },
            ]
        );
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn assigned_symbols_are_echoed() {
        let mut world = configured_world(1, 3);
        let mut events = Vec::new();
        let snapshot = SymbolSnapshot::from_raw(&[2, 1, 0]);

        apply(
            &mut world,
            Command::AssignSymbols {
                snapshot: snapshot.clone(),
            },
            &mut events,
        );

        assert_eq!(query::symbols(&world), snapshot);
        assert_eq!(events, vec![Event::SymbolsAssigned { snapshot }]);
    }

    #[test]
    fn empty_win_announcements_are_dropped() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::AnnounceWin { rows: Vec::new() }, &mut events);

        assert!(events.is_empty());
    }
}
