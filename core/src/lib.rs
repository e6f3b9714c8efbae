#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Reel Spin engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, SlotConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Reel Spin.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the grid with the provided dimensions, discarding every cell.
    ConfigureGrid {
        /// Number of rows and columns laid out in the grid.
        dimensions: GridDimensions,
        /// Motion parameters shared by every cell.
        kinematics: Kinematics,
        /// Vertical distance above the rest position where entering cells start.
        entry_distance: f32,
    },
    /// Computes the rest coordinate of every cell.
    LayoutDefaultPositions {
        /// Top-left corner of the grid in world units.
        origin: Point,
        /// Side length of a single square cell in world units.
        cell_size: f32,
    },
    /// Assigns one symbol to every cell, in index order.
    AssignSymbols {
        /// Symbols to display, one per cell.
        snapshot: SymbolSnapshot,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a cell transition into the provided animation state.
    SetAnimationState {
        /// Flattened index of the cell.
        cell: CellIndex,
        /// Animation state the cell should enter.
        state: AnimationState,
    },
    /// Announces that every cell settled and the spin can be evaluated.
    CompleteSpin {
        /// Symbols chosen for the spin's entry phase.
        snapshot: SymbolSnapshot,
    },
    /// Announces the rows that produced a winning run.
    AnnounceWin {
        /// Winning rows in ascending row order.
        rows: Vec<RowWin>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was rebuilt.
    GridConfigured {
        /// Dimensions of the rebuilt grid.
        dimensions: GridDimensions,
    },
    /// Confirms that new symbols were assigned to the grid.
    SymbolsAssigned {
        /// Symbols now displayed by the grid.
        snapshot: SymbolSnapshot,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that a cell entered a new animation state.
    AnimationStateChanged {
        /// Flattened index of the cell.
        cell: CellIndex,
        /// State the cell left.
        from: AnimationState,
        /// State the cell entered.
        to: AnimationState,
    },
    /// Reports that a cell completed its entry motion and came to rest.
    CellSettled {
        /// Flattened index of the settled cell.
        cell: CellIndex,
    },
    /// Reports that a spin finished and is ready for evaluation.
    SpinCompleted {
        /// Symbols the spin landed on.
        snapshot: SymbolSnapshot,
    },
    /// Reports that at least one row produced a winning run.
    WinAnnounced {
        /// Winning rows in ascending row order.
        rows: Vec<RowWin>,
    },
}

/// Animation phase of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    /// Resting at the default position.
    #[default]
    Idle,
    /// Flying into place from above the visible frame.
    Entry,
    /// Falling out of place.
    Exit,
    /// Spinning in place to celebrate a win.
    Winning,
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Row 0 is the bottom visual row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Flattened cell index, `row * columns + column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(u32);

impl CellIndex {
    /// Creates a new cell index with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index as a `usize`, suitable for slice access.
    #[must_use]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// Row and column counts of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    rows: u32,
    columns: u32,
}

impl GridDimensions {
    /// Creates a new dimensions descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells, `rows * columns`.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.row() < self.rows && coord.column() < self.columns
    }

    /// Flattens the coordinate into a cell index.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate lies outside the grid.
    #[must_use]
    pub fn index(&self, coord: CellCoord) -> CellIndex {
        match self.try_index(coord) {
            Some(index) => index,
            None => panic!(
                "cell {coord:?} lies outside a {}x{} grid",
                self.rows, self.columns
            ),
        }
    }

    /// Flattens the coordinate into a cell index, returning `None` when out of range.
    #[must_use]
    pub const fn try_index(&self, coord: CellCoord) -> Option<CellIndex> {
        if self.contains(coord) {
            Some(CellIndex::new(coord.row() * self.columns + coord.column()))
        } else {
            None
        }
    }

    /// Expands a cell index back into its coordinate.
    ///
    /// # Panics
    ///
    /// Panics when the index lies outside the grid.
    #[must_use]
    pub fn coord(&self, index: CellIndex) -> CellCoord {
        assert!(
            index.as_usize() < self.cell_count(),
            "cell index {} lies outside a {}x{} grid",
            index.get(),
            self.rows,
            self.columns
        );
        CellCoord::new(index.get() / self.columns, index.get() % self.columns)
    }

    /// Iterates every coordinate in index order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
    }
}

/// Identifier of the symbol displayed by a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Creates a new symbol identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Symbol assignment for the whole grid, stored in cell index order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    symbols: Vec<SymbolId>,
}

impl SymbolSnapshot {
    /// Creates a snapshot from symbols laid out in cell index order.
    #[must_use]
    pub fn new(symbols: Vec<SymbolId>) -> Self {
        Self { symbols }
    }

    /// Creates a snapshot from raw numeric symbol identifiers.
    #[must_use]
    pub fn from_raw(values: &[u32]) -> Self {
        Self::new(values.iter().copied().map(SymbolId::new).collect())
    }

    /// Draws a fresh snapshot of `count` symbols in `[0, symbol_type_count)`.
    #[must_use]
    pub fn random<R>(random: &mut R, symbol_type_count: u32, count: usize) -> Self
    where
        R: RandomSource + ?Sized,
    {
        Self::from_raw(&random.next_int_array(symbol_type_count, count))
    }

    /// Number of symbols held by the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Reports whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol assigned to the provided cell, if any.
    #[must_use]
    pub fn get(&self, cell: CellIndex) -> Option<SymbolId> {
        self.symbols.get(cell.as_usize()).copied()
    }

    /// Symbols in cell index order.
    #[must_use]
    pub fn as_slice(&self) -> &[SymbolId] {
        &self.symbols
    }

    /// Symbols of a single row, left to right.
    ///
    /// Returns an empty slice when the row lies outside the snapshot.
    #[must_use]
    pub fn row(&self, dimensions: GridDimensions, row: u32) -> &[SymbolId] {
        let columns = dimensions.columns() as usize;
        let start = row as usize * columns;
        self.symbols.get(start..start + columns).unwrap_or(&[])
    }
}

/// Two-dimensional coordinate or displacement in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal component; grows to the right.
    pub x: f32,
    /// Vertical component; grows downwards.
    pub y: f32,
}

impl Point {
    /// The origin, `(0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Motion parameters shared by every cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Velocity gained per second while moving, in world units per second squared.
    pub acceleration: f32,
    /// Upper bound on velocity, in world units per second.
    pub max_velocity: f32,
}

impl Kinematics {
    /// Creates a new kinematics descriptor.
    #[must_use]
    pub const fn new(acceleration: f32, max_velocity: f32) -> Self {
        Self {
            acceleration,
            max_velocity,
        }
    }
}

/// Immutable representation of a single cell's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSnapshot {
    /// Flattened index of the cell.
    pub index: CellIndex,
    /// Row and column of the cell.
    pub coord: CellCoord,
    /// Current animation phase.
    pub state: AnimationState,
    /// Symbol currently displayed.
    pub symbol: SymbolId,
    /// Rest coordinate of the cell centre.
    pub default_position: Point,
    /// Displacement from the rest coordinate.
    pub offset: Point,
    /// Rotation in radians.
    pub rotation: f32,
    /// Current speed along the motion axis.
    pub velocity: f32,
}

impl CellSnapshot {
    /// Absolute coordinate of the cell centre, `default_position + offset`.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(
            self.default_position.x + self.offset.x,
            self.default_position.y + self.offset.y,
        )
    }
}

/// Read-only snapshot describing every cell of the grid in index order.
#[derive(Clone, Debug, Default)]
pub struct CellView {
    snapshots: Vec<CellSnapshot>,
}

impl CellView {
    /// Creates a new cell view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CellSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.index);
        Self { snapshots }
    }

    /// Iterator over the captured cell snapshots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &CellSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided cell, if present.
    #[must_use]
    pub fn get(&self, index: CellIndex) -> Option<&CellSnapshot> {
        self.snapshots.get(index.as_usize())
    }

    /// Number of cells captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellSnapshot> {
        self.snapshots
    }
}

/// Winning run discovered in a single row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowWin {
    /// Row that produced the run.
    pub row: u32,
    /// Number of matching cells starting at column 0; always at least two.
    pub run_length: u32,
    /// Symbol shared by the run.
    pub symbol: SymbolId,
}

/// Identifier of an audio cue understood by the host's audio system.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CueId(String);

impl CueId {
    /// Creates a new cue identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the cue.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Source of uniformly distributed integers used to pick symbols.
pub trait RandomSource {
    /// Returns an integer in `[0, bound)`.
    fn next_int(&mut self, bound: u32) -> u32;

    /// Returns `count` integers in `[0, bound)`.
    fn next_int_array(&mut self, bound: u32, count: usize) -> Vec<u32> {
        (0..count).map(|_| self.next_int(bound)).collect()
    }
}

/// Host audio system that plays cues by identifier.
pub trait AudioCueSystem {
    /// Starts playback of the provided cue.
    fn play(&mut self, cue: &CueId);
}
