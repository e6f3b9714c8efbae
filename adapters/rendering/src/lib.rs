#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Reel Spin adapters.
//!
//! Backends expose a retained [`RenderSurface`] of drawables; [`SurfaceSync`]
//! mirrors world cell snapshots onto it, pushing only the properties that
//! changed since the previous frame.

mod button;

use anyhow::Result as AnyResult;
use glam::Vec2;
use reelspin_core::{CellView, SymbolId};
use std::{error::Error, fmt, time::Duration};

pub use self::button::{ButtonLayout, ButtonState, SpinButton};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used to draw symbols when no texture is available.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolPalette {
    colors: Vec<Color>,
}

impl SymbolPalette {
    /// Creates a palette, rejecting empty color lists.
    pub fn new(colors: Vec<Color>) -> Result<Self, RenderingError> {
        if colors.is_empty() {
            return Err(RenderingError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Color of `symbol`; palettes shorter than the symbol range repeat.
    #[must_use]
    pub fn color(&self, symbol: SymbolId) -> Color {
        self.colors[symbol.get() as usize % self.colors.len()]
    }

    /// Number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; palettes hold at least one color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for SymbolPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::from_rgb_u8(230, 57, 70),
                Color::from_rgb_u8(241, 143, 1),
                Color::from_rgb_u8(255, 209, 102),
                Color::from_rgb_u8(6, 214, 160),
                Color::from_rgb_u8(17, 138, 178),
                Color::from_rgb_u8(131, 56, 236),
                Color::from_rgb_u8(255, 0, 110),
                Color::from_rgb_u8(200, 200, 200),
            ],
        }
    }
}

/// Input snapshot gathered by adapters before updating the frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the player asked for a spin this frame, by key or button.
    pub spin_requested: bool,
    /// Cursor position in world units, when the cursor is inside the window.
    pub pointer: Option<Vec2>,
    /// Whether the primary pointer button went down this frame.
    pub pointer_pressed: bool,
    /// Whether the primary pointer button was released this frame.
    pub pointer_released: bool,
}

/// Opaque handle of a drawable created by a [`RenderSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableHandle(u32);

impl DrawableHandle {
    /// Creates a new handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Retained-mode surface that owns one drawable per grid cell.
pub trait RenderSurface {
    /// Creates a square drawable of the provided size and returns its handle.
    fn create_drawable(&mut self, size: Vec2) -> DrawableHandle;

    /// Moves the drawable's centre to `position`.
    fn set_position(&mut self, handle: DrawableHandle, position: Vec2);

    /// Rotates the drawable around its centre.
    fn set_rotation(&mut self, handle: DrawableHandle, radians: f32);

    /// Shows `symbol` on the drawable.
    fn set_texture(&mut self, handle: DrawableHandle, symbol: SymbolId);
}

/// Counts of surface calls issued by a single [`SurfaceSync::sync`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Drawables created.
    pub created: usize,
    /// Position updates pushed.
    pub moved: usize,
    /// Rotation updates pushed.
    pub rotated: usize,
    /// Texture updates pushed.
    pub retextured: usize,
}

impl SyncStats {
    /// Reports whether the sync left the surface untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Copy, Debug)]
struct Mirror {
    handle: DrawableHandle,
    position: Vec2,
    rotation: f32,
    symbol: SymbolId,
}

/// Mirrors world cell snapshots onto a [`RenderSurface`].
///
/// The first sync creates one drawable per cell and pushes every property;
/// later syncs only push properties that differ from the last pushed value.
#[derive(Clone, Debug)]
pub struct SurfaceSync {
    cell_size: f32,
    mirrors: Vec<Mirror>,
}

impl SurfaceSync {
    /// Creates a sync that will size drawables to `cell_size`.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            mirrors: Vec::new(),
        }
    }

    /// Number of drawables created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    /// Reports whether no drawables were created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    /// Pushes the changed properties of `cells` to `surface`.
    ///
    /// Grids only grow; drawables of cells missing from `cells` are left as they are.
    pub fn sync<S>(&mut self, cells: &CellView, surface: &mut S) -> SyncStats
    where
        S: RenderSurface + ?Sized,
    {
        let mut stats = SyncStats::default();

        for (slot, cell) in cells.iter().enumerate() {
            let position = Vec2::new(cell.position().x, cell.position().y);

            let Some(mirror) = self.mirrors.get_mut(slot) else {
                let handle = surface.create_drawable(Vec2::splat(self.cell_size));
                surface.set_position(handle, position);
                surface.set_rotation(handle, cell.rotation);
                surface.set_texture(handle, cell.symbol);
                self.mirrors.push(Mirror {
                    handle,
                    position,
                    rotation: cell.rotation,
                    symbol: cell.symbol,
                });
                stats.created += 1;
                stats.moved += 1;
                stats.rotated += 1;
                stats.retextured += 1;
                continue;
            };

            if mirror.position != position {
                surface.set_position(mirror.handle, position);
                mirror.position = position;
                stats.moved += 1;
            }
            if mirror.rotation != cell.rotation {
                surface.set_rotation(mirror.handle, cell.rotation);
                mirror.rotation = cell.rotation;
                stats.rotated += 1;
            }
            if mirror.symbol != cell.symbol {
                surface.set_texture(mirror.handle, cell.symbol);
                mirror.symbol = cell.symbol;
                stats.retextured += 1;
            }
        }

        stats
    }
}

/// Overlay state chosen by the host for the current frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Hud {
    /// Whether the spin button accepts clicks.
    pub spin_enabled: bool,
    /// Optional status line drawn above the grid.
    pub message: Option<String>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Initial window size in pixels.
    pub window_size: Vec2,
    /// World rectangle `[0, world_size]` scaled to fit the window.
    pub world_size: Vec2,
    /// Placement of the spin button.
    pub button: ButtonLayout,
    /// Fallback colors for symbols without textures.
    pub palette: SymbolPalette,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        window_size: Vec2,
        world_size: Vec2,
        button: ButtonLayout,
        palette: SymbolPalette,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            window_size,
            world_size,
            button,
            palette,
        }
    }
}

/// Rendering backend capable of presenting Reel Spin grids.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_frame` closure receives the frame delta, per-frame
    /// input captured by the adapter and the backend's surface, and returns
    /// the overlay state to draw on top of it.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn RenderSurface) -> Hud + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// A symbol palette needs at least one color.
    EmptyPalette,
    /// The spin button must have a positive size.
    InvalidButtonSize {
        /// Provided size that failed validation.
        size: Vec2,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPalette => write!(f, "symbol palette must contain at least one color"),
            Self::InvalidButtonSize { size } => {
                write!(
                    f,
                    "spin button size must be positive (received {}x{})",
                    size.x, size.y
                )
            }
        }
    }
}

impl Error for RenderingError {}
