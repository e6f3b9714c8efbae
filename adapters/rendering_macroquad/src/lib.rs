#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Reel Spin.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature, so audio cues are reported to the host instead
//! of being played here.

mod sprites;
mod surface;
mod ui;

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, is_mouse_button_released, mouse_position, KeyCode,
    MouseButton,
};
use reelspin_rendering::{
    FrameInput, Hud, Presentation, RenderSurface, RenderingBackend, SpinButton,
};
use std::{
    path::{Path, PathBuf},
    sync::mpsc,
    time::Duration,
};

use self::sprites::SymbolAtlas;

pub use self::surface::{Quad, QuadSurface, ScreenTransform};

/// Raw pointer and keyboard observations captured during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputObservations {
    /// Cursor position in screen pixels.
    pub cursor: Option<Vec2>,
    /// Whether the primary mouse button went down this frame.
    pub pressed: bool,
    /// Whether the primary mouse button was released this frame.
    pub released: bool,
    /// Whether the spin key was pressed this frame.
    pub spin_key: bool,
}

/// Converts raw observations into the frame input handed to the host.
///
/// The spin button consumes pointer events in world space; a click on an
/// enabled button or the spin key requests a spin.
#[doc(hidden)]
pub fn frame_input_from_observations(
    button: &mut SpinButton,
    transform: &ScreenTransform,
    observations: InputObservations,
) -> FrameInput {
    let pointer = observations
        .cursor
        .map(|cursor| transform.to_world(cursor));
    let clicked = button.observe(pointer, observations.pressed, observations.released);

    FrameInput {
        spin_requested: observations.spin_key || clicked,
        pointer,
        pointer_pressed: observations.pressed,
        pointer_released: observations.released,
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Space` requests a spin.
    spin: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            spin: is_key_pressed(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            manifest_path: SymbolAtlas::default_manifest_path(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load symbol sprites.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the location of the sprite manifest.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

fn load_atlas(enabled: bool, manifest_path: &Path) -> Result<Option<SymbolAtlas>> {
    if !enabled {
        return Ok(None);
    }
    if !manifest_path.exists() {
        tracing::info!(
            path = %manifest_path.display(),
            "no sprite manifest; drawing symbols as coloured quads"
        );
        return Ok(None);
    }

    let atlas = SymbolAtlas::from_manifest_path(manifest_path)
        .context("failed to initialise symbol atlas")?;
    tracing::info!(textures = atlas.len(), "symbol atlas loaded");
    Ok(Some(atlas))
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn RenderSurface) -> Hud + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            window_size,
            world_size,
            button,
            palette,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x.round() as i32,
            window_height: window_size.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let atlas = match load_atlas(load_sprites, &manifest_path) {
                Ok(atlas) => {
                    let _ = atlas_init_sender.send(Ok(()));
                    atlas
                }
                Err(error) => {
                    let _ = atlas_init_sender.send(Err(error));
                    return;
                }
            };

            let background = to_macroquad_color(clear_color);
            let mut surface = QuadSurface::new();
            let mut spin_button = SpinButton::new(button);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_size = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let transform = ScreenTransform::fit(world_size, screen_size);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = frame_input_from_observations(
                    &mut spin_button,
                    &transform,
                    InputObservations {
                        cursor: Some(Vec2::new(cursor_x, cursor_y)),
                        pressed: is_mouse_button_pressed(MouseButton::Left),
                        released: is_mouse_button_released(MouseButton::Left),
                        spin_key: keyboard.spin,
                    },
                );

                let hud = update_frame(frame_dt, frame_input, &mut surface);
                spin_button.set_enabled(hud.spin_enabled);

                surface.draw(&palette, atlas.as_ref(), &transform);
                ui::draw_spin_button(&spin_button, &transform);
                if let Some(message) = hud.message.as_deref() {
                    ui::draw_message(message);
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        tracing::info!(fps = per_second, drawables = surface.len(), "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn to_macroquad_color(color: reelspin_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
