//! Retained quad surface and the world-to-screen mapping used to draw it.

use std::f32::consts::SQRT_2;

use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams},
};
use reelspin_core::SymbolId;
use reelspin_rendering::{DrawableHandle, RenderSurface, SymbolPalette};

use crate::{sprites::SymbolAtlas, to_macroquad_color};

/// Uniform scale plus offset that fits a world rectangle inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
    scale: f32,
    offset: Vec2,
}

impl ScreenTransform {
    /// Fits `[0, world_size]` into `screen_size`, centring the leftover space.
    #[must_use]
    pub fn fit(world_size: Vec2, screen_size: Vec2) -> Self {
        if world_size.x <= f32::EPSILON || world_size.y <= f32::EPSILON {
            return Self {
                scale: 1.0,
                offset: Vec2::ZERO,
            };
        }
        let scale = (screen_size.x / world_size.x).min(screen_size.y / world_size.y);
        let offset = (screen_size - world_size * scale) * 0.5;
        Self { scale, offset }
    }

    /// Pixels per world unit.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Maps a world coordinate to screen pixels.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    /// Maps screen pixels back to a world coordinate.
    #[must_use]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale
    }
}

/// Square drawable held by a [`QuadSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Width and height in world units.
    pub size: Vec2,
    /// Centre in world units.
    pub position: Vec2,
    /// Rotation around the centre in radians.
    pub rotation: f32,
    /// Symbol shown by the quad, once assigned.
    pub symbol: Option<SymbolId>,
}

/// [`RenderSurface`] that keeps every drawable in memory and draws them each frame.
#[derive(Clone, Debug, Default)]
pub struct QuadSurface {
    quads: Vec<Quad>,
}

impl QuadSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drawables created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Reports whether no drawables exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Drawable behind `handle`, if it exists.
    #[must_use]
    pub fn quad(&self, handle: DrawableHandle) -> Option<&Quad> {
        self.quads.get(handle.get() as usize)
    }

    fn quad_mut(&mut self, handle: DrawableHandle) -> Option<&mut Quad> {
        self.quads.get_mut(handle.get() as usize)
    }

    pub(crate) fn draw(
        &self,
        palette: &SymbolPalette,
        atlas: Option<&SymbolAtlas>,
        transform: &ScreenTransform,
    ) {
        for quad in &self.quads {
            let Some(symbol) = quad.symbol else {
                continue;
            };
            let centre = transform.to_screen(quad.position);
            let size = quad.size * transform.scale();

            match atlas.and_then(|atlas| atlas.texture(symbol)) {
                Some(texture) => {
                    let top_left = centre - size * 0.5;
                    texture::draw_texture_ex(
                        texture,
                        top_left.x,
                        top_left.y,
                        macroquad::color::WHITE,
                        DrawTextureParams {
                            dest_size: Some(MacroquadVec2::new(size.x, size.y)),
                            rotation: quad.rotation,
                            ..DrawTextureParams::default()
                        },
                    );
                }
                None => {
                    let side = size.x.min(size.y) * 0.9;
                    // draw_poly takes the circumradius.
                    let radius = side * 0.5 * SQRT_2;
                    macroquad::shapes::draw_poly(
                        centre.x,
                        centre.y,
                        4,
                        radius,
                        45.0 + quad.rotation.to_degrees(),
                        to_macroquad_color(palette.color(symbol)),
                    );
                }
            }
        }
    }
}

impl RenderSurface for QuadSurface {
    fn create_drawable(&mut self, size: Vec2) -> DrawableHandle {
        let handle = DrawableHandle::new(self.quads.len() as u32);
        self.quads.push(Quad {
            size,
            position: Vec2::ZERO,
            rotation: 0.0,
            symbol: None,
        });
        handle
    }

    fn set_position(&mut self, handle: DrawableHandle, position: Vec2) {
        if let Some(quad) = self.quad_mut(handle) {
            quad.position = position;
        }
    }

    fn set_rotation(&mut self, handle: DrawableHandle, radians: f32) {
        if let Some(quad) = self.quad_mut(handle) {
            quad.rotation = radians;
        }
    }

    fn set_texture(&mut self, handle: DrawableHandle, symbol: SymbolId) {
        if let Some(quad) = self.quad_mut(handle) {
            quad.symbol = Some(symbol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_centres_the_world_in_the_window() {
        let transform = ScreenTransform::fit(Vec2::new(200.0, 100.0), Vec2::new(400.0, 400.0));

        assert_eq!(transform.scale(), 2.0);
        assert_eq!(transform.to_screen(Vec2::ZERO), Vec2::new(0.0, 100.0));
        assert_eq!(
            transform.to_world(Vec2::new(400.0, 300.0)),
            Vec2::new(200.0, 100.0)
        );
    }

    #[test]
    fn degenerate_worlds_map_one_to_one() {
        let transform = ScreenTransform::fit(Vec2::ZERO, Vec2::new(640.0, 480.0));

        assert_eq!(transform.to_screen(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn surface_records_pushed_properties() {
        let mut surface = QuadSurface::new();
        let handle = surface.create_drawable(Vec2::splat(64.0));

        surface.set_position(handle, Vec2::new(10.0, 20.0));
        surface.set_rotation(handle, 1.5);
        surface.set_texture(handle, SymbolId::new(4));

        assert_eq!(
            surface.quad(handle),
            Some(&Quad {
                size: Vec2::splat(64.0),
                position: Vec2::new(10.0, 20.0),
                rotation: 1.5,
                symbol: Some(SymbolId::new(4)),
            })
        );
    }

    #[test]
    fn unknown_handles_are_ignored() {
        let mut surface = QuadSurface::new();

        surface.set_position(DrawableHandle::new(3), Vec2::ONE);

        assert!(surface.is_empty());
    }
}
