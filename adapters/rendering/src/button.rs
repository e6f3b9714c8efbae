//! Visual state machine of the spin button.

use glam::Vec2;

use crate::RenderingError;

/// Visual state of the spin button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// Waiting for the pointer.
    #[default]
    Normal,
    /// The pointer is over the button.
    Hover,
    /// The pointer went down over the button.
    Pressed,
    /// Clicks are ignored while a spin is in flight.
    Disabled,
}

/// Screen-space rectangle occupied by the spin button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonLayout {
    center: Vec2,
    size: Vec2,
}

impl ButtonLayout {
    /// Creates a layout centred on `center`, rejecting non-positive sizes.
    pub fn new(center: Vec2, size: Vec2) -> Result<Self, RenderingError> {
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(RenderingError::InvalidButtonSize { size });
        }
        Ok(Self { center, size })
    }

    /// Centre of the button in screen pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Width and height of the button in screen pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Top-left corner of the button in screen pixels.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    /// Reports whether `point` lies inside the button.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size * 0.5;
        let delta = (point - self.center).abs();
        delta.x <= half.x && delta.y <= half.y
    }
}

/// Spin button driven by pointer events and the engine's spin gate.
#[derive(Clone, Copy, Debug)]
pub struct SpinButton {
    layout: ButtonLayout,
    state: ButtonState,
    hovering: bool,
}

impl SpinButton {
    /// Creates an enabled button that the pointer is not hovering.
    #[must_use]
    pub fn new(layout: ButtonLayout) -> Self {
        Self {
            layout,
            state: ButtonState::Normal,
            hovering: false,
        }
    }

    /// Current visual state.
    #[must_use]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Placement of the button.
    #[must_use]
    pub fn layout(&self) -> ButtonLayout {
        self.layout
    }

    /// The pointer moved onto the button.
    pub fn pointer_enter(&mut self) {
        self.hovering = true;
        if self.state == ButtonState::Normal {
            self.state = ButtonState::Hover;
        }
    }

    /// The pointer left the button.
    pub fn pointer_exit(&mut self) {
        self.hovering = false;
        if self.state == ButtonState::Hover {
            self.state = ButtonState::Normal;
        }
    }

    /// The pointer went down over the button.
    pub fn pointer_down(&mut self) {
        if matches!(self.state, ButtonState::Normal | ButtonState::Hover) {
            self.state = ButtonState::Pressed;
        }
    }

    /// The pointer was released over the button; returns whether a spin is requested.
    pub fn pointer_up(&mut self) -> bool {
        match self.state {
            ButtonState::Disabled => false,
            ButtonState::Pressed => {
                self.state = self.resting_state();
                true
            }
            ButtonState::Normal | ButtonState::Hover => true,
        }
    }

    /// Accepts clicks again.
    pub fn enable(&mut self) {
        self.state = self.resting_state();
    }

    /// Ignores clicks until [`enable`](Self::enable) is called.
    pub fn disable(&mut self) {
        self.state = ButtonState::Disabled;
    }

    /// Enables or disables the button, leaving it untouched when already in that mode.
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.state == ButtonState::Disabled) {
            (true, true) => self.enable(),
            (false, false) => self.disable(),
            _ => {}
        }
    }

    /// Translates raw pointer observations into button events.
    ///
    /// Returns whether a spin is requested this frame.
    pub fn observe(&mut self, pointer: Option<Vec2>, pressed: bool, released: bool) -> bool {
        let over = pointer.is_some_and(|point| self.layout.contains(point));
        if over != self.hovering {
            if over {
                self.pointer_enter();
            } else {
                self.pointer_exit();
            }
        }
        if !over {
            return false;
        }
        if pressed {
            self.pointer_down();
        }
        released && self.pointer_up()
    }

    fn resting_state(&self) -> ButtonState {
        if self.hovering {
            ButtonState::Hover
        } else {
            ButtonState::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> SpinButton {
        SpinButton::new(
            ButtonLayout::new(Vec2::new(100.0, 50.0), Vec2::new(80.0, 40.0))
                .expect("positive size"),
        )
    }

    #[test]
    fn hover_follows_the_pointer() {
        let mut button = button();

        button.pointer_enter();
        assert_eq!(button.state(), ButtonState::Hover);
        button.pointer_exit();
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn click_requests_a_spin_and_returns_to_hover() {
        let mut button = button();
        button.pointer_enter();
        button.pointer_down();
        assert_eq!(button.state(), ButtonState::Pressed);

        assert!(button.pointer_up());
        assert_eq!(button.state(), ButtonState::Hover);
    }

    #[test]
    fn disabled_button_ignores_clicks() {
        let mut button = button();
        button.pointer_enter();
        button.disable();

        button.pointer_down();
        assert_eq!(button.state(), ButtonState::Disabled);
        assert!(!button.pointer_up());
        button.pointer_exit();
        assert_eq!(button.state(), ButtonState::Disabled);
    }

    #[test]
    fn enabling_restores_hover_when_pointer_is_over() {
        let mut button = button();
        button.pointer_enter();
        button.disable();

        button.set_enabled(true);
        assert_eq!(button.state(), ButtonState::Hover);

        button.pointer_exit();
        button.disable();
        button.enable();
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn set_enabled_keeps_pressed_state_while_enabled() {
        let mut button = button();
        button.pointer_enter();
        button.pointer_down();

        button.set_enabled(true);

        assert_eq!(button.state(), ButtonState::Pressed);
    }

    #[test]
    fn observe_translates_pointer_frames() {
        let mut button = button();
        let inside = Some(Vec2::new(110.0, 60.0));
        let outside = Some(Vec2::new(10.0, 10.0));

        assert!(!button.observe(outside, false, false));
        assert_eq!(button.state(), ButtonState::Normal);
        assert!(!button.observe(inside, true, false));
        assert_eq!(button.state(), ButtonState::Pressed);
        assert!(button.observe(inside, false, true));
        assert_eq!(button.state(), ButtonState::Hover);
        assert!(!button.observe(None, false, true));
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn layout_rejects_degenerate_sizes() {
        assert_eq!(
            ButtonLayout::new(Vec2::ZERO, Vec2::new(0.0, 10.0)),
            Err(RenderingError::InvalidButtonSize {
                size: Vec2::new(0.0, 10.0)
            })
        );
    }
}
