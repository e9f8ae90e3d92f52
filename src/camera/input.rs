use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::camera::orbit::OrbitController;

/// Pixels per line for trackpads reporting pixel scroll deltas.
const PIXELS_PER_LINE: f32 = 100.0;

/// Routes winit window events to an [`OrbitController`].
///
/// Left-drag rotates, shift+left-drag pans, the wheel zooms. Events still
/// reach the orbit while it is disabled; the orbit itself drops the input.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_mouse_pos: Option<Vec2>,
}

impl InputHandler {
    /// Handler with no cursor position recorded yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the event was consumed by the camera.
    pub fn handle_event(&mut self, orbit: &mut OrbitController, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                orbit.mouse_pressed = *state == ElementState::Pressed && orbit.is_enabled();
                true
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                orbit.shift_pressed = modifiers.state().shift_key();
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current = Vec2::new(position.x as f32, position.y as f32);
                let delta = self.last_mouse_pos.map_or(Vec2::ZERO, |last| current - last);
                self.last_mouse_pos = Some(current);

                if !orbit.mouse_pressed {
                    return false;
                }
                if orbit.shift_pressed {
                    orbit.pan(delta);
                } else {
                    orbit.rotate(delta);
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_mouse_pos = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                orbit.zoom(scroll);
                true
            }
            _ => false,
        }
    }
}
