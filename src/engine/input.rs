// Mouse input tracking for the orbit camera
// Abstracts winit events into a queryable per-frame snapshot

use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

pub struct InputState {
    buttons_held: HashSet<MouseButton>,
    pub mouse_position: (f32, f32),
    mouse_prev_position: (f32, f32),
    pub mouse_delta: (f32, f32),

    // Scroll: accumulated vertical scroll this frame, reset in end_frame()
    pub scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            buttons_held: HashSet::new(),
            mouse_position: (0.0, 0.0),
            mouse_prev_position: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            scroll_delta: 0.0,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the app's own event handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    self.buttons_held.insert(*button);
                }
                ElementState::Released => {
                    self.buttons_held.remove(button);
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scroll_delta += y;
            }
            _ => {}
        }
    }

    /// Call once per frame after update() and render() have consumed input.
    /// Resets per-frame accumulators.
    pub fn end_frame(&mut self) {
        self.scroll_delta = 0.0;
        self.mouse_delta = (
            self.mouse_position.0 - self.mouse_prev_position.0,
            self.mouse_position.1 - self.mouse_prev_position.1,
        );
        self.mouse_prev_position = self.mouse_position;
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.buttons_held.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_frame_tracks_mouse_delta_and_resets_scroll() {
        let mut input = InputState::new();
        input.mouse_position = (100.0, 50.0);
        input.scroll_delta = 2.0;
        input.end_frame();
        assert_eq!(input.mouse_delta, (100.0, 50.0));
        assert_eq!(input.scroll_delta, 0.0);

        // No movement this frame: the delta settles back to zero.
        input.end_frame();
        assert_eq!(input.mouse_delta, (0.0, 0.0));
    }
}
