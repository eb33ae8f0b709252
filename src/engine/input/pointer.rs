// Pointer tracking for mouse clicks and touch starts

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase};

/// A press at a window position, in physical pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPress {
    pub position: Vec2,
}

/// Last known cursor position plus the presses seen since the last drain
#[derive(Debug, Default)]
pub struct PointerState {
    cursor: Option<Vec2>,
    presses: Vec<PointerPress>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Some(Vec2::new(x as f32, y as f32));
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Left button presses at the last cursor position count; others are ignored
    pub fn on_mouse_input(&mut self, state: ElementState, button: MouseButton) {
        if state != ElementState::Pressed || button != MouseButton::Left {
            return;
        }
        if let Some(position) = self.cursor {
            self.presses.push(PointerPress { position });
        }
    }

    /// Only the start of a touch counts as a press
    pub fn on_touch(&mut self, phase: TouchPhase, x: f64, y: f64) {
        if phase == TouchPhase::Started {
            self.presses.push(PointerPress {
                position: Vec2::new(x as f32, y as f32),
            });
        }
    }

    pub fn drain(&mut self) -> Vec<PointerPress> {
        std::mem::take(&mut self.presses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_uses_last_cursor_position() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(10.0, 20.0);
        pointer.on_cursor_moved(30.0, 40.0);
        pointer.on_mouse_input(ElementState::Pressed, MouseButton::Left);

        assert_eq!(
            pointer.drain(),
            vec![PointerPress {
                position: Vec2::new(30.0, 40.0)
            }]
        );
        assert!(pointer.drain().is_empty());
    }

    #[test]
    fn test_release_and_other_buttons_ignored() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(1.0, 1.0);
        pointer.on_mouse_input(ElementState::Released, MouseButton::Left);
        pointer.on_mouse_input(ElementState::Pressed, MouseButton::Right);
        assert!(pointer.drain().is_empty());
    }

    #[test]
    fn test_click_without_cursor_ignored() {
        let mut pointer = PointerState::new();
        pointer.on_mouse_input(ElementState::Pressed, MouseButton::Left);
        assert!(pointer.drain().is_empty());

        pointer.on_cursor_moved(5.0, 5.0);
        pointer.on_cursor_left();
        pointer.on_mouse_input(ElementState::Pressed, MouseButton::Left);
        assert!(pointer.drain().is_empty());
    }

    #[test]
    fn test_touch_start_only() {
        let mut pointer = PointerState::new();
        pointer.on_touch(TouchPhase::Started, 100.0, 200.0);
        pointer.on_touch(TouchPhase::Moved, 110.0, 210.0);
        pointer.on_touch(TouchPhase::Ended, 110.0, 210.0);

        let presses = pointer.drain();
        assert_eq!(presses.len(), 1);
        assert_eq!(presses[0].position, Vec2::new(100.0, 200.0));
    }
}
