// Input manager - turns window events into actions and pointer presses

use super::action::{default_bindings, Action, InputSource};
use super::pointer::{PointerPress, PointerState};
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Collects input between frames
pub struct InputManager {
    bindings: HashMap<InputSource, Action>,
    actions: Vec<Action>,
    pointer: PointerState,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            bindings: default_bindings().into_iter().collect(),
            actions: Vec::new(),
            pointer: PointerState::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Queue the action bound to `code`, ignoring releases and key repeats
    pub fn process_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        if state != ElementState::Pressed || repeat {
            return;
        }
        if let Some(&action) = self.bindings.get(&InputSource::key(code)) {
            self.actions.push(action);
        }
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    /// Actions triggered since the last call, in order
    pub fn drain_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    /// Pointer presses since the last call, in order
    pub fn drain_presses(&mut self) -> Vec<PointerPress> {
        self.pointer.drain()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
