// Keyboard action definitions and mappings

use winit::keyboard::KeyCode;

/// Everything the keyboard can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Close the window
    Quit,
    /// Stop or restart the per-frame rotation
    TogglePause,
}

/// Represents an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default key bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::Escape), Action::Quit),
        (InputSource::key(KeyCode::Space), Action::TogglePause),
    ]
}
