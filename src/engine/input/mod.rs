// Input handling
//
// - `action`: keyboard actions and their default bindings
// - `pointer`: mouse and touch presses in window pixels
// - `manager`: turns winit events into queued actions and presses
//
// The event loop feeds events in; the application drains the queues once per
// frame.

pub mod action;
pub mod manager;
pub mod pointer;

pub use action::Action;
pub use manager::InputManager;
pub use pointer::PointerPress;
