//! Input mapping
//!
//! Window events are translated into [`InputEvent`]s, which carry pointer
//! positions as fractions of the window size (origin top-left). The session
//! consumes only these, so it can be driven without a window.

use crate::trackball::{Behavior, Direction};
use pickfit_core::FeatureType;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Pointer buttons the session distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    pub fn from_winit(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Middle => Some(PointerButton::Middle),
            MouseButton::Right => Some(PointerButton::Secondary),
            _ => None,
        }
    }

    /// Camera gesture started by dragging with this button
    pub fn behavior(self) -> Behavior {
        match self {
            PointerButton::Primary => Behavior::Rotating,
            PointerButton::Middle => Behavior::Panning,
            PointerButton::Secondary => Behavior::Zooming,
        }
    }
}

/// Keyboard commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    SelectFeature(FeatureType),
    ResetCamera,
    ToggleMode,
    Move(Direction),
}

impl KeyAction {
    /// Keys 0-5 pick the feature type, Home resets the camera, Space switches
    /// between picking and navigating, and W/S/A/D/E/C fly the camera.
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Home) => Some(KeyAction::ResetCamera),
            Key::Named(NamedKey::Space) => Some(KeyAction::ToggleMode),
            Key::Character(c) => {
                let mut chars = c.chars();
                let ch = chars.next()?.to_ascii_lowercase();
                if chars.next().is_some() {
                    return None;
                }
                if let Some(feature) = ch.to_digit(10).and_then(FeatureType::from_digit) {
                    return Some(KeyAction::SelectFeature(feature));
                }
                let direction = match ch {
                    'w' => Direction::Forward,
                    's' => Direction::Backward,
                    'a' => Direction::Left,
                    'd' => Direction::Right,
                    'e' => Direction::Up,
                    'c' => Direction::Down,
                    _ => return None,
                };
                Some(KeyAction::Move(direction))
            }
            _ => None,
        }
    }
}

/// Window-independent input for the fit session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerPressed { x: f32, y: f32, button: PointerButton },
    PointerReleased { x: f32, y: f32, button: PointerButton },
    PointerMoved { x: f32, y: f32 },
    /// Positive notches zoom in
    Wheel { notches: f32 },
    Key { action: KeyAction, pressed: bool },
}

/// Wheel notches for a scroll delta; pixel deltas count 100 pixels per notch
pub fn wheel_notches(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
    }
}

/// Tracks the cursor and window size to translate winit window events
#[derive(Debug, Clone)]
pub struct WindowInput {
    size: PhysicalSize<u32>,
    cursor: PhysicalPosition<f64>,
}

impl WindowInput {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        Self {
            size,
            cursor: PhysicalPosition::new(0.0, 0.0),
        }
    }

    /// Cursor position as fractions of the window size
    pub fn cursor(&self) -> (f32, f32) {
        let width = self.size.width.max(1) as f64;
        let height = self.size.height.max(1) as f64;
        ((self.cursor.x / width) as f32, (self.cursor.y / height) as f32)
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::Resized(size) => {
                self.size = *size;
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = *position;
                let (x, y) = self.cursor();
                Some(InputEvent::PointerMoved { x, y })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = PointerButton::from_winit(*button)?;
                let (x, y) = self.cursor();
                Some(match state {
                    ElementState::Pressed => InputEvent::PointerPressed { x, y, button },
                    ElementState::Released => InputEvent::PointerReleased { x, y, button },
                })
            }
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
                notches: wheel_notches(delta),
            }),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return None;
                }
                let action = KeyAction::from_key(&event.logical_key)?;
                Some(InputEvent::Key {
                    action,
                    pressed: event.state == ElementState::Pressed,
                })
            }
            _ => None,
        }
    }
}
