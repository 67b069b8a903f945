//! Normalized input events

use glam::Vec2;

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Mouse state at an event, position in screen pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseEvent {
    pub position: Vec2,
    pub left: bool,
    pub middle: bool,
    pub right: bool,
    /// Snap modifier held
    pub ctrl: bool,
}

impl MouseEvent {
    /// Pointer at `position` with no button pressed
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Pointer at `position` with `button` pressed
    pub fn pressed(position: Vec2, button: MouseButton) -> Self {
        let mut event = Self::at(position);
        match button {
            MouseButton::Left => event.left = true,
            MouseButton::Middle => event.middle = true,
            MouseButton::Right => event.right = true,
        }
        event
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }
}

/// Key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character, lower case for letters
    Char(char),
    Backspace,
    Escape,
    Enter,
}

/// Key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}
