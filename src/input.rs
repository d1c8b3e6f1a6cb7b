//! Keyboard state for free-fly movement.
//!
//! [`MovementFlags`] holds one flag per direction. Key presses set a flag, key
//! releases clear it and the frame tick reads them. Several flags can be held at
//! the same time; opposite directions cancel out in the camera controller.

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// One of the six directions the camera can be moved in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Movement {
    /// The movement bound to a physical key, if any.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Movement::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Movement::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Movement::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Movement::Right),
            KeyCode::KeyE | KeyCode::KeyT => Some(Movement::Up),
            KeyCode::KeyQ | KeyCode::KeyG => Some(Movement::Down),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, code: KeyCode) {
        if let Some(movement) = Movement::from_key_code(code) {
            self.set(movement, true);
        }
    }

    pub fn on_key_up(&mut self, code: KeyCode) {
        if let Some(movement) = Movement::from_key_code(code) {
            self.set(movement, false);
        }
    }

    pub fn set(&mut self, movement: Movement, active: bool) {
        let flag = match movement {
            Movement::Forward => &mut self.forward,
            Movement::Backward => &mut self.backward,
            Movement::Left => &mut self.left,
            Movement::Right => &mut self.right,
            Movement::Up => &mut self.up,
            Movement::Down => &mut self.down,
        };
        *flag = active;
    }

    pub fn is_active(&self, movement: Movement) -> bool {
        match movement {
            Movement::Forward => self.forward,
            Movement::Backward => self.backward,
            Movement::Left => self.left,
            Movement::Right => self.right,
            Movement::Up => self.up,
            Movement::Down => self.down,
        }
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    /// Clear every flag, e.g. when the window loses focus and key releases
    /// would be missed.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Route a window event. Returns true if it changed a flag.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                let before = *self;
                match state {
                    ElementState::Pressed => self.on_key_down(*code),
                    ElementState::Released => self.on_key_up(*code),
                }
                before != *self
            }
            WindowEvent::Focused(false) => {
                let changed = self.any();
                self.clear();
                changed
            }
            _ => false,
        }
    }
}
