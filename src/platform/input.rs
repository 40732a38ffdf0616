//! Keyboard and touch input mapping
//!
//! Raw browser events are folded into a single `InputState` that the session
//! reads once per frame. Flags are last-write-wins; nothing is queued.

use glam::Vec2;

use crate::sim::InputState;

/// Touch movement (CSS px) below this is ignored as jitter
pub const DRAG_DEAD_ZONE: f32 = 2.0;

/// A direction the player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
}

impl Key {
    /// Map a `KeyboardEvent.key` value (any case) to a direction
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Forward),
            "s" | "arrowdown" => Some(Key::Back),
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            _ => None,
        }
    }
}

fn set(state: &mut InputState, key: Key, down: bool) {
    match key {
        Key::Forward => state.forward = down,
        Key::Back => state.back = down,
        Key::Left => state.left = down,
        Key::Right => state.right = down,
    }
}

/// Current directional intent from every input source
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    keys: InputState,
    touch: InputState,
    last_touch: Option<Vec2>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is one we handle
    pub fn key_down(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                set(&mut self.keys, key, true);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                set(&mut self.keys, key, false);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.last_touch = Some(pos);
        self.touch = InputState::default();
    }

    /// Steer by the sign of the drag since the previous touch event.
    /// Dragging up the screen means forward.
    pub fn touch_move(&mut self, pos: Vec2) {
        let Some(last) = self.last_touch else {
            self.touch_start(pos);
            return;
        };
        let delta = pos - last;
        if delta.x.abs() > DRAG_DEAD_ZONE {
            self.touch.left = delta.x < 0.0;
            self.touch.right = delta.x > 0.0;
        }
        if delta.y.abs() > DRAG_DEAD_ZONE {
            self.touch.forward = delta.y < 0.0;
            self.touch.back = delta.y > 0.0;
        }
        self.last_touch = Some(pos);
    }

    pub fn touch_end(&mut self) {
        self.last_touch = None;
        self.touch = InputState::default();
    }

    /// Release everything (e.g. the window lost focus)
    pub fn clear(&mut self) {
        self.keys = InputState::default();
        self.touch_end();
    }

    /// Combined state for this frame
    pub fn state(&self) -> InputState {
        InputState {
            forward: self.keys.forward || self.touch.forward,
            back: self.keys.back || self.touch.back,
            left: self.keys.left || self.touch.left,
            right: self.keys.right || self.touch.right,
        }
    }
}
