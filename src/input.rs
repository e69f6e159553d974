//! Input handling for the garden window.
//!
//! The `Input` struct turns raw window events into the state the frame loop
//! needs: where the pointer is (and whether there is one), how far it was
//! dragged, how much the wheel scrolled, and which keys were just pressed.
//!
//! Per-frame values (pressed keys, drag, scroll) are cleared by
//! [`Input::begin_frame`]; held state persists.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the garden responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Space,
    /// `+` / `=` and keypad plus.
    Plus,
    /// `-` and keypad minus.
    Minus,
    R,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Equal | WinitKeyCode::NumpadAdd => KeyCode::Plus,
            WinitKeyCode::Minus | WinitKeyCode::NumpadSubtract => KeyCode::Minus,
            WinitKeyCode::KeyR => KeyCode::R,
            _ => KeyCode::Other,
        }
    }
}

/// Input state tracking for keyboard and mouse.
#[derive(Debug, Default)]
pub struct Input {
    /// Held keys, used to drop auto-repeat.
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    // Pointer
    left_held: bool,
    mouse_position: Vec2,
    cursor_inside: bool,
    drag_delta: Vec2,

    // Scroll
    scroll_delta: f32,

    // Window size for NDC calculation
    window_size: (u32, u32),
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self {
            window_size: (1280, 720),
            ..Default::default()
        }
    }

    // ========== Key Queries ==========

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    // ========== Mouse Queries ==========

    /// Pointer in normalized device coordinates (-1 to 1, +y up).
    ///
    /// `None` while the cursor is outside the window.
    pub fn mouse_ndc(&self) -> Option<Vec2> {
        if !self.cursor_inside {
            return None;
        }
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Vec2::new(
            (self.mouse_position.x / w as f32) * 2.0 - 1.0,
            1.0 - (self.mouse_position.y / h as f32) * 2.0, // Y flipped
        ))
    }

    /// Pointer movement in pixels while the left button was held this frame.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Scroll wheel delta this frame, positive away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    // ========== Frame Bookkeeping ==========

    /// Clear per-frame state. Call after the frame has consumed it.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => {
                            // Only fire pressed event if not already held (no repeat)
                            if !self.keys_held.contains(&key) {
                                self.keys_pressed.insert(key);
                            }
                            self.keys_held.insert(key);
                        }
                        ElementState::Released => {
                            self.keys_held.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.left_held = *state == ElementState::Pressed;
            }

            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                if self.cursor_inside && self.left_held {
                    self.drag_delta += new_pos - self.mouse_position;
                }
                self.mouse_position = new_pos;
                self.cursor_inside = true;
            }

            WindowEvent::CursorEntered { .. } => {
                self.cursor_inside = true;
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor_inside = false;
                self.left_held = false;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }

            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.left_held = false;
            }

            _ => {}
        }
    }
}
