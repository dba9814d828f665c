//! Input abstraction layer.
//!
//! Normalizes DOM mouse and wheel events into a unified `InputEvent` enum
//! consumed by the viewport controllers and the splitter.

use mmd_core::{Point, Vec2};

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Platform command key: ⌘ on macOS, Ctrl elsewhere. Trackpad pinch
    /// gestures also arrive as ctrl+wheel.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Button pressed.
    PointerDown { x: f64, y: f64 },
    /// Pointer moved, pressed or not.
    PointerMove { x: f64, y: f64 },
    /// Button released.
    PointerUp { x: f64, y: f64 },
    /// Pointer left the element.
    PointerLeave,
    /// Mouse wheel or trackpad scroll, in pixels.
    Wheel {
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn from_wheel(dx: f64, dy: f64, modifiers: Modifiers) -> Self {
        Self::Wheel { dx, dy, modifiers }
    }

    /// Extract position if this is a positioned pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    /// Scroll delta if this is a wheel event.
    pub fn wheel_delta(&self) -> Option<Vec2> {
        match self {
            Self::Wheel { dx, dy, .. } => Some(Vec2::new(*dx, *dy)),
            _ => None,
        }
    }
}
