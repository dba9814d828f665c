//! Pan/zoom gesture handling for a preview surface.
//!
//! ## Gestures
//!
//! | Input | Effect |
//! |-------|--------|
//! | Drag | Pan, tracking the cursor 1:1 (no easing) |
//! | Wheel | Pan by `-(dx, dy)` |
//! | ⌘/Ctrl + wheel | Zoom one step (down = out, up = in) |

use crate::drag::{DragEnd, DragSession};
use crate::input::{InputEvent, Modifiers};
use mmd_core::viewport::ZOOM_STEP;
use mmd_core::{Point, Vec2, ViewportState};

const EASED_TRANSITION: &str = "transform 0.3s ease-out";

/// Viewport state plus the in-progress drag, if any.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    state: ViewportState,
    drag: Option<DragSession<Vec2>>,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.state.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.state.zoom_out();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.state.pan_by(delta);
    }

    /// Back to identity. Cancels any drag in progress.
    pub fn reset(&mut self) {
        self.end_drag(DragEnd::Teardown);
        self.state.reset();
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.drag = Some(DragSession::begin(at, self.state.pan()));
    }

    /// Returns `true` if the pan changed.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let offset = drag.update(at);
        let pan = drag.start() + offset;
        let changed = pan != self.state.pan();
        self.state.set_pan(pan);
        changed
    }

    pub fn end_drag(&mut self, reason: DragEnd) {
        if let Some(drag) = self.drag.take() {
            drag.end(reason);
        }
    }

    /// Returns `true` if the viewport changed.
    pub fn wheel(&mut self, delta: Vec2, modifiers: Modifiers) -> bool {
        let before = self.state;
        if modifiers.command() {
            if delta.y > 0.0 {
                self.state.zoom_by(-ZOOM_STEP);
            } else if delta.y < 0.0 {
                self.state.zoom_by(ZOOM_STEP);
            }
        } else {
            self.state.pan_by(-delta);
        }
        self.state != before
    }

    /// Dispatch a normalized input event. Returns `true` if the viewport
    /// changed or a drag started/ended (the host should restyle).
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.pointer_down(Point::new(x, y));
                true
            }
            InputEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            InputEvent::PointerUp { .. } => {
                let was_dragging = self.is_dragging();
                self.end_drag(DragEnd::PointerUp);
                was_dragging
            }
            InputEvent::PointerLeave => {
                let was_dragging = self.is_dragging();
                self.end_drag(DragEnd::PointerLeave);
                was_dragging
            }
            InputEvent::Wheel { dx, dy, modifiers } => self.wheel(Vec2::new(dx, dy), modifiers),
        }
    }

    /// CSS `transition` value: instant while dragging, eased otherwise.
    pub fn transition(&self) -> &'static str {
        if self.is_dragging() {
            "none"
        } else {
            EASED_TRANSITION
        }
    }

    /// CSS `cursor` value for the preview.
    pub fn cursor(&self) -> &'static str {
        if self.is_dragging() { "grabbing" } else { "grab" }
    }

    pub fn css_transform(&self) -> String {
        self.state.css_transform()
    }
}
