//! Pointer-drag sessions.
//!
//! Every drag gesture in the editor (preview pan, full-screen pan, splitter)
//! follows the same shape: capture the pointer origin and the state being
//! dragged, turn each move into a delta from the origin, then end. A
//! `DragSession` holds that capture; its owner applies the delta to whatever
//! it controls. Ending consumes the session, so a finished drag cannot be
//! updated again.

use mmd_core::{Point, Vec2};

/// Why a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEnd {
    PointerUp,
    PointerLeave,
    /// The owning surface went away mid-gesture (dialog closed, reset).
    Teardown,
}

/// An active drag: the pointer origin plus the dragged value at begin time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession<S> {
    origin: Point,
    start: S,
    last: Point,
}

impl<S: Copy> DragSession<S> {
    pub fn begin(origin: Point, start: S) -> Self {
        Self {
            origin,
            start,
            last: origin,
        }
    }

    /// The dragged value captured at begin time.
    pub fn start(&self) -> S {
        self.start
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Record a new cursor position and return its offset from the origin.
    pub fn update(&mut self, cursor: Point) -> Vec2 {
        self.last = cursor;
        cursor - self.origin
    }

    /// Offset of the last recorded cursor from the origin.
    pub fn offset(&self) -> Vec2 {
        self.last - self.origin
    }

    /// Finish the drag, returning the final offset.
    pub fn end(self, reason: DragEnd) -> Vec2 {
        let offset = self.offset();
        log::trace!("drag ended ({reason:?}) at offset ({}, {})", offset.x, offset.y);
        offset
    }
}
