//! Draggable divider between the editor and preview panes.

use crate::drag::{DragEnd, DragSession};
use mmd_core::{Point, SplitRatio};

#[derive(Debug, Clone, Default)]
pub struct Splitter {
    ratio: SplitRatio,
    drag: Option<DragSession<SplitRatio>>,
}

impl Splitter {
    pub fn new(ratio: SplitRatio) -> Self {
        Self { ratio, drag: None }
    }

    pub fn ratio(&self) -> SplitRatio {
        self.ratio
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer pressed on the divider at horizontal position `x`.
    pub fn begin(&mut self, x: f64) {
        self.drag = Some(DragSession::begin(Point::new(x, 0.0), self.ratio));
    }

    /// Pointer moved to `x` in a window `viewport_width` pixels wide.
    /// Returns the new ratio, or `None` when no drag is active.
    pub fn drag_to(&mut self, x: f64, viewport_width: f64) -> Option<SplitRatio> {
        let drag = self.drag.as_mut()?;
        let offset = drag.update(Point::new(x, 0.0));
        self.ratio = drag.start().dragged(offset.x, viewport_width);
        Some(self.ratio)
    }

    pub fn end(&mut self, reason: DragEnd) {
        if let Some(drag) = self.drag.take() {
            drag.end(reason);
            log::debug!("splitter settled at {:.1}%", self.ratio.percent());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_is_relative_to_start_ratio() {
        let mut splitter = Splitter::default();
        splitter.begin(400.0);
        let r = splitter.drag_to(500.0, 1000.0).unwrap();
        assert!((r.percent() - 60.0).abs() < 1e-9);
        // moving back re-derives from the start, not the last position
        let r = splitter.drag_to(450.0, 1000.0).unwrap();
        assert!((r.percent() - 55.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_drag_is_clamped() {
        let mut splitter = Splitter::default();
        splitter.begin(0.0);
        assert_eq!(splitter.drag_to(1.0e9, 800.0).unwrap().percent(), 80.0);
        assert_eq!(splitter.drag_to(-1.0e9, 800.0).unwrap().percent(), 20.0);
    }

    #[test]
    fn moves_after_end_are_ignored() {
        let mut splitter = Splitter::default();
        splitter.begin(100.0);
        splitter.drag_to(200.0, 1000.0);
        splitter.end(DragEnd::PointerUp);
        assert!(!splitter.is_dragging());
        assert_eq!(splitter.drag_to(900.0, 1000.0), None);
        assert!((splitter.ratio().percent() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_drags_start_from_settled_ratio() {
        let mut splitter = Splitter::default();
        for _ in 0..3 {
            splitter.begin(0.0);
            splitter.drag_to(50.0, 1000.0);
            splitter.end(DragEnd::PointerUp);
        }
        assert!((splitter.ratio().percent() - 65.0).abs() < 1e-9);
    }
}
