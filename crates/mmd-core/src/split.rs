//! Editor/preview split position.

pub const SPLIT_MIN: f64 = 20.0;
pub const SPLIT_MAX: f64 = 80.0;

/// Width of the editor pane as a percentage of the window, in
/// `[SPLIT_MIN, SPLIT_MAX]`. The preview takes the remainder.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SplitRatio(f64);

impl Default for SplitRatio {
    fn default() -> Self {
        Self(50.0)
    }
}

impl SplitRatio {
    /// Clamp an arbitrary percentage into range. NaN falls back to the default.
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::default();
        }
        Self(percent.clamp(SPLIT_MIN, SPLIT_MAX))
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    pub fn preview_percent(self) -> f64 {
        100.0 - self.0
    }

    /// Ratio after dragging the divider `dx` pixels in a window
    /// `viewport_width` pixels wide. A non-positive width leaves it unchanged.
    pub fn dragged(self, dx: f64, viewport_width: f64) -> Self {
        if viewport_width <= 0.0 || !viewport_width.is_finite() {
            return self;
        }
        Self::new(self.0 + (dx / viewport_width) * 100.0)
    }
}
