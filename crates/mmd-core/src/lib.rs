pub mod config;
pub mod direction;
pub mod document;
pub mod history;
pub mod split;
pub mod theme;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use direction::{Direction, detect_direction, rewrite_direction};
pub use document::Document;
pub use history::{EditOrigin, History, Snapshot};
pub use split::SplitRatio;
pub use theme::Theme;
pub use viewport::ViewportState;

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Affine, Point, Vec2};
