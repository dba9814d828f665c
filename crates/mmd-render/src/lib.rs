//! Boundary between the editor and the external diagram renderer.
//!
//! The renderer itself (mermaid.js in the browser) is opaque: it takes a
//! surface identity, source text, and a per-call [`RenderConfig`] and yields
//! SVG markup or a [`RenderError`].

pub mod engine;
pub mod export;
pub mod surface;

pub use engine::{DiagramRenderer, RenderConfig, RenderError};
pub use export::SvgExport;
pub use surface::Surface;
