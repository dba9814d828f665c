//! Editor engine for Mermaid Studio.
//!
//! [`session::EditorSession`] owns all editor state: the document and its
//! history, the render pipeline for both preview surfaces, the two viewport
//! controllers, the splitter, and the notification queue. Hosts feed it
//! input and clock ticks, run the render jobs it hands out, and report the
//! results back.

pub mod drag;
pub mod generate;
pub mod input;
pub mod notify;
pub mod pipeline;
pub mod session;
pub mod share;
pub mod shortcuts;
pub mod splitter;
pub mod viewport;

pub use session::EditorSession;
