//! The diagram document: source text backed by its history log.

use crate::history::{EditOrigin, History};

/// Default document shown on first load.
pub const DEFAULT_SOURCE: &str = "graph LR
  %% Style definitions
  classDef deviceStyle fill:#fff,stroke:#333,stroke-width:2px

  %% Main devices
  HOTSPOT[HotSpot]
  MICROTIK[MicroTik]
  OLT[OLT]
  SWITCH[SWITCH]
  SWH[SWH]
  AP[WiFi AP]
  EKCAST[EkCast]
  ANTO[Anto's PC]
  VODAFONE[Vodafone]";

pub const DEFAULT_TITLE: &str = "Network Diagram: Office";

/// Source text plus title. The text is never stored separately from the
/// history: `text()` is always the snapshot under the history cursor.
#[derive(Debug, Clone)]
pub struct Document {
    history: History,
    title: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}

impl Document {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            history: History::new(seed),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        self.history.current_text()
    }

    /// Heading of the full-screen dialog. Not part of the history.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the text from a keystroke.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.history.record(text, EditOrigin::Edit);
    }

    /// Replace the text from a programmatic rewrite.
    pub fn apply_transform(&mut self, text: impl Into<String>) {
        self.history.record(text, EditOrigin::Transform);
    }

    /// Replace the text with AI-generated source.
    pub fn apply_generated(&mut self, text: impl Into<String>) {
        self.history.record(text, EditOrigin::Generated);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of lines shown in the gutter. An empty document has one line.
    pub fn line_count(&self) -> usize {
        self.text().split('\n').count()
    }
}
