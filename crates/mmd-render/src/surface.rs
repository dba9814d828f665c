//! Render target identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An independent render destination. Each surface has its own render
/// identity so results can never be applied to the wrong preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Surface {
    /// The preview pane beside the text editor.
    Inline,
    /// The full-screen preview dialog.
    FullScreen,
}

impl Surface {
    pub const ALL: [Surface; 2] = [Surface::Inline, Surface::FullScreen];

    /// Id handed to the renderer for the temporary element it draws into.
    pub fn render_id(self) -> &'static str {
        match self {
            Surface::Inline => "mermaid-diagram",
            Surface::FullScreen => "full-screen-mermaid-diagram",
        }
    }

    /// Dense index for per-surface tables.
    pub fn index(self) -> usize {
        match self {
            Surface::Inline => 0,
            Surface::FullScreen => 1,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Inline => f.write_str("inline"),
            Surface::FullScreen => f.write_str("full-screen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_ids_are_distinct() {
        assert_ne!(Surface::Inline.render_id(), Surface::FullScreen.render_id());
    }

    #[test]
    fn serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&Surface::FullScreen).unwrap(),
            r#""fullScreen""#
        );
    }
}
