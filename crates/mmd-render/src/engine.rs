//! Renderer trait and per-call configuration.

use crate::surface::Surface;
use futures::future::LocalBoxFuture;
use mmd_core::Theme;

/// Failure reported by the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The source text could not be parsed as a diagram.
    #[error("diagram syntax error: {0}")]
    Syntax(String),
    /// The engine failed for a reason unrelated to the input.
    #[error("renderer failure: {0}")]
    Engine(String),
}

/// Configuration passed with every render call.
///
/// Carried per request instead of being installed into the engine globally,
/// so two surfaces rendering at once cannot observe each other's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderConfig {
    pub theme: Theme,
}

impl RenderConfig {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Mermaid init directive carrying this config.
    pub fn directive(&self) -> String {
        format!(r#"%%{{init: {{"theme": "{}"}}}}%%"#, self.theme.as_str())
    }

    /// Source text with the init directive inserted ahead of the diagram.
    /// The user's own directives come later and keep precedence. A YAML
    /// frontmatter block must stay first, so the directive follows it.
    pub fn apply(&self, source: &str) -> String {
        let directive = self.directive();
        let split = frontmatter_len(source).unwrap_or(0);
        let (head, body) = source.split_at(split);
        let mut out = String::with_capacity(directive.len() + 2 + source.len());
        out.push_str(head);
        if !head.is_empty() && !head.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&directive);
        out.push('\n');
        out.push_str(body);
        out
    }
}

/// Byte length of a leading `---` frontmatter block, closing fence included.
/// `None` when the source has no frontmatter or the block is never closed.
fn frontmatter_len(source: &str) -> Option<usize> {
    let mut lines = source.split_inclusive('\n');
    let open = lines.next()?;
    if open.trim_end() != "---" {
        return None;
    }
    let mut end = open.len();
    for line in lines {
        end += line.len();
        if line.trim_end() == "---" {
            return Some(end);
        }
    }
    None
}

/// An asynchronous, fallible diagram renderer.
///
/// Futures are `!Send`: the editor runs on a single-threaded event loop.
pub trait DiagramRenderer {
    fn render<'a>(
        &'a self,
        surface: Surface,
        source: &'a str,
        config: &'a RenderConfig,
    ) -> LocalBoxFuture<'a, Result<String, RenderError>>;
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for std::rc::Rc<R> {
    fn render<'a>(
        &'a self,
        surface: Surface,
        source: &'a str,
        config: &'a RenderConfig,
    ) -> LocalBoxFuture<'a, Result<String, RenderError>> {
        (**self).render(surface, source, config)
    }
}
