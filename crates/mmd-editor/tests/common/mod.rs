//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use mmd_editor::share::{ClipboardError, ClipboardWriter};
use mmd_render::{DiagramRenderer, RenderConfig, RenderError, Surface};
use std::cell::RefCell;

/// Renderer that accepts anything except a dangling `--` edge and records
/// every call it receives.
#[derive(Default)]
pub struct FakeRenderer {
    pub calls: RefCell<Vec<(Surface, String)>>,
}

impl FakeRenderer {
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

pub fn svg_for(surface: Surface, source: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" data-lines="{}"></svg>"#,
        surface.render_id(),
        source.lines().count()
    )
}

impl DiagramRenderer for FakeRenderer {
    fn render<'a>(
        &'a self,
        surface: Surface,
        source: &'a str,
        _config: &'a RenderConfig,
    ) -> LocalBoxFuture<'a, Result<String, RenderError>> {
        self.calls.borrow_mut().push((surface, source.to_string()));
        let result = if source.trim_end().ends_with("--") {
            Err(RenderError::Syntax("unexpected end of input".into()))
        } else {
            Ok(svg_for(surface, source))
        };
        futures::future::ready(result).boxed_local()
    }
}

/// Clipboard that stores the last write, or fails every write.
#[derive(Default)]
pub struct FakeClipboard {
    pub contents: RefCell<Option<String>>,
    pub deny: bool,
}

impl ClipboardWriter for FakeClipboard {
    fn write_text<'a>(&'a self, text: &'a str) -> LocalBoxFuture<'a, Result<(), ClipboardError>> {
        let result = if self.deny {
            Err(ClipboardError("permission denied".into()))
        } else {
            *self.contents.borrow_mut() = Some(text.to_string());
            Ok(())
        };
        futures::future::ready(result).boxed_local()
    }
}
