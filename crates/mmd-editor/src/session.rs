//! The editor session: every piece of editor state behind one owner.
//!
//! All methods are synchronous except the `*_with` helpers, which drive an
//! external renderer, generator, or clipboard to completion. Hosts that
//! cannot hold `&mut self` across an await (the WASM bridge) use the split
//! `begin_*` / `finish_*` and `tick` / `finish_render` pairs instead.

use crate::generate::{DiagramGenerator, GenerateError, GenerateRequest};
use crate::notify::{self, Notification, Notifications};
use crate::pipeline::{RenderJob, RenderOutcome, RenderPipeline};
use crate::share::{ClipboardError, ClipboardWriter};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::splitter::Splitter;
use crate::viewport::ViewportController;
use mmd_core::{Direction, Document, EditorConfig, SplitRatio, Theme, rewrite_direction};
use mmd_render::{DiagramRenderer, RenderConfig, RenderError, Surface, SvgExport};

pub struct EditorSession {
    document: Document,
    theme: Theme,
    direction: Direction,
    pipeline: RenderPipeline,
    inline_view: ViewportController,
    full_screen_view: ViewportController,
    splitter: Splitter,
    notifications: Notifications,
    /// A generation request is in flight.
    generating: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl EditorSession {
    /// Create a session. The first inline render is due on the first tick.
    pub fn new(config: &EditorConfig) -> Self {
        let mut document = Document::new(config.seed.clone());
        document.set_title(config.title.clone());

        let mut pipeline = RenderPipeline::new(config.debounce_ms);
        pipeline.schedule_now(Surface::Inline, 0.0);

        Self {
            document,
            theme: config.theme,
            direction: config.direction,
            pipeline,
            inline_view: ViewportController::new(),
            full_screen_view: ViewportController::new(),
            splitter: Splitter::new(SplitRatio::default()),
            notifications: Notifications::default(),
            generating: false,
        }
    }

    // ─── Document ────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn title(&self) -> &str {
        self.document.title()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document.set_title(title);
    }

    /// Replace the text from a keystroke and schedule a re-render.
    pub fn edit(&mut self, text: impl Into<String>, now_ms: f64) {
        self.document.edit(text);
        self.pipeline.schedule_open(now_ms);
    }

    pub fn undo(&mut self, now_ms: f64) -> bool {
        let moved = self.document.undo();
        if moved {
            self.pipeline.schedule_open(now_ms);
        }
        moved
    }

    pub fn redo(&mut self, now_ms: f64) -> bool {
        let moved = self.document.redo();
        if moved {
            self.pipeline.schedule_open(now_ms);
        }
        moved
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Set the preferred direction and rewrite the document header.
    ///
    /// The preference is always stored (it is sent with generation
    /// requests). Returns `true` if the text changed; a document without a
    /// flowchart header, or one already in `direction`, gets no history entry.
    pub fn set_direction(&mut self, direction: Direction, now_ms: f64) -> bool {
        self.direction = direction;
        match rewrite_direction(self.document.text(), direction) {
            Some(rewritten) if rewritten != self.document.text() => {
                log::info!("direction: rewrote header to {direction}");
                self.document.apply_transform(rewritten);
                self.pipeline.schedule_open(now_ms);
                true
            }
            _ => false,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme. Open surfaces re-render with the new config.
    pub fn set_theme(&mut self, theme: Theme, now_ms: f64) {
        if theme == self.theme {
            return;
        }
        log::info!("theme: {} -> {theme}", self.theme);
        self.theme = theme;
        self.pipeline.schedule_open(now_ms);
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new(self.theme)
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Render jobs that are due at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Vec<RenderJob> {
        let config = self.render_config();
        self.pipeline.take_due(now_ms, self.document.text(), config)
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.pipeline.next_deadline()
    }

    /// Report a job's result. Failures queue an error notification and keep
    /// the previous SVG on display.
    pub fn finish_render(
        &mut self,
        job: &RenderJob,
        result: Result<String, RenderError>,
    ) -> RenderOutcome {
        let outcome = self
            .pipeline
            .finish(job.surface, job.generation, &job.source, result);
        if let RenderOutcome::Failed(err) = &outcome {
            log::error!("render[{}] failed: {err}", job.surface);
            self.notifications
                .push(Notification::error(notify::RENDER_FAILED));
        }
        outcome
    }

    /// Run every due job through `renderer`, one after another.
    pub async fn pump_with<R: DiagramRenderer + ?Sized>(
        &mut self,
        renderer: &R,
        now_ms: f64,
    ) -> Vec<RenderOutcome> {
        let jobs = self.tick(now_ms);
        let mut outcomes = Vec::with_capacity(jobs.len());
        for job in jobs {
            let result = job.run(renderer).await;
            outcomes.push(self.finish_render(&job, result));
        }
        outcomes
    }

    pub fn displayed_svg(&self, surface: Surface) -> Option<&str> {
        self.pipeline.displayed(surface).map(|d| d.svg.as_str())
    }

    // ─── Full-screen ─────────────────────────────────────────────────────

    pub fn is_full_screen_open(&self) -> bool {
        self.pipeline.is_open(Surface::FullScreen)
    }

    /// Open the full-screen preview and render it right away.
    pub fn open_full_screen(&mut self, now_ms: f64) {
        if self.is_full_screen_open() {
            return;
        }
        self.pipeline.open(Surface::FullScreen, now_ms);
    }

    /// Close the full-screen preview. Its viewport resets so the next open
    /// starts from identity, and any render still in flight is discarded.
    pub fn close_full_screen(&mut self) {
        if !self.is_full_screen_open() {
            return;
        }
        self.pipeline.close(Surface::FullScreen);
        self.full_screen_view.reset();
    }

    // ─── View state ──────────────────────────────────────────────────────

    pub fn viewport(&self, surface: Surface) -> &ViewportController {
        match surface {
            Surface::Inline => &self.inline_view,
            Surface::FullScreen => &self.full_screen_view,
        }
    }

    pub fn viewport_mut(&mut self, surface: Surface) -> &mut ViewportController {
        match surface {
            Surface::Inline => &mut self.inline_view,
            Surface::FullScreen => &mut self.full_screen_view,
        }
    }

    /// The surface view shortcuts act on.
    pub fn active_surface(&self) -> Surface {
        if self.is_full_screen_open() {
            Surface::FullScreen
        } else {
            Surface::Inline
        }
    }

    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    pub fn splitter_mut(&mut self) -> &mut Splitter {
        &mut self.splitter
    }

    // ─── Export / share ──────────────────────────────────────────────────

    /// The inline preview as a downloadable file, if anything has rendered.
    pub fn export_svg(&mut self) -> Option<SvgExport> {
        let export = self
            .pipeline
            .displayed(Surface::Inline)
            .and_then(|d| SvgExport::from_markup(&d.svg));
        if export.is_none() {
            self.notifications
                .push(Notification::error(notify::EXPORT_EMPTY));
        }
        export
    }

    pub fn finish_share(&mut self, result: Result<(), ClipboardError>) -> bool {
        match result {
            Ok(()) => {
                self.notifications
                    .push(Notification::info(notify::SHARE_SUCCEEDED));
                true
            }
            Err(err) => {
                log::error!("share: {err}");
                self.notifications
                    .push(Notification::error(notify::SHARE_FAILED));
                false
            }
        }
    }

    /// Copy the source text to the clipboard.
    pub async fn share_with<C: ClipboardWriter + ?Sized>(&mut self, clipboard: &C) -> bool {
        let text = self.document.text().to_string();
        let result = clipboard.write_text(&text).await;
        self.finish_share(result)
    }

    // ─── AI generation ───────────────────────────────────────────────────

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Claim the single generation slot and build the request.
    pub fn begin_generate(&mut self, prompt: &str) -> Result<GenerateRequest, GenerateError> {
        if self.generating {
            log::warn!("generate: request already in flight");
            self.notifications
                .push(Notification::error(notify::GENERATE_BUSY));
            return Err(GenerateError::Busy);
        }
        self.generating = true;
        Ok(GenerateRequest {
            prompt: prompt.to_string(),
            direction: self.direction,
        })
    }

    /// Release the generation slot and apply the response. On failure the
    /// document and its history are left exactly as they were.
    pub fn finish_generate(&mut self, result: Result<String, GenerateError>, now_ms: f64) -> bool {
        self.generating = false;
        match result {
            Ok(source) => {
                self.document.apply_generated(source);
                self.pipeline.schedule_open(now_ms);
                self.notifications
                    .push(Notification::info(notify::GENERATE_SUCCEEDED));
                true
            }
            Err(err) => {
                log::error!("generate: {err}");
                self.notifications
                    .push(Notification::error(notify::GENERATE_FAILED));
                false
            }
        }
    }

    /// Generate a diagram from `prompt` and load it into the document.
    pub async fn generate_with<G: DiagramGenerator + ?Sized>(
        &mut self,
        prompt: &str,
        generator: &G,
        now_ms: f64,
    ) -> bool {
        let Ok(request) = self.begin_generate(prompt) else {
            return false;
        };
        let result = generator.generate(&request).await;
        self.finish_generate(result, now_ms)
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and apply a keyboard shortcut. `ExportSvg` is returned for
    /// the host to perform the download.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        now_ms: f64,
    ) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta)?;
        let surface = self.active_surface();
        match action {
            ShortcutAction::Undo => {
                self.undo(now_ms);
            }
            ShortcutAction::Redo => {
                self.redo(now_ms);
            }
            ShortcutAction::ZoomIn => self.viewport_mut(surface).zoom_in(),
            ShortcutAction::ZoomOut => self.viewport_mut(surface).zoom_out(),
            ShortcutAction::ResetView => self.viewport_mut(surface).reset(),
            ShortcutAction::CloseFullScreen => self.close_full_screen(),
            ShortcutAction::ExportSvg => {}
        }
        Some(action)
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(seed: &str) -> EditorSession {
        EditorSession::new(&EditorConfig {
            seed: seed.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn first_tick_renders_inline() {
        let mut s = session("graph LR");
        let jobs = s.tick(0.0);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].surface, Surface::Inline);
        assert_eq!(jobs[0].source, "graph LR");
    }

    #[test]
    fn edit_schedules_debounced_render() {
        let mut s = session("graph LR");
        s.tick(0.0);
        s.edit("graph LR\n  A-->B", 10.0);
        assert!(s.tick(50.0).is_empty());
        let jobs = s.tick(110.0);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source, "graph LR\n  A-->B");
    }

    #[test]
    fn direction_change_is_one_history_step() {
        let mut s = session("graph LR\n  A-->B");
        assert!(s.set_direction(Direction::TB, 0.0));
        assert_eq!(s.text(), "graph TB\n  A-->B");
        assert_eq!(s.document().history().len(), 2);

        // same direction again: no new entry
        assert!(!s.set_direction(Direction::TB, 0.0));
        assert_eq!(s.document().history().len(), 2);

        s.undo(0.0);
        assert_eq!(s.text(), "graph LR\n  A-->B");
    }

    #[test]
    fn direction_is_remembered_without_header() {
        let mut s = session("sequenceDiagram\n  A->>B: hi");
        assert!(!s.set_direction(Direction::RL, 0.0));
        assert_eq!(s.direction(), Direction::RL);
        assert_eq!(s.document().history().len(), 1);
    }

    #[test]
    fn theme_change_rerenders_with_new_config() {
        let mut s = session("graph LR");
        s.tick(0.0);
        s.set_theme(Theme::Forest, 0.0);
        let jobs = s.tick(100.0);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].config.theme, Theme::Forest);
    }

    #[test]
    fn close_full_screen_resets_its_viewport() {
        let mut s = session("graph LR");
        s.open_full_screen(0.0);
        assert_eq!(s.active_surface(), Surface::FullScreen);
        s.viewport_mut(Surface::FullScreen).zoom_in();
        s.viewport_mut(Surface::Inline).zoom_in();

        s.close_full_screen();
        assert!(s.viewport(Surface::FullScreen).state().is_identity());
        assert!(!s.viewport(Surface::Inline).state().is_identity());
        assert_eq!(s.active_surface(), Surface::Inline);
    }

    #[test]
    fn shortcuts_target_active_surface() {
        let mut s = session("graph LR");
        s.handle_key("=", true, false, false, false, 0.0);
        assert!((s.viewport(Surface::Inline).state().zoom() - 1.1).abs() < 1e-9);

        s.open_full_screen(0.0);
        s.handle_key("-", true, false, false, false, 0.0);
        assert!((s.viewport(Surface::FullScreen).state().zoom() - 0.9).abs() < 1e-9);

        assert_eq!(
            s.handle_key("Escape", false, false, false, false, 0.0),
            Some(ShortcutAction::CloseFullScreen)
        );
        assert!(!s.is_full_screen_open());
    }

    #[test]
    fn keyboard_undo_redo() {
        let mut s = session("A");
        s.edit("AB", 0.0);
        s.handle_key("z", true, false, false, false, 0.0);
        assert_eq!(s.text(), "A");
        s.handle_key("z", true, true, false, false, 0.0);
        assert_eq!(s.text(), "AB");
    }

    #[test]
    fn generation_slot_is_exclusive() {
        let mut s = session("graph LR");
        let req = s.begin_generate("a router").unwrap();
        assert_eq!(req.direction, Direction::LR);
        assert!(s.is_generating());
        assert!(matches!(s.begin_generate("again"), Err(GenerateError::Busy)));

        s.finish_generate(Err(GenerateError::Status(500)), 0.0);
        assert!(!s.is_generating());
        assert_eq!(s.text(), "graph LR");
        assert!(s.begin_generate("retry").is_ok());
    }

    #[test]
    fn export_before_first_render_is_none() {
        let mut s = session("graph LR");
        assert_eq!(s.export_svg(), None);
        assert!(s.notifications().last().unwrap().is_error());
    }
}
