//! WASM bridge for Mermaid Studio: exposes the editor engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page provides the text
//! area, the dialogs, and mermaid.js. This crate owns all editor state,
//! arms the render timer, runs render jobs through mermaid, and paints the
//! resulting SVG into the preview containers.

mod clipboard;
mod console_log;
mod listeners;
mod mermaid_js;

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use clipboard::NavigatorClipboard;
use listeners::ListenerGuard;
use mermaid_js::MermaidJs;
use mmd_core::{Direction, EditorConfig, Theme};
use mmd_editor::EditorSession;
use mmd_editor::drag::DragEnd;
use mmd_editor::generate::{DiagramGenerator, GenerateError, HttpGenerator};
use mmd_editor::input::{InputEvent, Modifiers};
use mmd_editor::pipeline::RenderOutcome;
use mmd_editor::share::ClipboardWriter;
use mmd_editor::shortcuts::ShortcutAction;
use mmd_editor::viewport::ViewportController;
use mmd_render::{Surface, SvgExport};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::MouseEvent;

// ─── Shared state ────────────────────────────────────────────────────────

/// Everything the exported handle and its timer/listener callbacks share.
///
/// Callbacks hold a `Weak` so a freed handle is never resurrected. No
/// `RefCell` borrow is held across an `.await` or a call into JS.
struct Studio {
    session: RefCell<EditorSession>,
    config: EditorConfig,
    renderer: MermaidJs,
    on_update: RefCell<Option<js_sys::Function>>,
    /// Handle of the armed render timer.
    timer: Cell<Option<i32>>,
    tick: Closure<dyn FnMut()>,
    split_drag: RefCell<Option<ListenerGuard>>,
}

impl Studio {
    fn new(session: EditorSession, config: EditorConfig) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Studio>| {
            let weak = weak.clone();
            Self {
                session: RefCell::new(session),
                config,
                renderer: MermaidJs,
                on_update: RefCell::new(None),
                timer: Cell::new(None),
                tick: Closure::new(move || {
                    if let Some(studio) = weak.upgrade() {
                        studio.pump();
                    }
                }),
                split_drag: RefCell::new(None),
            }
        })
    }

    /// Start every render that is due, then re-arm for the next deadline.
    fn pump(self: &Rc<Self>) {
        self.timer.set(None);
        let jobs = self.session.borrow_mut().tick(now_ms());
        for job in jobs {
            let studio = Rc::clone(self);
            spawn_local(async move {
                let result = job.run(&studio.renderer).await;
                let outcome = studio.session.borrow_mut().finish_render(&job, result);
                if outcome == RenderOutcome::Applied {
                    studio.paint(job.surface);
                }
                studio.notify();
            });
        }
        self.arm();
    }

    /// Point the single timer at the earliest pending deadline.
    fn arm(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(handle) = self.timer.take() {
            window.clear_timeout_with_handle(handle);
        }
        let Some(deadline) = self.session.borrow().next_deadline() else {
            return;
        };
        let delay = (deadline - now_ms()).max(0.0).ceil() as i32;
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.tick.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => self.timer.set(Some(handle)),
            Err(err) => log::error!("render timer: {}", js_message(&err)),
        }
    }

    fn container(&self, surface: Surface) -> Option<web_sys::Element> {
        let id = match surface {
            Surface::Inline => &self.config.inline_container,
            Surface::FullScreen => &self.config.full_screen_container,
        };
        let element = document().ok()?.get_element_by_id(id);
        if element.is_none() {
            log::warn!("paint[{surface}]: no element #{id}");
        }
        element
    }

    /// Show the surface's current SVG (or nothing, once closed).
    fn paint(&self, surface: Surface) {
        let Some(element) = self.container(surface) else {
            return;
        };
        let session = self.session.borrow();
        element.set_inner_html(session.displayed_svg(surface).unwrap_or_default());
    }

    /// Tell the page that state changed outside a direct call.
    fn notify(&self) {
        let callback = self.on_update.borrow().clone();
        let Some(callback) = callback else {
            return;
        };
        if let Err(err) = callback.call0(&JsValue::NULL) {
            log::error!("update callback threw: {}", js_message(&err));
        }
    }

    fn generator(&self) -> Result<HttpGenerator, GenerateError> {
        let origin = web_sys::window().and_then(|w| w.location().origin().ok());
        HttpGenerator::new(&self.config.generate_endpoint, origin.as_deref())
    }

    fn end_split_drag(&self, reason: DragEnd) {
        let guard = self.split_drag.borrow_mut().take();
        let Some(mut guard) = guard else {
            return;
        };
        guard.detach();
        self.session.borrow_mut().splitter_mut().end(reason);
        // this may run inside one of the guard's own handlers
        spawn_local(async move { drop(guard) });
    }
}

impl Drop for Studio {
    fn drop(&mut self) {
        if let (Some(handle), Some(window)) = (self.timer.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

// ─── Exported handle ─────────────────────────────────────────────────────

/// The main WASM-facing editor controller.
///
/// Every interaction from the page goes through this struct. View methods
/// return the surface's view state as JSON for the page to apply.
#[wasm_bindgen]
pub struct MermaidStudio {
    studio: Rc<Studio>,
}

#[wasm_bindgen]
impl MermaidStudio {
    /// Create the editor. `config_json` is an optional `EditorConfig`
    /// object; omitted keys take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<MermaidStudio, JsValue> {
        console_log::install(log::LevelFilter::Info);

        let config =
            EditorConfig::from_json(config_json.as_deref().unwrap_or_default()).map_err(js_error)?;
        if let Err(err) = MermaidJs::initialize() {
            log::warn!("mermaid: {}", js_message(&err));
        }

        let session = EditorSession::new(&config);
        let studio = Studio::new(session, config);
        studio.arm();
        Ok(Self { studio })
    }

    /// Register a callback invoked after asynchronous state changes
    /// (render finished, generation finished, clipboard write finished).
    pub fn set_on_update(&self, callback: Option<js_sys::Function>) {
        *self.studio.on_update.borrow_mut() = callback;
    }

    /// Release timers and document listeners.
    pub fn destroy(&self) {
        self.studio.end_split_drag(DragEnd::Teardown);
        if let (Some(handle), Some(window)) = (self.studio.timer.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }

    // ─── Document ────────────────────────────────────────────────────────

    pub fn get_text(&self) -> String {
        self.studio.session.borrow().text().to_string()
    }

    /// Replace the source text after a keystroke.
    pub fn set_text(&self, text: &str) {
        self.studio.session.borrow_mut().edit(text, now_ms());
        self.studio.arm();
    }

    pub fn get_title(&self) -> String {
        self.studio.session.borrow().title().to_string()
    }

    pub fn set_title(&self, title: &str) {
        self.studio.session.borrow_mut().set_title(title);
    }

    pub fn undo(&self) -> bool {
        let moved = self.studio.session.borrow_mut().undo(now_ms());
        self.studio.arm();
        moved
    }

    pub fn redo(&self) -> bool {
        let moved = self.studio.session.borrow_mut().redo(now_ms());
        self.studio.arm();
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.studio.session.borrow().document().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.studio.session.borrow().document().can_redo()
    }

    pub fn line_count(&self) -> usize {
        self.studio.session.borrow().document().line_count()
    }

    pub fn get_direction(&self) -> String {
        self.studio.session.borrow().direction().to_string()
    }

    /// Set the preferred direction (`LR`, `RL`, `TB`, `BT`). Returns `true`
    /// if the document header was rewritten.
    pub fn set_direction(&self, direction: &str) -> Result<bool, JsValue> {
        let direction = Direction::from_str(direction).map_err(js_error)?;
        let changed = self
            .studio
            .session
            .borrow_mut()
            .set_direction(direction, now_ms());
        self.studio.arm();
        Ok(changed)
    }

    pub fn get_theme(&self) -> String {
        self.studio.session.borrow().theme().to_string()
    }

    pub fn set_theme(&self, theme: &str) -> Result<(), JsValue> {
        let theme = Theme::from_str(theme).map_err(js_error)?;
        self.studio.session.borrow_mut().set_theme(theme, now_ms());
        self.studio.arm();
        Ok(())
    }

    /// Snapshot of the toolbar-relevant state as JSON.
    pub fn get_state_json(&self) -> String {
        state_json(&self.studio.session.borrow())
    }

    // ─── Full-screen ─────────────────────────────────────────────────────

    pub fn is_full_screen_open(&self) -> bool {
        self.studio.session.borrow().is_full_screen_open()
    }

    /// Call after the full-screen container is in the DOM.
    pub fn open_full_screen(&self) {
        self.studio.session.borrow_mut().open_full_screen(now_ms());
        self.studio.arm();
    }

    pub fn close_full_screen(&self) {
        self.studio.session.borrow_mut().close_full_screen();
        self.studio.paint(Surface::FullScreen);
        self.studio.arm();
    }

    // ─── Viewport API ────────────────────────────────────────────────────

    /// View state for `surface` (`"inline"` or `"fullScreen"`):
    /// `{"changed","zoom","panX","panY","transform","transformOrigin","transition","cursor"}`.
    pub fn get_view_json(&self, surface: &str) -> Result<String, JsValue> {
        self.with_view(surface, |_| false)
    }

    pub fn zoom_in(&self, surface: &str) -> Result<String, JsValue> {
        self.with_view(surface, |view| {
            let before = *view.state();
            view.zoom_in();
            *view.state() != before
        })
    }

    pub fn zoom_out(&self, surface: &str) -> Result<String, JsValue> {
        self.with_view(surface, |view| {
            let before = *view.state();
            view.zoom_out();
            *view.state() != before
        })
    }

    pub fn reset_view(&self, surface: &str) -> Result<String, JsValue> {
        self.with_view(surface, |view| {
            let before = *view.state();
            view.reset();
            *view.state() != before
        })
    }

    pub fn handle_pointer_down(&self, surface: &str, x: f64, y: f64) -> Result<String, JsValue> {
        self.with_view(surface, |view| {
            view.handle(&InputEvent::from_pointer_down(x, y))
        })
    }

    pub fn handle_pointer_move(&self, surface: &str, x: f64, y: f64) -> Result<String, JsValue> {
        self.with_view(surface, |view| {
            view.handle(&InputEvent::from_pointer_move(x, y))
        })
    }

    pub fn handle_pointer_up(&self, surface: &str, x: f64, y: f64) -> Result<String, JsValue> {
        self.with_view(surface, |view| view.handle(&InputEvent::from_pointer_up(x, y)))
    }

    pub fn handle_pointer_leave(&self, surface: &str) -> Result<String, JsValue> {
        self.with_view(surface, |view| view.handle(&InputEvent::PointerLeave))
    }

    /// Wheel over a preview. With ctrl/⌘ it zooms, otherwise it pans.
    pub fn handle_wheel(
        &self,
        surface: &str,
        dx: f64,
        dy: f64,
        ctrl: bool,
        meta: bool,
    ) -> Result<String, JsValue> {
        let modifiers = Modifiers {
            ctrl,
            meta,
            ..Default::default()
        };
        self.with_view(surface, |view| {
            view.handle(&InputEvent::from_wheel(dx, dy, modifiers))
        })
    }

    // ─── Splitter ────────────────────────────────────────────────────────

    pub fn get_split_ratio(&self) -> f64 {
        self.studio.session.borrow().splitter().ratio().percent()
    }

    /// Begin a divider drag at client `x`. Mouse moves anywhere on the page
    /// call `on_change(percent)` until the button is released.
    pub fn begin_split_drag(&self, x: f64, on_change: js_sys::Function) -> Result<(), JsValue> {
        let studio = &self.studio;
        studio.end_split_drag(DragEnd::Teardown);
        studio.session.borrow_mut().splitter_mut().begin(x);

        let target: web_sys::EventTarget = document()?.into();
        let mut guard = ListenerGuard::new(target);
        let weak = Rc::downgrade(studio);
        guard.listen("mousemove", move |event: MouseEvent| {
            let Some(studio) = weak.upgrade() else {
                return;
            };
            let ratio = studio
                .session
                .borrow_mut()
                .splitter_mut()
                .drag_to(f64::from(event.client_x()), viewport_width());
            let Some(ratio) = ratio else {
                return;
            };
            if let Err(err) = on_change.call1(&JsValue::NULL, &ratio.percent().into()) {
                log::error!("split callback threw: {}", js_message(&err));
            }
        })?;
        let weak = Rc::downgrade(studio);
        guard.listen("mouseup", move |_: MouseEvent| {
            if let Some(studio) = weak.upgrade() {
                studio.end_split_drag(DragEnd::PointerUp);
            }
        })?;
        *studio.split_drag.borrow_mut() = Some(guard);
        Ok(())
    }

    // ─── Generate / share / export ───────────────────────────────────────

    pub fn is_generating(&self) -> bool {
        self.studio.session.borrow().is_generating()
    }

    /// Ask the AI endpoint for a diagram. Resolves to `true` if the document
    /// was replaced.
    pub fn generate(&self, prompt: String) -> js_sys::Promise {
        let studio = Rc::clone(&self.studio);
        future_to_promise(async move {
            let begun = studio.session.borrow_mut().begin_generate(&prompt);
            let applied = match begun {
                Ok(request) => {
                    // lets the page show its busy state
                    studio.notify();
                    let result = match studio.generator() {
                        Ok(generator) => generator.generate(&request).await,
                        Err(err) => Err(err),
                    };
                    studio
                        .session
                        .borrow_mut()
                        .finish_generate(result, now_ms())
                }
                Err(_) => false,
            };
            studio.arm();
            studio.notify();
            Ok(JsValue::from_bool(applied))
        })
    }

    /// Copy the source text to the clipboard.
    pub fn share(&self) -> js_sys::Promise {
        let studio = Rc::clone(&self.studio);
        future_to_promise(async move {
            let text = studio.session.borrow().text().to_string();
            let result = NavigatorClipboard.write_text(&text).await;
            let copied = studio.session.borrow_mut().finish_share(result);
            studio.notify();
            Ok(JsValue::from_bool(copied))
        })
    }

    /// Download the inline preview as `mermaid-diagram.svg`.
    pub fn download_svg(&self) -> Result<bool, JsValue> {
        let export = self.studio.session.borrow_mut().export_svg();
        let Some(export) = export else {
            self.studio.notify();
            return Ok(false);
        };
        save_file(&export)?;
        log::info!(
            "export: {} ({} bytes)",
            export.file_name,
            export.contents.len()
        );
        Ok(true)
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns JSON:
    /// `{"action":"<action_name>","surface":"...","view":{...}}` or
    /// `{"action":"none"}`.
    pub fn handle_key(
        &self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Result<String, JsValue> {
        let action = self
            .studio
            .session
            .borrow_mut()
            .handle_key(key, ctrl, shift, alt, meta, now_ms());
        let Some(action) = action else {
            return Ok(r#"{"action":"none"}"#.to_string());
        };
        match action {
            ShortcutAction::ExportSvg => {
                self.download_svg()?;
            }
            ShortcutAction::CloseFullScreen => self.studio.paint(Surface::FullScreen),
            _ => {}
        }
        self.studio.arm();
        Ok(key_json(action, &self.studio.session.borrow()))
    }

    /// Queued notifications as a JSON array, oldest first. Clears the queue.
    pub fn drain_notifications_json(&self) -> String {
        let notifications = self.studio.session.borrow_mut().drain_notifications();
        serde_json::to_string(&notifications).unwrap_or_else(|_| "[]".to_string())
    }
}

impl MermaidStudio {
    fn with_view(
        &self,
        surface: &str,
        apply: impl FnOnce(&mut ViewportController) -> bool,
    ) -> Result<String, JsValue> {
        let surface = parse_surface(surface)
            .ok_or_else(|| js_error(format!("unknown surface '{surface}'")))?;
        let mut session = self.studio.session.borrow_mut();
        let view = session.viewport_mut(surface);
        let changed = apply(&mut *view);
        Ok(view_json(view, changed).to_string())
    }
}

// ─── Standalone functions ────────────────────────────────────────────────

/// Flowchart direction declared by `source`'s header, if any.
#[wasm_bindgen]
pub fn detect_direction(source: &str) -> Option<String> {
    mmd_core::detect_direction(source).map(|d| d.to_string())
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Best-effort text of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn save_file(export: &SvgExport) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(&export.contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(export.mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let anchor: web_sys::HtmlAnchorElement = document()?.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(export.file_name);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)
}

fn parse_surface(name: &str) -> Option<Surface> {
    match name {
        "inline" => Some(Surface::Inline),
        "fullScreen" | "full-screen" => Some(Surface::FullScreen),
        _ => None,
    }
}

fn view_json(view: &ViewportController, changed: bool) -> serde_json::Value {
    let state = view.state();
    json!({
        "changed": changed,
        "zoom": state.zoom(),
        "panX": state.pan().x,
        "panY": state.pan().y,
        "transform": view.css_transform(),
        "transformOrigin": "0 0",
        "transition": view.transition(),
        "cursor": view.cursor(),
    })
}

fn key_json(action: ShortcutAction, session: &EditorSession) -> String {
    let surface = session.active_surface();
    json!({
        "action": action.name(),
        "surface": surface,
        "view": view_json(session.viewport(surface), false),
        "canUndo": session.document().can_undo(),
        "canRedo": session.document().can_redo(),
    })
    .to_string()
}

fn state_json(session: &EditorSession) -> String {
    let history = session.document().history();
    json!({
        "title": session.title(),
        "theme": session.theme(),
        "direction": session.direction(),
        "canUndo": session.document().can_undo(),
        "canRedo": session.document().can_redo(),
        "historyIndex": history.index(),
        "historyLength": history.len(),
        "lineCount": session.document().line_count(),
        "isGenerating": session.is_generating(),
        "fullScreenOpen": session.is_full_screen_open(),
        "splitPercent": session.splitter().ratio().percent(),
    })
    .to_string()
}
