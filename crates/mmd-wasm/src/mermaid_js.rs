//! Renderer backed by the page's global `mermaid` object.
//!
//! The page loads mermaid.js itself; this module only calls
//! `mermaid.render(id, source)` and reads `svg` off the resolved value.
//! Theme is carried per call through the init directive rather than by
//! re-initialising the global instance.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use js_sys::{Function, Object, Promise, Reflect};
use mmd_render::{DiagramRenderer, RenderConfig, RenderError, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::js_message;

pub struct MermaidJs;

impl MermaidJs {
    /// `mermaid.initialize({ startOnLoad: false })`. Rendering is driven
    /// explicitly, never by mermaid scanning the page.
    pub fn initialize() -> Result<(), JsValue> {
        let mermaid = global_mermaid()?;
        let initialize: Function = Reflect::get(&mermaid, &"initialize".into())?.dyn_into()?;
        let options = Object::new();
        Reflect::set(&options, &"startOnLoad".into(), &JsValue::FALSE)?;
        initialize.call1(&mermaid, &options)?;
        Ok(())
    }
}

fn global_mermaid() -> Result<JsValue, JsValue> {
    let mermaid = Reflect::get(&js_sys::global(), &"mermaid".into())?;
    if mermaid.is_undefined() || mermaid.is_null() {
        return Err(JsValue::from_str("mermaid is not loaded"));
    }
    Ok(mermaid)
}

fn start_render(id: &str, source: &str) -> Result<Promise, JsValue> {
    let mermaid = global_mermaid()?;
    let render: Function = Reflect::get(&mermaid, &"render".into())?.dyn_into()?;
    render
        .call2(&mermaid, &id.into(), &source.into())?
        .dyn_into::<Promise>()
}

impl DiagramRenderer for MermaidJs {
    fn render<'a>(
        &'a self,
        surface: Surface,
        source: &'a str,
        config: &'a RenderConfig,
    ) -> LocalBoxFuture<'a, Result<String, RenderError>> {
        async move {
            let source = config.apply(source);
            let promise = start_render(surface.render_id(), &source)
                .map_err(|e| RenderError::Engine(js_message(&e)))?;
            // a rejected promise is mermaid's parse error
            let value = JsFuture::from(promise)
                .await
                .map_err(|e| RenderError::Syntax(js_message(&e)))?;
            Reflect::get(&value, &"svg".into())
                .ok()
                .and_then(|svg| svg.as_string())
                .ok_or_else(|| RenderError::Engine("mermaid.render resolved without svg".into()))
        }
        .boxed_local()
    }
}
