//! `navigator.clipboard.writeText`.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use js_sys::{Function, Promise, Reflect};
use mmd_editor::share::{ClipboardError, ClipboardWriter};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::js_message;

pub struct NavigatorClipboard;

fn start_write(text: &str) -> Result<Promise, JsValue> {
    let navigator = Reflect::get(&js_sys::global(), &"navigator".into())?;
    let clipboard = Reflect::get(&navigator, &"clipboard".into())?;
    if clipboard.is_undefined() {
        return Err(JsValue::from_str("clipboard API unavailable"));
    }
    let write: Function = Reflect::get(&clipboard, &"writeText".into())?.dyn_into()?;
    write.call1(&clipboard, &text.into())?.dyn_into::<Promise>()
}

impl ClipboardWriter for NavigatorClipboard {
    fn write_text<'a>(&'a self, text: &'a str) -> LocalBoxFuture<'a, Result<(), ClipboardError>> {
        async move {
            let promise = start_write(text).map_err(|e| ClipboardError(js_message(&e)))?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| ClipboardError(js_message(&e)))
        }
        .boxed_local()
    }
}
