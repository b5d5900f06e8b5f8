use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use image::RgbaImage;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::collab::ProjectPatch;
use crate::commands::Command;
use crate::config::EditorConfig;
use crate::engine::Editor;
use crate::error::{EditorError, Result};
use crate::hotkeys::KeyEvent;
use crate::image_ops::{add_image, short_src, ImageLoader};
use crate::logging;
use crate::objects::ObjectBody;

type Elements = Rc<RefCell<HashMap<String, HtmlImageElement>>>;

#[derive(Default)]
struct Outbox {
    patches: Vec<ProjectPatch>,
    selection_cleared: usize,
}

#[derive(Default)]
struct HostCallbacks {
    save: Option<js_sys::Function>,
    selection_cleared: Option<js_sys::Function>,
}

#[wasm_bindgen]
pub struct EditorHandle {
    editor: Rc<RefCell<Editor>>,
    elements: Elements,
    outbox: Rc<RefCell<Outbox>>,
    callbacks: Rc<RefCell<HostCallbacks>>,
}

fn respond(result: Result<Value>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn flush(outbox: &RefCell<Outbox>, callbacks: &RefCell<HostCallbacks>) {
    let Outbox { patches, selection_cleared } = std::mem::take(&mut *outbox.borrow_mut());
    let callbacks = callbacks.borrow();
    if let Some(save) = &callbacks.save {
        for patch in &patches {
            match serde_wasm_bindgen::to_value(patch) {
                Ok(value) => {
                    if let Err(err) = save.call1(&JsValue::NULL, &value) {
                        tracing::warn!(?err, "save listener threw");
                    }
                }
                Err(err) => tracing::error!(%err, "project patch not convertible"),
            }
        }
    }
    if let Some(cleared) = &callbacks.selection_cleared {
        for _ in 0..selection_cleared {
            if let Err(err) = cleared.call0(&JsValue::NULL) {
                tracing::warn!(?err, "selection listener threw");
            }
        }
    }
}

#[wasm_bindgen]
impl EditorHandle {
    /// `config_json` may be empty for defaults. `initial_state` is a saved
    /// document; an unreadable one falls back to a blank workspace.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, initial_state: Option<String>) -> std::result::Result<EditorHandle, JsValue> {
        console_error_panic_hook::set_once();
        logging::init(None);

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(|err| JsValue::from_str(&err.to_string()))?
        };
        let mut editor = match initial_state.as_deref() {
            Some(json) if !json.trim().is_empty() => Editor::with_state(config, json),
            _ => Editor::new(config),
        };

        let outbox = Rc::new(RefCell::new(Outbox::default()));
        {
            let outbox = Rc::clone(&outbox);
            editor.set_save_listener(move |patch| outbox.borrow_mut().patches.push(patch.clone()));
        }
        {
            let outbox = Rc::clone(&outbox);
            editor.set_selection_cleared_listener(move || outbox.borrow_mut().selection_cleared += 1);
        }

        Ok(EditorHandle {
            editor: Rc::new(RefCell::new(editor)),
            elements: Rc::new(RefCell::new(HashMap::new())),
            outbox,
            callbacks: Rc::new(RefCell::new(HostCallbacks::default())),
        })
    }

    /// Runs one `{ "action": ..., "params": ... }` command and returns its
    /// JSON output, or `{ "error": ... }`.
    pub fn execute_command(&self, cmd_json: &str) -> String {
        let result = Command::parse(cmd_json).and_then(|command| self.editor.borrow_mut().execute(command));
        flush(&self.outbox, &self.callbacks);
        respond(result)
    }

    /// Returns `null` for unbound keys.
    pub fn handle_key(&self, event_json: &str) -> String {
        let result = serde_json::from_str::<KeyEvent>(event_json)
            .map_err(EditorError::from)
            .and_then(|event| self.editor.borrow_mut().handle_key(&event))
            .map(|output| output.unwrap_or(Value::Null));
        flush(&self.outbox, &self.callbacks);
        respond(result)
    }

    /// Loads `src` and inserts it as an image. Resolves with the new id.
    pub fn add_image(&self, src: String) -> js_sys::Promise {
        let editor = Rc::clone(&self.editor);
        let outbox = Rc::clone(&self.outbox);
        let callbacks = Rc::clone(&self.callbacks);
        let loader = HtmlImageLoader { elements: Rc::clone(&self.elements) };
        future_to_promise(async move {
            let result = add_image(&editor, &loader, &src).await;
            flush(&outbox, &callbacks);
            result
                .map(|key| JsValue::from_f64(key.to_raw() as f64))
                .map_err(|err| JsValue::from_str(&err.to_string()))
        })
    }

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        self.request_missing_elements();
        self.editor.borrow().render(ctx, &self.elements.borrow());
    }

    pub fn set_save_listener(&self, callback: Option<js_sys::Function>) {
        self.callbacks.borrow_mut().save = callback;
    }

    pub fn set_selection_cleared_listener(&self, callback: Option<js_sys::Function>) {
        self.callbacks.borrow_mut().selection_cleared = callback;
    }

    pub fn can_undo(&self) -> bool {
        self.editor.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.borrow().can_redo()
    }

    /// Aborts in-flight loads and drops every host callback.
    pub fn teardown(&self) {
        self.editor.borrow_mut().teardown();
        *self.callbacks.borrow_mut() = HostCallbacks::default();
        *self.outbox.borrow_mut() = Outbox::default();
    }
}

impl EditorHandle {
    /// Images restored from a document carry pixels but no element to draw
    /// with. Start one for each; it shows up on a later frame.
    fn request_missing_elements(&self) {
        let editor = self.editor.borrow();
        let mut elements = self.elements.borrow_mut();
        for (_, obj) in editor.scene().ordered() {
            let ObjectBody::Image(image) = &obj.body else {
                continue;
            };
            if elements.contains_key(&image.src) {
                continue;
            }
            if let Ok(element) = HtmlImageElement::new() {
                element.set_cross_origin(Some("anonymous"));
                element.set_src(&image.src);
                elements.insert(image.src.clone(), element);
            }
        }
    }
}

/// Loads through an `<img>` element and reads the pixels back through a
/// scratch canvas. The element is kept for drawing.
pub struct HtmlImageLoader {
    elements: Elements,
}

impl ImageLoader for HtmlImageLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, Result<RgbaImage>> {
        let src = src.to_string();
        let elements = Rc::clone(&self.elements);
        async move {
            let element = load_element(&src).await?;
            let pixels = read_pixels(&element, &src)?;
            elements.borrow_mut().insert(src, element);
            Ok(pixels)
        }
        .boxed_local()
    }
}

fn load_failure(src: &str, reason: impl Into<String>) -> EditorError {
    EditorError::ImageLoad { src: short_src(src), reason: reason.into() }
}

/// Detaches the element's handlers when the load settles or is aborted.
struct PendingLoad {
    element: HtmlImageElement,
    on_load: Closure<dyn FnMut()>,
    on_error: Closure<dyn FnMut()>,
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}

async fn load_element(src: &str) -> Result<HtmlImageElement> {
    let element = HtmlImageElement::new().map_err(|err| load_failure(src, format!("{err:?}")))?;
    element.set_cross_origin(Some("anonymous"));

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let settle = |loaded: bool| {
        let tx = Rc::clone(&tx);
        Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(loaded);
            }
        })
    };
    let pending = PendingLoad { element: element.clone(), on_load: settle(true), on_error: settle(false) };
    element.set_onload(Some(pending.on_load.as_ref().unchecked_ref()));
    element.set_onerror(Some(pending.on_error.as_ref().unchecked_ref()));
    element.set_src(src);

    let outcome = rx.await;
    drop(pending);
    match outcome {
        Ok(true) => Ok(element),
        Ok(false) => Err(load_failure(src, "network or decode error")),
        Err(oneshot::Canceled) => Err(load_failure(src, "load abandoned")),
    }
}

fn read_pixels(element: &HtmlImageElement, src: &str) -> Result<RgbaImage> {
    let fail = |err: JsValue| load_failure(src, format!("{err:?}"));
    let (width, height) = (element.natural_width(), element.natural_height());

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| load_failure(src, "no document"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(fail)?
        .dyn_into()
        .map_err(|_| load_failure(src, "not a canvas"))?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(fail)?
        .ok_or_else(|| load_failure(src, "no 2d context"))?
        .dyn_into()
        .map_err(|_| load_failure(src, "not a 2d context"))?;

    ctx.draw_image_with_html_image_element(element, 0.0, 0.0).map_err(fail)?;
    let data = ctx.get_image_data(0.0, 0.0, f64::from(width), f64::from(height)).map_err(fail)?;
    RgbaImage::from_raw(width, height, data.data().0).ok_or_else(|| load_failure(src, "pixel buffer size mismatch"))
}
