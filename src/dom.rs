//! Scoped DOM resources: the effect canvas and event listeners are guards
//! that undo themselves on drop.

use crate::constants::{CANVAS_CLASS, CANVAS_STYLE, INITIAL_CANVAS_PX};
use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn device_pixel_ratio() -> f32 {
    web::window().map_or(1.0, |w| w.device_pixel_ratio() as f32)
}

/// CSS pixel size of `element`'s border box.
pub fn css_size(element: &web::Element) -> (f32, f32) {
    let rect = element.get_bounding_client_rect();
    (rect.width() as f32, rect.height() as f32)
}

/// A detached, absolutely positioned canvas ready to be handed to the GPU.
pub fn create_canvas(class_name: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow!("{:?}", e))?;
    let style = canvas.style();
    for (property, value) in CANVAS_STYLE {
        style
            .set_property(property, value)
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    let classes = canvas.class_list();
    classes.add_1(CANVAS_CLASS).map_err(|e| anyhow!("{:?}", e))?;
    for extra in class_name.split_whitespace() {
        classes.add_1(extra).map_err(|e| anyhow!("{:?}", e))?;
    }
    canvas.set_width(INITIAL_CANVAS_PX);
    canvas.set_height(INITIAL_CANVAS_PX);
    Ok(canvas)
}

/// A canvas appended to a container; removed again when dropped.
pub struct AttachedCanvas {
    canvas: web::HtmlCanvasElement,
}

impl AttachedCanvas {
    pub fn append(container: &web::Element, canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        container
            .append_child(&canvas)
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(Self { canvas })
    }

    pub fn element(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }
}

impl Drop for AttachedCanvas {
    fn drop(&mut self) {
        // Tolerates a canvas the page already removed.
        self.canvas.remove();
    }
}

/// Force the browser to drop any WebGL context still bound to `canvas`.
pub fn lose_webgl_context(canvas: &web::HtmlCanvasElement) {
    let Ok(Some(ctx)) = canvas.get_context("webgl2") else {
        return;
    };
    let Ok(gl) = ctx.dyn_into::<web::WebGl2RenderingContext>() else {
        return;
    };
    if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
        ext.unchecked_into::<web::WebglLoseContext>().lose_context();
    }
}

/// An event listener that is removed from its target on drop.
pub struct EventListener {
    target: web::EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
