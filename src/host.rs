//! Browser shell around [`AnimatedSurface`]: owns the container, the
//! observer, the frame loop and the window listeners, and carries out the
//! [`Directives`] the surface returns.

use crate::constants::{POINTER_EVENT, RESIZE_EVENT};
use crate::dom::{self, EventListener};
use crate::frame::FrameLoop;
use crate::input;
use crate::observer::VisibilityObserver;
use crate::render::GpuContext;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use surface_core::{
    surface_size, AcquireRequest, AnimatedSurface, ConfigError, ConfigPatch, Directives, EffectKind,
    HostPhase, RenderContext, SurfaceSize,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type Shared = Rc<RefCell<HostInner>>;

struct HostInner {
    surface: AnimatedSurface<GpuContext>,
    container: Option<web::HtmlElement>,
    observer: Option<VisibilityObserver>,
    frames: Option<FrameLoop>,
    resize_frames: Option<FrameLoop>,
    listeners: Vec<EventListener>,
}

impl HostInner {
    fn measure(&self) -> Option<SurfaceSize> {
        let container = self.container.as_ref()?;
        let (css_w, css_h) = dom::css_size(container);
        let policy = self.surface.policy();
        Some(surface_size(
            css_w,
            css_h,
            dom::device_pixel_ratio(),
            policy.dpr_cap,
            policy.pixel_scale,
        ))
    }

    fn resize(&mut self) {
        if let Some(size) = self.measure() {
            self.surface.resize(size);
        }
    }

    /// Drop every browser hook. Frame closures stay alive until the host is
    /// dropped since this can run from inside one of them.
    fn shutdown(&mut self) {
        if let Some(frames) = self.frames.as_mut() {
            frames.cancel();
        }
        if let Some(frames) = self.resize_frames.as_mut() {
            frames.cancel();
        }
        self.observer = None;
        self.listeners.clear();
    }
}

impl Drop for HostInner {
    fn drop(&mut self) {
        self.surface.teardown();
    }
}

/// One mounted background. Cloning shares the same surface.
#[derive(Clone)]
pub struct SurfaceHost {
    inner: Shared,
}

impl SurfaceHost {
    pub fn new(kind: EffectKind, patch: &ConfigPatch) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HostInner {
                surface: AnimatedSurface::from_patch(kind, patch),
                container: None,
                observer: None,
                frames: None,
                resize_frames: None,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.inner.borrow().surface.kind()
    }

    /// Start observing `container`. A second call is a no-op.
    pub fn attach(&self, container: web::HtmlElement) {
        let weak = Rc::downgrade(&self.inner);
        let observed = {
            let mut h = self.inner.borrow_mut();
            if !h.surface.attach() {
                return;
            }
            h.container = Some(container.clone());
            h.frames = Some(FrameLoop::new({
                let weak = weak.clone();
                move |ts| on_frame(&weak, ts)
            }));
            h.resize_frames = Some(FrameLoop::new({
                let weak = weak.clone();
                move |_| on_resize_frame(&weak)
            }));
            h.listeners = wire_listeners(&weak, &container);
            h.resize();
            let threshold = h.surface.policy().visibility_threshold;
            match VisibilityObserver::observe(&container, threshold, {
                let weak = weak.clone();
                move |visible| on_visibility(&weak, visible)
            }) {
                Ok(observer) => {
                    h.observer = Some(observer);
                    true
                }
                Err(e) => {
                    log::warn!("[surface] no IntersectionObserver ({}); treating as visible", e);
                    false
                }
            }
        };
        log::info!("[surface] {} attached", self.kind());
        if !observed {
            on_visibility(&weak, true);
        }
    }

    /// Re-measure the container now.
    pub fn resize(&self) {
        self.inner.borrow_mut().resize();
    }

    pub fn set_config(&self, patch: &ConfigPatch) -> Vec<ConfigError> {
        let mut h = self.inner.borrow_mut();
        let issues = h.surface.set_config(patch);
        h.resize();
        issues
    }

    pub fn teardown(&self) {
        let directives = self.inner.borrow_mut().surface.teardown();
        apply(&self.inner, directives);
    }

    pub fn draw_calls(&self) -> u64 {
        self.inner.borrow().surface.stats().draw_calls
    }

    /// True while a context exists and the surface can still render.
    pub fn is_active(&self) -> bool {
        let h = self.inner.borrow();
        h.surface.phase() == HostPhase::Mounted && h.surface.has_context()
    }

    pub fn phase(&self) -> HostPhase {
        self.inner.borrow().surface.phase()
    }

    /// True while this host owns `element`, including after it gave up rendering.
    pub fn is_attached_to(&self, element: &web::Element) -> bool {
        let h = self.inner.borrow();
        let node: &web::Node = element;
        h.surface.phase().occupies_container()
            && h.container
                .as_ref()
                .is_some_and(|c| c.is_same_node(Some(node)))
    }
}

fn wire_listeners(weak: &Weak<RefCell<HostInner>>, container: &web::HtmlElement) -> Vec<EventListener> {
    let Some(window) = web::window() else {
        return Vec::new();
    };
    let mut listeners = Vec::with_capacity(2);
    let on_resize = {
        let weak = weak.clone();
        move |_: web::Event| {
            if let Some(inner) = weak.upgrade() {
                if let Some(frames) = inner.borrow_mut().resize_frames.as_mut() {
                    frames.request();
                }
            }
        }
    };
    let on_pointer = {
        let weak = weak.clone();
        let container: web::Element = container.clone().into();
        move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            if let Some(inner) = weak.upgrade() {
                inner
                    .borrow_mut()
                    .surface
                    .set_pointer(input::pointer_uv(ev, &container));
            }
        }
    };
    for result in [
        EventListener::new(&window, RESIZE_EVENT, on_resize),
        EventListener::new(&window, POINTER_EVENT, on_pointer),
    ] {
        match result {
            Ok(listener) => listeners.push(listener),
            Err(e) => log::warn!("[surface] listener not installed: {}", e),
        }
    }
    listeners
}

fn on_visibility(weak: &Weak<RefCell<HostInner>>, visible: bool) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let directives = inner.borrow_mut().surface.set_visibility(visible);
    apply(&inner, directives);
}

fn on_frame(weak: &Weak<RefCell<HostInner>>, ts: f64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let directives = {
        let mut h = inner.borrow_mut();
        if let Some(frames) = h.frames.as_mut() {
            frames.fired();
        }
        h.surface.tick(ts).1
    };
    apply(&inner, directives);
}

fn on_resize_frame(weak: &Weak<RefCell<HostInner>>) {
    if let Some(inner) = weak.upgrade() {
        let mut h = inner.borrow_mut();
        if let Some(frames) = h.resize_frames.as_mut() {
            frames.fired();
        }
        h.resize();
    }
}

fn apply(inner: &Shared, directives: Directives) {
    let Directives {
        acquire,
        request_frame,
        cancel_frame,
        shutdown,
    } = directives;
    let pending = {
        let mut h = inner.borrow_mut();
        if let Some(frames) = h.frames.as_mut() {
            if cancel_frame {
                frames.cancel();
            }
            if request_frame {
                frames.request();
            }
        }
        if shutdown {
            h.shutdown();
        }
        acquire.zip(h.container.clone()).map(|(request, container)| {
            let class_name = h.surface.config().class_name.clone();
            (request, container, class_name)
        })
    };
    if let Some((request, container, class_name)) = pending {
        spawn_acquire(Rc::downgrade(inner), container, class_name, request);
    }
}

fn spawn_acquire(
    weak: Weak<RefCell<HostInner>>,
    container: web::HtmlElement,
    class_name: String,
    request: AcquireRequest,
) {
    spawn_local(async move {
        let result = GpuContext::acquire(&container, &class_name, &request).await;
        let Some(inner) = weak.upgrade() else {
            if let Ok(ctx) = result {
                ctx.release();
            }
            return;
        };
        let directives = inner
            .borrow_mut()
            .surface
            .on_context_ready(request.ticket, result);
        apply(&inner, directives);
    });
}
