//! Leptos Gesture Utilities
//!
//! Pointer drag and resize sessions for Leptos using mouse events.
//! A session owns its window listeners and detaches them when the pointer
//! is released, when it is cancelled, or when it is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// What the pointer is doing to the element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    /// Moving the element's top-left corner
    Drag,
    /// Moving the element's bottom-right corner
    Resize,
}

/// Pointer position in client (viewport) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerSample {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

impl From<&web_sys::MouseEvent> for PointerSample {
    fn from(ev: &web_sys::MouseEvent) -> Self {
        Self::new(ev.client_x() as f64, ev.client_y() as f64)
    }
}

/// Axis-aligned rectangle in client coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn from_rect(rect: &web_sys::DomRect) -> Self {
        Self::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    /// Bounding rectangle of an element's parent, if it has one
    pub fn of_parent(el: &web_sys::Element) -> Option<Self> {
        el.parent_element()
            .map(|parent| Self::from_rect(&parent.get_bounding_client_rect()))
    }
}

/// Inclusive `[min, max]` range for one extent
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtentRange {
    pub min: f64,
    pub max: f64,
}

impl ExtentRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Top-left corner for a dragged footprint.
///
/// `grab_offset` is where the pointer grabbed the element, relative to the
/// element's own top-left corner. The result keeps the whole footprint
/// inside `container`; a footprint larger than the container pins to 0.
pub fn clamp_origin(
    pointer: PointerSample,
    grab_offset: (f64, f64),
    container: Bounds,
    footprint: (f64, f64),
) -> (f64, f64) {
    let x = (pointer.client_x - container.left - grab_offset.0)
        .min(container.width - footprint.0)
        .max(0.0);
    let y = (pointer.client_y - container.top - grab_offset.1)
        .min(container.height - footprint.1)
        .max(0.0);
    (x, y)
}

/// Width and height for a footprint whose bottom-right corner follows the pointer.
///
/// `origin` is the footprint's top-left corner relative to `container`.
pub fn resize_extent(
    pointer: PointerSample,
    origin: (f64, f64),
    container: Bounds,
    width: ExtentRange,
    height: ExtentRange,
) -> (f64, f64) {
    (
        width.clamp(pointer.client_x - origin.0 - container.left),
        height.clamp(pointer.client_y - origin.1 - container.top),
    )
}

/// Tags that keep their own pointer behaviour and must not start a gesture
const INTERACTIVE_TAGS: &[&str] = &["input", "button", "textarea", "label", "svg", "path", "select"];

/// True when the event originated on a control (or inside a button).
pub fn is_interactive_target(ev: &web_sys::Event) -> bool {
    let Some(el) = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
        return false;
    };
    let tag = el.tag_name().to_ascii_lowercase();
    if INTERACTIVE_TAGS.contains(&tag.as_str()) {
        return true;
    }
    matches!(el.closest("button"), Ok(Some(_)))
}

/// Reactive view of the active gesture, for cursor and z-index styling
#[derive(Clone, Copy)]
pub struct GestureSignals {
    pub active_read: ReadSignal<Option<GestureKind>>,
    pub active_write: WriteSignal<Option<GestureKind>>,
}

pub fn create_gesture_signals() -> GestureSignals {
    let (active_read, active_write) = signal(None::<GestureKind>);
    GestureSignals { active_read, active_write }
}

type ListenerList = Rc<RefCell<Vec<(&'static str, js_sys::Function)>>>;

fn detach(listeners: &ListenerList) {
    let drained: Vec<_> = listeners.borrow_mut().drain(..).collect();
    if let Some(win) = web_sys::window() {
        for (name, callback) in drained {
            let _ = win.remove_event_listener_with_callback(name, &callback);
        }
    }
}

/// One pointer gesture, from mousedown to mouseup.
///
/// Window-level `mousemove`/`mouseup` listeners are attached on start.
/// The closures live as long as the session; their JS listeners are removed
/// on release, on [`GestureSession::cancel`], or on drop.
pub struct GestureSession {
    signals: GestureSignals,
    listeners: ListenerList,
    _on_move: Closure<dyn FnMut(web_sys::MouseEvent)>,
    _on_up: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl GestureSession {
    /// Attach listeners and mark the gesture active.
    ///
    /// `on_move` runs for every pointer move; `on_end` runs once on release.
    pub fn start<M, E>(kind: GestureKind, signals: GestureSignals, mut on_move: M, on_end: E) -> Self
    where
        M: FnMut(PointerSample) + 'static,
        E: FnOnce() + 'static,
    {
        let listeners: ListenerList = Rc::new(RefCell::new(Vec::new()));

        let on_move = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
            on_move(PointerSample::from(&ev));
        });

        let up_listeners = listeners.clone();
        let mut on_end = Some(on_end);
        let on_up = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
            // A closure cannot free itself mid-call; only the JS side is detached here.
            detach(&up_listeners);
            signals.active_write.set(None);
            if let Some(end) = on_end.take() {
                end();
            }
        });

        if let Some(win) = web_sys::window() {
            let move_fn: js_sys::Function = on_move.as_ref().unchecked_ref::<js_sys::Function>().clone();
            let up_fn: js_sys::Function = on_up.as_ref().unchecked_ref::<js_sys::Function>().clone();
            let _ = win.add_event_listener_with_callback("mousemove", &move_fn);
            let _ = win.add_event_listener_with_callback("mouseup", &up_fn);
            let mut registered = listeners.borrow_mut();
            registered.push(("mousemove", move_fn));
            registered.push(("mouseup", up_fn));
        }

        signals.active_write.set(Some(kind));

        Self {
            signals,
            listeners,
            _on_move: on_move,
            _on_up: on_up,
        }
    }

    /// Still receiving pointer events
    pub fn is_live(&self) -> bool {
        !self.listeners.borrow().is_empty()
    }

    /// Stop listening without running `on_end`
    pub fn cancel(&self) {
        if self.is_live() {
            detach(&self.listeners);
            self.signals.active_write.set(None);
        }
    }
}

impl Drop for GestureSession {
    fn drop(&mut self) {
        detach(&self.listeners);
    }
}

/// Holder for at most one session per element.
///
/// Starting a new gesture drops the previous (already released) session.
#[derive(Clone, Default)]
pub struct GestureSlot(Rc<RefCell<Option<GestureSession>>>);

impl GestureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin<M, E>(&self, kind: GestureKind, signals: GestureSignals, on_move: M, on_end: E)
    where
        M: FnMut(PointerSample) + 'static,
        E: FnOnce() + 'static,
    {
        let previous = self.0.borrow_mut().take();
        if let Some(previous) = previous {
            previous.cancel();
        }
        let session = GestureSession::start(kind, signals, on_move, on_end);
        *self.0.borrow_mut() = Some(session);
    }

    /// Tear down whatever session is held, e.g. on component cleanup
    pub fn clear(&self) {
        let session = self.0.borrow_mut().take();
        if let Some(session) = session {
            session.cancel();
        }
    }
}
