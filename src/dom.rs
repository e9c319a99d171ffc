use js_sys::Reflect;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Element, Event, EventTarget, Storage};

use crate::{
    card::CardRect,
    motion::Point,
    ticker::FrameScheduler,
    tracker::CursorMode,
};

pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

pub fn read_stored(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub fn cursor_mode() -> CursorMode {
    let Some(win) = window() else {
        return CursorMode::System;
    };

    let has_ontouchstart = Reflect::has(&win, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    CursorMode::detect(has_ontouchstart, win.navigator().max_touch_points())
}

/// Class on `<html>` that is removed again when dropped.
pub struct RootClass {
    root: Element,
    class: &'static str,
}

impl RootClass {
    pub fn add(class: &'static str) -> Option<Self> {
        let root = window()?.document()?.document_element()?;
        root.class_list().add_1(class).ok()?;
        Some(Self { root, class })
    }
}

impl Drop for RootClass {
    fn drop(&mut self) {
        let _ = self.root.class_list().remove_1(self.class);
    }
}

fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

pub fn viewport_center() -> Point {
    let (width, height) = viewport_size();
    Point::new(width / 2.0, height / 2.0)
}

pub fn bounding_rect(element: &Element) -> CardRect {
    let rect = element.get_bounding_client_rect();
    CardRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

pub fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Event listener that detaches itself when dropped.
pub struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event_type: &'static str, handler: F) -> Option<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .ok()?;

        Some(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref());
    }
}

type PendingFrame = Rc<RefCell<Option<Box<dyn FnOnce(f64)>>>>;

/// `requestAnimationFrame` behind [`FrameScheduler`].
///
/// A single long-lived closure is handed to the browser; it runs whichever
/// callback is queued when the frame fires.
pub struct AnimationFrames {
    queued: PendingFrame,
    request_id: Rc<Cell<Option<i32>>>,
    driver: Closure<dyn FnMut(f64)>,
}

impl AnimationFrames {
    pub fn new() -> Self {
        let queued: PendingFrame = Rc::new(RefCell::new(None));
        let request_id = Rc::new(Cell::new(None));

        let driver = {
            let queued = queued.clone();
            let request_id = request_id.clone();
            Closure::<dyn FnMut(f64)>::new(move |timestamp_ms: f64| {
                request_id.set(None);
                let callback = queued.borrow_mut().take();
                if let Some(callback) = callback {
                    callback(timestamp_ms);
                }
            })
        };

        Self {
            queued,
            request_id,
            driver,
        }
    }
}

impl Default for AnimationFrames {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        *self.queued.borrow_mut() = Some(callback);

        if self.request_id.get().is_some() {
            return;
        }

        if let Some(id) = window().and_then(|win| {
            win.request_animation_frame(self.driver.as_ref().unchecked_ref())
                .ok()
        }) {
            self.request_id.set(Some(id));
        }
    }

    fn cancel_pending(&self) {
        self.queued.borrow_mut().take();

        if let (Some(id), Some(win)) = (self.request_id.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
    }
}

impl Drop for AnimationFrames {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
