use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// A DOM event listener that removes itself when detached or dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Option<Closure<dyn FnMut(Event)>>,
}

impl Listener {
    /// Register a passive listener for `kind` on `target`.
    pub fn passive(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure: Some(closure),
        })
    }

    pub fn detach(&mut self) {
        if let Some(closure) = self.closure.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Build a handler that forwards only pointer events, ignoring anything else
/// dispatched under the same name.
pub fn on_pointer(
    mut handler: impl FnMut(&web_sys::PointerEvent) + 'static,
) -> impl FnMut(Event) + 'static {
    move |event: Event| {
        if let Some(pointer) = event.dyn_ref::<web_sys::PointerEvent>() {
            handler(pointer);
        }
    }
}

