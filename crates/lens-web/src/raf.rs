use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use lens_engine::{FrameCallback, FrameId, FrameScheduler};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type Slot = RefCell<Option<FrameCallback>>;

/// [`FrameScheduler`] backed by `window.requestAnimationFrame`.
///
/// Each request parks its callback in a slot owned by the JS closure.
/// Cancelling empties the slot, so a cancelled frame releases the engine
/// state it captured even though the browser keeps the (now empty) closure.
pub struct RafScheduler {
    window: web_sys::Window,
    slots: RefCell<HashMap<i32, Weak<Slot>>>,
}

impl RafScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            slots: RefCell::new(HashMap::new()),
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId> {
        let slot: Rc<Slot> = Rc::new(RefCell::new(Some(callback)));
        let parked = Rc::clone(&slot);
        // Freed by wasm-bindgen after its single invocation.
        let js = Closure::once_into_js(move |timestamp: f64| {
            let callback = parked.borrow_mut().take();
            if let Some(callback) = callback {
                callback(timestamp);
            }
        });

        match self.window.request_animation_frame(js.unchecked_ref()) {
            Ok(id) => {
                let mut slots = self.slots.borrow_mut();
                slots.retain(|_, slot| slot.strong_count() > 0);
                slots.insert(id, Rc::downgrade(&slot));
                Some(FrameId(id))
            }
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {:?}", err);
                None
            }
        }
    }

    fn cancel_frame(&self, id: FrameId) {
        if let Err(err) = self.window.cancel_animation_frame(id.0) {
            log::debug!("cancelAnimationFrame({}) failed: {:?}", id.0, err);
        }
        let slot = self.slots.borrow_mut().remove(&id.0).and_then(|slot| slot.upgrade());
        if let Some(slot) = slot {
            let dropped = slot.borrow_mut().take();
            drop(dropped);
        }
    }
}
