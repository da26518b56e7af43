use std::cell::RefCell;
use std::rc::Rc;
use lens_engine::{BackdropDrift, Position, PositionSink};
use wasm_bindgen::JsValue;
use web_sys::{CssStyleDeclaration, HtmlElement};

/// Attribute flipped when a sweep hands over to tracking, for CSS selectors.
pub const PHASE_ATTRIBUTE: &str = "data-lens-phase";

fn set_var(style: &CssStyleDeclaration, name: &str, value: &str) {
    if let Err(err) = style.set_property(name, value) {
        log::debug!("failed to set {}: {:?}", name, err);
    }
}

/// Writes the position as percentage custom properties on an element.
pub struct CssVarSink {
    element: HtmlElement,
    x_var: &'static str,
    y_var: &'static str,
    on_sweep_complete: Option<js_sys::Function>,
}

impl CssVarSink {
    pub fn new(element: HtmlElement, x_var: &'static str, y_var: &'static str) -> Self {
        Self {
            element,
            x_var,
            y_var,
            on_sweep_complete: None,
        }
    }

    /// Call `callback` once when the intro sweep finishes.
    pub fn with_sweep_callback(mut self, callback: Option<js_sys::Function>) -> Self {
        self.on_sweep_complete = callback;
        self
    }

    /// Write a position immediately, outside the frame loop.
    pub fn write(&self, position: Position) {
        let (x, y) = position.to_percent();
        let style = self.element.style();
        set_var(&style, self.x_var, &format!("{}%", x));
        set_var(&style, self.y_var, &format!("{}%", y));
    }
}

impl PositionSink for CssVarSink {
    fn on_update(&mut self, position: Position) {
        self.write(position);
    }

    fn on_sweep_complete(&mut self) {
        if let Err(err) = self.element.set_attribute(PHASE_ATTRIBUTE, "tracking") {
            log::debug!("failed to set {}: {:?}", PHASE_ATTRIBUTE, err);
        }
        if let Some(callback) = &self.on_sweep_complete {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                log::warn!("sweep completion callback threw: {:?}", err);
            }
        }
    }
}

/// Cursor glow plus scroll parallax and noise drift for a page backdrop.
pub struct BackdropSink {
    cursor: CssVarSink,
    drift: Rc<RefCell<BackdropDrift>>,
}

impl BackdropSink {
    pub fn new(element: HtmlElement, drift: Rc<RefCell<BackdropDrift>>) -> Self {
        Self {
            cursor: CssVarSink::new(element, "--bg-cursor-x", "--bg-cursor-y"),
            drift,
        }
    }

    fn write_drift(&self) {
        let drift = self.drift.borrow();
        let style = self.cursor.element.style();
        set_var(&style, "--bg-scroll", &format!("{}px", drift.scroll_offset()));
        set_var(&style, "--bg-noise-x", &format!("{}px", drift.noise_offset()));
    }
}

impl PositionSink for BackdropSink {
    fn on_update(&mut self, position: Position) {
        self.drift.borrow_mut().advance();
        self.cursor.write(position);
        self.write_drift();
    }
}
