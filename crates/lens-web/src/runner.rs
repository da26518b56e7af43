use std::cell::RefCell;
use std::rc::{Rc, Weak};
use lens_engine::{
    BackdropDrift, Bounds, DriftConfig, FollowConfig, FollowHandle, FrameRecord,
    Phase, PointerEvent, PointerSample,
};
use wasm_bindgen::JsValue;
use web_sys::{EventTarget, HtmlElement, Window};
use crate::css::{BackdropSink, CssVarSink, PHASE_ATTRIBUTE};
use crate::listeners::{on_pointer, Listener};
use crate::media;
use crate::raf::RafScheduler;

/// Wires one follow engine to the DOM: frame loop, pointer listeners and
/// the CSS sink. Owned by the exported mount object; stopping or dropping
/// it tears everything down.
pub struct LensRunner {
    handle: Rc<FollowHandle>,
    listeners: Vec<Listener>,
}

impl LensRunner {
    /// Lens confined to `element`, tracking enter/move/down/leave on it.
    pub fn element_scoped(
        window: &Window,
        element: &HtmlElement,
        config: FollowConfig,
        on_sweep_complete: Option<js_sys::Function>,
    ) -> Result<Self, JsValue> {
        let sink = CssVarSink::new(element.clone(), "--mx", "--my")
            .with_sweep_callback(on_sweep_complete);
        sink.write(config.rest_position);

        let is_static = config.is_static();
        let initial_phase = if is_static {
            "static"
        } else if config.sweep.is_some() {
            "sweep"
        } else {
            "tracking"
        };
        element.set_attribute(PHASE_ATTRIBUTE, initial_phase)?;

        let scheduler = Rc::new(RafScheduler::new(window.clone()));
        let handle = Rc::new(lens_engine::start(config, sink, scheduler));

        let mut listeners = Vec::new();
        if !is_static {
            let target: &EventTarget = element.as_ref();
            let forwards: [(&'static str, fn(PointerSample) -> PointerEvent); 3] = [
                ("pointerenter", PointerEvent::Enter),
                ("pointermove", PointerEvent::Move),
                ("pointerdown", PointerEvent::Down),
            ];
            for (kind, to_event) in forwards {
                let handler = forward_pointer(element.clone(), Rc::downgrade(&handle), to_event);
                listeners.push(Listener::passive(target, kind, handler)?);
            }

            let weak = Rc::downgrade(&handle);
            listeners.push(Listener::passive(
                target,
                "pointerleave",
                on_pointer(move |_| {
                    if let Some(handle) = weak.upgrade() {
                        handle.handle_event(PointerEvent::Leave, Bounds::default());
                    }
                }),
            )?);
        }

        log::info!("lens mounted ({})", initial_phase);
        Ok(Self { handle, listeners })
    }

    /// The hero name lens with its intro pass, honoring reduced motion and
    /// coarse-pointer devices.
    pub fn hero_visor(
        window: &Window,
        element: &HtmlElement,
        on_intro_complete: Option<js_sys::Function>,
    ) -> Result<Self, JsValue> {
        let config = FollowConfig::hero_visor(element.client_width() as f32)
            .with_reduced_motion(media::prefers_reduced_motion(window))
            .with_pointer_capable(media::has_fine_pointer(window));
        Self::element_scoped(window, element, config, on_intro_complete)
    }

    /// Page-wide glow: follows the pointer anywhere in the viewport and
    /// drifts with scroll.
    pub fn reactive_background(window: &Window, element: &HtmlElement) -> Result<Self, JsValue> {
        let reduced = media::prefers_reduced_motion(window);
        let config = FollowConfig::reactive_background().with_reduced_motion(reduced);

        let drift = if reduced {
            BackdropDrift::frozen()
        } else {
            BackdropDrift::new(DriftConfig::default())
        };
        let drift = Rc::new(RefCell::new(drift));
        drift.borrow_mut().set_scroll(window.scroll_y().unwrap_or(0.0) as f32);

        let sink = BackdropSink::new(element.clone(), Rc::clone(&drift));
        let scheduler = Rc::new(RafScheduler::new(window.clone()));
        let handle = Rc::new(lens_engine::start(config, sink, scheduler));

        let mut listeners = Vec::new();
        if !reduced {
            let target: &EventTarget = window.as_ref();
            for kind in ["pointermove", "pointerdown"] {
                let weak = Rc::downgrade(&handle);
                let viewport = window.clone();
                listeners.push(Listener::passive(
                    target,
                    kind,
                    on_pointer(move |pointer| {
                        if let Some(handle) = weak.upgrade() {
                            handle.report_pointer(sample_of(pointer), viewport_bounds(&viewport), true);
                        }
                    }),
                )?);
            }

            let scroller = window.clone();
            let scroll_drift = Rc::clone(&drift);
            listeners.push(Listener::passive(target, "scroll", move |_| {
                if let Ok(y) = scroller.scroll_y() {
                    scroll_drift.borrow_mut().set_scroll(y as f32);
                }
            })?);
        }

        log::info!("backdrop mounted (reduced motion: {})", reduced);
        Ok(Self { handle, listeners })
    }

    /// Detach listeners and stop the frame loop. Idempotent.
    pub fn stop(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
        self.handle.stop();
    }

    pub fn phase(&self) -> Phase {
        self.handle.phase()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub fn record(&self) -> FrameRecord {
        self.handle.record()
    }
}

impl Drop for LensRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sample_of(pointer: &web_sys::PointerEvent) -> PointerSample {
    PointerSample::new(pointer.client_x() as f32, pointer.client_y() as f32)
}

fn element_bounds(element: &HtmlElement) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

fn viewport_bounds(window: &Window) -> Bounds {
    let extent = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Bounds::sized(extent(window.inner_width()) as f32, extent(window.inner_height()) as f32)
}

fn forward_pointer(
    element: HtmlElement,
    handle: Weak<FollowHandle>,
    to_event: fn(PointerSample) -> PointerEvent,
) -> impl FnMut(web_sys::Event) + 'static {
    on_pointer(move |pointer| {
        if let Some(handle) = handle.upgrade() {
            handle.handle_event(to_event(sample_of(pointer)), element_bounds(&element));
        }
    })
}
