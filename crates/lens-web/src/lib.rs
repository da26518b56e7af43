pub mod css;
pub mod listeners;
pub mod media;
pub mod raf;
pub mod runner;

pub use raf::RafScheduler;
pub use runner::LensRunner;

use std::cell::Cell;
use lens_engine::{FollowConfig, PROTOCOL_VERSION};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

thread_local! {
    static LOGGING: Cell<bool> = const { Cell::new(false) };
}

/// Install the panic hook and console logger. Safe to call repeatedly;
/// every mount function calls it.
#[wasm_bindgen]
pub fn lens_init() {
    if LOGGING.with(|flag| flag.replace(true)) {
        return;
    }
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("lens-web: initialized");
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// A mounted effect. Call `stop()` from the component's unmount path.
#[wasm_bindgen]
pub struct LensMount {
    runner: LensRunner,
}

#[wasm_bindgen]
impl LensMount {
    /// Detach listeners and cancel the frame loop. Idempotent.
    pub fn stop(&mut self) {
        self.runner.stop();
    }

    /// "idle", "sweep" or "tracking".
    pub fn phase(&self) -> String {
        self.runner.phase().as_str().to_string()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.runner.is_running()
    }

    /// Layout version of [`LensMount::snapshot`].
    #[wasm_bindgen(js_name = protocolVersion)]
    pub fn protocol_version(&self) -> f32 {
        PROTOCOL_VERSION
    }

    /// Latest `[x, y, phase, active]` record.
    pub fn snapshot(&self) -> Vec<f32> {
        self.runner.record().as_floats().to_vec()
    }
}

/// Mount the hero lens on `element`. `on_intro_complete` fires once when
/// the intro pass ends and pointer tracking begins.
#[wasm_bindgen]
pub fn mount_hero_visor(
    element: HtmlElement,
    on_intro_complete: Option<js_sys::Function>,
) -> Result<LensMount, JsValue> {
    lens_init();
    let runner = LensRunner::hero_visor(&window()?, &element, on_intro_complete)?;
    Ok(LensMount { runner })
}

/// Mount the page-wide reactive glow on `element`.
#[wasm_bindgen]
pub fn mount_reactive_background(element: HtmlElement) -> Result<LensMount, JsValue> {
    lens_init();
    let runner = LensRunner::reactive_background(&window()?, &element)?;
    Ok(LensMount { runner })
}

/// Mount an element-scoped lens from a JSON [`FollowConfig`].
/// The OS reduced-motion preference applies on top of the JSON.
#[wasm_bindgen]
pub fn mount_with_config(element: HtmlElement, config_json: &str) -> Result<LensMount, JsValue> {
    lens_init();
    let window = window()?;
    let config = FollowConfig::from_json(config_json)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let reduced = config.reduced_motion || media::prefers_reduced_motion(&window);
    let config = config.with_reduced_motion(reduced);
    let runner = LensRunner::element_scoped(&window, &element, config, None)?;
    Ok(LensMount { runner })
}
