//! Browser bindings.
//!
//! [`Globe`] is the handle the host page holds. DOM events are forwarded as
//! plain numbers; the handle turns them into engine transitions and services
//! the resulting [`Action`]s: one `requestAnimationFrame` per pending redraw,
//! and a debounce that ends a wheel zoom once the wheel goes quiet.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::colors::ColorPatch;
use crate::config::GlobeConfig;
use crate::consts::WHEEL_END_DELAY_MS;
use crate::engine::{Action, Engine};
use crate::error::GlobeError;
use crate::geo::{FeatureCollection, WorldDataset};
use crate::input::{DeltaMode, WheelDelta};
use crate::viewport::Transform;

type FrameHolder = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

impl From<GlobeError> for JsValue {
    fn from(err: GlobeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Install the panic hook and route `log` output to the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("logger already installed");
    }
}

#[wasm_bindgen]
pub struct Globe {
    engine: Rc<RefCell<Engine>>,
    frame: FrameHolder,
    wheel_end: Rc<RefCell<Option<Timeout>>>,
}

#[wasm_bindgen]
impl Globe {
    /// Attach to `canvas`. `config_json` is an optional partial configuration.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or a canvas without a 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<Globe, JsValue> {
        let config = match config_json {
            Some(json) => GlobeConfig::from_json(&json)?,
            None => GlobeConfig::default(),
        };
        let engine = Engine::new(canvas, config)?;
        Ok(Self {
            engine: Rc::new(RefCell::new(engine)),
            frame: Rc::new(RefCell::new(None)),
            wheel_end: Rc::new(RefCell::new(None)),
        })
    }

    // --- Data / configuration ---

    /// Bind coarse and fine GeoJSON feature collections.
    ///
    /// # Errors
    ///
    /// Fails if either collection is not valid GeoJSON.
    pub fn bind_dataset(&self, low_json: &str, high_json: &str) -> Result<(), JsValue> {
        let dataset = WorldDataset::new(FeatureCollection::from_json(low_json)?, FeatureCollection::from_json(high_json)?);
        let actions = self.engine.borrow_mut().core.bind_dataset(dataset);
        self.dispatch(actions);
        Ok(())
    }

    /// Override some color slots, e.g. `{"hover": "orange"}`.
    ///
    /// # Errors
    ///
    /// Fails if the patch is not a valid color object.
    pub fn set_colors(&self, colors_json: &str) -> Result<(), JsValue> {
        let patch = ColorPatch::from_json(colors_json)?;
        let actions = self.engine.borrow_mut().core.set_colors(&patch);
        self.dispatch(actions);
        Ok(())
    }

    /// Schedule a redraw on the next animation frame.
    pub fn render(&self) {
        let actions = self.engine.borrow_mut().core.request_redraw();
        self.dispatch(actions);
    }

    /// Pick up a new canvas size.
    pub fn resize(&self) {
        let actions = self.engine.borrow_mut().resize();
        self.dispatch(actions);
    }

    // --- Pointer ---

    pub fn pointer_down(&self, client_x: f64, client_y: f64) {
        let actions = {
            let mut engine = self.engine.borrow_mut();
            let event = engine.pointer_event(client_x, client_y);
            engine.core.on_drag_start(event)
        };
        self.dispatch(actions);
    }

    pub fn pointer_move(&self, client_x: f64, client_y: f64) {
        let actions = {
            let mut engine = self.engine.borrow_mut();
            let event = engine.pointer_event(client_x, client_y);
            engine.core.on_pointer_move(event)
        };
        self.dispatch(actions);
    }

    pub fn pointer_up(&self, client_x: f64, client_y: f64) {
        let actions = {
            let mut engine = self.engine.borrow_mut();
            let event = engine.pointer_event(client_x, client_y);
            engine.core.on_drag_end(event)
        };
        self.dispatch(actions);
    }

    pub fn pointer_leave(&self) {
        let actions = self.engine.borrow_mut().core.on_pointer_leave();
        self.dispatch(actions);
    }

    // --- Zoom ---

    /// Wheel event. `delta_mode` is the DOM `WheelEvent.deltaMode` code.
    pub fn wheel(&self, client_x: f64, client_y: f64, delta_y: f64, delta_mode: u32) {
        let actions = {
            let mut engine = self.engine.borrow_mut();
            let event = engine.pointer_event(client_x, client_y);
            let delta = WheelDelta { dx: 0.0, dy: delta_y, mode: DeltaMode::from_dom(delta_mode) };
            engine.core.on_wheel(event, delta)
        };
        self.dispatch(actions);
        self.arm_wheel_end();
    }

    /// Start of a host-driven zoom gesture (e.g. pinch).
    pub fn zoom_start(&self) {
        let actions = self.engine.borrow_mut().core.on_zoom_start();
        self.dispatch(actions);
    }

    /// Proposed zoom transform from the host gesture layer.
    pub fn zoom(&self, k: f64, x: f64, y: f64) {
        let actions = self.engine.borrow_mut().core.on_zoom(Transform::new(k, x, y));
        self.dispatch(actions);
    }

    pub fn zoom_end(&self) {
        let actions = self.engine.borrow_mut().core.on_zoom_end();
        self.dispatch(actions);
    }

    // --- Queries ---

    /// Name of the hovered country, if any.
    #[must_use]
    pub fn hovered_country(&self) -> Option<String> {
        self.engine.borrow().core.hovered_name().map(str::to_owned)
    }
}

impl Globe {
    fn dispatch(&self, actions: Vec<Action>) {
        dispatch(&self.engine, &self.frame, actions);
    }

    /// Restart the quiet-period timer; a replaced timer is cancelled on drop.
    fn arm_wheel_end(&self) {
        let engine = Rc::clone(&self.engine);
        let frame = Rc::clone(&self.frame);
        let timeout = Timeout::new(WHEEL_END_DELAY_MS, move || {
            let actions = engine.borrow_mut().core.on_zoom_end();
            dispatch(&engine, &frame, actions);
        });
        *self.wheel_end.borrow_mut() = Some(timeout);
    }
}

fn dispatch(engine: &Rc<RefCell<Engine>>, frame: &FrameHolder, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::RenderNeeded => request_frame(engine, frame),
            Action::HoverChanged(name) => log::debug!("hover: {name:?}"),
        }
    }
}

fn request_frame(engine: &Rc<RefCell<Engine>>, frame: &FrameHolder) {
    let Some(window) = web_sys::window() else {
        log::warn!("no window, frame dropped");
        engine.borrow_mut().core.cancel_frame();
        return;
    };

    let engine_for_cb = Rc::clone(engine);
    let holder_for_cb = Rc::clone(frame);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        render_now(&engine_for_cb);
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(_) => *frame.borrow_mut() = Some(cb),
        Err(err) => {
            log::warn!("requestAnimationFrame failed: {err:?}");
            engine.borrow_mut().core.cancel_frame();
        }
    }
}

fn render_now(engine: &Rc<RefCell<Engine>>) {
    let started_ms = js_sys::Date::now();
    match engine.borrow_mut().render_frame() {
        Ok(()) => log::trace!("frame painted in {:.1} ms", (js_sys::Date::now() - started_ms).max(0.0)),
        Err(err) => log::warn!("render failed: {err:?}"),
    }
}
