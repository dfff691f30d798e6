use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::colors::{ColorPatch, Colors};
use crate::config::{GlobeConfig, ZoomDuringDrag, ZoomStrategy};
use crate::error::GlobeError;
use crate::geo::WorldDataset;
use crate::input::{InteractionMode, PointerEvent, Tier, WheelDelta};
use crate::path::ProjectedPath;
use crate::projection::Orthographic;
use crate::registry::{CountryId, CountryRegistry};
use crate::render::{self, Scene};
use crate::rotation::RotationTracker;
use crate::scheduler::FrameScheduler;
use crate::viewport::{self, Point, Transform, ViewportTransform};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A redraw was requested and none was pending: schedule an animation frame.
    RenderNeeded,
    /// The hovered country changed.
    HoverChanged(Option<String>),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// Every interaction is a named transition method; calls made before a dataset
/// is bound are no-ops.
pub struct EngineCore {
    pub projection: Orthographic,
    pub viewport: ViewportTransform,
    pub tracker: RotationTracker,
    pub registry: CountryRegistry,
    pub colors: Colors,
    pub config: GlobeConfig,
    pub mode: InteractionMode,
    pub scheduler: FrameScheduler,
    pub width: f64,
    pub height: f64,
    /// Projection scale at zoom factor 1, set by the last fit.
    base_scale: f64,
    /// Last canvas-local pointer position, for re-evaluating hover.
    last_pointer: Option<Point>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(GlobeConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: GlobeConfig) -> Self {
        let projection = Orthographic::new();
        Self {
            base_scale: projection.scale(),
            projection,
            viewport: ViewportTransform::new(config.scale_extent),
            tracker: RotationTracker::new(),
            registry: CountryRegistry::new(),
            colors: Colors::default(),
            config,
            mode: InteractionMode::Idle,
            scheduler: FrameScheduler::new(),
            width: 0.0,
            height: 0.0,
            last_pointer: None,
        }
    }

    // --- Data inputs ---

    /// Bind a dataset: build one record per fine feature, fit the projection
    /// and compute the fine paths. A dataset missing either resolution is
    /// ignored.
    pub fn bind_dataset(&mut self, dataset: WorldDataset) -> Vec<Action> {
        if !dataset.is_usable() {
            log::debug!("dataset missing a resolution, bind skipped");
            return Vec::new();
        }
        let mut actions = Vec::new();
        let had_hover = self.registry.hovered().is_some();

        let summary = self.registry.bind(&dataset, &self.colors.earth);
        log::info!("bound {} countries, {} without low-resolution match", summary.countries, summary.unmatched);

        self.tracker.end_drag();
        self.mode = InteractionMode::Idle;
        self.fit();
        self.registry.invalidate_paths(Tier::High, &self.projection);

        if had_hover {
            actions.push(Action::HoverChanged(None));
        }
        self.request_render(&mut actions);
        actions
    }

    /// Merge a color patch. Unhovered countries follow a new earth color and
    /// the hovered country follows a new hover color.
    pub fn set_colors(&mut self, patch: &ColorPatch) -> Vec<Action> {
        let colors = self.colors.merged(patch);
        if colors.earth != self.colors.earth {
            self.registry.recolor_unhovered(&colors.earth);
        }
        if colors.hover != self.colors.hover {
            if let Some(id) = self.registry.hovered() {
                self.registry.set_color(id, &colors.hover);
            }
        }
        self.colors = colors;

        let mut actions = Vec::new();
        self.request_render(&mut actions);
        actions
    }

    // --- Viewport ---

    /// Resize the canvas: re-clamp the viewport, refit and recompute paths.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.width = width;
        self.height = height;
        self.viewport.set_size(width, height);

        let mut actions = Vec::new();
        if !self.registry.is_bound() {
            return actions;
        }
        self.fit();
        self.registry.invalidate_paths(Tier::High, &self.projection);
        if self.mode.is_active() {
            self.registry.invalidate_paths(Tier::Low, &self.projection);
        }
        self.request_render(&mut actions);
        actions
    }

    fn fit(&mut self) {
        self.projection.fit_size(self.width, self.height, self.registry.high_geometries());
        self.base_scale = self.projection.scale();
        if self.config.zoom_strategy == ZoomStrategy::ProjectionScale {
            self.projection.set_scale(self.viewport.transform().k * self.base_scale);
        }
    }

    // --- Drag ---

    /// Idle -> Dragging. Ignored while zooming or before a dataset is bound.
    pub fn on_drag_start(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.mode != InteractionMode::Idle || !self.registry.is_bound() {
            return actions;
        }
        let p = event.local();
        self.last_pointer = Some(p);
        self.tracker.begin_drag(&self.projection, p);
        self.set_mode(InteractionMode::Dragging);
        self.registry.invalidate_paths(Tier::Low, &self.projection);
        self.request_render(&mut actions);
        actions
    }

    /// Rotate the globe so the grabbed point follows the pointer.
    pub fn on_drag(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.mode != InteractionMode::Dragging {
            return actions;
        }
        let p = event.local();
        self.last_pointer = Some(p);
        if self.tracker.continue_drag(&mut self.projection, p) {
            self.registry.invalidate_paths(Tier::Low, &self.projection);
            self.request_render(&mut actions);
        }
        actions
    }

    /// Dragging -> Idle.
    pub fn on_drag_end(&mut self, event: PointerEvent) -> Vec<Action> {
        if self.mode != InteractionMode::Dragging {
            return Vec::new();
        }
        self.last_pointer = Some(event.local());
        self.tracker.end_drag();
        self.enter_idle()
    }

    // --- Zoom ---

    /// Idle -> Zooming. A zoom starting mid-drag follows
    /// [`GlobeConfig::zoom_during_drag`].
    pub fn on_zoom_start(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.registry.is_bound() {
            return actions;
        }
        match (self.mode, self.config.zoom_during_drag) {
            (InteractionMode::Zooming, _) => return actions,
            (InteractionMode::Dragging, ZoomDuringDrag::Ignore) => {
                log::debug!("zoom start ignored during drag");
                return actions;
            }
            (InteractionMode::Dragging, ZoomDuringDrag::EndDrag) => {
                self.tracker.end_drag();
                actions = self.enter_idle();
            }
            (InteractionMode::Idle, _) => {}
        }
        self.set_mode(InteractionMode::Zooming);
        self.registry.invalidate_paths(Tier::Low, &self.projection);
        self.request_render(&mut actions);
        actions
    }

    /// Apply a proposed zoom transform through the configured strategy.
    pub fn on_zoom(&mut self, proposed: Transform) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.mode != InteractionMode::Zooming {
            return actions;
        }
        match self.config.zoom_strategy {
            ZoomStrategy::ProjectionScale => {
                let k = self.viewport.on_scale(proposed.k);
                self.projection.set_scale(k * self.base_scale);
                self.registry.invalidate_paths(Tier::Low, &self.projection);
            }
            ZoomStrategy::CanvasTransform => {
                self.viewport.on_zoom(proposed);
            }
        }
        self.request_render(&mut actions);
        actions
    }

    /// Zooming -> Idle.
    pub fn on_zoom_end(&mut self) -> Vec<Action> {
        if self.mode != InteractionMode::Zooming {
            return Vec::new();
        }
        self.enter_idle()
    }

    /// Wheel input: starts a zoom gesture if none is running and zooms about
    /// the pointer.
    ///
    /// The host ends the gesture with [`Self::on_zoom_end`] once wheel events
    /// stop arriving.
    pub fn on_wheel(&mut self, event: PointerEvent, delta: WheelDelta) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.mode != InteractionMode::Zooming {
            actions = self.on_zoom_start();
        }
        if self.mode != InteractionMode::Zooming {
            return actions;
        }
        let p = event.local();
        self.last_pointer = Some(p);
        let proposed = viewport::wheel_transform(self.viewport.transform(), p, delta, self.config.wheel_sensitivity);
        actions.extend(self.on_zoom(proposed));
        actions
    }

    // --- Pointer / hover ---

    /// Pointer movement: drives the drag while dragging, hover otherwise.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        let p = event.local();
        match self.mode {
            InteractionMode::Dragging => self.on_drag(event),
            InteractionMode::Zooming if !self.config.hover_while_zooming => {
                self.last_pointer = Some(p);
                Vec::new()
            }
            InteractionMode::Idle | InteractionMode::Zooming => {
                self.last_pointer = Some(p);
                self.update_hover(p)
            }
        }
    }

    /// The pointer left the canvas: forget it and clear hover.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.last_pointer = None;
        if self.mode == InteractionMode::Dragging {
            return Vec::new();
        }
        self.set_hovered(None)
    }

    /// Hit-test `p` (canvas-local) at the mode's tier and move the hover there.
    fn update_hover(&mut self, p: Point) -> Vec<Action> {
        if !self.registry.is_bound() {
            return Vec::new();
        }
        let target = match self.config.zoom_strategy {
            ZoomStrategy::CanvasTransform => self.viewport.transform().invert(p),
            ZoomStrategy::ProjectionScale => p,
        };
        let hit = self.registry.hit_test(self.mode.tier(), target, &self.projection);
        self.set_hovered(hit)
    }

    fn set_hovered(&mut self, hit: Option<CountryId>) -> Vec<Action> {
        let mut actions = Vec::new();
        let current = self.registry.hovered();
        if current == hit {
            return actions;
        }
        if let Some(prev) = current {
            self.registry.set_hover(prev, false);
            self.registry.set_color(prev, &self.colors.earth);
        }
        if let Some(id) = hit {
            self.registry.set_hover(id, true);
            self.registry.set_color(id, &self.colors.hover);
        }
        self.request_render(&mut actions);
        actions.push(Action::HoverChanged(self.hovered_name().map(str::to_owned)));
        actions
    }

    // --- Mode transitions ---

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            log::debug!("mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Entry work for Idle: fine paths once, hover at the last pointer, final frame.
    fn enter_idle(&mut self) -> Vec<Action> {
        self.set_mode(InteractionMode::Idle);
        if !self.registry.is_fresh(Tier::High, &self.projection) {
            self.registry.invalidate_paths(Tier::High, &self.projection);
        }
        let mut actions = match self.last_pointer {
            Some(p) => self.update_hover(p),
            None => Vec::new(),
        };
        self.request_render(&mut actions);
        actions
    }

    // --- Render ---

    /// Ask for a frame outside any gesture, e.g. on an explicit host render.
    pub fn request_redraw(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.request_render(&mut actions);
        actions
    }

    /// Drop the pending redraw when no frame could be scheduled for it, so
    /// the next request schedules again.
    pub fn cancel_frame(&mut self) {
        self.scheduler.cancel();
    }

    fn request_render(&mut self, actions: &mut Vec<Action>) {
        if self.registry.is_bound() && self.scheduler.request() {
            actions.push(Action::RenderNeeded);
        }
    }

    /// Consume the pending redraw. Returns whether a frame should be painted.
    ///
    /// Paths of the mode's tier are brought up to date first, so the frame
    /// never mixes tiers or uses stale geometry.
    pub fn begin_frame(&mut self) -> bool {
        self.scheduler.begin_frame() && self.prepare_frame()
    }

    /// Make the mode's tier current. Returns `false` when there is nothing to
    /// draw yet.
    pub fn prepare_frame(&mut self) -> bool {
        if !self.registry.is_bound() {
            return false;
        }
        let tier = self.mode.tier();
        if !self.registry.is_fresh(tier, &self.projection) {
            self.registry.invalidate_paths(tier, &self.projection);
        }
        true
    }

    /// Read-only view of the current frame. `sphere` is the horizon outline
    /// from [`Self::sphere_path`].
    #[must_use]
    pub fn scene<'a>(&'a self, sphere: &'a ProjectedPath) -> Scene<'a> {
        let transform = match self.config.zoom_strategy {
            ZoomStrategy::CanvasTransform => self.viewport.transform(),
            ZoomStrategy::ProjectionScale => Transform::default(),
        };
        Scene {
            width: self.width,
            height: self.height,
            transform,
            sphere,
            registry: &self.registry,
            colors: &self.colors,
            mode: self.mode,
            boundary_width: self.config.boundary_width,
            sphere_outline_width: self.config.sphere_outline_width,
        }
    }

    #[must_use]
    pub fn sphere_path(&self) -> ProjectedPath {
        self.projection.sphere_path()
    }

    // --- Queries ---

    #[must_use]
    pub fn hovered_name(&self) -> Option<&str> {
        self.registry.hovered().and_then(|id| self.registry.get(id)).map(|r| r.name())
    }

    #[must_use]
    pub fn last_pointer(&self) -> Option<Point> {
        self.last_pointer
    }
}

/// The full engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `canvas`, sized to its current pixel size.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::ContextUnavailable`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: GlobeConfig) -> Result<Self, GlobeError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GlobeError::ContextUnavailable)?
            .ok_or(GlobeError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GlobeError::ContextUnavailable)?;
        let mut core = EngineCore::new(config);
        core.set_viewport(f64::from(canvas.width()), f64::from(canvas.height()));
        Ok(Self { canvas, ctx, core })
    }

    /// Canvas-local position of a client-space point.
    #[must_use]
    pub fn pointer_event(&self, client_x: f64, client_y: f64) -> PointerEvent {
        let rect = self.canvas.get_bounding_client_rect();
        PointerEvent::new(Point::new(client_x, client_y), Point::new(rect.x(), rect.y()))
    }

    /// Re-read the canvas size and resize the engine to it.
    pub fn resize(&mut self) -> Vec<Action> {
        let (w, h) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        self.core.set_viewport(w, h)
    }

    // --- Render ---

    /// Paint the pending frame, if any. Called from the animation-frame callback.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render_frame(&mut self) -> Result<(), JsValue> {
        if !self.core.begin_frame() {
            return Ok(());
        }
        self.paint()
    }

    /// Paint unconditionally, outside the frame scheduler.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn paint(&mut self) -> Result<(), JsValue> {
        if !self.core.prepare_frame() {
            return Ok(());
        }
        let sphere = self.core.sphere_path();
        render::draw(&self.ctx, &self.core.scene(&sphere))
    }
}
