#![allow(clippy::float_cmp)]

use std::cell::RefCell;

use super::*;
use crate::geo::{FeatureCollection, GeoFeature, Geometry, Position};
use crate::render::Surface;

const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn square(name: &str, lon: f64, lat: f64, size: f64) -> GeoFeature {
    let ring = vec![
        Position::new(lon, lat),
        Position::new(lon + size, lat),
        Position::new(lon + size, lat + size),
        Position::new(lon, lat + size),
        Position::new(lon, lat),
    ];
    GeoFeature::new(name, Geometry::Polygon { coordinates: vec![ring] })
}

/// "Aland" has no low-resolution counterpart.
fn dataset() -> WorldDataset {
    let low = FeatureCollection::new(vec![square("Brazil", 10.0, -10.0, 20.0)]);
    let high = FeatureCollection::new(vec![square("Aland", -20.0, 0.0, 10.0), square("Brazil", 10.0, -10.0, 20.0)]);
    WorldDataset::new(low, high)
}

fn core_with(config: GlobeConfig) -> EngineCore {
    let mut core = EngineCore::new(config);
    core.set_viewport(400.0, 400.0);
    core.bind_dataset(dataset());
    core.begin_frame();
    core
}

fn core() -> EngineCore {
    core_with(GlobeConfig::default())
}

fn at(p: Point) -> PointerEvent {
    PointerEvent::new(p, Point::new(0.0, 0.0))
}

fn screen_of(core: &EngineCore, lon: f64, lat: f64) -> Point {
    core.projection.project(Position::new(lon, lat)).unwrap()
}

fn brazil(core: &EngineCore) -> Point {
    screen_of(core, 20.0, 0.0)
}

fn aland(core: &EngineCore) -> Point {
    screen_of(core, -15.0, 5.0)
}

fn off_globe() -> Point {
    Point::new(-5000.0, -5000.0)
}

fn id(core: &EngineCore, name: &str) -> CountryId {
    core.registry.find(name).unwrap()
}

fn record<'a>(core: &'a EngineCore, name: &str) -> &'a crate::registry::CountryRecord {
    core.registry.get(id(core, name)).unwrap()
}

fn hovered_count(core: &EngineCore) -> usize {
    core.registry.records().iter().filter(|r| r.is_hovered()).count()
}

fn nudge(p: Point, dx: f64, dy: f64) -> Point {
    Point::new(p.x + dx, p.y + dy)
}

/// Counts fills per color; strokes are counted separately.
#[derive(Default)]
struct Tally {
    fills: RefCell<Vec<String>>,
    strokes: RefCell<usize>,
}

impl Surface for Tally {
    type Error = ();

    fn save(&self) {}
    fn restore(&self) {}
    fn reset_transform(&self) -> Result<(), ()> {
        Ok(())
    }
    fn clear(&self, _width: f64, _height: f64) {}
    fn apply_transform(&self, _t: Transform) -> Result<(), ()> {
        Ok(())
    }
    fn fill_rect(&self, _x: f64, _y: f64, _width: f64, _height: f64, _color: &str) {}
    fn fill_path(&self, _path: &ProjectedPath, color: &str) -> Result<(), ()> {
        self.fills.borrow_mut().push(color.to_owned());
        Ok(())
    }
    fn stroke_path(&self, _path: &ProjectedPath, _color: &str, _line_width: f64) -> Result<(), ()> {
        *self.strokes.borrow_mut() += 1;
        Ok(())
    }
}

fn paint(core: &EngineCore) -> Tally {
    let tally = Tally::default();
    let sphere = core.sphere_path();
    render::draw(&tally, &core.scene(&sphere)).unwrap();
    tally
}

// =============================================================
// Binding
// =============================================================

#[test]
fn bind_creates_records_and_schedules_frame() {
    let mut core = EngineCore::default();
    core.set_viewport(400.0, 400.0);
    let actions = core.bind_dataset(dataset());
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.registry.len(), 2);
    assert!(core.registry.is_fresh(Tier::High, &core.projection));
    assert!(core.scheduler.is_pending());
}

#[test]
fn bind_fits_projection_to_canvas() {
    let core = core();
    let b = brazil(&core);
    let a = aland(&core);
    for p in [a, b] {
        assert!((0.0..=400.0).contains(&p.x));
        assert!((0.0..=400.0).contains(&p.y));
    }
}

#[test]
fn bind_without_both_resolutions_is_noop() {
    let mut core = EngineCore::default();
    let actions = core.bind_dataset(WorldDataset::new(FeatureCollection::default(), dataset().high.unwrap()));
    assert!(actions.is_empty());
    assert!(!core.registry.is_bound());
}

#[test]
fn calls_before_bind_are_noops() {
    let mut core = EngineCore::default();
    core.set_viewport(400.0, 400.0);
    let p = at(Point::new(200.0, 200.0));
    assert!(core.on_drag_start(p).is_empty());
    assert!(core.on_pointer_move(p).is_empty());
    assert!(core.on_zoom_start().is_empty());
    assert!(core.on_wheel(p, WheelDelta::pixels(-100.0)).is_empty());
    assert!(core.set_colors(&ColorPatch::default()).is_empty());
    assert_eq!(core.mode, InteractionMode::Idle);
    assert!(!core.begin_frame());
}

// =============================================================
// Hover
// =============================================================

#[test]
fn hover_highlights_and_reverts() {
    let mut core = core();
    core.set_colors(&ColorPatch { hover: Some("green".into()), ..Default::default() });

    let actions = core.on_pointer_move(at(brazil(&core)));
    assert!(actions.contains(&Action::HoverChanged(Some("Brazil".into()))));
    assert_eq!(record(&core, "Brazil").color(), "green");
    assert!(record(&core, "Brazil").is_hovered());

    let actions = core.on_pointer_move(at(off_globe()));
    assert!(actions.contains(&Action::HoverChanged(None)));
    assert_eq!(record(&core, "Brazil").color(), core.colors.earth);
    assert!(!record(&core, "Brazil").is_hovered());
}

#[test]
fn hover_subtracts_canvas_origin() {
    let mut core = core();
    let origin = Point::new(30.0, 40.0);
    let b = brazil(&core);
    core.on_pointer_move(PointerEvent::new(nudge(b, origin.x, origin.y), origin));
    assert_eq!(core.hovered_name(), Some("Brazil"));
}

#[test]
fn hover_is_exclusive() {
    let mut core = core();
    let path = [brazil(&core), aland(&core), off_globe(), aland(&core), brazil(&core), brazil(&core)];
    for p in path {
        core.on_pointer_move(at(p));
        assert!(hovered_count(&core) <= 1);
    }
    assert_eq!(core.hovered_name(), Some("Brazil"));
    assert_eq!(record(&core, "Aland").color(), core.colors.earth);
}

#[test]
fn unchanged_hover_emits_nothing() {
    let mut core = core();
    let b = brazil(&core);
    core.on_pointer_move(at(b));
    assert!(core.on_pointer_move(at(nudge(b, 1.0, 0.0))).is_empty());
}

#[test]
fn pointer_leave_clears_hover() {
    let mut core = core();
    core.on_pointer_move(at(aland(&core)));
    let actions = core.on_pointer_leave();
    assert!(actions.contains(&Action::HoverChanged(None)));
    assert_eq!(hovered_count(&core), 0);
    assert!(core.last_pointer().is_none());
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_uses_low_tier_and_skips_unmatched() {
    let mut core = core();
    let b = brazil(&core);
    core.on_drag_start(at(b));
    core.on_drag(at(nudge(b, 10.0, 0.0)));
    assert_eq!(core.mode, InteractionMode::Dragging);
    assert_eq!(core.mode.tier(), Tier::Low);
    assert!(core.registry.is_fresh(Tier::Low, &core.projection));

    assert!(record(&core, "Aland").path(Tier::Low).is_none());
    assert!(core.registry.hit_test(Tier::Low, aland(&core), &core.projection).is_none());
    assert_eq!(core.registry.hit_test(Tier::Low, brazil(&core), &core.projection), Some(id(&core, "Brazil")));

    let tally = paint(&core);
    assert_eq!(tally.fills.borrow().len(), 2);
    assert_eq!(*tally.strokes.borrow(), 1);
}

#[test]
fn drag_end_restores_high_tier() {
    let mut core = core();
    let b = brazil(&core);
    core.on_drag_start(at(b));
    core.on_drag(at(nudge(b, 10.0, 0.0)));
    core.on_drag_end(at(nudge(b, 10.0, 0.0)));
    assert_eq!(core.mode, InteractionMode::Idle);
    assert!(core.registry.is_fresh(Tier::High, &core.projection));
    assert!(record(&core, "Aland").path(Tier::High).is_some());

    let tally = paint(&core);
    assert_eq!(tally.fills.borrow().len(), 3);
    assert_eq!(*tally.strokes.borrow(), 3);

    core.on_pointer_move(at(aland(&core)));
    assert_eq!(core.hovered_name(), Some("Aland"));
}

#[test]
fn drag_moves_grabbed_point_with_pointer() {
    let mut core = core();
    let b = brazil(&core);
    let target = nudge(b, 15.0, -5.0);
    core.on_drag_start(at(b));
    core.on_drag(at(target));
    let now = brazil(&core);
    assert!(approx_eq(now.x, target.x) && approx_eq(now.y, target.y));
}

#[test]
fn hover_suppressed_while_dragging() {
    let mut core = core();
    let b = brazil(&core);
    core.on_drag_start(at(off_globe()));
    let actions = core.on_pointer_move(at(b));
    assert!(!actions.iter().any(|a| matches!(a, Action::HoverChanged(_))));
    assert_eq!(hovered_count(&core), 0);
}

#[test]
fn hover_reevaluated_when_drag_ends() {
    let mut core = core();
    let b = brazil(&core);
    let end = nudge(b, 10.0, 0.0);
    core.on_drag_start(at(b));
    core.on_drag(at(end));
    let actions = core.on_drag_end(at(end));
    assert!(actions.contains(&Action::HoverChanged(Some("Brazil".into()))));
}

#[test]
fn drag_off_sphere_holds_rotation() {
    let mut core = core();
    let b = brazil(&core);
    core.on_drag_start(at(b));
    core.on_drag(at(nudge(b, 5.0, 0.0)));
    let rotate = core.projection.rotate();
    assert!(core.on_drag(at(off_globe())).is_empty());
    assert_eq!(core.projection.rotate(), rotate);
}

#[test]
fn redraws_coalesce_between_frames() {
    let mut core = core();
    let b = brazil(&core);
    assert_eq!(core.on_drag_start(at(b)), vec![Action::RenderNeeded]);
    assert!(core.on_drag(at(nudge(b, 1.0, 0.0))).is_empty());
    assert!(core.on_drag(at(nudge(b, 2.0, 0.0))).is_empty());
    assert!(core.begin_frame());
    assert!(!core.begin_frame());
    assert_eq!(core.on_drag(at(nudge(b, 3.0, 0.0))), vec![Action::RenderNeeded]);
}

#[test]
fn cancelled_frame_allows_rescheduling() {
    let mut core = core();
    let b = brazil(&core);
    assert_eq!(core.on_drag_start(at(b)), vec![Action::RenderNeeded]);
    core.cancel_frame();
    assert!(!core.scheduler.is_pending());
    assert_eq!(core.on_drag(at(nudge(b, 1.0, 0.0))), vec![Action::RenderNeeded]);
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn projection_scale_zoom() {
    let mut core = core();
    let base = core.projection.scale();
    core.on_zoom_start();
    assert_eq!(core.mode, InteractionMode::Zooming);
    core.on_zoom(Transform::new(2.0, -30.0, -30.0));
    assert!(approx_eq(core.projection.scale(), 2.0 * base));
    assert_eq!(core.viewport.transform(), Transform::new(2.0, 0.0, 0.0));
    assert!(core.registry.is_fresh(Tier::Low, &core.projection));

    core.on_zoom(Transform::new(50.0, 0.0, 0.0));
    assert!(approx_eq(core.projection.scale(), 8.0 * base));

    core.on_zoom_end();
    assert_eq!(core.mode, InteractionMode::Idle);
    assert!(core.registry.is_fresh(Tier::High, &core.projection));
    assert_eq!(core.scene(&core.sphere_path()).transform, Transform::default());
}

#[test]
fn canvas_transform_zoom_leaves_projection() {
    let mut core = core_with(GlobeConfig { zoom_strategy: ZoomStrategy::CanvasTransform, ..Default::default() });
    let scale = core.projection.scale();
    core.on_zoom_start();
    let applied = Transform::new(2.0, -100.0, -100.0);
    core.on_zoom(applied);
    core.on_zoom_end();
    assert_eq!(core.projection.scale(), scale);
    assert_eq!(core.scene(&core.sphere_path()).transform, applied);

    core.on_pointer_move(at(applied.apply(brazil(&core))));
    assert_eq!(core.hovered_name(), Some("Brazil"));
}

#[test]
fn canvas_transform_zoom_is_clamped() {
    let mut core = core_with(GlobeConfig { zoom_strategy: ZoomStrategy::CanvasTransform, ..Default::default() });
    core.on_zoom_start();
    core.on_zoom(Transform::new(2.0, 300.0, -900.0));
    assert_eq!(core.viewport.transform(), Transform::new(2.0, 0.0, -400.0));
}

#[test]
fn wheel_zooms_from_idle() {
    let mut core = core();
    let base = core.projection.scale();
    let actions = core.on_wheel(at(Point::new(200.0, 200.0)), WheelDelta::pixels(-500.0));
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.mode, InteractionMode::Zooming);
    assert!(approx_eq(core.projection.scale(), 2.0 * base));
    core.on_wheel(at(Point::new(200.0, 200.0)), WheelDelta::pixels(500.0));
    assert!(approx_eq(core.projection.scale(), base));
}

#[test]
fn zoom_during_drag_ignored_by_default() {
    let mut core = core();
    core.on_drag_start(at(brazil(&core)));
    assert!(core.on_zoom_start().is_empty());
    assert_eq!(core.mode, InteractionMode::Dragging);
    assert!(core.on_zoom(Transform::new(3.0, 0.0, 0.0)).is_empty());
    assert!(core.tracker.is_tracking());
}

#[test]
fn zoom_during_drag_can_end_drag() {
    let mut core = core_with(GlobeConfig { zoom_during_drag: ZoomDuringDrag::EndDrag, ..Default::default() });
    core.on_drag_start(at(brazil(&core)));
    core.on_zoom_start();
    assert_eq!(core.mode, InteractionMode::Zooming);
    assert!(!core.tracker.is_tracking());
}

#[test]
fn drag_ignored_while_zooming() {
    let mut core = core();
    core.on_zoom_start();
    core.begin_frame();
    assert!(core.on_drag_start(at(brazil(&core))).is_empty());
    assert_eq!(core.mode, InteractionMode::Zooming);
}

#[test]
fn hover_disabled_while_zooming_by_default() {
    let mut core = core();
    core.on_zoom_start();
    let actions = core.on_pointer_move(at(brazil(&core)));
    assert!(actions.is_empty());
    assert_eq!(hovered_count(&core), 0);
}

#[test]
fn hover_while_zooming_uses_low_tier() {
    let mut core = core_with(GlobeConfig { hover_while_zooming: true, ..Default::default() });
    core.on_zoom_start();
    core.on_pointer_move(at(aland(&core)));
    assert_eq!(hovered_count(&core), 0);
    core.on_pointer_move(at(brazil(&core)));
    assert_eq!(core.hovered_name(), Some("Brazil"));
}

// =============================================================
// Colors / resize
// =============================================================

#[test]
fn earth_color_change_recolors_unhovered() {
    let mut core = core();
    core.on_pointer_move(at(brazil(&core)));
    core.begin_frame();
    let actions = core.set_colors(&ColorPatch { earth: Some("tan".into()), hover: Some("orange".into()), ..Default::default() });
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(record(&core, "Aland").color(), "tan");
    assert_eq!(record(&core, "Brazil").color(), "orange");

    core.on_pointer_move(at(off_globe()));
    assert_eq!(record(&core, "Brazil").color(), "tan");
}

#[test]
fn resize_refits_and_recomputes() {
    let mut core = core();
    let before = core.projection.scale();
    core.set_viewport(200.0, 200.0);
    assert!(approx_eq(core.projection.scale(), before / 2.0));
    assert!(core.registry.is_fresh(Tier::High, &core.projection));
}

#[test]
fn resize_keeps_zoom_factor() {
    let mut core = core();
    let base = core.projection.scale();
    core.on_zoom_start();
    core.on_zoom(Transform::new(2.0, 0.0, 0.0));
    core.on_zoom_end();
    core.set_viewport(200.0, 200.0);
    assert!(approx_eq(core.projection.scale(), base));
    assert!(core.registry.is_fresh(Tier::High, &core.projection));
}
