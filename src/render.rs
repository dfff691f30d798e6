//! Rendering: paints one frame of the globe.
//!
//! Drawing goes through the [`Surface`] trait so frames can be recorded in
//! tests; [`CanvasRenderingContext2d`] is the only production implementation.
//! [`draw`] reads a [`Scene`] and never mutates engine state.
//!
//! Layer order, each layer in its own save/restore scope:
//! clear, background, water, countries (fill, plus boundary stroke at rest),
//! sphere outline.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, Path2d};

use crate::colors::Colors;
use crate::input::InteractionMode;
use crate::path::ProjectedPath;
use crate::registry::CountryRegistry;
use crate::viewport::Transform;

/// Minimal 2D drawing surface.
pub trait Surface {
    type Error;

    fn save(&self);
    fn restore(&self);
    /// Back to the identity transform.
    fn reset_transform(&self) -> Result<(), Self::Error>;
    fn clear(&self, width: f64, height: f64);
    /// Translate by `(t.x, t.y)`, then scale by `t.k`.
    fn apply_transform(&self, t: Transform) -> Result<(), Self::Error>;
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str);
    /// Fill all rings of `path` with the even-odd rule.
    fn fill_path(&self, path: &ProjectedPath, color: &str) -> Result<(), Self::Error>;
    fn stroke_path(&self, path: &ProjectedPath, color: &str, line_width: f64) -> Result<(), Self::Error>;
}

/// Read-only view of everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub width: f64,
    pub height: f64,
    /// Canvas transform; identity unless zoom drives the canvas.
    pub transform: Transform,
    pub sphere: &'a ProjectedPath,
    pub registry: &'a CountryRegistry,
    pub colors: &'a Colors,
    pub mode: InteractionMode,
    pub boundary_width: f64,
    pub sphere_outline_width: f64,
}

/// Draw the full frame.
///
/// Countries use the paths of the mode's tier only; records without a path
/// for that tier are skipped.
///
/// # Errors
///
/// Returns the first error reported by the surface.
pub fn draw<S: Surface + ?Sized>(surface: &S, scene: &Scene<'_>) -> Result<(), S::Error> {
    scoped(surface, |s| {
        s.reset_transform()?;
        s.clear(scene.width, scene.height);
        Ok(())
    })?;

    scoped(surface, |s| {
        s.apply_transform(scene.transform)?;

        let t = scene.transform;
        scoped(s, |s| {
            s.fill_rect(-t.x / t.k, -t.y / t.k, scene.width / t.k, scene.height / t.k, &scene.colors.background);
            Ok(())
        })?;

        scoped(s, |s| s.fill_path(scene.sphere, &scene.colors.water))?;

        draw_countries(s, scene)?;

        scoped(s, |s| s.stroke_path(scene.sphere, &scene.colors.sphere_outline, scene.sphere_outline_width))
    })
}

fn draw_countries<S: Surface + ?Sized>(surface: &S, scene: &Scene<'_>) -> Result<(), S::Error> {
    let tier = scene.mode.tier();
    let strokes = scene.mode == InteractionMode::Idle;
    for record in scene.registry.records() {
        let Some(path) = record.path(tier).filter(|p| !p.is_empty()) else {
            continue;
        };
        scoped(surface, |s| {
            s.fill_path(path, record.color())?;
            if strokes {
                s.stroke_path(path, &scene.colors.boundary, scene.boundary_width)?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

fn scoped<S: Surface + ?Sized>(surface: &S, f: impl FnOnce(&S) -> Result<(), S::Error>) -> Result<(), S::Error> {
    surface.save();
    let result = f(surface);
    surface.restore();
    result
}

// =============================================================
// Canvas2D
// =============================================================

fn to_path2d(path: &ProjectedPath) -> Result<Path2d, JsValue> {
    let p2d = Path2d::new()?;
    for ring in path.rings() {
        let Some((first, rest)) = ring.split_first() else {
            continue;
        };
        p2d.move_to(first.x, first.y);
        for pt in rest {
            p2d.line_to(pt.x, pt.y);
        }
        p2d.close_path();
    }
    Ok(p2d)
}

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn save(&self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn reset_transform(&self) -> Result<(), JsValue> {
        self.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    fn clear(&self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn apply_transform(&self, t: Transform) -> Result<(), JsValue> {
        self.translate(t.x, t.y)?;
        self.scale(t.k, t.k)
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }

    fn fill_path(&self, path: &ProjectedPath, color: &str) -> Result<(), JsValue> {
        let p2d = to_path2d(path)?;
        self.set_fill_style_str(color);
        self.fill_with_path_2d_and_winding(&p2d, CanvasWindingRule::Evenodd);
        Ok(())
    }

    fn stroke_path(&self, path: &ProjectedPath, color: &str, line_width: f64) -> Result<(), JsValue> {
        let p2d = to_path2d(path)?;
        self.set_stroke_style_str(color);
        self.set_line_width(line_width);
        self.stroke_with_path(&p2d);
        Ok(())
    }
}
