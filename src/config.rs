//! Engine configuration.
//!
//! Every field has a default, so hosts only send what they want to change:
//! `{"zoomStrategy": "canvasTransform", "scaleExtent": [1, 4]}`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{BOUNDARY_LINE_WIDTH, DEFAULT_SCALE_EXTENT, SPHERE_LINE_WIDTH, WHEEL_PIXEL_FACTOR};
use crate::error::GlobeError;

/// How a zoom gesture changes what is drawn. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomStrategy {
    /// Zoom sets the projection scale to `k` times the fitted scale; the
    /// canvas transform stays at identity.
    #[default]
    ProjectionScale,
    /// Zoom pans and scales the canvas context; the projection is untouched.
    CanvasTransform,
}

/// What a zoom gesture does when it starts while a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomDuringDrag {
    /// The zoom is dropped; the drag continues.
    #[default]
    Ignore,
    /// The drag ends and the zoom takes over.
    EndDrag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobeConfig {
    /// Allowed `[min, max]` range of the zoom factor.
    pub scale_extent: [f64; 2],
    pub zoom_strategy: ZoomStrategy,
    pub zoom_during_drag: ZoomDuringDrag,
    /// Keep hover hit-testing (on coarse paths) while zooming.
    pub hover_while_zooming: bool,
    /// Multiplier for pixel-mode wheel deltas.
    pub wheel_sensitivity: f64,
    pub boundary_width: f64,
    pub sphere_outline_width: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            scale_extent: DEFAULT_SCALE_EXTENT,
            zoom_strategy: ZoomStrategy::default(),
            zoom_during_drag: ZoomDuringDrag::default(),
            hover_while_zooming: false,
            wheel_sensitivity: WHEEL_PIXEL_FACTOR,
            boundary_width: BOUNDARY_LINE_WIDTH,
            sphere_outline_width: SPHERE_LINE_WIDTH,
        }
    }
}

impl GlobeConfig {
    /// Decode and validate a configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Config`] for malformed JSON and
    /// [`GlobeError::InvalidScaleExtent`] for an unusable zoom range.
    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        let config: Self = serde_json::from_str(json).map_err(GlobeError::Config)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the scale extent is a non-empty positive range.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::InvalidScaleExtent`] otherwise.
    pub fn validate(&self) -> Result<(), GlobeError> {
        let [min, max] = self.scale_extent;
        if min > 0.0 && min <= max && max.is_finite() {
            Ok(())
        } else {
            Err(GlobeError::InvalidScaleExtent { min, max })
        }
    }
}
