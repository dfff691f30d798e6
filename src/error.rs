//! Errors raised at the crate's fallible boundaries.
//!
//! Interaction itself never fails: calls made before a dataset is bound,
//! features without a low-resolution counterpart and screen points outside
//! the sphere are all absorbed as no-ops. Only parsing host input and talking
//! to the browser can produce a [`GlobeError`].

/// Error returned by dataset, configuration and canvas setup calls.
#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    /// A feature collection could not be decoded as GeoJSON.
    #[error("invalid dataset json: {0}")]
    Dataset(#[source] serde_json::Error),
    /// The engine configuration could not be decoded.
    #[error("invalid config json: {0}")]
    Config(#[source] serde_json::Error),
    /// A color override object could not be decoded.
    #[error("invalid colors json: {0}")]
    Colors(#[source] serde_json::Error),
    /// The configured zoom range is empty or not positive.
    #[error("invalid scale extent [{min}, {max}]")]
    InvalidScaleExtent { min: f64, max: f64 },
    /// The canvas did not hand out a 2D rendering context.
    #[error("canvas 2d context unavailable")]
    ContextUnavailable,
}
