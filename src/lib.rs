//! Interactive orthographic globe rendered onto a 2D canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interaction-driven render pipeline of the globe: translating pointer and
//! wheel gestures into rotation and zoom, keeping projected country paths in
//! sync with the projection, hit-testing the country under the pointer, and
//! painting frames on the next animation tick. The host JavaScript layer only
//! loads the country datasets and forwards DOM events to [`web::Globe`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and the testable [`engine::EngineCore`] state machine |
//! | [`geo`] | GeoJSON feature types and the dual-resolution [`geo::WorldDataset`] |
//! | [`projection`] | Orthographic projection (rotate, scale, fit, project, invert) |
//! | [`path`] | Projected, horizon-clipped paths and point-in-path hit-testing |
//! | [`versor`] | Quaternion helpers for lock-free drag rotation |
//! | [`rotation`] | Drag rotation tracker built on [`versor`] |
//! | [`viewport`] | Pan/zoom transform with boundary clamping |
//! | [`registry`] | Country records with cached low/high resolution paths |
//! | [`input`] | Interaction modes, resolution tiers and typed gesture records |
//! | [`scheduler`] | Coalescing redraw scheduler |
//! | [`render`] | Frame painting through the [`render::Surface`] trait |
//! | [`colors`] | Color configuration and partial overrides |
//! | [`config`] | Engine configuration (zoom policy, scale extent, line widths) |
//! | [`error`] | Error type for the fallible boundaries |
//! | [`web`] | `wasm-bindgen` surface exposed to the host page |
//! | [`consts`] | Shared numeric constants |

pub mod colors;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geo;
pub mod input;
pub mod path;
pub mod projection;
pub mod registry;
pub mod render;
pub mod rotation;
pub mod scheduler;
pub mod versor;
pub mod viewport;
pub mod web;
