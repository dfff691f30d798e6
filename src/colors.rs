//! Color configuration.
//!
//! [`Colors`] is replaced wholesale, never edited in place: a [`ColorPatch`]
//! names the slots to override and [`Colors::merged`] produces the new value.

#[cfg(test)]
#[path = "colors_test.rs"]
mod colors_test;

use serde::{Deserialize, Serialize};

use crate::error::GlobeError;

/// Named color slots used by the renderer. Values are CSS color strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    /// Canvas background behind the globe.
    pub background: String,
    /// Sphere fill under the countries.
    pub water: String,
    /// Country fill at rest.
    pub earth: String,
    /// Fill of the hovered country.
    pub hover: String,
    /// Country boundary stroke.
    pub boundary: String,
    /// Sphere rim stroke.
    pub sphere_outline: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            background: "darkslategray".into(),
            water: "white".into(),
            earth: "darkslategray".into(),
            hover: "green".into(),
            boundary: "white".into(),
            sphere_outline: "darkslategray".into(),
        }
    }
}

impl Colors {
    /// A copy of `self` with every slot present in `patch` replaced.
    #[must_use]
    pub fn merged(&self, patch: &ColorPatch) -> Self {
        let pick = |new: &Option<String>, old: &String| new.clone().unwrap_or_else(|| old.clone());
        Self {
            background: pick(&patch.background, &self.background),
            water: pick(&patch.water, &self.water),
            earth: pick(&patch.earth, &self.earth),
            hover: pick(&patch.hover, &self.hover),
            boundary: pick(&patch.boundary, &self.boundary),
            sphere_outline: pick(&patch.sphere_outline, &self.sphere_outline),
        }
    }
}

/// Sparse color override. Only present slots are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sphere_outline: Option<String>,
}

impl ColorPatch {
    /// Decode a patch from a JSON object such as `{"hover": "orange"}`.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Colors`] when the text is not a valid patch.
    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        serde_json::from_str(json).map_err(GlobeError::Colors)
    }
}
