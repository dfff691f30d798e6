//! Country registry: one render record per fine-resolution feature.
//!
//! Each record pairs a fine feature with the coarse feature of the same name
//! (if any) and caches the projected path of both. Cached paths are stamped
//! with the projection revision they were computed at; a path is only trusted
//! for hit-testing while that revision is current. Records keep dataset
//! order, which is also paint order and hit-test order.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use crate::geo::{FeatureCollection, GeoFeature, WorldDataset};
use crate::input::Tier;
use crate::path::{self, ProjectedPath};
use crate::projection::Orthographic;
use crate::viewport::Point;

/// Index of a record within the registry.
pub type CountryId = usize;

/// Render state of a single country.
#[derive(Debug, Clone)]
pub struct CountryRecord {
    name: String,
    feature_high: GeoFeature,
    feature_low: Option<GeoFeature>,
    paths: [Option<ProjectedPath>; 2],
    color: String,
    hovered: bool,
}

impl CountryRecord {
    fn new(feature_high: GeoFeature, feature_low: Option<GeoFeature>, color: &str) -> Self {
        Self {
            name: feature_high.name().to_owned(),
            feature_high,
            feature_low,
            paths: [None, None],
            color: color.to_owned(),
            hovered: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source feature for `tier`; `None` for an unmatched coarse feature.
    #[must_use]
    pub fn feature(&self, tier: Tier) -> Option<&GeoFeature> {
        match tier {
            Tier::Low => self.feature_low.as_ref(),
            Tier::High => Some(&self.feature_high),
        }
    }

    /// Whether a coarse counterpart was found at bind time.
    #[must_use]
    pub fn has_low(&self) -> bool {
        self.feature_low.is_some()
    }

    /// Cached projected path for `tier`, if one has been computed.
    #[must_use]
    pub fn path(&self, tier: Tier) -> Option<&ProjectedPath> {
        self.paths[tier.index()].as_ref()
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

/// Outcome of [`CountryRegistry::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindSummary {
    pub countries: usize,
    pub unmatched: usize,
}

/// Ordered set of country records.
#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    records: Vec<CountryRecord>,
    fresh: [Option<u64>; 2],
}

impl CountryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all records with one per fine feature of `dataset`, each
    /// matched by name to its coarse counterpart. Every record starts
    /// unhovered in `color`, with no cached paths.
    ///
    /// A dataset carrying only one resolution uses it for both tiers. Fine
    /// features sharing a name share the same coarse feature.
    pub fn bind(&mut self, dataset: &WorldDataset, color: &str) -> BindSummary {
        let low = features_of(dataset.min_resolution());
        self.records = features_of(dataset.max_resolution())
            .iter()
            .map(|feature| {
                let matched = low.iter().find(|f| f.name() == feature.name()).cloned();
                if matched.is_none() {
                    log::debug!("no low-resolution feature for {:?}", feature.name());
                }
                CountryRecord::new(feature.clone(), matched, color)
            })
            .collect();
        self.fresh = [None, None];
        BindSummary {
            countries: self.records.len(),
            unmatched: self.records.iter().filter(|r| !r.has_low()).count(),
        }
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        !self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: CountryId) -> Option<&CountryRecord> {
        self.records.get(id)
    }

    /// Linear lookup by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<CountryId> {
        self.records.iter().position(|r| r.name == name)
    }

    /// Fine geometries, for fitting the projection.
    pub fn high_geometries(&self) -> impl Iterator<Item = &crate::geo::Geometry> {
        self.records.iter().filter_map(|r| r.feature_high.geometry.as_ref())
    }

    // --- Paths ---

    /// Recompute the cached paths of `tier` from `projection`.
    ///
    /// Records without a feature for the tier get no path.
    pub fn invalidate_paths(&mut self, tier: Tier, projection: &Orthographic) {
        for record in &mut self.records {
            record.paths[tier.index()] = record
                .feature(tier)
                .and_then(|f| f.geometry.as_ref())
                .map(|g| path::project_geometry(projection, g));
        }
        self.fresh[tier.index()] = Some(projection.revision());
    }

    /// Whether `tier`'s paths were computed at the projection's current revision.
    #[must_use]
    pub fn is_fresh(&self, tier: Tier, projection: &Orthographic) -> bool {
        self.fresh[tier.index()] == Some(projection.revision())
    }

    /// First record, in registry order, whose `tier` path contains `p`.
    ///
    /// Stale paths never match.
    #[must_use]
    pub fn hit_test(&self, tier: Tier, p: Point, projection: &Orthographic) -> Option<CountryId> {
        if !self.is_fresh(tier, projection) {
            return None;
        }
        self.records
            .iter()
            .position(|r| r.path(tier).is_some_and(|path| path.contains(p)))
    }

    // --- Visual state ---

    pub fn set_color(&mut self, id: CountryId, color: &str) {
        if let Some(record) = self.records.get_mut(id) {
            color.clone_into(&mut record.color);
        }
    }

    pub fn set_hover(&mut self, id: CountryId, hovered: bool) {
        if let Some(record) = self.records.get_mut(id) {
            record.hovered = hovered;
        }
    }

    /// The hovered record, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<CountryId> {
        self.records.iter().position(|r| r.hovered)
    }

    /// Give every unhovered record `color`.
    pub fn recolor_unhovered(&mut self, color: &str) {
        for record in self.records.iter_mut().filter(|r| !r.hovered) {
            color.clone_into(&mut record.color);
        }
    }
}

fn features_of(collection: Option<&FeatureCollection>) -> &[GeoFeature] {
    collection.map_or(&[], |c| c.features.as_slice())
}
