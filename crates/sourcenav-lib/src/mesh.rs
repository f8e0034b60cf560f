use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::area::NavArea;
use crate::error::{Error, Result};
use crate::geometry::Vector3;
use crate::graph::{link_areas, link_ladders, LinkOptions};
use crate::ladder::Ladder;
use crate::place::Place;
use crate::spatial::QuadTree;

/// Numeric identifier for an area.
pub type AreaId = u32;

/// Numeric identifier for a ladder.
pub type LadderId = u32;

/// Numeric identifier for a place. Places are numbered from 1; 0 means "no place".
pub type PlaceId = u32;

/// Header values recorded in the nav file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FormatInfo {
    pub major_version: u32,
    /// Only present in files with major version 10 or later; 0 otherwise.
    pub minor_version: u32,
    /// Size of the BSP the mesh was generated from.
    pub bsp_size: u32,
    pub is_analyzed: bool,
    pub has_unnamed_areas: bool,
}

/// Mutable collection of decoded records, before relations are resolved.
///
/// Areas are indexed spatially as they are added. [`NavMeshBuilder::link`]
/// consumes the builder and returns the read-only [`NavMesh`].
#[derive(Debug, Clone, Default)]
pub struct NavMeshBuilder {
    format: FormatInfo,
    places: HashMap<PlaceId, Place>,
    areas: HashMap<AreaId, NavArea>,
    ladders: HashMap<LadderId, Ladder>,
    quad_tree: QuadTree,
    unindexed: usize,
}

impl NavMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder whose spatial index covers the given world rectangle instead of
    /// the default Source bounds.
    pub fn with_bounds(north_west: (f32, f32), south_east: (f32, f32)) -> Self {
        Self {
            quad_tree: QuadTree::with_bounds(north_west, south_east),
            ..Self::default()
        }
    }

    pub fn set_format(&mut self, format: FormatInfo) -> &mut Self {
        self.format = format;
        self
    }

    /// Register a place. Places must be added before the areas that refer to them.
    pub fn add_place(&mut self, place: Place) -> &mut Self {
        self.places.insert(place.id, place);
        self
    }

    /// Register an area and insert its footprint into the spatial index.
    ///
    /// A place reference that names no registered place is dropped. Areas whose
    /// footprint lies outside the index bounds are kept in the mesh but cannot
    /// be found by point lookups. A second area with an id already present is
    /// dropped; the first record wins.
    pub fn add_area(&mut self, mut area: NavArea) -> &mut Self {
        if self.areas.contains_key(&area.id) {
            warn!(area = area.id, "duplicate area id ignored");
            return self;
        }

        area.place_name = None;
        if let Some(place_id) = area.place {
            match self.places.get_mut(&place_id) {
                Some(place) => {
                    place.areas.push(area.id);
                    area.place_name = Some(place.name.clone());
                }
                None => area.place = None,
            }
        }

        if let Err(violation) = self.quad_tree.insert(area.id, area.extent) {
            self.unindexed += 1;
            warn!(area = area.id, error = %violation, "area left out of spatial index");
        }

        self.areas.insert(area.id, area);
        self
    }

    pub fn add_ladder(&mut self, ladder: Ladder) -> &mut Self {
        self.ladders.insert(ladder.id, ladder);
        self
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Resolve every numeric cross-reference and freeze the mesh.
    pub fn link(self) -> NavMesh {
        self.link_with(LinkOptions::default())
    }

    /// Like [`NavMeshBuilder::link`], with explicit options.
    pub fn link_with(mut self, options: LinkOptions) -> NavMesh {
        link_areas(&mut self.areas, &self.ladders, options);
        link_ladders(&mut self.ladders, &self.areas, options);

        info!(
            areas = self.areas.len(),
            ladders = self.ladders.len(),
            places = self.places.len(),
            unindexed = self.unindexed,
            parallel = options.parallel,
            "linked nav mesh"
        );

        NavMesh {
            format: self.format,
            places: self.places,
            areas: self.areas,
            ladders: self.ladders,
            quad_tree: self.quad_tree,
        }
    }
}

/// Linked, read-only navigation mesh.
///
/// Safe to share between threads for concurrent queries once built.
#[derive(Debug, Clone)]
pub struct NavMesh {
    format: FormatInfo,
    places: HashMap<PlaceId, Place>,
    areas: HashMap<AreaId, NavArea>,
    ladders: HashMap<LadderId, Ladder>,
    quad_tree: QuadTree,
}

impl NavMesh {
    pub fn format(&self) -> FormatInfo {
        self.format
    }

    pub fn area(&self, id: AreaId) -> Option<&NavArea> {
        self.areas.get(&id)
    }

    pub fn ladder(&self, id: LadderId) -> Option<&Ladder> {
        self.ladders.get(&id)
    }

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(&id)
    }

    pub fn areas(&self) -> impl Iterator<Item = &NavArea> {
        self.areas.values()
    }

    pub fn ladders(&self) -> impl Iterator<Item = &Ladder> {
        self.ladders.values()
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn ladder_count(&self) -> usize {
        self.ladders.len()
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn quad_tree(&self) -> &QuadTree {
        &self.quad_tree
    }

    /// Lookup a place by its case-sensitive name.
    pub fn place_by_name(&self, name: &str) -> Option<&Place> {
        self.places.values().find(|place| place.name == name)
    }

    /// Area-weighted centroid of a place's member areas.
    pub fn place_center(&self, place: &Place) -> Result<Vector3> {
        place.estimated_center(place.areas.iter().filter_map(|id| self.areas.get(id)))
    }

    /// Centroid of the place called `name`.
    pub fn place_center_by_name(&self, name: &str) -> Result<Vector3> {
        let place = self.place_by_name(name).ok_or_else(|| Error::UnknownPlace {
            name: name.to_string(),
        })?;
        self.place_center(place)
    }

    /// Area containing `point`, choosing the closest floor by height.
    ///
    /// `allow_below` lets the point sit below the returned floor; without it
    /// only floors at or under the point qualify.
    pub fn find_area(&self, point: Vector3, allow_below: bool) -> Option<&NavArea> {
        self.quad_tree
            .find_by_point(point, allow_below)
            .and_then(|id| self.areas.get(&id))
    }

    /// Area containing `point` among those accepted by `eligible`, still
    /// ranked by height difference.
    pub fn find_area_with<F>(&self, point: Vector3, eligible: F) -> Option<&NavArea>
    where
        F: Fn(&NavArea, Vector3) -> bool,
    {
        self.quad_tree
            .find_by_point_with(point, |entry, point| {
                self.areas
                    .get(&entry.id)
                    .is_some_and(|area| eligible(area, point))
            })
            .and_then(|entry| self.areas.get(&entry.id))
    }

    /// Area containing `point`, or failing that the area whose footprint comes
    /// closest to it.
    pub fn nearest_area(&self, point: Vector3, allow_below: bool) -> Option<&NavArea> {
        self.find_area(point, allow_below).or_else(|| {
            self.areas.values().min_by(|a, b| {
                let da = (a.closest_point(point) - point).length_squared();
                let db = (b.closest_point(point) - point).length_squared();
                da.total_cmp(&db).then_with(|| a.id.cmp(&b.id))
            })
        })
    }
}
