use std::fmt::Write;

use serde::Serialize;

use crate::area::NavArea;
use crate::geometry::Vector3;
use crate::mesh::{AreaId, FormatInfo, NavMesh, PlaceId};
use crate::path::Path;

/// Place entry within a [`MeshSummary`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlaceSummary {
    pub id: PlaceId,
    pub name: String,
    pub areas: usize,
}

/// Headline facts about a loaded mesh.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeshSummary {
    pub format: FormatInfo,
    pub areas: usize,
    pub ladders: usize,
    pub connections: usize,
    pub places: Vec<PlaceSummary>,
}

impl MeshSummary {
    pub fn from_mesh(mesh: &NavMesh) -> Self {
        let mut places = mesh
            .places()
            .map(|place| PlaceSummary {
                id: place.id,
                name: place.name.clone(),
                areas: place.areas.len(),
            })
            .collect::<Vec<_>>();
        places.sort_by_key(|place| place.id);

        Self {
            format: mesh.format(),
            areas: mesh.area_count(),
            ladders: mesh.ladder_count(),
            connections: mesh.areas().map(|area| area.connections.len()).sum(),
            places,
        }
    }

    pub fn render(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Nav mesh v{}.{} (bsp size {}, analyzed: {})",
            self.format.major_version,
            self.format.minor_version,
            self.format.bsp_size,
            self.format.is_analyzed
        );
        let _ = writeln!(
            buffer,
            "{} areas, {} connections, {} ladders, {} places",
            self.areas,
            self.connections,
            self.ladders,
            self.places.len()
        );
        for place in &self.places {
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({} areas)",
                place.id, place.name, place.areas
            );
        }
        buffer
    }
}

/// An area resolved from a point lookup.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AreaSummary {
    pub id: AreaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    pub center: Vector3,
    /// Height difference between the query point and the floor below it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_distance: Option<f32>,
}

impl AreaSummary {
    pub fn from_area(area: &NavArea, query: Option<Vector3>) -> Self {
        Self {
            id: area.id,
            place: area.place_name().map(str::to_string),
            center: area.center(),
            z_distance: query.map(|point| area.extent.z_distance(point)),
        }
    }

    fn display_name(&self) -> &str {
        self.place.as_deref().unwrap_or("<unnamed>")
    }

    pub fn render(&self) -> String {
        let mut line = format!(
            "Area {} [{}] centered at {}",
            self.id,
            self.display_name(),
            self.center
        );
        if let Some(gap) = self.z_distance {
            let _ = write!(line, ", {gap:.2} above floor");
        }
        line.push('\n');
        line
    }
}

/// Step taken along a route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub area: AreaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    pub cost_from_start: f32,
}

/// Structured representation of a found path.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub start: AreaId,
    pub goal: AreaId,
    pub hops: usize,
    pub cost: f32,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Attach place names to each step of `path`.
    pub fn from_path(mesh: &NavMesh, path: &Path) -> Self {
        let steps = path
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| RouteStep {
                index,
                area: node.area,
                place: mesh
                    .area(node.area)
                    .and_then(NavArea::place_name)
                    .map(str::to_string),
                cost_from_start: node.cost_from_start,
            })
            .collect::<Vec<_>>();

        Self {
            start: steps.first().map(|step| step.area).unwrap_or_default(),
            goal: steps.last().map(|step| step.area).unwrap_or_default(),
            hops: steps.len().saturating_sub(1),
            cost: path.cost(),
            steps,
        }
    }

    pub fn render(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, cost {:.2})",
            self.start, self.goal, self.hops, self.cost
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: area {} [{}] {:.2}",
                step.index,
                step.area,
                step.place.as_deref().unwrap_or("<unnamed>"),
                step.cost_from_start
            );
        }
        buffer
    }
}
