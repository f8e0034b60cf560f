use std::fmt;

use serde::Serialize;

use crate::geometry::{AreaExtent, Vector3};
use crate::ladder::{LadderConnection, LadderDirection};
use crate::mesh::{AreaId, LadderId, PlaceId};

/// Cardinal direction of a connection, as recorded in the nav file.
///
/// Kept for diagnostics; the path search does not consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in file order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Directed edge from one area to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: AreaId,
    /// Raw target identifier as stored in the file.
    pub target_id: AreaId,
    /// Target resolved by the link pass; `None` when `target_id` names no area.
    pub target: Option<AreaId>,
    pub direction: Direction,
}

impl Connection {
    pub fn new(source: AreaId, target_id: AreaId, direction: Direction) -> Self {
        Self {
            source,
            target_id,
            target: None,
            direction,
        }
    }
}

/// Spot inside an area that offers cover.
#[derive(Debug, Clone, PartialEq)]
pub struct HidingSpot {
    pub id: u32,
    pub location: Vector3,
    pub flags: u8,
}

/// A spot along an encounter path.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterSpot {
    pub order_id: u32,
    /// Position along the path, quantised to `[0, 1]`.
    pub parametric_distance: f32,
}

/// Precomputed line of sight through an area between two neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterPath {
    pub from_id: AreaId,
    pub from: Option<AreaId>,
    /// Raw direction byte; not validated.
    pub from_direction: u8,
    pub to_id: AreaId,
    pub to: Option<AreaId>,
    pub to_direction: u8,
    pub spots: Vec<EncounterSpot>,
}

/// Area that is potentially visible from the owning area.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleArea {
    pub area_id: AreaId,
    pub area: Option<AreaId>,
    pub attributes: u8,
}

/// Light intensity sampled at each corner of an area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerLight {
    pub north_west: f32,
    pub north_east: f32,
    pub south_east: f32,
    pub south_west: f32,
}

/// Traversable floor cell.
#[derive(Debug, Clone, PartialEq)]
pub struct NavArea {
    pub id: AreaId,
    pub extent: AreaExtent,
    pub flags: u32,
    /// Place back-reference; `None` for unnamed areas.
    pub place: Option<PlaceId>,
    pub(crate) place_name: Option<String>,
    pub connections: Vec<Connection>,
    pub ladder_connections: Vec<LadderConnection>,
    pub hiding_spots: Vec<HidingSpot>,
    pub encounter_paths: Vec<EncounterPath>,
    pub visible_areas: Vec<VisibleArea>,
    pub inherit_visibility_from: AreaId,
    pub earliest_occupy_time: [f32; 2],
    pub light_intensity: CornerLight,
}

impl NavArea {
    /// Empty area with the given footprint and no relations.
    pub fn new(id: AreaId, extent: AreaExtent) -> Self {
        Self {
            id,
            extent,
            flags: 0,
            place: None,
            place_name: None,
            connections: Vec::new(),
            ladder_connections: Vec::new(),
            hiding_spots: Vec::new(),
            encounter_paths: Vec::new(),
            visible_areas: Vec::new(),
            inherit_visibility_from: 0,
            earliest_occupy_time: [0.0; 2],
            light_intensity: CornerLight::default(),
        }
    }

    /// Add an outgoing connection to `target_id`.
    pub fn connect(&mut self, target_id: AreaId, direction: Direction) -> &mut Self {
        self.connections
            .push(Connection::new(self.id, target_id, direction));
        self
    }

    /// Add an outgoing ladder connection to `ladder_id`.
    pub fn connect_ladder(&mut self, ladder_id: LadderId, direction: LadderDirection) -> &mut Self {
        self.ladder_connections
            .push(LadderConnection::new(self.id, ladder_id, direction));
        self
    }

    pub fn center(&self) -> Vector3 {
        self.extent.center()
    }

    /// Floor height at `(x, y)`; `None` outside the footprint.
    pub fn z_at(&self, x: f32, y: f32) -> Option<f32> {
        self.extent.z_at(x, y)
    }

    pub fn contains_xy(&self, point: Vector3) -> bool {
        self.extent.contains_xy(point)
    }

    pub fn rough_area(&self) -> f32 {
        self.extent.rough_area()
    }

    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        self.extent.closest_point(point)
    }

    /// Name of the place this area belongs to, once linked into a mesh.
    pub fn place_name(&self) -> Option<&str> {
        self.place_name.as_deref()
    }
}

impl fmt::Display for NavArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AreaID: {} [{}] @ {{{}, {}}}",
            self.id,
            self.place_name().unwrap_or("<null>"),
            self.extent.north_west,
            self.extent.south_east
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_record_source_and_direction() {
        let mut area = NavArea::new(3, AreaExtent::flat((0.0, 0.0), (4.0, 4.0), 0.0));
        area.connect(4, Direction::East)
            .connect_ladder(9, LadderDirection::Down);

        assert_eq!(area.connections, vec![Connection::new(3, 4, Direction::East)]);
        assert_eq!(area.connections[0].target, None);
        assert_eq!(area.ladder_connections[0].source, 3);
        assert_eq!(area.ladder_connections[0].target_id, 9);
    }

    #[test]
    fn display_names_place_or_null() {
        let mut area = NavArea::new(7, AreaExtent::flat((0.0, 0.0), (2.0, 3.0), 1.0));
        assert_eq!(area.to_string(), "AreaID: 7 [<null>] @ {(0, 0, 1), (2, 3, 1)}");
        area.place_name = Some("Ramp".to_string());
        assert_eq!(area.to_string(), "AreaID: 7 [Ramp] @ {(0, 0, 1), (2, 3, 1)}");
    }
}
