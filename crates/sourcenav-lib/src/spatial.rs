//! Loose point-region quadtree over area footprints.
//!
//! The tree answers "which area is under this point" queries. Areas are stored
//! in the deepest node that fully encloses their 2D footprint, so areas that
//! straddle a quadrant boundary stay at the lowest common ancestor. Lookups pick
//! the candidate whose interpolated floor height is closest to the query point,
//! which is what separates stacked floors on multi-storey maps.
//!
//! Nodes live in a flat arena addressed by index; a subdivided node owns four
//! children in north-west, north-east, south-west, south-east order.

use thiserror::Error;
use tracing::{debug, warn};

use crate::geometry::{AreaExtent, Vector3};
use crate::mesh::AreaId;

/// Number of areas a leaf holds before it subdivides.
pub const PREFERRED_NODE_CAPACITY: usize = 4;

/// Half the side length of the default root node. Source maps live inside
/// ±16384 units on both horizontal axes.
pub const DEFAULT_WORLD_HALF_EXTENT: f32 = 16384.0;

const ROOT: usize = 0;

/// Raised when an area footprint does not fit inside the node it is inserted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("area {id} is not fully contained within the quadtree node bounds")]
pub struct NodeBoundsViolation {
    pub id: AreaId,
}

/// Entry stored in the tree: the area id plus a copy of its footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedArea {
    pub id: AreaId,
    pub extent: AreaExtent,
}

#[derive(Debug, Clone)]
struct QuadNode {
    bounds: AreaExtent,
    areas: Vec<IndexedArea>,
    children: Option<[usize; 4]>,
}

impl QuadNode {
    fn new(north_west: (f32, f32), south_east: (f32, f32)) -> Self {
        Self {
            bounds: AreaExtent::flat(north_west, south_east, 0.0),
            areas: Vec::new(),
            children: None,
        }
    }
}

/// Default containment rule for point lookups.
///
/// With `allow_below` set, any footprint under or over the point qualifies. Without
/// it, the point must be at or above the floor, i.e. only floors beneath the
/// point are eligible.
pub fn default_containment(extent: &AreaExtent, point: Vector3, allow_below: bool) -> bool {
    allow_below || extent.z_distance(point) >= 0.0
}

/// Spatial index over area footprints.
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    len: usize,
}

impl Default for QuadTree {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadTree {
    /// Tree covering the default Source world bounds.
    pub fn new() -> Self {
        Self::with_bounds(
            (-DEFAULT_WORLD_HALF_EXTENT, -DEFAULT_WORLD_HALF_EXTENT),
            (DEFAULT_WORLD_HALF_EXTENT, DEFAULT_WORLD_HALF_EXTENT),
        )
    }

    /// Tree covering the rectangle between `north_west` and `south_east`.
    pub fn with_bounds(north_west: (f32, f32), south_east: (f32, f32)) -> Self {
        Self {
            nodes: vec![QuadNode::new(north_west, south_east)],
            len: 0,
        }
    }

    /// Bounds of the root node.
    pub fn bounds(&self) -> AreaExtent {
        self.nodes[ROOT].bounds
    }

    /// Number of indexed areas.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert an area footprint.
    ///
    /// Fails when the footprint is not enclosed by the root bounds; the tree is
    /// left untouched in that case.
    pub fn insert(&mut self, id: AreaId, extent: AreaExtent) -> Result<(), NodeBoundsViolation> {
        self.insert_at(ROOT, IndexedArea { id, extent })?;
        self.len += 1;
        Ok(())
    }

    fn insert_at(&mut self, node: usize, entry: IndexedArea) -> Result<usize, NodeBoundsViolation> {
        if !self.nodes[node].bounds.encloses(&entry.extent) {
            return Err(NodeBoundsViolation { id: entry.id });
        }

        if let Some(children) = self.nodes[node].children {
            for child in children {
                if let Ok(placed) = self.insert_at(child, entry) {
                    return Ok(placed);
                }
            }
            self.nodes[node].areas.push(entry);
            return Ok(node);
        }

        if self.nodes[node].areas.len() >= PREFERRED_NODE_CAPACITY && self.can_subdivide(node) {
            self.subdivide(node);
            return self.insert_at(node, entry);
        }

        self.nodes[node].areas.push(entry);
        Ok(node)
    }

    // Stops subdividing once the midpoint can no longer split the node, which
    // only happens for degenerate clusters at float precision limits.
    fn can_subdivide(&self, node: usize) -> bool {
        let bounds = &self.nodes[node].bounds;
        let (mid_x, mid_y) = midpoint(bounds);
        bounds.north_west.x < mid_x
            && mid_x < bounds.south_east.x
            && bounds.north_west.y < mid_y
            && mid_y < bounds.south_east.y
    }

    fn subdivide(&mut self, node: usize) {
        let bounds = self.nodes[node].bounds;
        let (nw_x, nw_y) = (bounds.north_west.x, bounds.north_west.y);
        let (se_x, se_y) = (bounds.south_east.x, bounds.south_east.y);
        let (mid_x, mid_y) = midpoint(&bounds);

        let first = self.nodes.len();
        self.nodes.push(QuadNode::new((nw_x, nw_y), (mid_x, mid_y)));
        self.nodes.push(QuadNode::new((mid_x, nw_y), (se_x, mid_y)));
        self.nodes.push(QuadNode::new((nw_x, mid_y), (mid_x, se_y)));
        self.nodes.push(QuadNode::new((mid_x, mid_y), (se_x, se_y)));
        self.nodes[node].children = Some([first, first + 1, first + 2, first + 3]);

        let existing = std::mem::take(&mut self.nodes[node].areas);
        debug!(node, relocated = existing.len(), "subdividing quadtree node");
        for entry in existing {
            // Every entry was enclosed by this node, so re-insertion cannot fail.
            if let Err(violation) = self.insert_at(node, entry) {
                debug_assert!(false, "{violation}");
                warn!(area = violation.id, node, "entry lost while subdividing");
            }
        }
    }

    /// Find the area under `point` whose floor is closest in height, using
    /// [`default_containment`].
    pub fn find_by_point(&self, point: Vector3, allow_below: bool) -> Option<AreaId> {
        self.find_by_point_with(point, |entry, point| {
            default_containment(&entry.extent, point, allow_below)
        })
        .map(|entry| entry.id)
    }

    /// Find the best area under `point` among footprints accepted by `eligible`.
    ///
    /// Candidates are ranked by absolute height difference between the point
    /// and the interpolated floor; on equal distances the first candidate seen
    /// is kept.
    pub fn find_by_point_with<F>(&self, point: Vector3, eligible: F) -> Option<&IndexedArea>
    where
        F: Fn(&IndexedArea, Vector3) -> bool,
    {
        self.find_in(ROOT, point, &eligible)
    }

    fn find_in<F>(&self, node: usize, point: Vector3, eligible: &F) -> Option<&IndexedArea>
    where
        F: Fn(&IndexedArea, Vector3) -> bool,
    {
        let current = &self.nodes[node];
        if !current.bounds.contains_xy(point) {
            return None;
        }

        let mut best: Option<(&IndexedArea, f32)> = None;
        let z_gap = |entry: &IndexedArea| entry.extent.z_distance(point).abs();

        for entry in &current.areas {
            if entry.extent.contains_xy(point) && eligible(entry, point) {
                let distance = z_gap(entry);
                if best.map_or(true, |(_, known)| distance < known) {
                    best = Some((entry, distance));
                }
            }
        }

        // A point on a quadrant boundary lies in more than one child; all of
        // them are searched.
        if let Some(children) = current.children {
            for child in children {
                if let Some(entry) = self.find_in(child, point, eligible) {
                    let distance = z_gap(entry);
                    if best.map_or(true, |(_, known)| distance < known) {
                        best = Some((entry, distance));
                    }
                }
            }
        }

        best.map(|(entry, _)| entry)
    }

    /// Iterate every indexed entry, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedArea> {
        self.nodes.iter().flat_map(|node| node.areas.iter())
    }
}

fn midpoint(bounds: &AreaExtent) -> (f32, f32) {
    (
        (bounds.north_west.x + bounds.south_east.x) / 2.0,
        (bounds.north_west.y + bounds.south_east.y) / 2.0,
    )
}
