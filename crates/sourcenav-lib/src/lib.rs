//! Source-engine navigation mesh library.
//!
//! This crate decodes `.nav` files into an in-memory area graph, links the
//! numeric cross-references, indexes area footprints in a loose quadtree, and
//! runs A* over the linked graph. Higher-level consumers (the CLI) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

pub mod area;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod ladder;
pub mod loader;
pub mod mesh;
pub mod output;
pub mod path;
pub mod place;
mod queue;
pub mod spatial;

pub use area::{Connection, Direction, NavArea};
pub use error::{Error, Result};
pub use geometry::{AreaExtent, Vector3};
pub use graph::{Edge, EdgeKind, LinkOptions};
pub use ladder::{Ladder, LadderConnection, LadderDirection};
pub use loader::{decode_nav_mesh, load_nav_mesh, parse_nav_mesh};
pub use mesh::{AreaId, FormatInfo, LadderId, NavMesh, NavMeshBuilder, PlaceId};
pub use output::{AreaSummary, MeshSummary, RouteSummary};
pub use path::{find_path, find_path_default, CostFns, EuclideanCost, Path, PathCost, PathNode};
pub use place::Place;
pub use spatial::QuadTree;
