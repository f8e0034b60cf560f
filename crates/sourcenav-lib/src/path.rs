//! A* search over linked areas.
//!
//! Edges are an area's resolved connections plus the areas reachable through
//! its ladder connections. Walking and climbing are priced by separate
//! callbacks on [`PathCost`], and the heuristic steers expansion. The search is
//! optimal only when the heuristic never overestimates and is consistent;
//! that is the caller's obligation.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::area::{Connection, NavArea};
use crate::error::{Error, Result};
use crate::graph::EdgeKind;
use crate::ladder::{Ladder, LadderDirection};
use crate::mesh::{AreaId, NavMesh};
use crate::queue::OpenSet;

/// Cost model consulted by [`find_path`].
pub trait PathCost {
    /// Cost of walking `connection` from `from` into `to`.
    fn connection_cost(&self, connection: &Connection, from: &NavArea, to: &NavArea) -> f32;

    /// Cost of taking `ladder` in `direction` from `from` to `to`.
    fn ladder_cost(
        &self,
        ladder: &Ladder,
        direction: LadderDirection,
        from: &NavArea,
        to: &NavArea,
    ) -> f32;

    /// Estimated remaining cost from `from` to `goal`.
    fn heuristic(&self, from: &NavArea, goal: &NavArea) -> f32;
}

/// Straight-line distances between area centers.
///
/// Walking costs the 3D distance between centers; climbing costs the ladder's
/// length plus the horizontal distance between the two areas' centers. The
/// heuristic is the 3D center distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanCost;

impl PathCost for EuclideanCost {
    fn connection_cost(&self, _connection: &Connection, from: &NavArea, to: &NavArea) -> f32 {
        from.center().distance(&to.center())
    }

    fn ladder_cost(
        &self,
        ladder: &Ladder,
        _direction: LadderDirection,
        from: &NavArea,
        to: &NavArea,
    ) -> f32 {
        // Height is already covered by the ladder length.
        (from.center() - to.center()).flattened().length() + ladder.length
    }

    fn heuristic(&self, from: &NavArea, goal: &NavArea) -> f32 {
        from.center().distance(&goal.center())
    }
}

/// Adapts three closures into a [`PathCost`].
pub struct CostFns<A, L, H> {
    pub connection: A,
    pub ladder: L,
    pub heuristic: H,
}

impl<A, L, H> PathCost for CostFns<A, L, H>
where
    A: Fn(&Connection, &NavArea, &NavArea) -> f32,
    L: Fn(&Ladder, LadderDirection, &NavArea, &NavArea) -> f32,
    H: Fn(&NavArea, &NavArea) -> f32,
{
    fn connection_cost(&self, connection: &Connection, from: &NavArea, to: &NavArea) -> f32 {
        (self.connection)(connection, from, to)
    }

    fn ladder_cost(
        &self,
        ladder: &Ladder,
        direction: LadderDirection,
        from: &NavArea,
        to: &NavArea,
    ) -> f32 {
        (self.ladder)(ladder, direction, from, to)
    }

    fn heuristic(&self, from: &NavArea, goal: &NavArea) -> f32 {
        (self.heuristic)(from, goal)
    }
}

/// One area along a path with the accumulated cost to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathNode {
    pub area: AreaId,
    pub cost_from_start: f32,
}

/// Least-cost sequence of areas from start to goal, both included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub nodes: Vec<PathNode>,
}

impl Path {
    /// Total cost: the accumulated cost at the goal.
    pub fn cost(&self) -> f32 {
        self.nodes
            .last()
            .map(|node| node.cost_from_start)
            .unwrap_or_default()
    }

    pub fn areas(&self) -> Vec<AreaId> {
        self.nodes.iter().map(|node| node.area).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

struct SearchNode<'a> {
    area: &'a NavArea,
    parent: Option<usize>,
    cost_from_start: f32,
    closed: bool,
}

/// Find the least-cost path from `start` to `goal` using [`EuclideanCost`].
pub fn find_path_default(mesh: &NavMesh, start: AreaId, goal: AreaId) -> Result<Path> {
    find_path(mesh, start, goal, &EuclideanCost)
}

/// Find the least-cost path from `start` to `goal` with a caller-supplied cost model.
///
/// Fails with [`Error::UnknownArea`] if either endpoint is not in the mesh and
/// with [`Error::PathNotFound`] when the goal is unreachable. Among several
/// equally cheap paths, which one is returned depends on queue order.
pub fn find_path<C>(mesh: &NavMesh, start: AreaId, goal: AreaId, costs: &C) -> Result<Path>
where
    C: PathCost + ?Sized,
{
    let start_area = mesh.area(start).ok_or(Error::UnknownArea { id: start })?;
    let goal_area = mesh.area(goal).ok_or(Error::UnknownArea { id: goal })?;

    let mut nodes = vec![SearchNode {
        area: start_area,
        parent: None,
        cost_from_start: 0.0,
        closed: false,
    }];
    let mut lookup: HashMap<AreaId, usize> = HashMap::from([(start, 0)]);
    let mut open = OpenSet::new();
    open.push(0, costs.heuristic(start_area, goal_area));
    let mut expanded = 0usize;
    let mut peak_open = open.len();

    while let Some(slot) = open.pop() {
        let current = nodes[slot].area;
        if current.id == goal {
            let path = reconstruct_path(&nodes, slot);
            debug!(
                start,
                goal,
                expanded,
                peak_open,
                hops = path.len(),
                cost = path.cost(),
                "found path"
            );
            return Ok(path);
        }

        nodes[slot].closed = true;
        expanded += 1;
        let current_cost = nodes[slot].cost_from_start;

        for edge in mesh.neighbours(current) {
            let seen = lookup.get(&edge.target).copied();
            if seen.is_some_and(|known| nodes[known].closed) {
                continue;
            }
            let Some(target) = mesh.area(edge.target) else {
                continue;
            };

            let step = match edge.kind {
                EdgeKind::Walk(connection) => costs.connection_cost(connection, current, target),
                EdgeKind::Ladder { ladder, direction } => {
                    costs.ladder_cost(ladder, direction, current, target)
                }
            };
            let candidate = current_cost + step;

            match seen {
                None => {
                    let next = nodes.len();
                    nodes.push(SearchNode {
                        area: target,
                        parent: Some(slot),
                        cost_from_start: candidate,
                        closed: false,
                    });
                    lookup.insert(edge.target, next);
                    open.push(next, candidate + costs.heuristic(target, goal_area));
                }
                Some(known) if candidate < nodes[known].cost_from_start => {
                    nodes[known].parent = Some(slot);
                    nodes[known].cost_from_start = candidate;
                    open.update(known, candidate + costs.heuristic(target, goal_area));
                }
                Some(_) => {}
            }
        }
        peak_open = peak_open.max(open.len());
    }

    debug!(start, goal, expanded, "open set exhausted without reaching goal");
    Err(Error::PathNotFound { start, goal })
}

fn reconstruct_path(nodes: &[SearchNode<'_>], goal_slot: usize) -> Path {
    let mut path = Vec::new();
    let mut current = Some(goal_slot);
    while let Some(slot) = current {
        let node = &nodes[slot];
        path.push(PathNode {
            area: node.area.id,
            cost_from_start: node.cost_from_start,
        });
        current = node.parent;
    }
    path.reverse();
    Path { nodes: path }
}
