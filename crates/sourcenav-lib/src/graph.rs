//! Link pass and edge expansion over the area graph.
//!
//! The loader records every relation as a raw numeric id. Linking resolves
//! those ids against the id → entity maps once, storing `Some(id)` for live
//! targets and `None` for ids that name nothing (the zero sentinel included).
//! Each area only writes its own relation fields, so areas are linked in
//! parallel with rayon; the parallel iterator joins before `link` returns.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::area::{Connection, NavArea};
use crate::ladder::{Ladder, LadderDirection};
use crate::mesh::{AreaId, LadderId, NavMesh};

/// Options for the link pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOptions {
    /// Resolve areas on the rayon thread pool instead of the calling thread.
    pub parallel: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl LinkOptions {
    pub fn sequential() -> Self {
        Self { parallel: false }
    }
}

fn resolve<T>(map: &HashMap<u32, T>, id: u32) -> Option<u32> {
    map.contains_key(&id).then_some(id)
}

fn link_area(
    area: &mut NavArea,
    areas: &HashMap<AreaId, ()>,
    ladders: &HashMap<LadderId, Ladder>,
) {
    for connection in &mut area.connections {
        connection.target = resolve(areas, connection.target_id);
    }

    for path in &mut area.encounter_paths {
        path.from = resolve(areas, path.from_id);
        path.to = resolve(areas, path.to_id);
    }

    for connection in &mut area.ladder_connections {
        connection.ladder = resolve(ladders, connection.target_id);
    }

    for visible in &mut area.visible_areas {
        visible.area = resolve(areas, visible.area_id);
    }
}

pub(crate) fn link_areas(
    areas: &mut HashMap<AreaId, NavArea>,
    ladders: &HashMap<LadderId, Ladder>,
    options: LinkOptions,
) {
    // Key snapshot so areas can be mutated while their targets are looked up.
    let known: HashMap<AreaId, ()> = areas.keys().map(|&id| (id, ())).collect();

    if options.parallel {
        areas
            .par_iter_mut()
            .for_each(|(_, area)| link_area(area, &known, ladders));
    } else {
        areas
            .values_mut()
            .for_each(|area| link_area(area, &known, ladders));
    }
}

pub(crate) fn link_ladders(
    ladders: &mut HashMap<LadderId, Ladder>,
    areas: &HashMap<AreaId, NavArea>,
    options: LinkOptions,
) {
    let link = |ladder: &mut Ladder| {
        for slot in ladder.attachments_mut() {
            slot.area = resolve(areas, slot.area_id);
        }
    };

    if options.parallel {
        ladders.par_iter_mut().for_each(|(_, ladder)| link(ladder));
    } else {
        ladders.values_mut().for_each(link);
    }
}

/// How an edge of the search graph is traversed.
#[derive(Debug, Clone, Copy)]
pub enum EdgeKind<'a> {
    /// Walking across a direct area-to-area connection.
    Walk(&'a Connection),
    /// Climbing a ladder in the given direction.
    Ladder {
        ladder: &'a Ladder,
        direction: LadderDirection,
    },
}

/// Outgoing edge of an area in the search graph.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'a> {
    pub target: AreaId,
    pub kind: EdgeKind<'a>,
}

impl NavMesh {
    /// Outgoing edges of `area`: resolved connections first, then every area
    /// reachable through its ladder connections. An upward ladder contributes
    /// one edge per resolved top attachment.
    pub fn neighbours<'a>(&'a self, area: &'a NavArea) -> impl Iterator<Item = Edge<'a>> + 'a {
        let walks = area.connections.iter().filter_map(|connection| {
            connection.target.map(|target| Edge {
                target,
                kind: EdgeKind::Walk(connection),
            })
        });

        let climbs = area
            .ladder_connections
            .iter()
            .filter_map(move |connection| {
                let ladder = self.ladder(connection.ladder?)?;
                Some((ladder, connection.direction))
            })
            .flat_map(|(ladder, direction)| {
                ladder.reachable_areas(direction).map(move |target| Edge {
                    target,
                    kind: EdgeKind::Ladder { ladder, direction },
                })
            });

        walks.chain(climbs)
    }
}
