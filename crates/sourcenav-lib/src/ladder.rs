use serde::Serialize;

use crate::geometry::Vector3;
use crate::mesh::{AreaId, LadderId};

/// Direction of travel on a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderDirection {
    Up,
    Down,
}

impl LadderDirection {
    /// Both directions in file order.
    pub const ALL: [LadderDirection; 2] = [LadderDirection::Up, LadderDirection::Down];

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(LadderDirection::Up),
            1 => Some(LadderDirection::Down),
            _ => None,
        }
    }
}

/// Directed edge from an area onto a ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderConnection {
    pub source: AreaId,
    /// Raw ladder identifier as stored in the file.
    pub target_id: LadderId,
    /// Ladder resolved by the link pass.
    pub ladder: Option<LadderId>,
    pub direction: LadderDirection,
}

impl LadderConnection {
    pub fn new(source: AreaId, target_id: LadderId, direction: LadderDirection) -> Self {
        Self {
            source,
            target_id,
            ladder: None,
            direction,
        }
    }
}

/// One of the five positions where an area can attach to a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LadderAttachment {
    /// Raw area identifier; zero means "no area".
    pub area_id: AreaId,
    /// Area resolved by the link pass.
    pub area: Option<AreaId>,
}

impl LadderAttachment {
    pub fn new(area_id: AreaId) -> Self {
        Self {
            area_id,
            area: None,
        }
    }
}

/// Climbable transition between floors.
#[derive(Debug, Clone, PartialEq)]
pub struct Ladder {
    pub id: LadderId,
    pub width: f32,
    /// Physical length of the ladder.
    pub length: f32,
    /// Center of the top of the ladder.
    pub top: Vector3,
    /// Center of the bottom of the ladder.
    pub bottom: Vector3,
    pub direction: LadderDirection,
    pub top_forward: LadderAttachment,
    pub top_left: LadderAttachment,
    pub top_right: LadderAttachment,
    pub top_behind: LadderAttachment,
    pub bottom_area: LadderAttachment,
}

impl Ladder {
    pub fn new(id: LadderId, top: Vector3, bottom: Vector3, direction: LadderDirection) -> Self {
        Self {
            id,
            width: 0.0,
            length: (top - bottom).length(),
            top,
            bottom,
            direction,
            top_forward: LadderAttachment::default(),
            top_left: LadderAttachment::default(),
            top_right: LadderAttachment::default(),
            top_behind: LadderAttachment::default(),
            bottom_area: LadderAttachment::default(),
        }
    }

    pub(crate) fn attachments_mut(&mut self) -> [&mut LadderAttachment; 5] {
        [
            &mut self.top_forward,
            &mut self.top_left,
            &mut self.top_right,
            &mut self.top_behind,
            &mut self.bottom_area,
        ]
    }

    /// Areas reachable by travelling along this ladder in `direction`.
    ///
    /// Going up exposes the resolved top positions (behind, forward, right,
    /// left); going down exposes only the bottom area.
    pub fn reachable_areas(&self, direction: LadderDirection) -> impl Iterator<Item = AreaId> {
        let slots = match direction {
            LadderDirection::Up => [
                self.top_behind.area,
                self.top_forward.area,
                self.top_right.area,
                self.top_left.area,
            ],
            LadderDirection::Down => [self.bottom_area.area, None, None, None],
        };
        slots.into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder() -> Ladder {
        let mut ladder = Ladder::new(
            7,
            Vector3::new(0.0, 0.0, 100.0),
            Vector3::new(0.0, 0.0, 0.0),
            LadderDirection::Up,
        );
        ladder.top_forward = LadderAttachment { area_id: 2, area: Some(2) };
        ladder.top_left = LadderAttachment { area_id: 9, area: None };
        ladder.top_behind = LadderAttachment { area_id: 3, area: Some(3) };
        ladder.bottom_area = LadderAttachment { area_id: 1, area: Some(1) };
        ladder
    }

    #[test]
    fn going_up_exposes_resolved_top_positions() {
        let areas: Vec<_> = ladder().reachable_areas(LadderDirection::Up).collect();
        assert_eq!(areas, vec![3, 2]);
    }

    #[test]
    fn going_down_exposes_bottom_only() {
        let areas: Vec<_> = ladder().reachable_areas(LadderDirection::Down).collect();
        assert_eq!(areas, vec![1]);
    }

    #[test]
    fn default_length_spans_top_to_bottom() {
        assert_eq!(ladder().length, 100.0);
    }
}
