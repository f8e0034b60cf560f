use crate::area::NavArea;
use crate::error::{Error, Result};
use crate::geometry::Vector3;
use crate::mesh::{AreaId, PlaceId};

/// Named zone grouping areas, e.g. `BombsiteA`.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    /// Member areas in load order.
    pub areas: Vec<AreaId>,
}

impl Place {
    pub fn new(id: PlaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            areas: Vec::new(),
        }
    }

    /// Footprint-area weighted centroid of the given member areas.
    ///
    /// Fails with [`Error::InvalidGeometry`] when the members have no total
    /// footprint area (including when there are no members at all).
    pub fn estimated_center<'a>(
        &self,
        members: impl IntoIterator<Item = &'a NavArea>,
    ) -> Result<Vector3> {
        let mut accumulated = Vector3::ZERO;
        let mut weight = 0.0_f32;

        for area in members {
            let footprint = area.rough_area();
            accumulated += area.center() * footprint;
            weight += footprint;
        }

        if weight == 0.0 {
            return Err(Error::InvalidGeometry {
                message: format!(
                    "cannot estimate center of place '{}': member areas have no footprint area",
                    self.name
                ),
            });
        }

        Ok(accumulated / weight)
    }
}
