//! Vector and footprint primitives shared by the mesh, the quadtree and the
//! path search.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use serde::Serialize;

/// A point or direction in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared length; cheaper than [`Vector3::length`] when only comparing.
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction. A zero vector yields NaN components,
    /// following IEEE-754 division.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Copy of this vector with the height component dropped.
    pub fn flattened(&self) -> Self {
        Self::new(self.x, self.y, 0.0)
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f32) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f32) -> Vector3 {
        Vector3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Rectangular floor footprint with a height at each corner.
///
/// The north-west and south-east corners carry their own Z; the remaining two
/// corners store only their height, the X/Y being derived from the explicit
/// corners. North is the smaller Y, west the smaller X.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AreaExtent {
    pub north_west: Vector3,
    pub south_east: Vector3,
    pub north_east_z: f32,
    pub south_west_z: f32,
}

impl AreaExtent {
    /// Flat footprint at a single height.
    pub fn flat(north_west: (f32, f32), south_east: (f32, f32), z: f32) -> Self {
        Self {
            north_west: Vector3::new(north_west.0, north_west.1, z),
            south_east: Vector3::new(south_east.0, south_east.1, z),
            north_east_z: z,
            south_west_z: z,
        }
    }

    pub fn north_east(&self) -> Vector3 {
        Vector3::new(self.south_east.x, self.north_west.y, self.north_east_z)
    }

    pub fn south_west(&self) -> Vector3 {
        Vector3::new(self.north_west.x, self.south_east.y, self.south_west_z)
    }

    pub fn width(&self) -> f32 {
        self.south_east.x - self.north_west.x
    }

    pub fn depth(&self) -> f32 {
        self.south_east.y - self.north_west.y
    }

    /// Center of the footprint, lifted onto the floor.
    pub fn center(&self) -> Vector3 {
        let x = (self.north_west.x + self.south_east.x) / 2.0;
        let y = (self.north_west.y + self.south_east.y) / 2.0;
        Vector3::new(x, y, self.interpolate_z(x, y))
    }

    /// Rough footprint area (width × depth), ignoring slope.
    pub fn rough_area(&self) -> f32 {
        self.width() * self.depth()
    }

    /// Whether the X/Y projection of `point` lies inside the footprint.
    /// Edges are inclusive.
    pub fn contains_xy(&self, point: Vector3) -> bool {
        self.north_west.x <= point.x
            && self.north_west.y <= point.y
            && self.south_east.x >= point.x
            && self.south_east.y >= point.y
    }

    /// Whether `other` fits entirely inside this footprint (2D).
    pub fn encloses(&self, other: &AreaExtent) -> bool {
        self.north_west.x <= other.north_west.x
            && self.north_west.y <= other.north_west.y
            && self.south_east.x >= other.south_east.x
            && self.south_east.y >= other.south_east.y
    }

    /// Floor height at `(x, y)`, or `None` when the point is outside the footprint.
    pub fn z_at(&self, x: f32, y: f32) -> Option<f32> {
        self.contains_xy(Vector3::new(x, y, 0.0))
            .then(|| self.interpolate_z(x, y))
    }

    /// Signed height of `point` above the floor directly beneath (or above) it.
    /// The floor height is sampled at the closest footprint position.
    pub fn z_distance(&self, point: Vector3) -> f32 {
        point.z - self.closest_point(point).z
    }

    /// The point on this floor closest to `point` in the X/Y plane.
    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        let x = point.x.clamp(self.north_west.x, self.south_east.x.max(self.north_west.x));
        let y = point.y.clamp(self.north_west.y, self.south_east.y.max(self.north_west.y));
        Vector3::new(x, y, self.interpolate_z(x, y))
    }

    // Interpolates along the north and south edges at `x`, then between those
    // two heights at `y`. Zero-width or zero-depth footprints collapse to the
    // edge they degenerate onto.
    fn interpolate_z(&self, x: f32, y: f32) -> f32 {
        let width = self.width();
        let depth = self.depth();
        let tx = if width > 0.0 {
            (self.south_east.x - x) / width
        } else {
            0.0
        };
        let ty = if depth > 0.0 {
            (self.south_east.y - y) / depth
        } else {
            0.0
        };

        let north_z = self.north_east_z + (self.north_west.z - self.north_east_z) * tx;
        let south_z = self.south_east.z + (self.south_west_z - self.south_east.z) * tx;

        south_z + (north_z - south_z) * ty
    }
}
